use serde::{Deserialize, Serialize};

use crate::utils::math::vector::ZeroSpVec;

/// Sparse document-term matrix.
/// Every row carries the position and the key of its source document in the
/// corpus table. Skipped rows leave gaps in the positions, never renumber them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTermMatrix {
    n_cols: usize,
    rows: Vec<ZeroSpVec<f64>>,
    doc_rows: Vec<usize>,
    doc_keys: Vec<Box<str>>,
}

impl DocTermMatrix {
    /// # Arguments
    /// * `n_cols` - vocabulary size, every row must have this length
    /// * `rows` - one weighted vector per document
    /// * `doc_rows` - corpus position of each row, strictly ascending
    /// * `doc_keys` - one key per row, same order
    pub fn new(
        n_cols: usize,
        rows: Vec<ZeroSpVec<f64>>,
        doc_rows: Vec<usize>,
        doc_keys: Vec<Box<str>>,
    ) -> Self {
        debug_assert_eq!(rows.len(), doc_rows.len());
        debug_assert_eq!(rows.len(), doc_keys.len());
        debug_assert!(rows.iter().all(|r| r.len() == n_cols));
        Self {
            n_cols,
            rows,
            doc_rows,
            doc_keys,
        }
    }

    /// Check the shape invariants of a matrix read from outside
    pub fn validate(&self) -> Result<(), String> {
        if self.rows.len() != self.doc_keys.len() {
            return Err(format!(
                "{} rows but {} document keys",
                self.rows.len(),
                self.doc_keys.len()
            ));
        }
        if self.rows.len() != self.doc_rows.len() {
            return Err(format!(
                "{} rows but {} document positions",
                self.rows.len(),
                self.doc_rows.len()
            ));
        }
        if let Some(w) = self.doc_rows.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "document positions not ascending: {} then {}",
                w[0], w[1]
            ));
        }
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != self.n_cols) {
            return Err(format!(
                "row {} has length {}, expected {}",
                i,
                row.len(),
                self.n_cols
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[ZeroSpVec<f64>] {
        &self.rows
    }

    /// Corpus position of every row
    #[inline]
    pub fn doc_rows(&self) -> &[usize] {
        &self.doc_rows
    }

    #[inline]
    pub fn doc_keys(&self) -> &[Box<str>] {
        &self.doc_keys
    }

    /// Number of stored non-zero entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_catches_shape_mismatch() {
        let rows = vec![ZeroSpVec::from_pairs(3, vec![(0, 1.0)]), ZeroSpVec::zeros(3)];
        let keys: Vec<Box<str>> = vec!["a".into(), "b".into()];
        let ok = DocTermMatrix::new(3, rows.clone(), vec![0, 2], keys.clone());
        assert!(ok.validate().is_ok());
        assert_eq!(ok.nnz(), 1);
        assert_eq!(ok.doc_rows(), &[0, 2]);

        let bad_keys = DocTermMatrix {
            n_cols: 3,
            rows: rows.clone(),
            doc_rows: vec![0, 1],
            doc_keys: vec!["a".into()],
        };
        assert!(bad_keys.validate().is_err());

        let bad_positions = DocTermMatrix {
            n_cols: 3,
            rows: rows.clone(),
            doc_rows: vec![2, 2],
            doc_keys: keys.clone(),
        };
        assert!(bad_positions.validate().unwrap_err().contains("ascending"));

        let bad_cols = DocTermMatrix {
            n_cols: 4,
            rows,
            doc_rows: vec![0, 1],
            doc_keys: keys,
        };
        assert!(bad_cols.validate().unwrap_err().contains("expected 4"));
    }
}
