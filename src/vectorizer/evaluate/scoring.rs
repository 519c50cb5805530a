use std::cmp::Ordering;
use std::fmt::Debug;

use rayon::prelude::*;
use serde::Serialize;

use crate::{utils::math::vector::ZeroSpVec, vectorizer::matrix::DocTermMatrix};

/// One ranked document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry {
    /// 0-based position of the document in the corpus table
    pub index: usize,
    /// document key stored with the row
    pub key: Box<str>,
    /// cosine similarity in [-1, 1]
    pub score: f64,
}

/// Structure to store search results
#[derive(Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    /// Create a new Hits instance
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score, lower index first among equal scores
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|h| !h.score.is_nan());
        // -0.0 と 0.0 は同点として扱う
        self.list.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        self
    }

    /// Keep the first `k` entries
    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry> {
        self.list.iter()
    }

    /// (index, score) pairs in rank order
    pub fn pairs(&self) -> Vec<(usize, f64)> {
        self.list.iter().map(|h| (h.index, h.score)).collect()
    }
}

impl IntoIterator for Hits {
    type Item = HitEntry;
    type IntoIter = std::vec::IntoIter<HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    #{} {:?}: {:.6}", hit.index, hit.key, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Cosine similarity of `query` against every row, top `k` first.
///
/// cosθ = A・B / (|A||B|), 0 when either norm is 0.
/// Rows are scored in parallel and collected in row order, so the result does
/// not depend on scheduling.
///
/// # Arguments
/// * `query` - query vector, same dimension as the matrix columns
/// * `matrix` - document-term matrix
/// * `k` - maximum number of hits
pub fn rank(query: &ZeroSpVec<f64>, matrix: &DocTermMatrix, k: usize) -> Hits {
    debug_assert_eq!(query.len(), matrix.n_cols());
    let query_norm = query.norm();
    let list: Vec<HitEntry> = matrix
        .rows()
        .par_iter()
        .zip(matrix.doc_rows().par_iter())
        .zip(matrix.doc_keys().par_iter())
        .map(|((row, &index), key)| HitEntry {
            index,
            key: key.clone(),
            score: query.cosine_with_norm(query_norm, row),
        })
        .collect();
    let mut hits = Hits::new(list);
    hits.sort_by_score().truncate(k);
    hits
}
