pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod evaluate;
pub mod matrix;
pub mod tfidf;
pub mod token;

use indexmap::IndexSet;
use rayon::prelude::*;
use ::serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        analyzer::TermAnalyzer,
        config::FeatureConfig,
        corpus::Corpus,
        token::TokenFrequency,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,
    #[error("corpus yields no terms for {0}")]
    EmptyVocabulary(FeatureConfig),
}

pub type FitResult<T> = Result<T, FitError>;

/// A query projected into a vectorizer's space
#[derive(Debug, Clone)]
pub struct Projection {
    pub vector: ZeroSpVec<f64>,
    /// terms extracted from the text (with repeats)
    pub term_count: usize,
    /// extracted terms missing from the vocabulary (with repeats)
    pub oov_count: usize,
}

/// Fitted text -> vector mapping.
///
/// The vocabulary (term -> column) and, for tf-idf, the idf weights are frozen
/// at fit time. Terms unknown to the vocabulary are dropped by `transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vectorizer {
    config: FeatureConfig,
    /// column順の語彙 (辞書順)
    vocabulary: IndexSet<Box<str>>,
    /// tfidf のときだけ Some
    idf: Option<Vec<f64>>,
}

impl Vectorizer {
    /// Fit on `texts` and return the vectorizer with the weighted rows of the
    /// training texts, in input order.
    ///
    /// # Arguments
    /// * `config` - granularity and weighting
    /// * `texts` - normalized indexed texts, one per document
    pub fn fit_transform<S>(config: FeatureConfig, texts: &[S]) -> FitResult<(Self, Vec<ZeroSpVec<f64>>)>
    where
        S: AsRef<str> + Sync,
    {
        if texts.is_empty() {
            return Err(FitError::EmptyCorpus);
        }
        let analyzer = TermAnalyzer::new(config.granularity);
        let freqs: Vec<TokenFrequency> = texts
            .par_iter()
            .map(|text| analyzer.term_frequency(text.as_ref()))
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }
        if corpus.vocab_size() == 0 {
            return Err(FitError::EmptyVocabulary(config));
        }

        let vocabulary: IndexSet<Box<str>> = corpus.sorted_terms().into_iter().collect();
        let idf = tfidf::idf_for(config.weighting, &corpus, &vocabulary);
        let vectorizer = Self {
            config,
            vocabulary,
            idf,
        };
        let rows = freqs
            .par_iter()
            .map(|freq| vectorizer.weigh(freq))
            .collect();
        Ok((vectorizer, rows))
    }

    /// Fit only; rows of the training texts are discarded
    pub fn fit<S>(config: FeatureConfig, texts: &[S]) -> FitResult<Self>
    where
        S: AsRef<str> + Sync,
    {
        Self::fit_transform(config, texts).map(|(vectorizer, _)| vectorizer)
    }

    #[inline]
    fn weigh(&self, freq: &TokenFrequency) -> ZeroSpVec<f64> {
        let mut vec = tfidf::weigh(self.config.weighting, freq, &self.vocabulary, self.idf.as_deref());
        vec.shrink_to_fit();
        vec
    }

    /// Vector of a text in this vectorizer's space
    #[inline]
    pub fn transform(&self, text: &str) -> ZeroSpVec<f64> {
        self.project(text).vector
    }

    /// Like `transform`, also reporting term and out-of-vocabulary counts
    pub fn project(&self, text: &str) -> Projection {
        let freq = TermAnalyzer::new(self.config.granularity).term_frequency(text);
        let oov_count = freq
            .iter()
            .filter(|(term, _)| !self.vocabulary.contains(*term))
            .map(|(_, count)| count as usize)
            .sum();
        Projection {
            vector: self.weigh(&freq),
            term_count: freq.token_sum() as usize,
            oov_count,
        }
    }

    #[inline]
    pub fn config(&self) -> FeatureConfig {
        self.config
    }

    /// Number of columns
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column of a term
    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    /// Terms in column order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocabulary.iter().map(|t| &**t)
    }

    #[inline]
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Check the invariants of a vectorizer read from outside
    pub fn validate(&self) -> Result<(), String> {
        if let Some(idf) = &self.idf {
            if idf.len() != self.vocabulary.len() {
                return Err(format!(
                    "idf has {} entries for {} terms",
                    idf.len(),
                    self.vocabulary.len()
                ));
            }
        }
        if self.idf.is_some() != (self.config.weighting == config::Weighting::Tfidf) {
            return Err(format!("idf presence does not match weighting {}", self.config.weighting));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::config::{Granularity, Weighting};

    const TEXTS: [&str; 3] = [
        "neural network train",
        "graph database index",
        "neural network infer",
    ];

    fn cfg(g: Granularity, w: Weighting) -> FeatureConfig {
        FeatureConfig::new(g, w)
    }

    #[test]
    fn vocabulary_is_sorted_and_frozen() {
        let (vec, rows) =
            Vectorizer::fit_transform(cfg(Granularity::Unigram, Weighting::Freq), &TEXTS).unwrap();
        let vocab: Vec<&str> = vec.vocabulary().collect();
        assert_eq!(
            vocab,
            vec!["database", "graph", "index", "infer", "network", "neural", "train"]
        );
        assert_eq!(rows.len(), 3);
        let fresh = vec.transform("network brand new words");
        assert_eq!(fresh.len(), 7);
        assert_eq!(fresh.nnz(), 1);
        assert_eq!(vec.dimension(), 7);
    }

    #[test]
    fn transform_reproduces_training_rows() {
        for config in FeatureConfig::all() {
            let (vec, rows) = Vectorizer::fit_transform(config, &TEXTS).unwrap();
            for (text, row) in TEXTS.iter().zip(&rows) {
                let again = vec.transform(text);
                assert_eq!(again.as_ind_slice(), row.as_ind_slice(), "{config}");
                for (a, b) in again.as_val_slice().iter().zip(row.as_val_slice()) {
                    assert!((a - b).abs() < 1e-12, "{config}");
                }
            }
        }
    }

    #[test]
    fn idf_uses_smoothed_formula() {
        let vec = Vectorizer::fit(cfg(Granularity::Unigram, Weighting::Tfidf), &TEXTS).unwrap();
        let idf = vec.idf().unwrap();
        let neural = vec.term_index("neural").unwrap();
        let graph = vec.term_index("graph").unwrap();
        assert!((idf[neural] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf[graph] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert!(vec.validate().is_ok());
    }

    #[test]
    fn weighting_shapes_rows() {
        let texts = ["graph graph index", "index"];
        let (_, binary) = Vectorizer::fit_transform(cfg(Granularity::Unigram, Weighting::Binary), &texts).unwrap();
        assert!(binary.iter().all(|r| r.as_val_slice().iter().all(|&v| v == 1.0)));
        let (_, freq) = Vectorizer::fit_transform(cfg(Granularity::Unigram, Weighting::Freq), &texts).unwrap();
        assert_eq!(freq[0].as_val_slice(), &[2.0, 1.0]);
        let (_, tfidf) = Vectorizer::fit_transform(cfg(Granularity::Unigram, Weighting::Tfidf), &texts).unwrap();
        assert!(tfidf.iter().all(|r| (r.norm() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn bigram_vocabulary_differs_from_unigram() {
        let uni = Vectorizer::fit(cfg(Granularity::Unigram, Weighting::Freq), &TEXTS).unwrap();
        let bi = Vectorizer::fit(cfg(Granularity::Bigram, Weighting::Freq), &TEXTS).unwrap();
        let bi_terms: Vec<&str> = bi.vocabulary().collect();
        assert_eq!(
            bi_terms,
            vec!["graph database", "database index", "network infer", "network train", "neural network"]
                .into_iter()
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect::<Vec<_>>()
        );
        assert_ne!(uni.dimension(), bi.dimension());
    }

    #[test]
    fn projection_counts_unknown_terms() {
        let vec = Vectorizer::fit(cfg(Granularity::Unigram, Weighting::Tfidf), &TEXTS).unwrap();
        let p = vec.project("deep neural network deep");
        assert_eq!(p.term_count, 4);
        assert_eq!(p.oov_count, 2);
        assert_eq!(p.vector.nnz(), 2);
    }

    #[test]
    fn empty_inputs_fail() {
        let none: [&str; 0] = [];
        assert_eq!(
            Vectorizer::fit(FeatureConfig::default(), &none).unwrap_err(),
            FitError::EmptyCorpus
        );
        let config = cfg(Granularity::Bigram, Weighting::Binary);
        assert_eq!(
            Vectorizer::fit(config, &["one", "x y"]).unwrap_err(),
            FitError::EmptyVocabulary(config)
        );
    }
}
