use indexmap::IndexSet;

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{config::Weighting, corpus::Corpus, token::TokenFrequency},
};

/// Weighting scheme seam.
/// Engines are stateless; everything they need is passed in.
pub trait TFIDFEngine {
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `corpus` - コーパス
    /// * `vocabulary` - 列順に並んだ語彙
    /// # Returns
    /// * `Option<Vec<f64>>` - 語彙順のIDFベクトル、IDFを使わない重み付けなら None
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<Box<str>>) -> Option<Vec<f64>>;

    /// 1文書の重みベクトルを生成するメソッド
    /// 語彙に無い term は捨てる
    /// # Arguments
    /// * `freq` - 文書の term 出現回数
    /// * `vocabulary` - 列順に並んだ語彙
    /// * `idf` - `idf_vec` の結果
    fn tf_vec(
        freq: &TokenFrequency,
        vocabulary: &IndexSet<Box<str>>,
        idf: Option<&[f64]>,
    ) -> ZeroSpVec<f64>;
}

/// 語彙に載っている term だけを (列, count) に射影する
fn project_counts(freq: &TokenFrequency, vocabulary: &IndexSet<Box<str>>) -> Vec<(u32, u32)> {
    freq.iter()
        .filter_map(|(term, count)| vocabulary.get_index_of(term).map(|idx| (idx as u32, count)))
        .collect()
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`
#[inline]
pub fn smooth_idf(doc_num: u64, doc_freq: u64) -> f64 {
    ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
}

/// Raw counts
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyEngine;

impl TFIDFEngine for FrequencyEngine {
    fn idf_vec(_corpus: &Corpus, _vocabulary: &IndexSet<Box<str>>) -> Option<Vec<f64>> {
        None
    }

    fn tf_vec(
        freq: &TokenFrequency,
        vocabulary: &IndexSet<Box<str>>,
        _idf: Option<&[f64]>,
    ) -> ZeroSpVec<f64> {
        let pairs = project_counts(freq, vocabulary)
            .into_iter()
            .map(|(idx, count)| (idx, count as f64))
            .collect();
        ZeroSpVec::from_pairs(vocabulary.len(), pairs)
    }
}

/// Presence 0 / 1
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryEngine;

impl TFIDFEngine for BinaryEngine {
    fn idf_vec(_corpus: &Corpus, _vocabulary: &IndexSet<Box<str>>) -> Option<Vec<f64>> {
        None
    }

    fn tf_vec(
        freq: &TokenFrequency,
        vocabulary: &IndexSet<Box<str>>,
        _idf: Option<&[f64]>,
    ) -> ZeroSpVec<f64> {
        let pairs = project_counts(freq, vocabulary)
            .into_iter()
            .map(|(idx, _)| (idx, 1.0))
            .collect();
        ZeroSpVec::from_pairs(vocabulary.len(), pairs)
    }
}

/// デフォルトのTF-IDFエンジン
/// count * smooth idf を L2 正規化する
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<Box<str>>) -> Option<Vec<f64>> {
        let doc_num = corpus.get_doc_num();
        let idf_vec = vocabulary
            .iter()
            .map(|term| smooth_idf(doc_num, corpus.get_term_count(term)))
            .collect();
        Some(idf_vec)
    }

    fn tf_vec(
        freq: &TokenFrequency,
        vocabulary: &IndexSet<Box<str>>,
        idf: Option<&[f64]>,
    ) -> ZeroSpVec<f64> {
        let pairs = project_counts(freq, vocabulary)
            .into_iter()
            .map(|(idx, count)| {
                let weight = idf.and_then(|idf| idf.get(idx as usize)).copied().unwrap_or(1.0);
                (idx, count as f64 * weight)
            })
            .collect();
        let mut vec = ZeroSpVec::from_pairs(vocabulary.len(), pairs);
        vec.l2_normalize();
        vec
    }
}

/// Dispatch `idf_vec` on a weighting value
pub fn idf_for(
    weighting: Weighting,
    corpus: &Corpus,
    vocabulary: &IndexSet<Box<str>>,
) -> Option<Vec<f64>> {
    match weighting {
        Weighting::Freq => FrequencyEngine::idf_vec(corpus, vocabulary),
        Weighting::Binary => BinaryEngine::idf_vec(corpus, vocabulary),
        Weighting::Tfidf => DefaultTFIDFEngine::idf_vec(corpus, vocabulary),
    }
}

/// Dispatch `tf_vec` on a weighting value
pub fn weigh(
    weighting: Weighting,
    freq: &TokenFrequency,
    vocabulary: &IndexSet<Box<str>>,
    idf: Option<&[f64]>,
) -> ZeroSpVec<f64> {
    match weighting {
        Weighting::Freq => FrequencyEngine::tf_vec(freq, vocabulary, idf),
        Weighting::Binary => BinaryEngine::tf_vec(freq, vocabulary, idf),
        Weighting::Tfidf => DefaultTFIDFEngine::tf_vec(freq, vocabulary, idf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> IndexSet<Box<str>> {
        terms.iter().map(|&t| Box::<str>::from(t)).collect()
    }

    fn freq(tokens: &[&str]) -> TokenFrequency {
        let mut f = TokenFrequency::new();
        f.add_tokens(tokens);
        f
    }

    #[test]
    fn smooth_idf_matches_formula() {
        assert!((smooth_idf(3, 3) - 1.0).abs() < 1e-12);
        assert!((smooth_idf(3, 1) - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert!((smooth_idf(3, 2) - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn frequency_and_binary_weights() {
        let v = vocab(&["graph", "index", "network"]);
        let f = freq(&["network", "network", "graph", "unknown"]);
        let counts = FrequencyEngine::tf_vec(&f, &v, None);
        assert_eq!(counts.iter().copied().collect::<Vec<f64>>(), vec![1.0, 0.0, 2.0]);
        let presence = BinaryEngine::tf_vec(&f, &v, None);
        assert_eq!(presence.iter().copied().collect::<Vec<f64>>(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn tfidf_rows_have_unit_norm() {
        let v = vocab(&["graph", "index", "network"]);
        let mut corpus = Corpus::new();
        corpus.add_set(&["graph", "network"]);
        corpus.add_set(&["index"]);
        let idf = DefaultTFIDFEngine::idf_vec(&corpus, &v).unwrap();
        assert_eq!(idf.len(), 3);
        let row = DefaultTFIDFEngine::tf_vec(&freq(&["graph", "network", "network"]), &v, Some(&idf));
        assert!((row.norm() - 1.0).abs() < 1e-12);
        assert_eq!(row.nnz(), 2);
    }

    #[test]
    fn no_known_terms_gives_zero_vector() {
        let v = vocab(&["graph"]);
        let row = DefaultTFIDFEngine::tf_vec(&freq(&["other"]), &v, Some(&[1.0]));
        assert_eq!(row.nnz(), 0);
        assert_eq!(row.len(), 1);
    }
}
