pub mod lemma;
pub mod lexicon;
pub mod tokenizer;

use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::normalizer::{
    lemma::Lemmatizer,
    lexicon::{Lexicon, PartOfSpeech},
    tokenizer::{TokenKind, Tokenizer},
};

/// One token produced by a linguistic pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// surface form as it appeared in the input
    pub text: Box<str>,
    /// lowercased base form
    pub lemma: Box<str>,
    pub pos: PartOfSpeech,
}

/// Tokenizer + tagger + lemmatizer.
///
/// Implementations must be deterministic: the same text always yields the same
/// tokens. Both the index builder and the query side have to share one instance,
/// otherwise the vocabularies drift apart.
pub trait LinguisticPipeline: Send + Sync + Debug {
    fn analyze(&self, text: &str) -> Vec<AnalyzedToken>;
}

/// Default English pipeline built from rule tables, no model files involved
#[derive(Debug, Clone, Default)]
pub struct RuleBasedPipeline {
    tokenizer: Tokenizer,
    lexicon: Lexicon,
    lemmatizer: Lemmatizer,
}

impl RuleBasedPipeline {
    pub fn new(tokenizer: Tokenizer, lexicon: Lexicon, lemmatizer: Lemmatizer) -> Self {
        Self {
            tokenizer,
            lexicon,
            lemmatizer,
        }
    }
}

impl LinguisticPipeline for RuleBasedPipeline {
    fn analyze(&self, text: &str) -> Vec<AnalyzedToken> {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .map(|raw| {
                let lower = raw.text.to_lowercase();
                let (lemma, pos) = match raw.kind {
                    TokenKind::Space => (lower, PartOfSpeech::Space),
                    TokenKind::Punct => (lower, PartOfSpeech::Punct),
                    TokenKind::Word => {
                        let lemma = self.lemmatizer.lemma(&lower);
                        // 表層形か見出し語のどちらかが機能語なら除去対象
                        let pos = match self.lexicon.closed_class(&lower) {
                            Some(pos) => pos,
                            None => self.lexicon.tag(&lemma),
                        };
                        (lemma, pos)
                    }
                };
                AnalyzedToken {
                    text: raw.text.into(),
                    lemma: lemma.into_boxed_str(),
                    pos,
                }
            })
            .collect()
    }
}

/// Space-joined lowercase lemmas
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text that is fed to a vectorizer: `title + " " + abstract`, both already normalized
pub fn indexed_text(title: &NormalizedText, abstract_text: &NormalizedText) -> String {
    let mut text = String::with_capacity(title.0.len() + abstract_text.0.len() + 1);
    text.push_str(&title.0);
    text.push(' ');
    text.push_str(&abstract_text.0);
    text
}

/// Text normalizer shared by indexing and querying.
///
/// Cheap to clone; clones share the same pipeline.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    pipeline: Arc<dyn LinguisticPipeline>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl TextNormalizer {
    pub fn new<P>(pipeline: P) -> Self
    where
        P: LinguisticPipeline + 'static,
    {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Normalizer over the rule-based English pipeline
    pub fn english() -> Self {
        Self::new(RuleBasedPipeline::default())
    }

    /// Drop function words and whitespace, keep lowercased lemmas of the rest
    pub fn normalize(&self, text: &str) -> NormalizedText {
        if text.is_empty() {
            return NormalizedText::default();
        }
        let lemmas: Vec<Box<str>> = self
            .pipeline
            .analyze(text)
            .into_iter()
            .filter(|tok| !tok.pos.is_removed() && !tok.lemma.is_empty())
            .map(|tok| tok.lemma)
            .collect();
        NormalizedText(lemmas.join(" "))
    }

    /// Missing fields normalize to the empty string
    #[inline]
    pub fn normalize_opt(&self, text: Option<&str>) -> NormalizedText {
        text.map(|t| self.normalize(t)).unwrap_or_default()
    }

    /// `normalize(title) + " " + normalize(abstract)`, trimmed
    pub fn query_text(&self, title: Option<&str>, abstract_text: Option<&str>) -> String {
        let title = self.normalize_opt(title);
        let abstract_text = self.normalize_opt(abstract_text);
        indexed_text(&title, &abstract_text).trim().to_string()
    }
}
