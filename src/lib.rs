/// This crate is a title/abstract similarity search engine for scientific article corpora.
pub mod builder;
pub mod config;
pub mod document;
pub mod normalizer;
pub mod query;
pub mod store;
pub mod utils;
pub mod vectorizer;

/// Text Normalizer
/// Turns free text into space-joined lowercase lemmas.
/// Determiners, adpositions, conjunctions, pronouns and whitespace are dropped,
/// punctuation is kept.
///
/// The linguistic pipeline is injected (`LinguisticPipeline`), the default one is
/// `RuleBasedPipeline`. Clones share the pipeline, so the builder and the query
/// side can hold the same instance.
///
/// Normalization never fails and is idempotent.
pub use normalizer::{LinguisticPipeline, NormalizedText, RuleBasedPipeline, TextNormalizer};

/// Vectorizer
/// A fitted mapping from normalized text to a sparse vector.
/// The vocabulary is sorted and frozen at fit time; unknown terms are dropped.
///
/// Six feature configurations exist per corpus:
/// - granularity: unigram, bigram
/// - weighting: freq, binary, tfidf
pub use vectorizer::{
    config::{FeatureConfig, Granularity, Weighting},
    matrix::DocTermMatrix,
    Vectorizer,
};

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked results, descending score, lower row first among ties
/// - `HitEntry`: row index, row key and cosine similarity
pub use vectorizer::evaluate::scoring::{rank, HitEntry, Hits};

/// Representation Builder
/// Fits and persists all six configurations of a corpus, or rebuilds a single one.
pub use builder::{normalize_corpus, BuildError, BuildReport, RepresentationBuilder};

/// Artifact Store
/// `FsArtifactStore` writes CBOR files under `{root}/{corpus}_vectors/`,
/// `MemoryArtifactStore` keeps artifacts in process.
pub use store::{Artifact, ArtifactKey, ArtifactStore, FsArtifactStore, MemoryArtifactStore, StoreError};

/// Query Pipeline
/// Normalizes a query document, projects it into a stored vector space and ranks
/// the corpus documents by cosine similarity.
pub use query::{QueryDocument, QueryPipeline, SearchError};

pub use config::EngineConfig;
pub use document::{Document, Table};
