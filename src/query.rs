//! Online query pipeline: normalize, project, rank.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    normalizer::TextNormalizer,
    store::{ArtifactKey, ArtifactStore, StoreError},
    vectorizer::{
        config::{FeatureConfig, Granularity, Weighting},
        evaluate::scoring::{rank, Hits},
    },
};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query has no text after normalization")]
    EmptyQuery,

    #[error("No artifact built for {0}")]
    ArtifactMissing(ArtifactKey),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => SearchError::ArtifactMissing(key),
            other => SearchError::Store(other),
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Query document: a title and an abstract, either may be missing
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryDocument<'a> {
    pub title: Option<&'a str>,
    pub abstract_text: Option<&'a str>,
}

impl<'a> QueryDocument<'a> {
    pub fn new(title: Option<&'a str>, abstract_text: Option<&'a str>) -> Self {
        Self {
            title,
            abstract_text,
        }
    }
}

/// Ranks stored corpus documents against a query document
#[derive(Clone)]
pub struct QueryPipeline {
    normalizer: TextNormalizer,
    store: Arc<dyn ArtifactStore>,
    top_k: usize,
}

impl QueryPipeline {
    pub fn new(normalizer: TextNormalizer, store: Arc<dyn ArtifactStore>, config: &EngineConfig) -> Self {
        Self {
            normalizer,
            store,
            top_k: config.top_k,
        }
    }

    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Top `top_k` documents of `corpus` for the query
    pub fn search(
        &self,
        query: QueryDocument<'_>,
        corpus: &str,
        granularity: Granularity,
        weighting: Weighting,
    ) -> SearchResult<Hits> {
        self.search_with_k(query, corpus, granularity, weighting, self.top_k)
    }

    /// Top `k` documents of `corpus` for the query
    ///
    /// # Errors
    /// * `EmptyQuery` - title and abstract normalize to nothing
    /// * `ArtifactMissing` - the configuration was never built for `corpus`
    pub fn search_with_k(
        &self,
        query: QueryDocument<'_>,
        corpus: &str,
        granularity: Granularity,
        weighting: Weighting,
        k: usize,
    ) -> SearchResult<Hits> {
        let start = Instant::now();
        let text = self.normalizer.query_text(query.title, query.abstract_text);
        if text.is_empty() {
            warn!(corpus, "query has no text after normalization");
            return Err(SearchError::EmptyQuery);
        }

        let key = ArtifactKey::new(corpus, FeatureConfig::new(granularity, weighting));
        let artifact = self.store.load(&key)?;
        let projection = artifact.vectorizer.project(&text);
        debug!(
            artifact = %key,
            terms = projection.term_count,
            oov = projection.oov_count,
            "query projected"
        );

        let hits = rank(&projection.vector, &artifact.matrix, k);
        info!(
            artifact = %key,
            hits = hits.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );
        Ok(hits)
    }
}
