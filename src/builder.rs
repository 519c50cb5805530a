//! Offline construction of the vector representations of a corpus.

use std::time::Instant;

use indexmap::IndexMap;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    document::{Document, Table, TableResult, ABSTRACT_COLUMN, TITLE_COLUMN},
    normalizer::{indexed_text, TextNormalizer},
    store::{Artifact, ArtifactKey, ArtifactStore, StoreError},
    vectorizer::{config::FeatureConfig, matrix::DocTermMatrix, FitError, Vectorizer},
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Corpus has no usable documents")]
    EmptyCorpus,

    #[error("Corpus yields no terms for {0}")]
    EmptyVocabulary(FeatureConfig),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FitError> for BuildError {
    fn from(err: FitError) -> Self {
        match err {
            FitError::EmptyCorpus => BuildError::EmptyCorpus,
            FitError::EmptyVocabulary(config) => BuildError::EmptyVocabulary(config),
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Fitted artifacts keyed by configuration, in canonical order
pub type BuildOutput = IndexMap<FeatureConfig, Artifact>;

/// A row that was skipped because both text fields are blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedDocument {
    pub row: usize,
    pub key: Box<str>,
}

/// Normalized indexed texts of the usable documents, with their corpus positions and keys
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    texts: Vec<String>,
    rows: Vec<usize>,
    keys: Vec<Box<str>>,
    malformed: Vec<MalformedDocument>,
}

impl PreparedCorpus {
    #[inline]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    #[inline]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Corpus position of each prepared text
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[inline]
    pub fn keys(&self) -> &[Box<str>] {
        &self.keys
    }

    #[inline]
    pub fn malformed(&self) -> &[MalformedDocument] {
        &self.malformed
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub artifacts: BuildOutput,
    pub malformed: Vec<MalformedDocument>,
}

/// Builds one vectorizer + matrix per feature configuration
#[derive(Debug, Clone, Default)]
pub struct RepresentationBuilder {
    normalizer: TextNormalizer,
}

impl RepresentationBuilder {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Normalize every document into its indexed text.
    /// Blank rows are skipped and reported; no usable row at all is `EmptyCorpus`.
    /// `documents` are expected in table order (ascending `row`), as `Table::documents` yields them.
    pub fn prepare(&self, documents: &[Document]) -> BuildResult<PreparedCorpus> {
        let normalized: Vec<Option<String>> = documents
            .par_iter()
            .map(|doc| {
                if doc.is_blank() {
                    return None;
                }
                let title = self.normalizer.normalize_opt(doc.title.as_deref());
                let abstract_text = self.normalizer.normalize_opt(doc.abstract_text.as_deref());
                Some(indexed_text(&title, &abstract_text))
            })
            .collect();

        let mut texts = Vec::with_capacity(documents.len());
        let mut rows = Vec::with_capacity(documents.len());
        let mut keys = Vec::with_capacity(documents.len());
        let mut malformed = Vec::new();
        for (doc, text) in documents.iter().zip(normalized) {
            match text {
                Some(text) => {
                    texts.push(text);
                    rows.push(doc.row);
                    keys.push(doc.key.clone());
                }
                None => {
                    warn!(row = doc.row, key = %doc.key, "MalformedDocument: title and abstract are blank, row skipped");
                    malformed.push(MalformedDocument {
                        row: doc.row,
                        key: doc.key.clone(),
                    });
                }
            }
        }
        if texts.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }
        Ok(PreparedCorpus {
            texts,
            rows,
            keys,
            malformed,
        })
    }

    /// Fit one configuration on a prepared corpus
    pub fn fit(&self, prepared: &PreparedCorpus, config: FeatureConfig) -> BuildResult<Artifact> {
        let start = Instant::now();
        let (vectorizer, rows) = Vectorizer::fit_transform(config, &prepared.texts)?;
        let matrix = DocTermMatrix::new(
            vectorizer.dimension(),
            rows,
            prepared.rows.clone(),
            prepared.keys.clone(),
        );
        debug!(
            config = %config,
            rows = matrix.n_rows(),
            dimension = vectorizer.dimension(),
            nnz = matrix.nnz(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "configuration fitted"
        );
        Ok(Artifact::new(vectorizer, matrix))
    }

    /// Fit all six configurations in parallel without persisting them
    pub fn fit_all(&self, documents: &[Document]) -> BuildResult<BuildReport> {
        let prepared = self.prepare(documents)?;
        let fitted: Vec<(FeatureConfig, BuildResult<Artifact>)> = FeatureConfig::all()
            .into_par_iter()
            .map(|config| (config, self.fit(&prepared, config)))
            .collect();

        let mut artifacts = BuildOutput::with_capacity(fitted.len());
        for (config, artifact) in fitted {
            artifacts.insert(config, artifact?);
        }
        Ok(BuildReport {
            artifacts,
            malformed: prepared.malformed,
        })
    }

    /// Fit all six configurations and persist them under `corpus`
    pub fn build(
        &self,
        corpus: &str,
        documents: &[Document],
        store: &dyn ArtifactStore,
    ) -> BuildResult<BuildReport> {
        let start = Instant::now();
        info!(corpus, documents = documents.len(), "building representations");
        let report = self.fit_all(documents)?;
        for (config, artifact) in &report.artifacts {
            store.save(&ArtifactKey::new(corpus, *config), artifact)?;
        }
        info!(
            corpus,
            configurations = report.artifacts.len(),
            skipped = report.malformed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "build finished"
        );
        Ok(report)
    }

    /// Fit and persist a single configuration, leaving the others untouched
    pub fn rebuild_one(
        &self,
        corpus: &str,
        documents: &[Document],
        config: FeatureConfig,
        store: &dyn ArtifactStore,
    ) -> BuildResult<Artifact> {
        info!(corpus, config = %config, "rebuilding one configuration");
        let prepared = self.prepare(documents)?;
        let artifact = self.fit(&prepared, config)?;
        store.save(&ArtifactKey::new(corpus, config), &artifact)?;
        Ok(artifact)
    }
}

/// Normalize the `Title` and `Abstract` cells of every row.
/// Other columns are copied through unchanged.
pub fn normalize_corpus(normalizer: &TextNormalizer, raw: &Table) -> TableResult<Table> {
    let title = raw.require_column(TITLE_COLUMN)?;
    let abstract_col = raw.require_column(ABSTRACT_COLUMN)?;
    let records = raw
        .records
        .par_iter()
        .map(|record| {
            record
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    if idx == title || idx == abstract_col {
                        normalizer.normalize(cell).into_string()
                    } else {
                        cell.to_string()
                    }
                })
                .collect::<csv::StringRecord>()
        })
        .collect();
    info!(rows = raw.len(), "corpus normalized");
    Ok(Table {
        headers: raw.headers.clone(),
        records,
    })
}
