//! Persistence of fitted vectorizers and their document-term matrices.
//!
//! Artifacts are keyed by `(corpus, granularity, weighting)`. The file store
//! lays them out as
//!
//! ```text
//! {root}/{corpus}_vectors/{corpus}_{weighting}_{granularity}_vectorizer.cbor
//! {root}/{corpus}_vectors/{corpus}_{weighting}_{granularity}_matrix.cbor
//! ```

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::vectorizer::{config::FeatureConfig, matrix::DocTermMatrix, Vectorizer};

/// Identity of a stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub corpus: String,
    pub config: FeatureConfig,
}

impl ArtifactKey {
    pub fn new(corpus: impl Into<String>, config: FeatureConfig) -> Self {
        Self {
            corpus: corpus.into(),
            config,
        }
    }

    /// `{corpus}_{weighting}_{granularity}`
    pub fn stem(&self) -> String {
        format!("{}_{}", self.corpus, self.config)
    }

    pub fn vectorizer_name(&self) -> String {
        format!("{}_vectorizer", self.stem())
    }

    pub fn matrix_name(&self) -> String {
        format!("{}_matrix", self.stem())
    }
}

impl Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// A fitted vectorizer with the matrix of its training corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub vectorizer: Vectorizer,
    pub matrix: DocTermMatrix,
}

impl Artifact {
    pub fn new(vectorizer: Vectorizer, matrix: DocTermMatrix) -> Self {
        Self { vectorizer, matrix }
    }

    /// Consistency between the two halves
    pub fn validate(&self) -> Result<(), String> {
        self.vectorizer.validate()?;
        self.matrix.validate()?;
        if self.vectorizer.dimension() != self.matrix.n_cols() {
            return Err(format!(
                "vectorizer dimension {} does not match matrix columns {}",
                self.vectorizer.dimension(),
                self.matrix.n_cols()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Artifact not found: {0}")]
    NotFound(ArtifactKey),

    #[error("Artifact {key} is corrupt: {reason}")]
    Corrupt { key: ArtifactKey, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed artifact storage.
///
/// `load` distinguishes an absent artifact (`NotFound`) from one that exists
/// but cannot be read back (`Corrupt`).
pub trait ArtifactStore: Send + Sync {
    /// Store (or overwrite) an artifact
    fn save(&self, key: &ArtifactKey, artifact: &Artifact) -> StoreResult<()>;

    fn load(&self, key: &ArtifactKey) -> StoreResult<Arc<Artifact>>;

    /// Configurations of `corpus` with a complete artifact, in canonical order
    fn list(&self, corpus: &str) -> StoreResult<Vec<FeatureConfig>>;
}

fn check_loaded(key: &ArtifactKey, artifact: &Artifact) -> StoreResult<()> {
    if artifact.vectorizer.config() != key.config {
        return Err(StoreError::Corrupt {
            key: key.clone(),
            reason: format!("vectorizer was fitted for {}", artifact.vectorizer.config()),
        });
    }
    artifact.validate().map_err(|reason| StoreError::Corrupt {
        key: key.clone(),
        reason,
    })
}

/// File system store, CBOR encoded
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{corpus}_vectors`
    pub fn corpus_dir(&self, corpus: &str) -> io::Result<PathBuf> {
        // コーパス名はそのままパスになるので区切り文字を拒否する
        if corpus.is_empty() || corpus == "." || corpus == ".." || corpus.contains(['/', '\\']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid corpus name `{}`", corpus),
            ));
        }
        Ok(self.root.join(format!("{}_vectors", corpus)))
    }

    pub fn vectorizer_path(&self, key: &ArtifactKey) -> io::Result<PathBuf> {
        Ok(self.corpus_dir(&key.corpus)?.join(format!("{}.cbor", key.vectorizer_name())))
    }

    pub fn matrix_path(&self, key: &ArtifactKey) -> io::Result<PathBuf> {
        Ok(self.corpus_dir(&key.corpus)?.join(format!("{}.cbor", key.matrix_name())))
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_atomic<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_cbor::to_writer(&mut writer, value).map_err(|e| StoreError::Encode(e.to_string()))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_part<T: DeserializeOwned>(key: &ArtifactKey, path: &Path) -> StoreResult<T> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_cbor::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: key.clone(),
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save(&self, key: &ArtifactKey, artifact: &Artifact) -> StoreResult<()> {
        let dir = self.corpus_dir(&key.corpus)?;
        fs::create_dir_all(&dir)?;
        let vectorizer_path = self.vectorizer_path(key)?;
        let matrix_path = self.matrix_path(key)?;
        Self::write_atomic(&vectorizer_path, &artifact.vectorizer)?;
        Self::write_atomic(&matrix_path, &artifact.matrix)?;
        debug!(artifact = %key, dir = %dir.display(), "artifact written");
        Ok(())
    }

    fn load(&self, key: &ArtifactKey) -> StoreResult<Arc<Artifact>> {
        let vectorizer_path = self.vectorizer_path(key)?;
        let matrix_path = self.matrix_path(key)?;
        // 片方でも無ければ NotFound
        if !vectorizer_path.exists() || !matrix_path.exists() {
            return Err(StoreError::NotFound(key.clone()));
        }
        let vectorizer: Vectorizer = Self::read_part(key, &vectorizer_path)?;
        let matrix: DocTermMatrix = Self::read_part(key, &matrix_path)?;
        let artifact = Artifact::new(vectorizer, matrix);
        check_loaded(key, &artifact)?;
        debug!(
            artifact = %key,
            rows = artifact.matrix.n_rows(),
            dimension = artifact.vectorizer.dimension(),
            "artifact loaded"
        );
        Ok(Arc::new(artifact))
    }

    fn list(&self, corpus: &str) -> StoreResult<Vec<FeatureConfig>> {
        let mut built = Vec::new();
        for config in FeatureConfig::all() {
            let key = ArtifactKey::new(corpus, config);
            if self.vectorizer_path(&key)?.is_file() && self.matrix_path(&key)?.is_file() {
                built.push(config);
            }
        }
        Ok(built)
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<ArtifactKey, Arc<Artifact>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save(&self, key: &ArtifactKey, artifact: &Artifact) -> StoreResult<()> {
        let mut artifacts = self.artifacts.write().unwrap_or_else(|e| e.into_inner());
        artifacts.insert(key.clone(), Arc::new(artifact.clone()));
        Ok(())
    }

    fn load(&self, key: &ArtifactKey) -> StoreResult<Arc<Artifact>> {
        let artifacts = self.artifacts.read().unwrap_or_else(|e| e.into_inner());
        let artifact = artifacts
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        check_loaded(key, &artifact)?;
        Ok(artifact)
    }

    fn list(&self, corpus: &str) -> StoreResult<Vec<FeatureConfig>> {
        let artifacts = self.artifacts.read().unwrap_or_else(|e| e.into_inner());
        Ok(FeatureConfig::all()
            .into_iter()
            .filter(|&config| artifacts.contains_key(&ArtifactKey::new(corpus, config)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::config::{Granularity, Weighting};

    fn artifact(config: FeatureConfig) -> Artifact {
        let texts = ["neural network train", "graph database index"];
        let (vectorizer, rows) = Vectorizer::fit_transform(config, &texts).unwrap();
        let matrix = DocTermMatrix::new(
            vectorizer.dimension(),
            rows,
            vec![0, 1],
            vec!["a".into(), "b".into()],
        );
        Artifact::new(vectorizer, matrix)
    }

    fn key(config: FeatureConfig) -> ArtifactKey {
        ArtifactKey::new("arxiv", config)
    }

    #[test]
    fn file_names_follow_layout() {
        let store = FsArtifactStore::new("representation");
        let k = key(FeatureConfig::new(Granularity::Bigram, Weighting::Tfidf));
        assert_eq!(
            store.vectorizer_path(&k).unwrap(),
            PathBuf::from("representation/arxiv_vectors/arxiv_tfidf_bigram_vectorizer.cbor")
        );
        assert_eq!(
            store.matrix_path(&k).unwrap(),
            PathBuf::from("representation/arxiv_vectors/arxiv_tfidf_bigram_matrix.cbor")
        );
        assert!(store.corpus_dir("../etc").is_err());
    }

    #[test]
    fn fs_round_trip_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let config = FeatureConfig::new(Granularity::Unigram, Weighting::Tfidf);
        let original = artifact(config);
        store.save(&key(config), &original).unwrap();

        let loaded = store.load(&key(config)).unwrap();
        assert_eq!(*loaded, original);
        assert_eq!(store.list("arxiv").unwrap(), vec![config]);
        assert!(store.list("pubmed").unwrap().is_empty());
    }

    #[test]
    fn missing_is_not_found_and_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let config = FeatureConfig::new(Granularity::Unigram, Weighting::Freq);
        let k = key(config);
        assert!(matches!(store.load(&k), Err(StoreError::NotFound(_))));

        store.save(&k, &artifact(config)).unwrap();
        fs::remove_file(store.matrix_path(&k).unwrap()).unwrap();
        assert!(matches!(store.load(&k), Err(StoreError::NotFound(_))));

        store.save(&k, &artifact(config)).unwrap();
        fs::write(store.matrix_path(&k).unwrap(), b"not cbor at all").unwrap();
        assert!(matches!(store.load(&k), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn mismatched_halves_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let uni = FeatureConfig::new(Granularity::Unigram, Weighting::Binary);
        let bi = FeatureConfig::new(Granularity::Bigram, Weighting::Binary);
        store.save(&key(uni), &artifact(uni)).unwrap();
        store.save(&key(bi), &artifact(bi)).unwrap();
        // bigram の行列を unigram の場所に置く
        fs::copy(store.matrix_path(&key(bi)).unwrap(), store.matrix_path(&key(uni)).unwrap()).unwrap();
        assert!(matches!(store.load(&key(uni)), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn memory_store_behaves_like_fs() {
        let store = MemoryArtifactStore::new();
        let config = FeatureConfig::new(Granularity::Bigram, Weighting::Freq);
        assert!(matches!(store.load(&key(config)), Err(StoreError::NotFound(_))));
        store.save(&key(config), &artifact(config)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list("arxiv").unwrap(), vec![config]);
        assert_eq!(store.load(&key(config)).unwrap().matrix.n_rows(), 2);
    }
}
