use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTIFACT_DIR: &str = "representation";
pub const DEFAULT_TOP_K: usize = 10;

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// root directory of the file artifact store
    pub artifact_root: PathBuf,
    /// number of hits returned by `search`
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artifact_root: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl EngineConfig {
    pub fn new(artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_root: artifact_root.into(),
            ..Self::default()
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.artifact_root, PathBuf::from("representation"));
        assert_eq!(config.top_k, 10);
        assert_eq!(EngineConfig::new("/tmp/x").with_top_k(3).top_k, 3);
    }
}
