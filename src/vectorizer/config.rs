use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Term granularity of a vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// single terms
    Unigram,
    /// two consecutive terms
    Bigram,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Unigram, Granularity::Bigram];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Unigram => "unigram",
            Granularity::Bigram => "bigram",
        }
    }

    /// n of the n-gram
    #[inline]
    pub fn n(self) -> usize {
        match self {
            Granularity::Unigram => 1,
            Granularity::Bigram => 2,
        }
    }
}

/// Weighting scheme of a vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// raw term count
    Freq,
    /// 0 / 1 presence
    Binary,
    /// count * smoothed idf, L2 normalized
    Tfidf,
}

impl Weighting {
    pub const ALL: [Weighting; 3] = [Weighting::Freq, Weighting::Binary, Weighting::Tfidf];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Weighting::Freq => "freq",
            Weighting::Binary => "binary",
            Weighting::Tfidf => "tfidf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseConfigError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for Granularity {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unigram" => Ok(Granularity::Unigram),
            "bigram" => Ok(Granularity::Bigram),
            _ => Err(ParseConfigError {
                kind: "granularity",
                value: s.to_string(),
                expected: "unigram, bigram",
            }),
        }
    }
}

impl FromStr for Weighting {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freq" => Ok(Weighting::Freq),
            "binary" => Ok(Weighting::Binary),
            "tfidf" => Ok(Weighting::Tfidf),
            _ => Err(ParseConfigError {
                kind: "weighting",
                value: s.to_string(),
                expected: "freq, binary, tfidf",
            }),
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (granularity, weighting) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub granularity: Granularity,
    pub weighting: Weighting,
}

impl FeatureConfig {
    #[inline]
    pub const fn new(granularity: Granularity, weighting: Weighting) -> Self {
        Self {
            granularity,
            weighting,
        }
    }

    /// All six configurations, unigram first
    pub fn all() -> Vec<FeatureConfig> {
        Granularity::ALL
            .iter()
            .flat_map(|&g| Weighting::ALL.iter().map(move |&w| FeatureConfig::new(g, w)))
            .collect()
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::new(Granularity::Unigram, Weighting::Tfidf)
    }
}

/// `{weighting}_{granularity}`, the suffix used in artifact names
impl Display for FeatureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.weighting, self.granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_distinct_configurations() {
        let all = FeatureConfig::all();
        assert_eq!(all.len(), 6);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 6);
        assert_eq!(all[0], FeatureConfig::new(Granularity::Unigram, Weighting::Freq));
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Bigram".parse::<Granularity>().unwrap(), Granularity::Bigram);
        assert_eq!(" tfidf ".parse::<Weighting>().unwrap(), Weighting::Tfidf);
        assert!("trigram".parse::<Granularity>().is_err());
        let err = "tf".parse::<Weighting>().unwrap_err();
        assert!(err.to_string().contains("freq, binary, tfidf"));
        assert_eq!(
            FeatureConfig::new(Granularity::Bigram, Weighting::Binary).to_string(),
            "binary_bigram"
        );
    }
}
