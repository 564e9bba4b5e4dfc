use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for classifying entries in the download directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFilterConfig {
    /// Regex patterns marking a name as a provisional (still downloading) artifact
    #[serde(default = "default_temporary_patterns")]
    pub temporary_patterns: Vec<String>,

    /// Regex patterns for names the watcher should never consider at all
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Default temporary markers: Firefox `.part`, generic `.tmp`, Chromium `.crdownload`
pub fn default_temporary_patterns() -> Vec<String> {
    vec![
        r"\.part$".to_string(),
        r"\.tmp$".to_string(),
        r"\.crdownload$".to_string(),
    ]
}

impl Default for ArtifactFilterConfig {
    fn default() -> Self {
        Self {
            temporary_patterns: default_temporary_patterns(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// How a single directory entry name is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Still being written by the browser
    Temporary,
    /// Complete, marker absent
    Final,
    /// Excluded by an ignore pattern
    Ignored,
}

/// Compiled artifact classifier
#[derive(Debug)]
pub struct ArtifactFilter {
    temporary_regexes: Vec<Regex>,
    ignore_regexes: Vec<Regex>,
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self::new(&ArtifactFilterConfig::default())
            .expect("Default artifact patterns should be valid")
    }
}

impl ArtifactFilter {
    /// Compile the configured patterns
    pub fn new(config: &ArtifactFilterConfig) -> Result<Self, regex::Error> {
        let temporary_regexes = config
            .temporary_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let ignore_regexes = config
            .ignore_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            temporary_regexes,
            ignore_regexes,
        })
    }

    /// Classify a directory entry by name. Ignore patterns take precedence.
    pub fn classify(&self, name: &str) -> ArtifactKind {
        if self.ignore_regexes.iter().any(|r| r.is_match(name)) {
            ArtifactKind::Ignored
        } else if self.temporary_regexes.iter().any(|r| r.is_match(name)) {
            ArtifactKind::Temporary
        } else {
            ArtifactKind::Final
        }
    }

    pub fn is_temporary(&self, name: &str) -> bool {
        self.classify(name) == ArtifactKind::Temporary
    }
}
