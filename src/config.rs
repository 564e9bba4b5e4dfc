use crate::error::{Result, SwitcherError};
use crate::filter::{ArtifactFilter, ArtifactFilterConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for one wallpaper switching run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitcherConfig {
    /// URL of the album page to sample from
    pub album_url: String,

    /// Firefox profile directory carrying the album's login session
    #[serde(default)]
    pub firefox_profile: Option<PathBuf>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Directory the browser downloads into; owned exclusively by the run
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// CSS selector matching one album item
    #[serde(default = "default_item_selector")]
    pub item_selector: String,

    /// CSS selector, relative to an item, of the control that selects it
    #[serde(default = "default_checkbox_selector")]
    pub checkbox_selector: String,

    /// Pause after reaching the sampled depth before enumerating items
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default)]
    pub stability: StabilityPolicy,

    #[serde(default)]
    pub download: DownloadPolicy,

    /// Command used to install the wallpaper. It is split into words like a
    /// shell would, but never run through one; `%f` is the image path, `%u`
    /// its file URI, and `;` or `&&` start another command.
    #[serde(default)]
    pub wallpaper_command: Option<String>,

    /// Set to false to only download the image
    #[serde(default = "default_true")]
    pub apply_wallpaper: bool,
}

/// Bounds for the content-stability detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityPolicy {
    /// Maximum number of incremental-load triggers before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Consecutive unchanged fingerprints required to call the page stable
    #[serde(default = "default_stable_threshold")]
    pub stable_threshold: u32,

    /// Pause after each trigger so the renderer can catch up
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl StabilityPolicy {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            stable_threshold: default_stable_threshold(),
            pause_ms: default_pause_ms(),
        }
    }
}

/// Bounds and artifact rules for the download watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadPolicy {
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Temporary and ignored artifact name patterns
    #[serde(flatten)]
    pub artifacts: ArtifactFilterConfig,
}

impl DownloadPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Compile the artifact patterns into a filter
    pub fn filter(&self) -> Result<ArtifactFilter> {
        Ok(ArtifactFilter::new(&self.artifacts)?)
    }
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: default_download_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            artifacts: ArtifactFilterConfig::default(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloaded-image")
}

fn default_item_selector() -> String {
    ".rtIMgb.fCPuz.nV0gYe".to_string()
}

fn default_checkbox_selector() -> String {
    "div[role = 'checkbox']".to_string()
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    100
}

fn default_stable_threshold() -> u32 {
    3
}

fn default_pause_ms() -> u64 {
    100
}

fn default_download_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl SwitcherConfig {
    /// Create a new configuration with default values
    pub fn new(album_url: &str) -> Self {
        Self {
            album_url: album_url.to_string(),
            firefox_profile: None,
            webdriver_url: default_webdriver_url(),
            headless: true,
            download_dir: default_download_dir(),
            item_selector: default_item_selector(),
            checkbox_selector: default_checkbox_selector(),
            settle_delay_ms: default_settle_delay_ms(),
            stability: StabilityPolicy::default(),
            download: DownloadPolicy::default(),
            wallpaper_command: None,
            apply_wallpaper: true,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check everything the run depends on before a browser is started
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.album_url).map_err(|e| {
            SwitcherError::InvalidConfig(format!("album URL {:?}: {}", self.album_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SwitcherError::InvalidConfig(format!(
                "album URL must be http or https, got {}",
                url.scheme()
            )));
        }

        if let Some(profile) = &self.firefox_profile {
            if !profile.is_dir() {
                return Err(SwitcherError::InvalidConfig(format!(
                    "Firefox profile {} is not a directory",
                    profile.display()
                )));
            }
        }

        if self.item_selector.trim().is_empty() || self.checkbox_selector.trim().is_empty() {
            return Err(SwitcherError::InvalidConfig(
                "item selectors must not be empty".to_string(),
            ));
        }
        if self.stability.max_attempts == 0 {
            return Err(SwitcherError::InvalidConfig(
                "stability.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.stability.stable_threshold == 0 {
            return Err(SwitcherError::InvalidConfig(
                "stability.stable_threshold must be at least 1".to_string(),
            ));
        }
        if self.download.timeout_secs == 0 {
            return Err(SwitcherError::InvalidConfig(
                "download.timeout_secs must be positive".to_string(),
            ));
        }
        if self.download.poll_interval_ms == 0 {
            return Err(SwitcherError::InvalidConfig(
                "download.poll_interval_ms must be positive".to_string(),
            ));
        }

        if let Some(command) = &self.wallpaper_command {
            shell_words::split(command).map_err(|e| {
                SwitcherError::InvalidConfig(format!("wallpaper command: {}", e))
            })?;
        }

        self.download.filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config =
            SwitcherConfig::from_json(r#"{"album_url": "https://photos.app.goo.gl/abc"}"#)
                .unwrap();

        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.download_dir, PathBuf::from("downloaded-image"));
        assert_eq!(config.stability.max_attempts, 100);
        assert_eq!(config.stability.stable_threshold, 3);
        assert_eq!(config.stability.pause(), Duration::from_millis(100));
        assert_eq!(config.download.timeout(), Duration::from_secs(60));
        assert_eq!(config.download.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.download.artifacts.temporary_patterns.len(), 3);
        assert!(config.apply_wallpaper);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let json = r#"{
            "album_url": "https://example.com/album",
            "headless": false,
            "stability": { "max_attempts": 10 },
            "download": { "timeout_secs": 5, "ignore_patterns": ["^\\."] }
        }"#;
        let config = SwitcherConfig::from_json(json).unwrap();

        assert!(!config.headless);
        assert_eq!(config.stability.max_attempts, 10);
        assert_eq!(config.stability.stable_threshold, 3);
        assert_eq!(config.download.timeout_secs, 5);
        assert_eq!(config.download.poll_interval_ms, 1000);
        assert_eq!(config.download.artifacts.ignore_patterns, vec![r"^\.".to_string()]);
    }

    #[test]
    fn test_missing_album_url_is_rejected() {
        assert!(SwitcherConfig::from_json("{}").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SwitcherConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(SwitcherError::InvalidConfig(_))
        ));

        let config = SwitcherConfig::new("ftp://example.com/album");
        assert!(matches!(
            config.validate(),
            Err(SwitcherError::InvalidConfig(_))
        ));

        let mut config = SwitcherConfig::new("https://example.com/album");
        config.firefox_profile = Some(PathBuf::from("/definitely/not/a/profile"));
        assert!(matches!(
            config.validate(),
            Err(SwitcherError::InvalidConfig(_))
        ));

        let mut config = SwitcherConfig::new("https://example.com/album");
        config.stability.stable_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = SwitcherConfig::new("https://example.com/album");
        config.download.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(SwitcherError::InvalidConfig(_))
        ));

        let mut config = SwitcherConfig::new("https://example.com/album");
        config.wallpaper_command = Some("feh --bg-fill '%f".to_string());
        assert!(matches!(
            config.validate(),
            Err(SwitcherError::InvalidConfig(_))
        ));

        let mut config = SwitcherConfig::new("https://example.com/album");
        config.download.artifacts.temporary_patterns = vec!["[".to_string()];
        assert!(matches!(config.validate(), Err(SwitcherError::Pattern(_))));
    }

    #[test]
    fn test_validate_accepts_existing_profile() {
        let profile = tempfile::tempdir().unwrap();
        let mut config = SwitcherConfig::new("https://example.com/album");
        config.firefox_profile = Some(profile.path().to_path_buf());
        assert!(config.validate().is_ok());
    }
}
