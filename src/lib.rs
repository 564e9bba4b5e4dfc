pub mod config;
pub mod download;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod sampler;
pub mod source;
pub mod stability;
pub mod wallpaper;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::SwitcherConfig;
pub use error::{Result, SwitcherError};
pub use source::{ContentSource, PageState, WebAlbum};

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Main builder for a random-album-photo wallpaper run
pub struct Switcher {
    config: SwitcherConfig,
}

impl Switcher {
    /// Create a new Switcher for the given album URL with default settings
    pub fn new(album_url: &str) -> Self {
        Self {
            config: SwitcherConfig::new(album_url),
        }
    }

    /// Create a Switcher from a complete configuration
    pub fn from_config(config: SwitcherConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_config(SwitcherConfig::from_file(path)?))
    }

    /// Override the album URL
    pub fn with_album_url(mut self, album_url: &str) -> Self {
        self.config.album_url = album_url.to_string();
        self
    }

    /// Use a Firefox profile (for albums that need a signed-in session)
    pub fn with_firefox_profile(mut self, profile: impl Into<PathBuf>) -> Self {
        self.config.firefox_profile = Some(profile.into());
        self
    }

    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = dir.into();
        self
    }

    /// Set how long to wait for the download to settle
    pub fn with_download_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.download.timeout_secs = timeout_seconds;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set whether the downloaded image is installed as the wallpaper
    pub fn with_apply_wallpaper(mut self, apply: bool) -> Self {
        self.config.apply_wallpaper = apply;
        self
    }

    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Run the whole flow and return the path of the downloaded image.
    ///
    /// The browser session is closed whether or not the run succeeds.
    pub async fn run(mut self) -> Result<PathBuf> {
        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.webdriver_url = webdriver_url;
            }
        }
        self.config.validate()?;
        let config = self.config;

        let download_dir = download::prepare_download_dir(&config.download_dir).await?;

        let mut album = WebAlbum::connect(&config, &download_dir).await?;
        let mut rng = StdRng::from_os_rng();
        let outcome = drive(&mut album, &config, &download_dir, &mut rng).await;

        if let Err(e) = album.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
        let image = outcome?;

        if config.apply_wallpaper {
            wallpaper::set_as_wallpaper(&image, config.wallpaper_command.as_deref()).await?;
        }
        Ok(image)
    }
}

async fn drive(
    album: &mut WebAlbum,
    config: &SwitcherConfig,
    download_dir: &Path,
    rng: &mut StdRng,
) -> Result<PathBuf> {
    album.reset().await?;
    pipeline::run_once(album, config, download_dir, rng).await
}
