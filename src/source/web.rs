use crate::config::SwitcherConfig;
use crate::error::{Result, SwitcherError};
use crate::source::{ContentSource, PageState};
use fantoccini::actions::{InputSource, KeyAction, KeyActions};
use fantoccini::elements::Element;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::path::Path;

/// Script returning the markup the fingerprint is computed over
const BODY_SNAPSHOT_SCRIPT: &str = "return document.body.innerHTML;";

/// Album keyboard shortcut that downloads the selected items
const DOWNLOAD_SHORTCUT: char = 'd';

/// A web photo album driven through a WebDriver session
pub struct WebAlbum {
    client: Client,
    album_url: String,
    item_selector: String,
    checkbox_selector: String,
    items: Vec<Element>,
}

impl WebAlbum {
    /// Opens a browser session configured to download into `download_dir`.
    ///
    /// The album itself is not loaded until [`ContentSource::reset`] is called.
    pub async fn connect(config: &SwitcherConfig, download_dir: &Path) -> Result<Self> {
        let capabilities = firefox_capabilities(config, download_dir);
        let client = connect_to_webdriver(&config.webdriver_url, capabilities).await?;

        Ok(Self {
            client,
            album_url: config.album_url.clone(),
            item_selector: config.item_selector.clone(),
            checkbox_selector: config.checkbox_selector.clone(),
            items: Vec::new(),
        })
    }

    /// Ends the browser session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }

    async fn press(&self, actions: KeyActions) -> Result<()> {
        self.client.perform_actions(actions).await?;
        Ok(())
    }
}

impl ContentSource for WebAlbum {
    async fn fingerprint(&mut self) -> Result<PageState> {
        let value = self.client.execute(BODY_SNAPSHOT_SCRIPT, vec![]).await?;
        let html = value.as_str().unwrap_or_default();
        Ok(PageState::of(html))
    }

    async fn advance(&mut self) -> Result<()> {
        let page_down: char = Key::PageDown.into();
        let actions = KeyActions::new("keyboard".to_string())
            .then(KeyAction::Down { value: page_down })
            .then(KeyAction::Up { value: page_down });
        self.press(actions).await
    }

    async fn reset(&mut self) -> Result<()> {
        ::log::debug!("Loading album {}", self.album_url);
        self.items.clear();
        self.client.goto(&self.album_url).await?;
        Ok(())
    }

    async fn loaded_items(&mut self) -> Result<usize> {
        self.items = self
            .client
            .find_all(Locator::Css(&self.item_selector))
            .await?;
        ::log::debug!(
            "Found {} items matching {}",
            self.items.len(),
            self.item_selector
        );
        Ok(self.items.len())
    }

    async fn download_item(&mut self, index: usize) -> Result<()> {
        let item = self.items.get(index).ok_or(SwitcherError::EmptySelection)?;
        item.find(Locator::Css(&self.checkbox_selector))
            .await?
            .click()
            .await?;

        let shift: char = Key::Shift.into();
        let actions = KeyActions::new("keyboard".to_string())
            .then(KeyAction::Down { value: shift })
            .then(KeyAction::Down {
                value: DOWNLOAD_SHORTCUT,
            })
            .then(KeyAction::Up {
                value: DOWNLOAD_SHORTCUT,
            })
            .then(KeyAction::Up { value: shift });
        self.press(actions).await?;

        ::log::debug!("Triggered download of item {}", index);
        Ok(())
    }
}

/// Builds geckodriver capabilities: headless mode, the user's profile, and
/// download preferences that send files straight into `download_dir`.
fn firefox_capabilities(config: &SwitcherConfig, download_dir: &Path) -> Map<String, Value> {
    let mut args = Vec::new();
    if config.headless {
        args.push("-headless".to_string());
    }
    if let Some(profile) = &config.firefox_profile {
        args.push("-profile".to_string());
        args.push(profile.display().to_string());
    }

    let prefs = json!({
        "browser.download.folderList": 2,
        "browser.download.dir": download_dir.display().to_string(),
        "browser.download.useDownloadDir": true,
        "browser.download.manager.showWhenStarting": false,
        "browser.helperApps.neverAsk.saveToDisk": "image/jpeg,image/png,image/gif,image/webp,image/heic,application/zip,application/octet-stream",
    });

    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("firefox"));
    capabilities.insert(
        "moz:firefoxOptions".to_string(),
        json!({ "args": args, "prefs": prefs }),
    );
    capabilities
}

/// Connects to the WebDriver instance, trying common local endpoints if the
/// configured one is unreachable
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: Map<String, Value>,
) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities);

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    let fallback_urls = ["http://localhost:4444", "http://127.0.0.1:4444"];
    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure geckodriver is running or set the WEBDRIVER_URL environment variable"
    );
    Err(first_error.into())
}
