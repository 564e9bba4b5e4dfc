use std::time::Duration;

/// Errors surfaced by a wallpaper switching run
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    /// The page kept changing for the whole attempt bound
    #[error("page did not stabilize after {attempts} attempts")]
    StabilizationTimeout { attempts: u32 },

    /// No final artifact was confirmed before the deadline
    #[error("download did not complete within {waited:?}")]
    DownloadTimeout { waited: Duration },

    /// The album page exposed no selectable items
    #[error("no selectable items found on the album page")]
    EmptySelection,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("webdriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("failed to open webdriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid artifact pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to set wallpaper: {0}")]
    Wallpaper(String),
}

pub type Result<T> = std::result::Result<T, SwitcherError>;
