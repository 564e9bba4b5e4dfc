use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "album-wallpaper")]
#[command(about = "Set a random photo from a web photo album as the desktop wallpaper")]
#[command(version)]
pub struct Args {
    /// URL of the photo album
    #[arg(long, required_unless_present = "config")]
    pub album_url: Option<String>,

    /// Path to the Firefox profile directory
    #[arg(long)]
    pub firefox_profile: Option<PathBuf>,

    /// JSON configuration file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver (geckodriver) URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Directory the image is downloaded into (emptied on every run)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Download timeout in seconds
    #[arg(long)]
    pub download_timeout: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub show_browser: bool,

    /// Only download the image, do not change the wallpaper
    #[arg(long)]
    pub no_apply: bool,

    /// Also write log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
