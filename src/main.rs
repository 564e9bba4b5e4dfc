use album_wallpaper::Switcher;
use clap::Parser;
use std::process::ExitCode;

mod args;
mod logging;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let switcher = match build_switcher(&args) {
        Ok(switcher) => switcher,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Starting album wallpaper switcher with Firefox profile {:?} and album URL {}",
        switcher.config().firefox_profile,
        switcher.config().album_url
    );

    let start_time = std::time::Instant::now();
    match switcher.run().await {
        Ok(image) => {
            ::log::info!(
                "Finished with {} in {:.2} seconds",
                image.display(),
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Merge the optional config file with command-line overrides
fn build_switcher(args: &Args) -> album_wallpaper::Result<Switcher> {
    let mut switcher = match &args.config {
        Some(path) => Switcher::from_config_file(path)?,
        None => Switcher::new(args.album_url.as_deref().unwrap_or_default()),
    };

    if let Some(url) = &args.album_url {
        switcher = switcher.with_album_url(url);
    }
    if let Some(profile) = &args.firefox_profile {
        switcher = switcher.with_firefox_profile(profile.clone());
    }
    if let Some(url) = &args.webdriver_url {
        switcher = switcher.with_webdriver_url(url);
    }
    if let Some(dir) = &args.download_dir {
        switcher = switcher.with_download_dir(dir.clone());
    }
    if let Some(timeout) = args.download_timeout {
        switcher = switcher.with_download_timeout(timeout);
    }
    if args.show_browser {
        switcher = switcher.with_headless(false);
    }
    if args.no_apply {
        switcher = switcher.with_apply_wallpaper(false);
    }
    Ok(switcher)
}
