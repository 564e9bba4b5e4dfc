use crate::config::SwitcherConfig;
use crate::download::await_completed_download;
use crate::error::{Result, SwitcherError};
use crate::sampler::sample_and_navigate;
use crate::source::ContentSource;
use crate::stability::detect_stable_depth;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Runs one selection against an already opened album.
///
/// Finds the stable depth, replays navigation to a random depth, downloads a
/// random loaded item into `download_dir` and returns the finished file.
/// No step is retried.
pub async fn run_once<S, R>(
    source: &mut S,
    config: &SwitcherConfig,
    download_dir: &Path,
    rng: &mut R,
) -> Result<PathBuf>
where
    S: ContentSource,
    R: Rng + ?Sized,
{
    let filter = config.download.filter()?;

    let max_depth = detect_stable_depth(source, &config.stability).await?;
    ::log::info!("Estimated total PAGE_DOWNs to bottom of page: {}", max_depth);

    let pause = config.stability.pause();
    sample_and_navigate(source, max_depth, pause, rng).await?;
    tokio::time::sleep(config.settle_delay()).await;

    let count = source.loaded_items().await?;
    if count == 0 {
        return Err(SwitcherError::EmptySelection);
    }
    let index = rng.random_range(0..count);
    ::log::info!("Selected item {} of {}", index + 1, count);
    source.download_item(index).await?;

    await_completed_download(download_dir, &config.download, &filter).await
}
