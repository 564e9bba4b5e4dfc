use crate::error::Result;
use crate::source::ContentSource;
use rand::Rng;
use std::time::Duration;

/// Picks a depth uniformly from `0..=max_depth`
pub fn sample_depth<R: Rng + ?Sized>(rng: &mut R, max_depth: u32) -> u32 {
    rng.random_range(0..=max_depth)
}

/// Applies `n` incremental-load triggers, pausing after each one
pub async fn scroll_n_times<S: ContentSource>(
    source: &mut S,
    n: u32,
    pause: Duration,
) -> Result<()> {
    for _ in 0..n {
        source.advance().await?;
        tokio::time::sleep(pause).await;
    }
    Ok(())
}

/// Resets `source` and replays navigation to a uniformly sampled depth.
///
/// Loading is not re-checked at the target depth; every depth up to
/// `max_depth` was already observed reachable. Returns the sampled depth.
pub async fn sample_and_navigate<S: ContentSource, R: Rng + ?Sized>(
    source: &mut S,
    max_depth: u32,
    pause: Duration,
    rng: &mut R,
) -> Result<u32> {
    let target = sample_depth(rng, max_depth);
    ::log::info!("Scrolling randomly {} times...", target);

    source.reset().await?;
    scroll_n_times(source, target, pause).await?;
    Ok(target)
}
