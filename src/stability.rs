use crate::config::StabilityPolicy;
use crate::error::{Result, SwitcherError};
use crate::source::ContentSource;

/// Triggers incremental loads until the page stops changing.
///
/// Returns the index of the trigger at which `policy.stable_threshold`
/// consecutive fingerprints matched their predecessor; that is the number of
/// triggers needed to reach the point past which nothing new loads.
///
/// Leaves `source` scrolled to the bottom; callers must reset it before
/// navigating again.
pub async fn detect_stable_depth<S: ContentSource>(
    source: &mut S,
    policy: &StabilityPolicy,
) -> Result<u32> {
    let pause = policy.pause();
    let mut stable_count = 0;
    let mut previous = source.fingerprint().await?;

    for attempt in 0..policy.max_attempts {
        source.advance().await?;
        tokio::time::sleep(pause).await;
        let current = source.fingerprint().await?;

        if current == previous {
            stable_count += 1;
            ::log::trace!(
                "Attempt {}: unchanged ({}/{})",
                attempt,
                stable_count,
                policy.stable_threshold
            );
            if stable_count >= policy.stable_threshold {
                ::log::debug!("Page stable after {} triggers", attempt);
                return Ok(attempt);
            }
        } else {
            ::log::trace!("Attempt {}: content changed", attempt);
            stable_count = 0;
            previous = current;
        }
    }

    Err(SwitcherError::StabilizationTimeout {
        attempts: policy.max_attempts,
    })
}
