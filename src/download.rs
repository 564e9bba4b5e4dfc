use crate::config::DownloadPolicy;
use crate::error::{Result, SwitcherError};
use crate::filter::{ArtifactFilter, ArtifactKind};
use std::path::{Path, PathBuf};
use tokio::time::Instant;

/// Empties `directory`, creating it first if needed.
///
/// Stale files from a previous run must never be mistaken for the current
/// download, so this runs before the browser is pointed at the directory.
pub async fn reset_download_dir(directory: &Path) -> Result<()> {
    ::log::info!("Initializing download directory {}", directory.display());

    if !tokio::fs::try_exists(directory).await? {
        tokio::fs::create_dir_all(directory).await?;
        return Ok(());
    }

    let mut entries = tokio::fs::read_dir(directory).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
    }

    ::log::debug!("Download directory initialized");
    Ok(())
}

/// Resets `directory` and returns its absolute, symlink-free path for the browser
pub async fn prepare_download_dir(directory: &Path) -> Result<PathBuf> {
    reset_download_dir(directory).await?;
    Ok(tokio::fs::canonicalize(directory).await?)
}

/// Two-phase completion tracker for a download directory.
///
/// The first poll that sees a final artifact only records it as the
/// candidate. A later poll confirms it once no temporary artifact remains.
#[derive(Debug)]
pub struct DownloadWatch<'a> {
    directory: PathBuf,
    filter: &'a ArtifactFilter,
    candidate: Option<PathBuf>,
}

impl<'a> DownloadWatch<'a> {
    pub fn new(directory: &Path, filter: &'a ArtifactFilter) -> Self {
        Self {
            directory: directory.to_path_buf(),
            filter,
            candidate: None,
        }
    }

    pub fn candidate(&self) -> Option<&Path> {
        self.candidate.as_deref()
    }

    /// Feeds one directory listing into the tracker.
    ///
    /// `still_present` re-checks a final entry before it becomes the
    /// candidate. Returns the confirmed artifact path once the download set
    /// has settled.
    pub fn observe<F>(&mut self, names: &[String], still_present: F) -> Option<PathBuf>
    where
        F: Fn(&Path) -> bool,
    {
        if let Some(candidate) = &self.candidate {
            let pending = names.iter().any(|name| self.filter.is_temporary(name));
            if pending {
                ::log::trace!("Temporary artifacts still present, waiting");
                return None;
            }
            return Some(candidate.clone());
        }

        for name in names {
            if self.filter.classify(name) != ArtifactKind::Final {
                continue;
            }
            let path = self.directory.join(name);
            if still_present(&path) {
                ::log::debug!("Download candidate {}", path.display());
                self.candidate = Some(path);
            }
        }
        None
    }
}

/// Polls `directory` until a downloaded artifact is confirmed final.
pub async fn await_completed_download(
    directory: &Path,
    policy: &DownloadPolicy,
    filter: &ArtifactFilter,
) -> Result<PathBuf> {
    ::log::info!("Downloading...");

    let timeout = policy.timeout();
    let interval = policy.poll_interval();
    let start = Instant::now();
    let mut watch = DownloadWatch::new(directory, filter);

    while start.elapsed() < timeout {
        let names = list_names(directory).await?;
        if let Some(path) = watch.observe(&names, |p| p.exists()) {
            ::log::info!("Downloaded image {}", path.display());
            return Ok(path);
        }
        tokio::time::sleep(interval).await;
    }

    if let Some(candidate) = watch.candidate() {
        ::log::warn!(
            "Candidate {} never settled before the deadline",
            candidate.display()
        );
    }
    Err(SwitcherError::DownloadTimeout { waited: timeout })
}

async fn list_names(directory: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(directory).await?;
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
