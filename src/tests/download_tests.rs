use crate::config::DownloadPolicy;
use crate::download::{
    DownloadWatch, await_completed_download, prepare_download_dir, reset_download_dir,
};
use crate::error::SwitcherError;
use crate::filter::ArtifactFilter;
use std::path::Path;
use std::time::Duration;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

fn fast_policy(timeout_secs: u64) -> DownloadPolicy {
    DownloadPolicy {
        timeout_secs,
        poll_interval_ms: 20,
        ..DownloadPolicy::default()
    }
}

#[cfg(test)]
mod watch_tests {
    use super::*;

    #[test]
    fn test_confirms_only_after_temporaries_are_gone() {
        let filter = ArtifactFilter::default();
        let mut watch = DownloadWatch::new(Path::new("dl"), &filter);

        assert_eq!(watch.observe(&names(&["a.tmp"]), |_| true), None);
        assert_eq!(watch.candidate(), None);

        assert_eq!(watch.observe(&names(&["a.tmp", "b.jpg"]), |_| true), None);
        assert_eq!(watch.candidate(), Some(Path::new("dl/b.jpg")));

        assert_eq!(
            watch.observe(&names(&["b.jpg"]), |_| true),
            Some(Path::new("dl/b.jpg").to_path_buf())
        );
    }

    #[test]
    fn test_candidate_is_never_returned_on_the_poll_that_found_it() {
        let filter = ArtifactFilter::default();
        let mut watch = DownloadWatch::new(Path::new("dl"), &filter);

        assert_eq!(watch.observe(&names(&["b.jpg"]), |_| true), None);
        assert!(watch.observe(&names(&["b.jpg"]), |_| true).is_some());
    }

    #[test]
    fn test_sibling_temporary_blocks_confirmation() {
        let filter = ArtifactFilter::default();
        let mut watch = DownloadWatch::new(Path::new("dl"), &filter);

        watch.observe(&names(&["b.jpg"]), |_| true);
        assert_eq!(
            watch.observe(&names(&["b.jpg", "b.mp4.part"]), |_| true),
            None
        );
        assert!(watch.observe(&names(&["b.jpg", "b.mp4"]), |_| true).is_some());
    }

    #[test]
    fn test_vanished_entry_is_not_a_candidate() {
        let filter = ArtifactFilter::default();
        let mut watch = DownloadWatch::new(Path::new("dl"), &filter);

        assert_eq!(watch.observe(&names(&["b.jpg"]), |_| false), None);
        assert_eq!(watch.candidate(), None);
    }

    #[test]
    fn test_last_final_entry_wins() {
        let filter = ArtifactFilter::default();
        let mut watch = DownloadWatch::new(Path::new("dl"), &filter);

        watch.observe(&names(&["x.jpg", "y.tmp", "z.jpg"]), |_| true);
        assert_eq!(watch.candidate(), Some(Path::new("dl/z.jpg")));
    }
}

#[cfg(test)]
mod polling_tests {
    use super::*;

    #[tokio::test]
    async fn test_waits_through_directory_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("a.tmp"), b"").unwrap();

        let writer_root = root.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::fs::write(writer_root.join("b.jpg"), b"jpeg").unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::fs::remove_file(writer_root.join("a.tmp")).unwrap();
        });

        let filter = ArtifactFilter::default();
        let path = await_completed_download(&root, &fast_policy(5), &filter)
            .await
            .unwrap();

        assert_eq!(path, root.join("b.jpg"));
        assert!(!root.join("a.tmp").exists());
    }

    #[tokio::test]
    async fn test_lingering_temporary_times_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("c.tmp"), b"").unwrap();

        let filter = ArtifactFilter::default();
        let result = await_completed_download(dir.path(), &fast_policy(1), &filter).await;

        assert!(matches!(
            result,
            Err(SwitcherError::DownloadTimeout { waited }) if waited == Duration::from_secs(1)
        ));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let filter = ArtifactFilter::default();
        let result =
            await_completed_download(&dir.path().join("absent"), &fast_policy(1), &filter).await;
        assert!(matches!(result, Err(SwitcherError::Io(_))));
    }
}

#[cfg(test)]
mod reset_tests {
    use super::*;

    fn is_empty_dir(path: &Path) -> bool {
        path.is_dir() && std::fs::read_dir(path).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_reset_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("downloaded-image");

        reset_download_dir(&target).await.unwrap();
        assert!(is_empty_dir(&target));

        reset_download_dir(&target).await.unwrap();
        assert!(is_empty_dir(&target));
    }

    #[tokio::test]
    async fn test_reset_removes_stale_entries() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloaded-image");
        std::fs::create_dir_all(target.join("sub").join("deeper")).unwrap();
        std::fs::write(target.join("old.jpg"), b"old").unwrap();
        std::fs::write(target.join("old.jpg.part"), b"").unwrap();
        std::fs::write(target.join("sub").join("inner.png"), b"").unwrap();

        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"keep").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(&outside, target.join("link")).unwrap();

        reset_download_dir(&target).await.unwrap();
        assert!(is_empty_dir(&target));
        // Symlinks are removed, not followed
        assert!(outside.exists());

        reset_download_dir(&target).await.unwrap();
        assert!(is_empty_dir(&target));
    }

    #[tokio::test]
    async fn test_prepare_returns_absolute_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("..").join("downloaded-image");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.jpg"), b"old").unwrap();

        let prepared = prepare_download_dir(&target).await.unwrap();

        assert!(prepared.is_absolute());
        assert!(!prepared.components().any(|c| c.as_os_str() == ".."));
        assert_eq!(
            prepared,
            std::fs::canonicalize(dir.path().join("downloaded-image")).unwrap()
        );
        assert!(is_empty_dir(&prepared));
    }
}
