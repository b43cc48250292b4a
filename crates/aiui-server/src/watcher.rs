//! File watching for hot reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The site config was written
    ConfigModified(PathBuf),

    /// A Markdown page was modified in place
    DocModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Any other modification
    Modified(PathBuf),
}

impl WatchEvent {
    /// Whether the site needs a recompile, rather than a content refresh.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WatchEvent::ConfigModified(_) | WatchEvent::Created(_) | WatchEvent::Deleted(_)
        )
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `paths`; changes to a file named like `config_path` are
    /// reported as config changes.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        paths: &[PathBuf],
        config_path: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::debug!("Not watching missing path {}", path.display());
            }
        }

        let config_name = config_path.file_name().map(|n| n.to_os_string());

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                // Editors write in bursts.
                let now = Instant::now();
                if last_event_time.is_some_and(|last| now.duration_since(last) < debounce_duration) {
                    continue;
                }
                last_event_time = Some(now);

                for path in event.paths {
                    if let Some(e) = classify_event(&path, &event.kind, config_name.as_ref()) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(
    path: &Path,
    kind: &notify::EventKind,
    config_name: Option<&OsString>,
) -> Option<WatchEvent> {
    use notify::EventKind;

    let is_config = config_name.is_some_and(|name| path.file_name() == Some(name.as_os_str()));
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) if is_config => {
            Some(WatchEvent::ConfigModified(path.to_path_buf()))
        }
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => {
            if ext == "md" || ext == "mdx" {
                Some(WatchEvent::DocModified(path.to_path_buf()))
            } else {
                Some(WatchEvent::Modified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use notify::EventKind;
    use std::fs;
    use tempfile::tempdir;

    fn config_name() -> OsString {
        OsString::from("aiui.yaml")
    }

    #[test]
    fn classifies_config_changes() {
        let name = config_name();
        let event = classify_event(
            Path::new("/site/aiui.yaml"),
            &EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            Some(&name),
        );

        let event = event.unwrap();
        assert_eq!(event, WatchEvent::ConfigModified(PathBuf::from("/site/aiui.yaml")));
        assert!(event.is_structural());
    }

    #[test]
    fn classifies_doc_and_other_changes() {
        let name = config_name();
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        let doc = classify_event(Path::new("/site/docs/intro.md"), &modify, Some(&name)).unwrap();
        assert_eq!(doc, WatchEvent::DocModified(PathBuf::from("/site/docs/intro.md")));
        assert!(!doc.is_structural());

        let other = classify_event(Path::new("/site/docs/logo.png"), &modify, Some(&name));
        assert_eq!(other, Some(WatchEvent::Modified(PathBuf::from("/site/docs/logo.png"))));
    }

    #[test]
    fn creation_and_removal_are_structural() {
        let created = classify_event(
            Path::new("/site/docs/new.md"),
            &EventKind::Create(CreateKind::File),
            None,
        )
        .unwrap();
        let deleted = classify_event(
            Path::new("/site/docs/old.md"),
            &EventKind::Remove(RemoveKind::File),
            None,
        )
        .unwrap();

        assert!(created.is_structural());
        assert!(deleted.is_structural());
        assert_eq!(
            classify_event(Path::new("/site/docs/a.md"), &EventKind::Any, None),
            None
        );
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("test.md");

        let (watcher, mut rx) =
            FileWatcher::new(&[temp.path().to_path_buf()], Path::new("aiui.yaml")).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, "# Created").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }
}
