//! File watching for live reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Markdown document was modified
    MarkdownModified(PathBuf),

    /// Site descriptor was written, created or replaced
    ConfigModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification
    Modified(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::MarkdownModified(p)
            | Self::ConfigModified(p)
            | Self::Created(p)
            | Self::Deleted(p)
            | Self::Modified(p) => p,
        }
    }
}

/// What to watch and what to leave alone.
#[derive(Debug, Clone)]
struct Filter {
    /// Watched single files
    files: Vec<PathBuf>,
    /// Paths whose changes never trigger events (build output)
    ignored: Vec<PathBuf>,
    /// Recursively watched directories
    dirs: Vec<PathBuf>,
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `dirs` recursively and `files` individually, skipping anything
    /// under `ignored`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        dirs: &[PathBuf],
        files: &[PathBuf],
        ignored: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let filter = Filter {
            files: files.iter().map(|f| canonical_file(f)).collect(),
            ignored: ignored.iter().map(|p| canonical(p)).collect(),
            dirs: dirs.iter().map(|d| canonical(d)).collect(),
        };

        // Create the watcher
        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for dir in &filter.dirs {
            if dir.exists() {
                watcher
                    .watch(dir, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Editors replace files on save, so watch the parent of single files
        for file in &filter.files {
            if let Some(parent) = file.parent().filter(|p| p.exists()) {
                watcher
                    .watch(parent, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Forward events to the async side
        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    if let Some(e) = classify_event(path, &event.kind, &filter) {
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

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonical path of a file that may be replaced (and briefly missing).
fn canonical_file(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    match path.file_name() {
        Some(name) => canonical(parent).join(name),
        None => canonical(path),
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind, filter: &Filter) -> Option<WatchEvent> {
    use notify::EventKind;

    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_)
    ) {
        return None;
    }

    if filter.files.iter().any(|f| f == path) {
        return Some(WatchEvent::ConfigModified(path.to_path_buf()));
    }

    if filter.ignored.iter().any(|i| path.starts_with(i)) {
        return None;
    }

    // Siblings of watched files are not of interest
    if !filter.dirs.iter().any(|d| path.starts_with(d)) {
        return None;
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        _ if ext == "md" => Some(WatchEvent::MarkdownModified(path.to_path_buf())),
        _ => Some(WatchEvent::Modified(path.to_path_buf())),
    }
}
