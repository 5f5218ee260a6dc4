//! Where the index structure comes from, file watching, and background
//! reloads.
//!
//! A file source is watched with `notify`; change signals reach the event
//! loop over a channel.  The document is then read on a worker thread so a
//! slow disk never stalls the loop, and results come back tagged with a
//! generation so an older read can't overwrite a newer one.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::event::{AccessKind, AccessMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::core::tree::IndexStructure;

/// Input location given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    File(PathBuf),
    Stdin,
}

impl StructureSource {
    /// `-` means stdin; anything else is a path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            StructureSource::Stdin
        } else {
            StructureSource::File(arg.to_path_buf())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StructureSource::File(path) => path.display().to_string(),
            StructureSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Whether the source can be re-read later (stdin cannot).
    pub fn is_reloadable(&self) -> bool {
        matches!(self, StructureSource::File(_))
    }
}

/// Parse a structure document.
pub fn parse_structure(json: &str) -> Result<IndexStructure> {
    serde_json::from_str(json).context("invalid index structure document")
}

/// Read and parse the whole document from `source`.
pub fn load_structure(source: &StructureSource) -> Result<IndexStructure> {
    let json = match source {
        StructureSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        StructureSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read structure from stdin")?;
            buf
        }
    };
    parse_structure(&json).with_context(|| format!("while loading {}", source.describe()))
}

/// Result of a background reload.
pub struct SourceUpdate {
    pub generation: u64,
    pub result: Result<IndexStructure>,
}

pub fn spawn_reload(tx: mpsc::UnboundedSender<SourceUpdate>, generation: u64, source: StructureSource) {
    std::thread::spawn(move || {
        let result = load_structure(&source);
        let _ = tx.send(SourceUpdate { generation, result });
    });
}

/// Watch `path` and send a unit on `tx` whenever it is written, created,
/// replaced or removed.  The returned watcher stops when dropped.
///
/// The parent directory is watched rather than the file itself: editors
/// that save by renaming a temp file over the original would otherwise
/// leave the watch on a dead inode.
pub fn watch_source(path: &Path, tx: mpsc::UnboundedSender<()>) -> Result<RecommendedWatcher> {
    let name = path
        .file_name()
        .map(OsString::from)
        .with_context(|| format!("{} does not name a file", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let watched_name = name.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if touches_source(&event, &watched_name) => {
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("watch: {err}"),
        },
        Config::default(),
    )
    .context("cannot start file watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("cannot watch {}", dir.display()))?;
    tracing::debug!("watch: {} in {}", name.to_string_lossy(), dir.display());
    Ok(watcher)
}

/// Whether `event` changed the file called `name`.  Reads never count.
fn touches_source(event: &Event, name: &OsString) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Remove(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    );
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use notify::event::ModifyKind;
    use tempfile::tempdir;

    use super::*;
    use crate::core::tree::IndexType;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(StructureSource::from_arg(Path::new("-")), StructureSource::Stdin);
        assert!(!StructureSource::Stdin.is_reloadable());
        let file = StructureSource::from_arg(Path::new("tree.json"));
        assert_eq!(file, StructureSource::File(PathBuf::from("tree.json")));
        assert_eq!(file.describe(), "tree.json");
    }

    #[test]
    fn parse_errors_carry_context() {
        let err = parse_structure("{\"index_type\": \"btree\"}").unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid index structure document"));
    }

    #[test]
    fn missing_file_is_reported() {
        let source = StructureSource::File(PathBuf::from("/definitely/not/here.json"));
        let err = load_structure(&source).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[tokio::test]
    async fn reload_reports_back_with_its_generation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(
            &path,
            r#"{"index_type": "suffix", "root": {"id": "root", "label": "Suffix Tree Root"}}"#,
        )
        .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_reload(tx, 7, StructureSource::File(path));
        let update = rx.recv().await.unwrap();

        assert_eq!(update.generation, 7);
        let structure = update.result.unwrap();
        assert_eq!(structure.index_type, IndexType::Suffix);
        assert_eq!(structure.root.unwrap().label, "Suffix Tree Root");
    }

    #[test]
    fn only_writes_to_the_source_file_count() {
        let name = OsString::from("tree.json");
        let write = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/idx/tree.json"));
        let closed = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
            .add_path(PathBuf::from("/idx/tree.json"));
        let read = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Read)))
            .add_path(PathBuf::from("/idx/tree.json"));
        let sibling = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/idx/other.json"));

        assert!(touches_source(&write, &name));
        assert!(touches_source(&closed, &name));
        assert!(!touches_source(&read, &name));
        assert!(!touches_source(&sibling, &name));
    }

    #[tokio::test]
    async fn watcher_signals_when_the_file_is_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "{}").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _watcher = watch_source(&path, tx).unwrap();
        std::fs::write(&path, r#"{"index_type": "patricia", "root": null}"#).unwrap();

        let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(signal.unwrap(), Some(()));
    }

    #[test]
    fn watching_needs_a_file_name() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(watch_source(Path::new("/"), tx).is_err());
    }
}
