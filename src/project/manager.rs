// Persistence for tab documents: store contract, file-backed store and debounced autosave

use crate::config::EditorConfig;
use crate::messaging::channels::NotificationConsumer;
use crate::messaging::notification::NotificationKind;
use crate::project::serialization::*;
use crate::project::types::ProjectId;
use crate::store::TabStore;
use ringbuf::traits::Consumer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Project error types
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("File system error: {0}")]
    FileSystemError(String),

    #[error("Invalid project structure: {0}")]
    InvalidStructure(String),

    #[error("Project {0} not found")]
    NotFound(ProjectId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

/// External document store
///
/// `put` is called after the autosave debounce window; the editor never waits
/// on it before accepting further edits.
pub trait ProjectStore {
    fn put(&mut self, id: ProjectId, document: &Document) -> Result<(), ProjectError>;

    fn get(&self, id: ProjectId) -> Result<Document, ProjectError>;
}

/// On-disk encoding used by `FileProjectStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Ron,
}

impl StoreFormat {
    fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Ron => "ron",
        }
    }
}

/// One file per project under a root directory
pub struct FileProjectStore {
    root: PathBuf,
    format: StoreFormat,
}

impl FileProjectStore {
    /// Create a store rooted at `root` (created on first save)
    pub fn new<P: AsRef<Path>>(root: P, format: StoreFormat) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path_for(&self, id: ProjectId) -> PathBuf {
        self.root.join(format!("{}.{}", id, self.format.extension()))
    }
}

impl ProjectStore for FileProjectStore {
    fn put(&mut self, id: ProjectId, document: &Document) -> Result<(), ProjectError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            ProjectError::FileSystemError(format!("Failed to create store directory: {}", e))
        })?;

        let data = match self.format {
            StoreFormat::Json => serialize_to_json(document)?,
            StoreFormat::Ron => serialize_to_ron(document)?,
        };

        // Write beside the target, then rename over it
        let path = self.path_for(id);
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, data).map_err(|e| {
            ProjectError::FileSystemError(format!("Failed to write project {}: {}", id, e))
        })?;
        std::fs::rename(&temp_path, &path)?;

        tracing::info!("Saved project '{}' to {}", document.project_name, path.display());
        Ok(())
    }

    fn get(&self, id: ProjectId) -> Result<Document, ProjectError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(ProjectError::NotFound(id));
        }
        load_document_file(&path)
    }
}

/// In-memory store, mainly for tests and previews
#[derive(Default)]
pub struct MemoryProjectStore {
    documents: HashMap<ProjectId, Document>,
    puts: usize,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls
    pub fn put_count(&self) -> usize {
        self.puts
    }
}

impl ProjectStore for MemoryProjectStore {
    fn put(&mut self, id: ProjectId, document: &Document) -> Result<(), ProjectError> {
        self.documents.insert(id, document.clone());
        self.puts += 1;
        Ok(())
    }

    fn get(&self, id: ProjectId) -> Result<Document, ProjectError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or(ProjectError::NotFound(id))
    }
}

/// Read a document file, picking the decoder from the extension
pub fn load_document_file<P: AsRef<Path>>(path: P) -> Result<Document, ProjectError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|e| {
        ProjectError::FileSystemError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let document = match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => deserialize_from_ron(&data)?,
        _ => deserialize_from_json(&data)?,
    };
    tracing::info!("Loaded project '{}' from {}", document.project_name, path.display());
    Ok(document)
}

/// Write a document file, picking the encoder from the extension
pub fn save_document_file<P: AsRef<Path>>(path: P, document: &Document) -> Result<(), ProjectError> {
    let path = path.as_ref();
    let data = match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => serialize_to_ron(document)?,
        _ => serialize_to_json(document)?,
    };
    std::fs::write(path, data).map_err(|e| {
        ProjectError::FileSystemError(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// Debounced autosave driven by document-changed notifications
///
/// Every change restarts the debounce window; once it elapses with no new
/// change the document is put to the store. A failed put stays pending and
/// is retried on the next poll.
pub struct Autosave {
    notifications: NotificationConsumer,
    debounce: Duration,
    pending_since: Option<Instant>,
    last_saved: Option<chrono::DateTime<chrono::Utc>>,
}

impl Autosave {
    pub fn new(notifications: NotificationConsumer, debounce: Duration) -> Self {
        Self {
            notifications,
            debounce,
            pending_since: None,
            last_saved: None,
        }
    }

    /// Autosave using the configured debounce window
    pub fn with_config(notifications: NotificationConsumer, config: &EditorConfig) -> Self {
        Self::new(notifications, config.autosave_debounce())
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Wall-clock time of the last successful save
    pub fn last_saved(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.last_saved
    }

    /// Drain notifications and save if the debounce window has elapsed.
    /// Returns true when a save happened.
    pub fn poll(
        &mut self,
        now: Instant,
        tabs: &mut TabStore,
        store: &mut dyn ProjectStore,
    ) -> Result<bool, ProjectError> {
        while let Some(notification) = self.notifications.try_pop() {
            if matches!(
                notification.kind,
                NotificationKind::DocumentChanged | NotificationKind::HistoryRestored
            ) {
                self.pending_since = Some(now);
            }
        }

        let Some(since) = self.pending_since else {
            return Ok(false);
        };
        if now.duration_since(since) < self.debounce {
            return Ok(false);
        }

        let document = tabs.to_document();
        if let Err(e) = store.put(tabs.project().id, &document) {
            tracing::warn!("Autosave failed, will retry: {}", e);
            return Err(e);
        }

        self.pending_since = None;
        self.last_saved = Some(chrono::Utc::now());
        tabs.mark_saved();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::create_notification_channel;
    use crate::project::types::Project;
    use crate::tab::data::TabData;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileProjectStore::new(dir.path(), StoreFormat::Json);
        let project = Project::new("Stored");
        let document = to_document(&project, &TabData::new());

        store.put(project.id, &document).unwrap();
        assert!(store.path_for(project.id).exists());
        assert_eq!(store.get(project.id).unwrap(), document);
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new(dir.path(), StoreFormat::Ron);
        let missing = ProjectId::new();
        assert!(matches!(store.get(missing), Err(ProjectError::NotFound(id)) if id == missing));
    }

    #[test]
    fn test_document_file_by_extension() {
        let dir = tempdir().unwrap();
        let project = Project::new("Files");
        let document = to_document(&project, &TabData::new());

        for name in ["song.json", "song.ron"] {
            let path = dir.path().join(name);
            save_document_file(&path, &document).unwrap();
            assert_eq!(load_document_file(&path).unwrap(), document);
        }
    }

    #[test]
    fn test_autosave_debounce() {
        let (producer, consumer) = create_notification_channel(16);
        let mut tabs = TabStore::new(Project::default()).with_notifications(producer);
        let mut autosave = Autosave::new(consumer, Duration::from_millis(500));
        let mut store = MemoryProjectStore::new();
        let start = Instant::now();

        let section = tabs.project().sections[0].id;
        let bars = tabs.get_bars(section, crate::tab::Instrument::Guitar).unwrap().to_vec();
        tabs.set_bars(section, crate::tab::Instrument::Guitar, bars);
        assert!(tabs.is_dirty());

        assert!(!autosave.poll(start, &mut tabs, &mut store).unwrap());
        assert!(autosave.is_pending());
        assert!(!autosave
            .poll(start + Duration::from_millis(100), &mut tabs, &mut store)
            .unwrap());
        assert!(autosave
            .poll(start + Duration::from_millis(600), &mut tabs, &mut store)
            .unwrap());

        assert_eq!(store.put_count(), 1);
        assert!(!tabs.is_dirty());
        assert!(autosave.last_saved().is_some());
        assert!(store.get(tabs.project().id).is_ok());
    }

    #[test]
    fn test_autosave_debounce_from_config() {
        let config = EditorConfig {
            autosave_debounce_ms: 50,
            ..EditorConfig::default()
        };
        let (producer, consumer) = create_notification_channel(16);
        let mut tabs = TabStore::new(Project::default()).with_notifications(producer);
        let mut autosave = Autosave::with_config(consumer, &config);
        let mut store = MemoryProjectStore::new();
        let start = Instant::now();

        tabs.set_key("A");
        assert!(!autosave.poll(start, &mut tabs, &mut store).unwrap());
        assert!(autosave
            .poll(start + Duration::from_millis(60), &mut tabs, &mut store)
            .unwrap());
        assert_eq!(store.put_count(), 1);
    }
}
