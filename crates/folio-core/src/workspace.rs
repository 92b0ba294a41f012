//! Workspace: the in-progress draft for the current tool
//!
//! Every mutation auto-saves the draft through the session manager, so a
//! reload lands the user back on the same files, tool and options.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use folio_session::{
    Clock, FileDescriptor, SessionConfig, SessionManager, SessionRecord, SessionState, SystemClock,
};
use folio_storage::{MemoryStorage, SessionStorage, SqliteStorage};

use crate::config::{Config, StorageConfig};
use crate::error::CoreError;
use crate::tool::Tool;
use crate::Result;

pub struct Workspace {
    manager: SessionManager,
    /// Current draft; `saved_at` is only meaningful in storage
    draft: RwLock<SessionRecord>,
}

impl Workspace {
    /// Open the storage named in `config` and restore any live session
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with(config, config.session_config())
    }

    /// Like [`Workspace::open`], with a caller-built session config
    /// (typically `config.session_config()` plus callbacks)
    pub fn open_with(config: &Config, session: SessionConfig) -> Result<Self> {
        config.validate()?;
        let storage = open_storage(&config.storage)?;
        Ok(Self::new(storage, session))
    }

    pub fn new<S>(storage: S, session: SessionConfig) -> Self
    where
        S: SessionStorage + 'static,
    {
        Self::with_clock(storage, session, Arc::new(SystemClock))
    }

    pub fn with_clock<S>(storage: S, session: SessionConfig, clock: Arc<dyn Clock>) -> Self
    where
        S: SessionStorage + 'static,
    {
        let manager = SessionManager::with_clock(storage, session, clock);
        let draft = manager.take_restored().unwrap_or_else(blank_draft);

        tracing::info!(
            session_key = %manager.session_key(),
            operation = %draft.operation,
            file_count = draft.files.len(),
            total_bytes = draft.total_size(),
            "Opened workspace"
        );

        Self {
            manager,
            draft: RwLock::new(draft),
        }
    }

    pub fn draft(&self) -> SessionRecord {
        self.draft.read().clone()
    }

    /// The selected tool, if the draft names one this build knows
    pub fn tool(&self) -> Option<Tool> {
        self.draft.read().operation.parse().ok()
    }

    /// Whether the draft names a known tool and holds a PDF selection it
    /// can run on
    pub fn is_ready(&self) -> bool {
        let draft = self.draft.read();
        let Ok(tool) = draft.operation.parse::<Tool>() else {
            return false;
        };
        let count = draft.files.len();
        count >= tool.min_files()
            && (count <= 1 || tool.accepts_multiple())
            && draft.files.iter().all(FileDescriptor::is_pdf)
    }

    pub fn state(&self) -> SessionState {
        self.manager.state()
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.manager
    }

    // === Draft mutations (auto-saved) ===

    /// Switch tools. Options belong to a tool, so switching clears them.
    pub fn select_tool(&self, tool: Tool) -> SessionRecord {
        self.update(|draft| {
            if draft.operation != tool.as_str() {
                draft.operation = tool.as_str().to_string();
                draft.options.clear();
            }
        })
    }

    pub fn add_file(&self, file: FileDescriptor) -> SessionRecord {
        self.update(|draft| draft.files.push(file))
    }

    pub fn remove_file(&self, id: &str) -> Result<SessionRecord> {
        self.try_update(|draft| {
            let index = draft
                .file_index(id)
                .ok_or_else(|| CoreError::FileNotFound(id.to_string()))?;
            draft.files.remove(index);
            Ok(())
        })
    }

    /// Move a file to a new position (drag-and-drop reordering)
    pub fn move_file(&self, id: &str, new_index: usize) -> Result<SessionRecord> {
        self.try_update(|draft| {
            let current_index = draft
                .file_index(id)
                .ok_or_else(|| CoreError::FileNotFound(id.to_string()))?;
            let file = draft.files.remove(current_index);
            let insert_index = new_index.min(draft.files.len());
            draft.files.insert(insert_index, file);
            Ok(())
        })
    }

    pub fn set_option(&self, name: impl Into<String>, value: impl Into<Value>) -> SessionRecord {
        let name = name.into();
        let value = value.into();
        self.update(|draft| {
            draft.options.insert(name, value);
        })
    }

    pub fn remove_option(&self, name: &str) -> SessionRecord {
        self.update(|draft| {
            draft.options.remove(name);
        })
    }

    // === Session lifecycle ===

    /// Reload the draft from storage. Returns `None` (and leaves the draft
    /// untouched) if nothing live is stored.
    pub fn resume(&self) -> Option<SessionRecord> {
        let record = self.manager.restore_session()?;
        *self.draft.write() = record.clone();
        Some(record)
    }

    /// Processing finished: drop the stored session and start a blank draft
    pub fn complete(&self) -> bool {
        let cleared = self.manager.clear_session(false);
        *self.draft.write() = blank_draft();

        tracing::info!(session_key = %self.manager.session_key(), cleared, "Completed workspace");
        cleared
    }

    /// Throw away the current work, optionally asking the user first.
    /// The draft is only reset if the session was actually cleared.
    pub fn discard(&self, show_warning: bool) -> bool {
        let cleared = self.manager.clear_session(show_warning);
        if cleared {
            *self.draft.write() = blank_draft();
        }
        cleared
    }

    fn update<F>(&self, f: F) -> SessionRecord
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut draft = self.draft.write();
        f(&mut draft);
        self.persist(&draft);
        draft.clone()
    }

    fn try_update<F>(&self, f: F) -> Result<SessionRecord>
    where
        F: FnOnce(&mut SessionRecord) -> Result<()>,
    {
        let mut draft = self.draft.write();
        f(&mut draft)?;
        self.persist(&draft);
        Ok(draft.clone())
    }

    fn persist(&self, draft: &SessionRecord) {
        if !self.manager.save(draft) {
            tracing::warn!(
                session_key = %self.manager.session_key(),
                total_bytes = draft.total_size(),
                "Draft kept in memory only; it will not survive a reload"
            );
        }
    }
}

fn blank_draft() -> SessionRecord {
    SessionRecord::new(String::new())
}

fn open_storage(config: &StorageConfig) -> Result<Arc<dyn SessionStorage>> {
    match config {
        StorageConfig::Memory { quota_bytes } => {
            let storage = match quota_bytes {
                Some(quota) => MemoryStorage::with_quota(*quota),
                None => MemoryStorage::new(),
            };
            Ok(Arc::new(storage))
        }
        StorageConfig::Sqlite { path } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Arc::new(SqliteStorage::open(path)?))
        }
    }
}
