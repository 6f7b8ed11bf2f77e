//! Periodic saving of the open project.

use crate::project::Project;
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key the most recently saved project is mirrored under.
pub const LAST_PROJECT_KEY: &str = "__last_project__";

/// Tracks unsaved changes and writes the project back when the interval elapses.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    /// Id the project is saved under besides [`LAST_PROJECT_KEY`].
    project_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            project_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the project as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_project_id(&mut self, id: Option<String>) {
        self.project_id = id;
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Dirty, and the interval has elapsed since the last save (or there was none).
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        self.last_save.is_none_or(|last| last.elapsed() >= self.interval)
    }

    /// Save if [`should_save`](Self::should_save). Returns true if a save happened.
    pub async fn maybe_save(&mut self, project: &Project) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        if let Err(e) = self.save(project).await {
            log::warn!("autosave failed: {}", e);
            return Err(e);
        }
        Ok(true)
    }

    /// Save immediately, under the project id if set and always under [`LAST_PROJECT_KEY`].
    pub async fn save(&mut self, project: &Project) -> StorageResult<()> {
        if let Some(id) = &self.project_id {
            self.storage.save(id, project).await?;
        }
        self.storage.save(LAST_PROJECT_KEY, project).await?;

        self.last_save = Some(Instant::now());
        self.dirty = false;
        log::debug!("autosaved {} elements", project.elements.len());
        Ok(())
    }

    /// Load a project by id and make it the current one.
    pub async fn load(&mut self, id: &str) -> StorageResult<Project> {
        let project = self.storage.load(id).await?;
        self.project_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(project)
    }

    /// The last saved project, if there is one that still parses.
    pub async fn load_last(&mut self) -> Option<Project> {
        match self.storage.load(LAST_PROJECT_KEY).await {
            Ok(project) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(project)
            }
            Err(e) => {
                log::warn!("could not restore last project: {}", e);
                None
            }
        }
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Saved project ids, without [`LAST_PROJECT_KEY`].
    pub async fn list_projects(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_PROJECT_KEY);
        Ok(ids)
    }

    pub async fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::MemoryStorage>> {
    Ok(Arc::new(crate::storage::MemoryStorage::new()))
}

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::MemoryStorage;

pub type PlatformAutoSaveManager = AutoSaveManager<PlatformStorage>;

/// Auto-save manager over [`create_default_storage`].
pub fn create_autosave_manager() -> StorageResult<PlatformAutoSaveManager> {
    let storage = create_default_storage()?;
    Ok(AutoSaveManager::new(storage))
}
