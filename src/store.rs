use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::{CounterEntry, Group, StoreData, WidgetPreference};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Group already exists: {0}")]
    DuplicateGroup(String),
}

/// JSON document store. All access goes through one async mutex, and every
/// mutation is persisted before the lock is released, so concurrent writers
/// are serialised and memory never runs ahead of disk.
pub struct Store {
    data: Mutex<StoreData>,
    path: Option<PathBuf>,
}

impl Store {
    /// Loads the document at `path`; a missing file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let data = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoreData::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no data file at {}, starting empty", path.display());
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "loaded {} groups, {} counters from {}",
            data.groups.len(),
            data.counters.len(),
            path.display()
        );

        Ok(Self {
            data: Mutex::new(data),
            path: Some(path),
        })
    }

    /// Store without a backing file.
    pub fn in_memory(data: StoreData) -> Self {
        Self {
            data: Mutex::new(data),
            path: None,
        }
    }

    pub async fn snapshot(&self) -> StoreData {
        self.data.lock().await.clone()
    }

    /// Fails when the directory holding the data file has become unreachable.
    pub async fn check(&self) -> Result<(), StoreError> {
        let _guard = self.data.lock().await;
        if let Some(parent) = self.path.as_deref().and_then(Path::parent) {
            let dir = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            fs::metadata(dir).await?;
        }
        Ok(())
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        self.data.lock().await.groups.clone()
    }

    pub async fn group_count(&self) -> usize {
        self.data.lock().await.groups.len()
    }

    pub async fn insert_group(&self, group: Group) -> Result<Group, StoreError> {
        self.mutate(|data| {
            if data.groups.iter().any(|g| g.id == group.id) {
                return Err(StoreError::DuplicateGroup(group.id.clone()));
            }
            data.groups.push(group.clone());
            Ok(group)
        })
        .await
    }

    /// Removes the group together with its counter and widget preference.
    /// An unknown id is not an error and leaves the document untouched.
    pub async fn remove_group(&self, id: &str) -> Result<bool, StoreError> {
        let mut guard = self.data.lock().await;
        if !guard.groups.iter().any(|g| g.id == id) {
            return Ok(false);
        }

        let mut next = guard.clone();
        next.groups.retain(|g| g.id != id);
        next.counters.remove(id);
        next.widgets.remove(id);

        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }

    pub async fn counters(&self) -> BTreeMap<String, CounterEntry> {
        self.data.lock().await.counters.clone()
    }

    pub async fn counter(&self, id: &str) -> Option<CounterEntry> {
        self.data.lock().await.counters.get(id).cloned()
    }

    /// Writes the results of one refresh cycle and persists once. Entries
    /// for groups deleted while the cycle was running are dropped.
    pub async fn apply_counters(
        &self,
        updates: Vec<(String, CounterEntry)>,
    ) -> Result<usize, StoreError> {
        self.mutate(|data| {
            let mut applied = 0;
            for (id, entry) in updates {
                if !data.groups.iter().any(|g| g.id == id) {
                    debug!("dropping counter for removed group {}", id);
                    continue;
                }
                data.counters.insert(id, entry);
                applied += 1;
            }
            Ok(applied)
        })
        .await
    }

    pub async fn widgets(&self) -> BTreeMap<String, WidgetPreference> {
        self.data.lock().await.widgets.clone()
    }

    pub async fn widget(&self, id: &str) -> Option<WidgetPreference> {
        self.data.lock().await.widgets.get(id).cloned()
    }

    pub async fn upsert_widget(
        &self,
        id: &str,
        preference: WidgetPreference,
    ) -> Result<WidgetPreference, StoreError> {
        self.mutate(|data| {
            data.widgets.insert(id.to_string(), preference.clone());
            Ok(preference)
        })
        .await
    }

    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.data.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, path).await?;
        debug!("persisted {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
