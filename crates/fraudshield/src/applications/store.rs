use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::domain::{Application, ApplicationId, ApplicationStatus};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Every backend behaves like a single serialized list: there is no
/// versioning, and the last writer wins.
pub trait ApplicationStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<Application>, StoreError>;
    fn next_id(&self) -> Result<ApplicationId, StoreError>;
    fn insert(&self, application: Application) -> Result<Application, StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

fn highest_sequence(applications: &[Application]) -> u64 {
    applications
        .iter()
        .filter_map(|application| application.id.sequence())
        .max()
        .unwrap_or(0)
}

fn insert_into(
    applications: &mut Vec<Application>,
    application: Application,
) -> Result<Application, StoreError> {
    if applications
        .iter()
        .any(|existing| existing.id == application.id)
    {
        return Err(StoreError::Conflict);
    }
    applications.push(application.clone());
    Ok(application)
}

fn set_status(
    applications: &mut [Application],
    id: &ApplicationId,
    status: ApplicationStatus,
) -> Result<Application, StoreError> {
    let application = applications
        .iter_mut()
        .find(|application| &application.id == id)
        .ok_or(StoreError::NotFound)?;
    application.status = status;
    Ok(application.clone())
}

#[derive(Debug, Default)]
struct MemoryState {
    applications: Vec<Application>,
    last_sequence: u64,
}

/// Process-local store; contents vanish on restart.
#[derive(Debug, Default)]
pub struct InMemoryApplicationStore {
    state: Mutex<MemoryState>,
}

impl InMemoryApplicationStore {
    pub fn with_applications(applications: Vec<Application>) -> Self {
        let last_sequence = highest_sequence(&applications);
        Self {
            state: Mutex::new(MemoryState {
                applications,
                last_sequence,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store mutex poisoned".to_string()))
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn load_all(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.lock()?.applications.clone())
    }

    fn next_id(&self) -> Result<ApplicationId, StoreError> {
        let mut state = self.lock()?;
        state.last_sequence = state
            .last_sequence
            .max(highest_sequence(&state.applications))
            + 1;
        Ok(ApplicationId::from_sequence(state.last_sequence))
    }

    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        let mut state = self.lock()?;
        insert_into(&mut state.applications, application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .find(|application| &application.id == id)
            .cloned())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut state = self.lock()?;
        set_status(&mut state.applications, id, status)
    }
}

/// JSON file holding the whole application list under one storage key.
///
/// Reads tolerate a missing or corrupt file by starting from an empty list.
/// Each mutation rewrites the full file.
#[derive(Debug)]
pub struct JsonFileApplicationStore {
    path: PathBuf,
    last_sequence: Mutex<u64>,
}

impl JsonFileApplicationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_sequence: Mutex::new(0),
        }
    }

    /// Store at `<dir>/<storage_key>.json`.
    pub fn in_dir(dir: impl AsRef<Path>, storage_key: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{storage_key}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, u64>, StoreError> {
        self.last_sequence
            .lock()
            .map_err(|_| StoreError::Unavailable("json store mutex poisoned".to_string()))
    }

    fn read(&self) -> Result<Vec<Application>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&raw) {
            Ok(applications) => Ok(applications),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "stored applications are malformed; starting from an empty list"
                );
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, applications: &[Application]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = serde_json::to_vec_pretty(applications)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), count = applications.len(), "applications persisted");
        Ok(())
    }
}

impl ApplicationStore for JsonFileApplicationStore {
    fn load_all(&self) -> Result<Vec<Application>, StoreError> {
        let _guard = self.lock()?;
        self.read()
    }

    fn next_id(&self) -> Result<ApplicationId, StoreError> {
        let mut last_sequence = self.lock()?;
        let applications = self.read()?;
        *last_sequence = (*last_sequence).max(highest_sequence(&applications)) + 1;
        Ok(ApplicationId::from_sequence(*last_sequence))
    }

    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        let _guard = self.lock()?;
        let mut applications = self.read()?;
        let stored = insert_into(&mut applications, application)?;
        self.write(&applications)?;
        Ok(stored)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let _guard = self.lock()?;
        Ok(self
            .read()?
            .into_iter()
            .find(|application| &application.id == id))
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let _guard = self.lock()?;
        let mut applications = self.read()?;
        let updated = set_status(&mut applications, id, status)?;
        self.write(&applications)?;
        Ok(updated)
    }
}
