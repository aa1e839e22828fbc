use fraudshield::applications::{
    Application, ApplicationId, ApplicationStatus, ApplicationStore, InMemoryApplicationStore,
    JsonFileApplicationStore, StoreError,
};
use fraudshield::config::{StorageBackend, StorageConfig};
use fraudshield::verification::RiskLevel;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected at startup from `FRAUDSHIELD_STORE`.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryApplicationStore),
    Json(JsonFileApplicationStore),
}

impl ConfiguredStore {
    pub(crate) fn from_config(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::Memory => Self::Memory(InMemoryApplicationStore::default()),
            StorageBackend::JsonFile => {
                Self::Json(JsonFileApplicationStore::new(config.storage_path()))
            }
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "in-memory".to_string(),
            Self::Json(store) => format!("json file {}", store.path().display()),
        }
    }

    fn inner(&self) -> &dyn ApplicationStore {
        match self {
            Self::Memory(store) => store,
            Self::Json(store) => store,
        }
    }
}

impl ApplicationStore for ConfiguredStore {
    fn load_all(&self) -> Result<Vec<Application>, StoreError> {
        self.inner().load_all()
    }

    fn next_id(&self) -> Result<ApplicationId, StoreError> {
        self.inner().next_id()
    }

    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        self.inner().insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.inner().fetch(id)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        self.inner().update_status(id, status)
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(raw).ok_or_else(|| {
        format!("unknown status '{raw}' (expected pending, approved, rejected, under_review)")
    })
}

pub(crate) fn parse_risk(raw: &str) -> Result<RiskLevel, String> {
    RiskLevel::parse(raw)
        .ok_or_else(|| format!("unknown risk level '{raw}' (expected low, medium, high)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parsers_accept_dashboard_labels() {
        assert_eq!(parse_status("under-review"), Ok(ApplicationStatus::UnderReview));
        assert_eq!(parse_risk("HIGH"), Ok(RiskLevel::High));
        assert!(parse_status("archived").is_err());
        assert!(parse_risk("extreme").is_err());
    }

    #[test]
    fn configured_store_follows_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./unused"),
            storage_key: "apps".to_string(),
        };
        let store = ConfiguredStore::from_config(&config);
        assert_eq!(store.describe(), "in-memory");
        assert_eq!(store.next_id().expect("id issued").0, "app-000001");
        assert!(store.load_all().expect("load succeeds").is_empty());
    }
}
