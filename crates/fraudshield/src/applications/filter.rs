use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Application, ApplicationStatus};
use crate::verification::RiskLevel;

/// Dashboard filter; every criterion is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub search: Option<String>,
}

/// `?status=` is the dashboard's "all" option, so an empty value means no criterion.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(value.into_deserializer())
            .map(Some)
            .map_err(|err: de::value::Error| de::Error::custom(err)),
    }
}

impl ApplicationFilter {
    pub fn by_status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn by_risk(risk: RiskLevel) -> Self {
        Self {
            risk: Some(risk),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.risk.is_none() && self.search_term().is_none()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, application: &Application) -> bool {
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }
        if let Some(risk) = self.risk {
            if application.risk_level() != risk {
                return false;
            }
        }
        match self.search_term() {
            Some(term) => matches_search(application, &term),
            None => true,
        }
    }

    /// Keep only matching applications, preserving order.
    pub fn apply(&self, applications: Vec<Application>) -> Vec<Application> {
        applications
            .into_iter()
            .filter(|application| self.matches(application))
            .collect()
    }
}

fn matches_search(application: &Application, term: &str) -> bool {
    let applicant = &application.applicant;
    [
        applicant.full_name.as_str(),
        applicant.email.as_str(),
        applicant.phone_number.as_str(),
        application.id.0.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
