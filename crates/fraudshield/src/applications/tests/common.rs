use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::applications::domain::{
    ApplicantIdentity, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    EmploymentStatus, FinancialProfile,
};
use crate::applications::service::ApplicationService;
use crate::applications::store::{ApplicationStore, InMemoryApplicationStore, StoreError};
use crate::verification::{
    MockVerificationProvider, SimulatedLatency, VerificationChecks, VerificationStatus,
};

pub(crate) fn identity(name: &str, phone: &str) -> ApplicantIdentity {
    let email = format!(
        "{}@example.com",
        name.to_ascii_lowercase().replace(' ', ".")
    );
    ApplicantIdentity {
        full_name: name.to_string(),
        email,
        phone_number: phone.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 12).expect("valid date"),
        address: "221B Baker Street, London".to_string(),
        id_number: "P987654321".to_string(),
        document_type: "passport".to_string(),
    }
}

pub(crate) fn financial() -> FinancialProfile {
    FinancialProfile {
        employment_status: EmploymentStatus::Employed,
        employer: Some("Northwind Traders".to_string()),
        annual_income: 84_000,
        requested_amount: 15_000,
        purpose: "Vehicle purchase".to_string(),
    }
}

pub(crate) fn submission(name: &str, phone: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        applicant: identity(name, phone),
        financial: financial(),
    }
}

fn submitted_at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 27, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn application(
    sequence: u64,
    name: &str,
    status: ApplicationStatus,
    risk_score: u8,
    hour: u32,
) -> Application {
    let verification_status = if risk_score <= 70 {
        VerificationStatus::Pass
    } else {
        VerificationStatus::Fail
    };
    Application {
        id: ApplicationId::from_sequence(sequence),
        submitted_at: submitted_at(hour),
        status,
        applicant: identity(name, &format!("+1 555-01{sequence:02}")),
        financial: financial(),
        risk_score,
        verification_status,
        checks: VerificationChecks::all_clear(),
    }
}

/// Fixture list covering every status and every risk band.
pub(crate) fn sample_applications() -> Vec<Application> {
    vec![
        application(1, "John Smith", ApplicationStatus::Pending, 15, 9),
        application(2, "Sarah Johnson", ApplicationStatus::Rejected, 85, 10),
        application(3, "Mike Wilson", ApplicationStatus::Approved, 25, 11),
        application(4, "Maria Gonzalez", ApplicationStatus::UnderReview, 55, 12),
        application(5, "Dev Patel", ApplicationStatus::Pending, 72, 13),
        application(6, "Aiko Tanaka", ApplicationStatus::Pending, 30, 14),
        application(7, "Lena Fischer", ApplicationStatus::Approved, 70, 15),
    ]
}

pub(crate) fn provider() -> Arc<MockVerificationProvider> {
    Arc::new(MockVerificationProvider::with_seed(
        SimulatedLatency::disabled(),
        42,
    ))
}

pub(crate) fn build_service() -> (
    ApplicationService<InMemoryApplicationStore>,
    Arc<InMemoryApplicationStore>,
) {
    let store = Arc::new(InMemoryApplicationStore::default());
    let service = ApplicationService::new(store.clone(), provider());
    (service, store)
}

pub(crate) fn seeded_service() -> (
    ApplicationService<InMemoryApplicationStore>,
    Arc<InMemoryApplicationStore>,
) {
    let store = Arc::new(InMemoryApplicationStore::with_applications(
        sample_applications(),
    ));
    let service = ApplicationService::new(store.clone(), provider());
    (service, store)
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every call fails, for error mapping tests.
pub(crate) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn load_all(&self) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn next_id(&self) -> Result<ApplicationId, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn insert(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}
