//! Application intake, the local application list, and the review dashboard operations.

pub mod domain;
pub mod export;
pub mod filter;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    ApplicantIdentity, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    EmploymentStatus, FinancialProfile,
};
pub use export::{write_csv, ExportError};
pub use filter::ApplicationFilter;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError, ApplicationSummary};
pub use store::{ApplicationStore, InMemoryApplicationStore, JsonFileApplicationStore, StoreError};
