use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::{Application, ApplicationId, ApplicationStatus, ApplicationSubmission};
use super::export::{write_csv, ExportError};
use super::filter::ApplicationFilter;
use super::store::{ApplicationStore, StoreError};
use crate::verification::{MockVerificationProvider, RiskLevel};

/// Service composing the mock verification provider with the application store.
pub struct ApplicationService<S> {
    store: Arc<S>,
    provider: Arc<MockVerificationProvider>,
}

impl<S> ApplicationService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>, provider: Arc<MockVerificationProvider>) -> Self {
        Self { store, provider }
    }

    /// Verify the applicant, then persist a new pending application.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<Application, ApplicationServiceError> {
        let result = self
            .provider
            .verify_kyc(&submission.applicant.kyc_data())
            .await;

        let application = Application {
            id: self.store.next_id()?,
            submitted_at: Utc::now(),
            status: ApplicationStatus::Pending,
            applicant: submission.applicant,
            financial: submission.financial,
            risk_score: result.risk_score,
            verification_status: result.status,
            checks: result.checks,
        };

        let stored = self.store.insert(application)?;
        info!(
            application_id = %stored.id,
            risk_score = stored.risk_score,
            verification = stored.verification_status.label(),
            "application submitted"
        );
        Ok(stored)
    }

    /// Filtered applications, newest first.
    pub fn list(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let mut applications = filter.apply(self.store.load_all()?);
        applications.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.sequence().cmp(&a.id.sequence()))
        });
        Ok(applications)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Application, ApplicationServiceError> {
        let application = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(application)
    }

    pub fn approve(&self, id: &ApplicationId) -> Result<Application, ApplicationServiceError> {
        self.set_status(id, ApplicationStatus::Approved)
    }

    pub fn reject(&self, id: &ApplicationId) -> Result<Application, ApplicationServiceError> {
        self.set_status(id, ApplicationStatus::Rejected)
    }

    /// Blocking is a rejection raised from the fraud alert view.
    pub fn block(&self, id: &ApplicationId) -> Result<Application, ApplicationServiceError> {
        self.set_status(id, ApplicationStatus::Rejected)
    }

    pub fn mark_under_review(
        &self,
        id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.set_status(id, ApplicationStatus::UnderReview)
    }

    fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationServiceError> {
        let updated = self.store.update_status(id, status)?;
        info!(application_id = %id, status = status.label(), "application status updated");
        Ok(updated)
    }

    pub fn summary(&self) -> Result<ApplicationSummary, ApplicationServiceError> {
        Ok(ApplicationSummary::from_applications(&self.store.load_all()?))
    }

    /// Write the filtered list as CSV and return the number of rows exported.
    pub fn export_csv<W: Write>(
        &self,
        filter: &ApplicationFilter,
        writer: W,
    ) -> Result<usize, ApplicationServiceError> {
        let applications = self.list(filter)?;
        let rows = write_csv(&applications, writer)?;
        info!(rows, "applications exported");
        Ok(rows)
    }
}

/// Counts and averages for the dashboard header cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub under_review: usize,
    pub high_risk: usize,
    pub average_risk_score: f64,
}

impl ApplicationSummary {
    pub fn from_applications(applications: &[Application]) -> Self {
        let count = |status: ApplicationStatus| {
            applications
                .iter()
                .filter(|application| application.status == status)
                .count()
        };
        let total_score: u64 = applications
            .iter()
            .map(|application| u64::from(application.risk_score))
            .sum();
        let average_risk_score = if applications.is_empty() {
            0.0
        } else {
            let raw = total_score as f64 / applications.len() as f64;
            (raw * 10.0).round() / 10.0
        };

        Self {
            total: applications.len(),
            pending: count(ApplicationStatus::Pending),
            approved: count(ApplicationStatus::Approved),
            rejected: count(ApplicationStatus::Rejected),
            under_review: count(ApplicationStatus::UnderReview),
            high_risk: applications
                .iter()
                .filter(|application| application.risk_level() == RiskLevel::High)
                .count(),
            average_risk_score,
        }
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
