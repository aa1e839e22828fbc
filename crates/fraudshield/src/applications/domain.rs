use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::verification::{KycData, RiskLevel, VerificationChecks, VerificationStatus};

/// Identifier wrapper for stored applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("app-{sequence:06}"))
    }

    /// Numeric suffix of ids minted by [`ApplicationId::from_sequence`].
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("app-")?.parse().ok()
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review state an operator moves an application through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    UnderReview,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::UnderReview,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::UnderReview => "under_review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "under_review" | "review" => Some(Self::UnderReview),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
    Retired,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self_employed",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Student => "student",
            EmploymentStatus::Retired => "retired",
        }
    }
}

/// Who the applicant claims to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub id_number: String,
    pub document_type: String,
}

impl ApplicantIdentity {
    pub fn kyc_data(&self) -> KycData {
        KycData {
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            id_number: self.id_number.clone(),
            document_type: self.document_type.clone(),
        }
    }
}

/// Employment and funding details from the application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub employment_status: EmploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    pub annual_income: u64,
    pub requested_amount: u64,
    pub purpose: String,
}

/// Form payload submitted by an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub applicant: ApplicantIdentity,
    pub financial: FinancialProfile,
}

/// Stored application row, as listed on the review dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub applicant: ApplicantIdentity,
    pub financial: FinancialProfile,
    pub risk_score: u8,
    pub verification_status: VerificationStatus,
    pub checks: VerificationChecks,
}

impl Application {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}
