use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity payload collected by the KYC form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycData {
    pub full_name: String,
    pub phone_number: String,
    pub id_number: String,
    #[serde(default = "default_document_type")]
    pub document_type: String,
}

fn default_document_type() -> String {
    "aadhaar".to_string()
}

/// Request body for the single-number checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneCheckRequest {
    pub phone_number: String,
}

/// Overall outcome of a composite verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Pass,
    Fail,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pass => "PASS",
            VerificationStatus::Fail => "FAIL",
        }
    }
}

/// Coarse banding of a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Banding used for composite scores on the results screen.
    pub const fn from_score(score: u8) -> Self {
        if score <= 30 {
            Self::Low
        } else if score <= 70 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Banding applied by the scam signal detector to the raw hash score.
    pub const fn from_scam_score(score: u8) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 70 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberVerification {
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSwapReport {
    pub swapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_swap_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycMatch {
    pub matched: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamSignal {
    pub is_scam: bool,
    pub risk_level: RiskLevel,
}

/// The four check outcomes; `true` always means the check came back clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChecks {
    pub number_verification: bool,
    pub sim_swap_check: bool,
    pub kyc_match: bool,
    pub scam_signal: bool,
}

impl VerificationChecks {
    pub const fn all_clear() -> Self {
        Self {
            number_verification: true,
            sim_swap_check: true,
            kyc_match: true,
            scam_signal: true,
        }
    }

    pub fn failed_count(&self) -> usize {
        [
            self.number_verification,
            self.sim_swap_check,
            self.kyc_match,
            self.scam_signal,
        ]
        .iter()
        .filter(|clean| !**clean)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub full_name: String,
    pub phone_number: String,
    pub id_number: String,
}

/// Composite verification returned to the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub risk_score: u8,
    pub user: VerifiedUser,
    pub checks: VerificationChecks,
    pub timestamp: DateTime<Utc>,
}

impl VerificationResult {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

/// Headline figures shown on the dashboard home tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudStats {
    pub total_verifications: u32,
    pub success_rate: f64,
    pub fraud_prevented: u32,
    pub average_risk_score: u8,
}
