//! Composite risk scoring over the phone hash and the four check outcomes.

use serde::Serialize;

use super::domain::{VerificationChecks, VerificationStatus};

pub const MAX_RISK_SCORE: u8 = 100;
/// Scores at or below this value pass.
pub const PASS_THRESHOLD: u8 = 70;
/// Base scores above this value are flagged by the scam detector.
pub const SCAM_THRESHOLD: u8 = 75;

pub const UNVERIFIED_NUMBER_PENALTY: u8 = 20;
pub const SIM_SWAP_PENALTY: u8 = 30;
pub const KYC_MISMATCH_PENALTY: u8 = 25;
pub const SCAM_SIGNAL_PENALTY: u8 = 35;

/// 32-bit rolling string hash (`h * 31 + unit`) over UTF-16 code units.
pub fn phone_hash(phone: &str) -> i32 {
    phone.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit))
    })
}

/// Deterministic 0..=99 base score for a phone number.
pub fn base_score(phone: &str) -> u8 {
    // `%` keeps the sign of the dividend, so the magnitude is below 100.
    (phone_hash(phone) % 100).unsigned_abs() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedCheck {
    NumberVerification,
    SimSwap,
    KycMatch,
    ScamSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskPenalty {
    pub check: FailedCheck,
    pub points: u8,
}

/// Breakdown of a composite score so callers can explain the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub base_score: u8,
    pub penalties: Vec<RiskPenalty>,
    pub risk_score: u8,
    pub status: VerificationStatus,
}

pub fn status_for(score: u8) -> VerificationStatus {
    if score <= PASS_THRESHOLD {
        VerificationStatus::Pass
    } else {
        VerificationStatus::Fail
    }
}

pub fn assess(base_score: u8, checks: &VerificationChecks) -> RiskAssessment {
    let mut penalties = Vec::new();
    if !checks.number_verification {
        penalties.push(RiskPenalty {
            check: FailedCheck::NumberVerification,
            points: UNVERIFIED_NUMBER_PENALTY,
        });
    }
    if !checks.sim_swap_check {
        penalties.push(RiskPenalty {
            check: FailedCheck::SimSwap,
            points: SIM_SWAP_PENALTY,
        });
    }
    if !checks.kyc_match {
        penalties.push(RiskPenalty {
            check: FailedCheck::KycMatch,
            points: KYC_MISMATCH_PENALTY,
        });
    }
    if !checks.scam_signal {
        penalties.push(RiskPenalty {
            check: FailedCheck::ScamSignal,
            points: SCAM_SIGNAL_PENALTY,
        });
    }

    let total = penalties
        .iter()
        .fold(u16::from(base_score), |acc, penalty| {
            acc + u16::from(penalty.points)
        })
        .min(u16::from(MAX_RISK_SCORE)) as u8;

    RiskAssessment {
        base_score,
        penalties,
        risk_score: total,
        status: status_for(total),
    }
}
