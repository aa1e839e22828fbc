//! Simulated phone, SIM swap, KYC, and scam checks plus the composite risk score.

pub mod domain;
mod provider;
pub mod router;
pub mod scoring;

pub use domain::{
    FraudStats, KycData, KycMatch, NumberVerification, PhoneCheckRequest, RiskLevel, ScamSignal,
    SimSwapReport, VerificationChecks, VerificationResult, VerificationStatus, VerifiedUser,
};
pub use provider::{MockVerificationProvider, SimulatedLatency};
pub use router::verification_router;
pub use scoring::{RiskAssessment, RiskPenalty};
