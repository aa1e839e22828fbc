//! Mock fraud screening and KYC onboarding workflows.
//!
//! Verification outcomes are fabricated by [`verification::MockVerificationProvider`];
//! applications live in a single serialized list behind [`applications::ApplicationStore`].

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod verification;
