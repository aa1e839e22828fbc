use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::domain::{
    FraudStats, KycData, KycMatch, NumberVerification, RiskLevel, ScamSignal, SimSwapReport,
    VerificationChecks, VerificationResult, VerificationStatus, VerifiedUser,
};
use super::scoring::{self, SCAM_THRESHOLD};

const CARRIERS: [&str; 3] = ["Verizon", "AT&T", "T-Mobile"];

const NUMBER_CHECK_DELAY_MS: u64 = 1_000;
const SIM_SWAP_DELAY_MS: u64 = 800;
const KYC_MATCH_DELAY_MS: u64 = 1_500;
const SCAM_SIGNAL_DELAY_MS: u64 = 600;
const COMPOSITE_DELAY_MS: u64 = 3_000;
const HISTORY_DELAY_MS: u64 = 500;
const STATS_DELAY_MS: u64 = 300;

/// Multiplier applied to every simulated provider round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedLatency {
    scale: f64,
}

impl SimulatedLatency {
    /// Largest accepted multiplier; the slowest call then waits fifty minutes.
    pub const MAX_SCALE: f64 = 1_000.0;

    pub const fn realistic() -> Self {
        Self { scale: 1.0 }
    }

    pub const fn disabled() -> Self {
        Self { scale: 0.0 }
    }

    pub fn scaled(scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            Self {
                scale: scale.min(Self::MAX_SCALE),
            }
        } else {
            Self::disabled()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.scale <= 0.0
    }

    pub fn duration(&self, base_ms: u64) -> Duration {
        if self.is_disabled() {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(base_ms as f64 / 1_000.0 * self.scale)
            .unwrap_or(Duration::MAX)
    }

    async fn pause(&self, base_ms: u64) {
        let delay = self.duration(base_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::realistic()
    }
}

/// Stand-in for the network verification APIs.
///
/// Every call resolves successfully. Outcomes follow fixed rules on the phone
/// number and applicant data; only the carrier name and KYC confidence are
/// random.
pub struct MockVerificationProvider {
    latency: SimulatedLatency,
    rng: Mutex<StdRng>,
}

impl MockVerificationProvider {
    pub fn new(latency: SimulatedLatency) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for tests and reproducible demos.
    pub fn with_seed(latency: SimulatedLatency, seed: u64) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn latency(&self) -> SimulatedLatency {
        self.latency
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned RNG is still a valid RNG.
        let mut guard = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Numbers containing "000" fail verification.
    pub async fn verify_number(&self, phone: &str) -> NumberVerification {
        self.latency.pause(NUMBER_CHECK_DELAY_MS).await;

        let verified = !phone.contains("000");
        let carrier = verified.then(|| {
            let index = self.with_rng(|rng| rng.gen_range(0..CARRIERS.len()));
            CARRIERS[index].to_string()
        });

        debug!(verified, carrier = carrier.as_deref(), "number verification");
        NumberVerification { verified, carrier }
    }

    /// Numbers ending in "666" report a swap two days ago.
    pub async fn check_sim_swap(&self, phone: &str) -> SimSwapReport {
        self.latency.pause(SIM_SWAP_DELAY_MS).await;

        let swapped = phone.ends_with("666");
        let last_swap_date = swapped.then(|| Utc::now() - chrono::Duration::days(2));

        debug!(swapped, "sim swap check");
        SimSwapReport {
            swapped,
            last_swap_date,
        }
    }

    pub async fn match_kyc(&self, data: &KycData) -> KycMatch {
        self.latency.pause(KYC_MATCH_DELAY_MS).await;

        let matched =
            utf16_len(&data.full_name) > 5 && utf16_len(&data.id_number) >= 10;
        let confidence = self.with_rng(|rng| {
            if matched {
                rng.gen_range(0.85..0.99)
            } else {
                rng.gen_range(0.20..0.50)
            }
        });

        debug!(matched, "kyc match");
        KycMatch {
            matched,
            confidence: (confidence * 100.0_f64).round() / 100.0,
        }
    }

    pub async fn detect_scam_signal(&self, phone: &str) -> ScamSignal {
        self.latency.pause(SCAM_SIGNAL_DELAY_MS).await;

        let base = scoring::base_score(phone);
        let signal = ScamSignal {
            is_scam: base > SCAM_THRESHOLD,
            risk_level: RiskLevel::from_scam_score(base),
        };

        debug!(is_scam = signal.is_scam, risk_level = signal.risk_level.label(), "scam signal");
        signal
    }

    /// Full KYC run: all four checks fan out together, then the composite score.
    pub async fn verify_kyc(&self, data: &KycData) -> VerificationResult {
        self.latency.pause(COMPOSITE_DELAY_MS).await;

        let (number, sim_swap, kyc, scam) = tokio::join!(
            self.verify_number(&data.phone_number),
            self.check_sim_swap(&data.phone_number),
            self.match_kyc(data),
            self.detect_scam_signal(&data.phone_number),
        );

        let checks = VerificationChecks {
            number_verification: number.verified,
            sim_swap_check: !sim_swap.swapped,
            kyc_match: kyc.matched,
            scam_signal: !scam.is_scam,
        };
        let assessment = scoring::assess(scoring::base_score(&data.phone_number), &checks);

        info!(
            status = assessment.status.label(),
            risk_score = assessment.risk_score,
            failed_checks = checks.failed_count(),
            "kyc verification completed"
        );

        VerificationResult {
            status: assessment.status,
            risk_score: assessment.risk_score,
            user: VerifiedUser {
                full_name: data.full_name.clone(),
                phone_number: data.phone_number.clone(),
                id_number: data.id_number.clone(),
            },
            checks,
            timestamp: Utc::now(),
        }
    }

    /// Canned history rows for the dashboard history tab.
    pub async fn verification_history(&self) -> Vec<VerificationResult> {
        self.latency.pause(HISTORY_DELAY_MS).await;

        let now = Utc::now();
        vec![
            VerificationResult {
                status: VerificationStatus::Pass,
                risk_score: 15,
                user: VerifiedUser {
                    full_name: "John Smith".to_string(),
                    phone_number: "+1 555-0123".to_string(),
                    id_number: "ID12345".to_string(),
                },
                checks: VerificationChecks::all_clear(),
                timestamp: now - chrono::Duration::hours(1),
            },
            VerificationResult {
                status: VerificationStatus::Fail,
                risk_score: 85,
                user: VerifiedUser {
                    full_name: "Sarah Johnson".to_string(),
                    phone_number: "+1 555-0456".to_string(),
                    id_number: "ID67890".to_string(),
                },
                checks: VerificationChecks {
                    number_verification: false,
                    sim_swap_check: false,
                    kyc_match: true,
                    scam_signal: false,
                },
                timestamp: now - chrono::Duration::hours(2),
            },
        ]
    }

    pub async fn fraud_stats(&self) -> FraudStats {
        self.latency.pause(STATS_DELAY_MS).await;

        FraudStats {
            total_verifications: 1247,
            success_rate: 94.2,
            fraud_prevented: 73,
            average_risk_score: 32,
        }
    }
}

/// Length in UTF-16 code units, the unit the scoring hash also walks.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

impl Default for MockVerificationProvider {
    fn default() -> Self {
        Self::new(SimulatedLatency::default())
    }
}
