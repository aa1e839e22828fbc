use crate::applications::render_table;
use chrono::NaiveDate;
use clap::Args;
use fraudshield::applications::{
    ApplicantIdentity, ApplicationFilter, ApplicationService, ApplicationSubmission,
    EmploymentStatus, FinancialProfile, InMemoryApplicationStore,
};
use fraudshield::config::AppConfig;
use fraudshield::error::AppError;
use fraudshield::verification::{
    scoring, KycData, MockVerificationProvider, RiskLevel, SimulatedLatency, VerificationResult,
    VerificationStatus,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct VerifyArgs {
    /// Applicant full name
    #[arg(long)]
    pub(crate) name: String,
    /// Phone number to check
    #[arg(long)]
    pub(crate) phone: String,
    /// Identity document number
    #[arg(long)]
    pub(crate) id_number: String,
    /// Identity document type
    #[arg(long, default_value = "aadhaar")]
    pub(crate) document_type: String,
    /// Skip the simulated provider latency
    #[arg(long)]
    pub(crate) fast: bool,
    /// Print the raw JSON result
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the provider RNG so carriers and confidences repeat.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Keep the simulated provider latency (off by default for the demo).
    #[arg(long)]
    pub(crate) realistic_latency: bool,
}

pub(crate) async fn run_verify(config: &AppConfig, args: VerifyArgs) -> Result<(), AppError> {
    let latency = if args.fast {
        SimulatedLatency::disabled()
    } else {
        config.verification.latency
    };
    let provider = MockVerificationProvider::new(latency);

    let data = KycData {
        full_name: args.name,
        phone_number: args.phone,
        id_number: args.id_number,
        document_type: args.document_type,
    };
    let result = provider.verify_kyc(&data).await;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("JSON output unavailable: {err}"),
        }
    } else {
        render_result(&result);
    }
    Ok(())
}

pub(crate) fn render_result(result: &VerificationResult) {
    let risk_label = match result.risk_level() {
        RiskLevel::Low => "Low Risk",
        RiskLevel::Medium => "Medium Risk",
        RiskLevel::High => "High Risk",
    };
    println!(
        "Verification {} for {} ({})",
        result.status.label(),
        result.user.full_name,
        result.user.phone_number
    );
    println!("Risk score {}/100 ({})", result.risk_score, risk_label);
    println!("Checks:");
    let checks = [
        ("Number verification", result.checks.number_verification),
        ("SIM swap", result.checks.sim_swap_check),
        ("KYC match", result.checks.kyc_match),
        ("Scam signal", result.checks.scam_signal),
    ];
    for (name, clean) in checks {
        println!("  - {}: {}", name, if clean { "clear" } else { "flagged" });
    }

    let assessment = scoring::assess(
        scoring::base_score(&result.user.phone_number),
        &result.checks,
    );
    println!("Score breakdown: base {}", assessment.base_score);
    for penalty in &assessment.penalties {
        println!("  + {} ({:?})", penalty.points, penalty.check);
    }
}

pub(crate) fn demo_submissions() -> Vec<ApplicationSubmission> {
    let applicant = |name: &str, phone: &str, id_number: &str| ApplicantIdentity {
        full_name: name.to_string(),
        email: format!(
            "{}@example.com",
            name.to_ascii_lowercase().replace(' ', ".")
        ),
        phone_number: phone.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap_or(NaiveDate::MIN),
        address: "500 Market Street, San Francisco".to_string(),
        id_number: id_number.to_string(),
        document_type: "passport".to_string(),
    };
    let financial = |status: EmploymentStatus, income: u64, amount: u64| FinancialProfile {
        employment_status: status,
        employer: matches!(status, EmploymentStatus::Employed)
            .then(|| "Contoso Ltd".to_string()),
        annual_income: income,
        requested_amount: amount,
        purpose: "Personal loan".to_string(),
    };

    vec![
        ApplicationSubmission {
            applicant: applicant("John Smith", "+1 555-0123", "X1234567890"),
            financial: financial(EmploymentStatus::Employed, 92_000, 12_000),
        },
        ApplicationSubmission {
            applicant: applicant("Sarah Johnson", "+1 555-000-4666", "ID67890"),
            financial: financial(EmploymentStatus::Unemployed, 0, 25_000),
        },
        ApplicationSubmission {
            applicant: applicant("Mike Wilson", "+1 555-0789", "M5550789000"),
            financial: financial(EmploymentStatus::SelfEmployed, 64_000, 8_000),
        },
    ]
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let latency = if args.realistic_latency {
        SimulatedLatency::realistic()
    } else {
        SimulatedLatency::disabled()
    };
    let provider = Arc::new(match args.seed {
        Some(seed) => MockVerificationProvider::with_seed(latency, seed),
        None => MockVerificationProvider::new(latency),
    });
    let store = Arc::new(InMemoryApplicationStore::default());
    let service = ApplicationService::new(store, provider.clone());

    println!("FraudShield onboarding demo (in-memory store)");
    for submission in demo_submissions() {
        let name = submission.applicant.full_name.clone();
        let application = service.submit(submission).await?;
        println!(
            "- {} submitted as {} -> {} with risk {} ({})",
            name,
            application.id,
            application.verification_status.label(),
            application.risk_score,
            application.risk_level().label()
        );

        let outcome = if application.risk_level() == RiskLevel::High {
            service.block(&application.id)?
        } else if application.verification_status == VerificationStatus::Pass {
            service.approve(&application.id)?
        } else {
            service.mark_under_review(&application.id)?
        };
        println!("  operator action -> {}", outcome.status.label());
    }

    println!("\nDashboard");
    render_table(
        &service.list(&ApplicationFilter::default())?,
        std::io::stdout().lock(),
    )?;

    let summary = service.summary()?;
    println!(
        "\n{} applications | {} approved | {} rejected | {} under review | avg risk {:.1}",
        summary.total,
        summary.approved,
        summary.rejected,
        summary.under_review,
        summary.average_risk_score
    );

    let stats = provider.fraud_stats().await;
    println!(
        "Network stats: {} verifications | {:.1}% success | {} frauds prevented",
        stats.total_verifications, stats.success_rate, stats.fraud_prevented
    );

    println!("\nCSV export");
    service.export_csv(&ApplicationFilter::default(), std::io::stdout().lock())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_submissions_cover_clean_and_flagged_numbers() {
        let submissions = demo_submissions();
        assert_eq!(submissions.len(), 3);
        assert!(submissions
            .iter()
            .any(|s| s.applicant.phone_number.ends_with("666")));
        assert!(submissions[0].financial.employer.is_some());
        assert!(submissions[1].financial.employer.is_none());
    }

    #[tokio::test]
    async fn demo_runs_without_latency() {
        run_demo(DemoArgs {
            seed: Some(1),
            realistic_latency: false,
        })
        .await
        .expect("demo completes");
    }
}
