use crate::infra::{parse_risk, parse_status, ConfiguredStore};
use clap::{Args, Subcommand};
use fraudshield::applications::{
    Application, ApplicationFilter, ApplicationId, ApplicationService, ApplicationStatus,
};
use fraudshield::config::AppConfig;
use fraudshield::error::AppError;
use fraudshield::verification::{MockVerificationProvider, RiskLevel};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicationsCommand {
    /// List stored applications, newest first
    List(ListArgs),
    /// Export the filtered list as CSV
    Export(ExportArgs),
    /// Print status counts and the average risk score
    Summary,
    /// Approve an application
    Approve(IdArgs),
    /// Reject an application
    Reject(IdArgs),
    /// Block an application flagged as fraudulent
    Block(IdArgs),
    /// Send an application to manual review
    Review(IdArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Only include applications in this status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Only include applications in this risk band (low, medium, high)
    #[arg(long, value_parser = parse_risk)]
    pub(crate) risk: Option<RiskLevel>,
    /// Case-insensitive match on name, email, phone, or id
    #[arg(long)]
    pub(crate) search: Option<String>,
}

impl FilterArgs {
    pub(crate) fn into_filter(self) -> ApplicationFilter {
        ApplicationFilter {
            status: self.status,
            risk: self.risk,
            search: self.search,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Print the raw JSON records instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Destination file (defaults to stdout)
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    /// Application id, e.g. app-000001
    pub(crate) id: String,
}

fn configured_service(config: &AppConfig) -> ApplicationService<ConfiguredStore> {
    let store = Arc::new(ConfiguredStore::from_config(&config.storage));
    let provider = Arc::new(MockVerificationProvider::new(config.verification.latency));
    ApplicationService::new(store, provider)
}

pub(crate) fn run_applications(
    config: &AppConfig,
    command: ApplicationsCommand,
) -> Result<(), AppError> {
    let service = configured_service(config);

    match command {
        ApplicationsCommand::List(args) => {
            let applications = service.list(&args.filter.into_filter())?;
            if args.json {
                match serde_json::to_string_pretty(&applications) {
                    Ok(json) => println!("{json}"),
                    Err(err) => println!("JSON output unavailable: {err}"),
                }
            } else {
                render_table(&applications, io::stdout().lock())?;
            }
        }
        ApplicationsCommand::Export(args) => {
            let filter = args.filter.into_filter();
            let rows = match args.output {
                Some(path) => {
                    let file = File::create(&path)?;
                    let rows = service.export_csv(&filter, BufWriter::new(file))?;
                    eprintln!("Exported {rows} applications to {}", path.display());
                    rows
                }
                None => service.export_csv(&filter, io::stdout().lock())?,
            };
            if rows == 0 {
                eprintln!("No applications matched the filter");
            }
        }
        ApplicationsCommand::Summary => {
            let summary = service.summary()?;
            println!("Applications: {}", summary.total);
            println!(
                "- pending {} | under review {} | approved {} | rejected {}",
                summary.pending, summary.under_review, summary.approved, summary.rejected
            );
            println!(
                "- average risk score {:.1} | {} high risk",
                summary.average_risk_score, summary.high_risk
            );
        }
        ApplicationsCommand::Approve(args) => {
            report_status(service.approve(&ApplicationId(args.id))?);
        }
        ApplicationsCommand::Reject(args) => {
            report_status(service.reject(&ApplicationId(args.id))?);
        }
        ApplicationsCommand::Block(args) => {
            report_status(service.block(&ApplicationId(args.id))?);
        }
        ApplicationsCommand::Review(args) => {
            report_status(service.mark_under_review(&ApplicationId(args.id))?);
        }
    }

    Ok(())
}

fn report_status(application: Application) {
    println!(
        "{} ({}) -> {}",
        application.id,
        application.applicant.full_name,
        application.status.label()
    );
}

pub(crate) fn render_table<W: Write>(
    applications: &[Application],
    mut out: W,
) -> io::Result<()> {
    if applications.is_empty() {
        return writeln!(out, "No applications found");
    }

    writeln!(
        out,
        "{:<11} {:<24} {:<18} {:<13} {:>5} {:<7} {:<4}",
        "ID", "NAME", "PHONE", "STATUS", "RISK", "BAND", "KYC"
    )?;
    for application in applications {
        writeln!(
            out,
            "{:<11} {:<24} {:<18} {:<13} {:>5} {:<7} {:<4}",
            application.id.0,
            truncate(&application.applicant.full_name, 24),
            truncate(&application.applicant.phone_number, 18),
            application.status.label(),
            application.risk_score,
            application.risk_level().label(),
            application.verification_status.label(),
        )?;
    }
    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
        shortened.push('~');
        shortened
    }
}
