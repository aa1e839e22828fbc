use crate::applications::{run_applications, ApplicationsCommand};
use crate::demo::{run_demo, run_verify, DemoArgs, VerifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fraudshield::config::AppConfig;
use fraudshield::error::AppError;
use fraudshield::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "FraudShield",
    about = "Run the FraudShield mock verification service or drive it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single KYC verification and print the result
    Verify(VerifyArgs),
    /// Inspect and review stored applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// Walk through sample applicants end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Verify(args) => run_verify(&config, args).await,
        Command::Applications { command } => run_applications(&config, command),
        Command::Demo(args) => run_demo(args).await,
    }
}
