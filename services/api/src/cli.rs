use crate::demo::{run_demo, run_kpi, DemoArgs, KpiCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use work_readiness::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Work Readiness Service",
    about = "Serve and exercise work-readiness scheduling and KPI scoring from the command line",
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
    /// Compute a KPI from command-line inputs and print it as JSON
    Kpi {
        #[command(subcommand)]
        command: KpiCommand,
    },
    /// Walk through batch scheduling against an in-memory repository
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

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Kpi { command } => run_kpi(command),
        Command::Demo(args) => run_demo(args),
    }
}
