use crate::demo::{run_batch, run_demo, run_evaluate, BatchArgs, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_sanction::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Sanction Pipeline",
    about = "Evaluate loan applications through the eligibility, identity, credit, and sanction stages",
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
    /// Evaluate a single application described by a JSON file
    Evaluate(EvaluateArgs),
    /// Evaluate every application in a CSV export
    Batch(BatchArgs),
    /// Run the accept and reject scenarios and print their audit trails
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
