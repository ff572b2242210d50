use crate::demo::{run_batch, run_compare, run_decide, run_demo, BatchArgs, DemoArgs, ScenarioArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trolley_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trolley Decision Engine",
    about = "Serve, run, and compare trolley dilemma decisions from the command line",
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
    /// Decide one scenario read from a JSON file (aggregate or roster form)
    Decide(ScenarioArgs),
    /// Run a roster scenario through every strategy and print the comparison
    Compare(ScenarioArgs),
    /// Decide every aggregate scenario in a CSV file
    Batch(BatchArgs),
    /// Print a canned comparison across every strategy
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
        Command::Decide(args) => run_decide(args),
        Command::Compare(args) => run_compare(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
    }
}
