use crate::demo::{run_demo, run_match, DemoArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lender_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Lender Match",
    about = "Manage lender criteria and match funding deals against them",
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
    /// Match deals from a JSON file against a lender catalog CSV
    Match(MatchArgs),
    /// Seed sample lenders and deals and print a readable match report
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
    /// Lender catalog CSV to import at startup (overrides APP_LENDER_CATALOG)
    #[arg(long)]
    pub(crate) lender_catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Demo(args) => run_demo(args),
    }
}
