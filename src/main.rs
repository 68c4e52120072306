mod commands;
mod config;
mod context;
mod discovery;
mod executor;
mod output;
mod reconcile;
mod scaffold;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{AdoptCommand, DiscoverCommand, ScaffoldCommand};
use context::Context;

#[derive(Parser)]
#[command(name = "tfadopt")]
#[command(
    about = "Adopt existing AWS VPC networking into Terraform/OpenTofu management",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the Terraform module tree for an adoption target
    Scaffold(ScaffoldCommand),

    /// Query AWS for an existing VPC's networking topology
    Discover(DiscoverCommand),

    /// Discover, scaffold, render variables, then init/import/plan/apply
    Adopt(AdoptCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();

    match cli.command {
        Commands::Scaffold(cmd) => cmd.execute(&ctx),
        Commands::Discover(cmd) => cmd.execute(&ctx).await,
        Commands::Adopt(cmd) => cmd.execute(&ctx).await,
    }
}
