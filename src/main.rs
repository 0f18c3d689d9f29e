//! teamctl - manage your development team's settings.
//!
//! Team settings, such as the quickstart locations available to the team,
//! live in an `Environment` custom resource stored by the cluster API.
//! The commands here read and conditionally rewrite them.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

mod cli;
mod client;
mod environment;
mod git;
mod progress;

use client::ClusterClient;

/// teamctl - manage your development team's settings
#[derive(Parser)]
#[command(name = "teamctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run without prompting; all inputs must come from flags
    #[arg(short, long, global = true)]
    batch: bool,

    /// Team namespace (overrides the configured namespace)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add team settings such as quickstart locations
    #[command(subcommand)]
    Create(cli::create::CreateCommands),

    /// Delete team settings such as quickstart locations
    #[command(subcommand)]
    Delete(cli::delete::DeleteCommands),

    /// Display team settings
    #[command(subcommand)]
    Get(cli::get::GetCommands),

    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    // Default to INFO unless verbose is set (then DEBUG), or RUST_LOG overrides it.
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false) // cleaner output for simple CLI tools
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("Error: {:#}", e); // Use {:#} for alternate view (causal chain)
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "teamctl", &mut std::io::stdout());
            Ok(())
        }

        command => {
            let client = ClusterClient::connect(cli.namespace.as_deref())?;
            let namespace = client.namespace().to_string();
            let mut out = std::io::stdout();

            match command {
                Commands::Create(command) => {
                    cli::create::run(&client, &mut out, &namespace, cli.batch, command)
                }

                Commands::Delete(command) => {
                    cli::delete::run(&client, &mut out, &namespace, cli.batch, command)
                }

                Commands::Get(command) => cli::get::run(&client, &mut out, &namespace, command),

                // Handled above before a client is built.
                Commands::Completion { .. } => Ok(()),
            }
        }
    }
}
