//! Tenderdesk CLI — the main entry point.
//!
//! Commands:
//! - `ask`    — Run one question through the agent
//! - `serve`  — Start the HTTP gateway
//! - `tools`  — Show the tool catalog

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tenderdesk",
    about = "Tenderdesk — tool-using assistant for bid and tender records",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one question through the agent and print the answer
    Ask {
        /// The question to answer
        question: String,

        /// Override the step budget for this run
        #[arg(long)]
        max_steps: Option<u32>,

        /// Print the full reasoning trace after the answer
        #[arg(long)]
        trace: bool,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the tool catalog
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask {
            question,
            max_steps,
            trace,
        } => commands::ask::run(&question, max_steps, trace).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Tools => commands::tools_cmd::run(),
    }

    Ok(())
}
