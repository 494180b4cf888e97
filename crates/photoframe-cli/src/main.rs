use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod prompt;

#[derive(Parser)]
#[command(name = "photoframe")]
#[command(about = "Keeps a digital photo frame stocked with images from tagged Discourse topics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the recurring fetch job on this host
    Install,
    /// Change how often the fetch job runs
    Reschedule,
    /// Run the fetch job once and exit
    Run,
    /// Show schedule, backend, job activity and recent log lines
    Status,
    /// Remove the scheduled job and optionally the local data
    Uninstall,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Usage problems exit 1, same as lifecycle failures; --help and
    // --version still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let result = match cli.command {
        Commands::Install => commands::install(),
        Commands::Reschedule => commands::reschedule(prompt::interval_request()),
        Commands::Run => commands::run().await,
        Commands::Status => commands::status(),
        Commands::Uninstall => commands::uninstall(),
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
