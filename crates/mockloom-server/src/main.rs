use clap::{Parser, Subcommand};
use tracing::error;

/// mockloom: a declarative HTTP mock/chaos server.
#[derive(Parser, Debug)]
#[command(name = "mockloom", about = "Declarative HTTP mock/chaos server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a scenario document and serve its declared services.
    Run {
        /// Path to the scenario document.
        #[arg(long, default_value = "scenario.json")]
        scenario: String,

        /// Comma-separated list of service names to start. Empty means
        /// start every declared service.
        #[arg(long, value_delimiter = ',')]
        execute: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let Command::Run { scenario, execute } = cli.command;

    if let Err(err) = run(&scenario, &execute).await {
        error!(error = %err, "mockloom exiting");
        std::process::exit(1);
    }
}

async fn run(scenario_path: &str, selection: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let document = mockloom_core::load(scenario_path)?;
    let resolved = mockloom_engine::resolve(&document)?;
    mockloom_server::run(resolved, selection).await?;
    Ok(())
}
