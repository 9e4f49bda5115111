// src/main.rs — Lucidra entry point

use clap::Parser;

use lucidra::cli::{analyze, providers, serve, Cli, Commands};
use lucidra::infra::config::Config;
use lucidra::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG
    logger::init_logging("info", cli.verbose);

    // Falls back to defaults if no config.toml
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Serve { host, port } => serve::run_serve(config, host, port).await,
        Commands::Analyze {
            scenario,
            provider,
            plan,
            opt_in,
            json,
        } => {
            let text = scenario.join(" ");
            analyze::run_analyze(&config, &text, provider.as_deref(), plan, opt_in, json).await
        }
        Commands::Providers => providers::show_providers(&config),
        Commands::Tips => {
            providers::show_tips();
            Ok(())
        }
    }
}
