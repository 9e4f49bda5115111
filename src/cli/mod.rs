// src/cli/mod.rs — CLI definition (clap derive)

pub mod analyze;
pub mod providers;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::usage::PlanTier;

#[derive(Parser)]
#[command(
    name = "lucidra",
    about = "Usage-gated AI scenario analysis with keyword fallback",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log with module targets
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides config and LUCIDRA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze one scenario through the full gate → AI → fallback path
    Analyze {
        /// Scenario text
        #[arg(required = true, trailing_var_arg = true)]
        scenario: Vec<String>,
        /// Provider to try first
        #[arg(long)]
        provider: Option<String>,
        /// Plan tier for the throwaway session
        #[arg(long, default_value = "free")]
        plan: PlanTier,
        /// Opt the session in to AI (off by default, as for new users)
        #[arg(long)]
        opt_in: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// List providers in attempt order with availability
    Providers,
    /// Print coaching tips
    Tips,
}
