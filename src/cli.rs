use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rhsmctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative Red Hat subscription state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List resource types, or show the attributes of one
    Schema {
        /// Resource type to describe (pool, repo)
        #[arg(value_name = "TYPE")]
        type_name: Option<String>,
    },

    /// Validate a manifest without contacting the host
    Check {
        /// Desired-state manifest (TOML, or JSON by extension)
        manifest: PathBuf,
    },

    /// Preview what apply would change
    Plan(PlanArgs),

    /// Make the observed state match the manifest
    Apply(ApplyArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Plan / Apply
// ============================================================================

#[derive(Args)]
pub struct TargetArgs {
    /// Desired-state manifest (TOML, or JSON by extension)
    pub manifest: PathBuf,

    /// Snapshot file holding the observed host state
    #[arg(short, long, value_name = "SNAPSHOT")]
    pub observed: PathBuf,

    /// Number of parallel jobs (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Seconds allowed per provider call, 0 for no limit (overrides config)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Extra attempts for failed or degraded resources (overrides config)
    #[arg(short, long)]
    pub retries: Option<u32>,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show config location and the settings in effect
    Show,
}
