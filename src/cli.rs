use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deploy-manifest")]
#[command(about = "Resolve Maven module manifests into license and dependency reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./deploy-manifest.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a deployment report for one or more modules
    Report(ReportArgs),
    /// Write a preset configuration file
    Init {
        /// Configuration preset
        preset: InitPreset,

        /// Target file (default: ./deploy-manifest.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show or validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Args, Default)]
pub struct ReportArgs {
    /// Module directories or pom.xml files (default: current directory)
    pub modules: Vec<PathBuf>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Local repository root (default: ~/.m2/repository)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Include the dependency tree
    #[arg(long)]
    pub tree: bool,

    /// Include the build properties snapshot
    #[arg(long)]
    pub properties: bool,

    /// Aggregate licenses over transitive dependencies too
    #[arg(long)]
    pub transitive: bool,

    /// Skip license aggregation
    #[arg(long)]
    pub no_licenses: bool,

    /// Exit non-zero when an incompatible license is found
    #[arg(long)]
    pub fail_on_incompatible: bool,

    /// Exit with code 0 even when incompatible licenses are found
    #[arg(long)]
    pub exit_zero: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InitPreset {
    Permissive,
    Standard,
    Strict,
}
