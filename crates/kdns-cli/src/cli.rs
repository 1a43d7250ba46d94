//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kdns_resolver::QueryType;

/// kdns - resolve Kubernetes DNS names against a cluster snapshot.
#[derive(Parser, Debug, Clone)]
#[command(name = "kdns")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a query name against a cluster snapshot.
    Resolve(ResolveArgs),

    /// Show how a query name is parsed, without resolving it.
    Parse(ParseArgs),

    /// Validate a resolver configuration file.
    CheckConfig(ConfigArgs),
}

/// Arguments for `kdns resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Resolver configuration file (JSON).
    #[arg(short, long, env = "KDNS_CONFIG")]
    pub config: PathBuf,

    /// Cluster snapshot file (JSON).
    #[arg(short, long, env = "KDNS_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Query type.
    #[arg(short = 't', long = "type", default_value = "A")]
    pub qtype: QueryType,

    /// Zone to resolve in; defaults to the most specific configured zone.
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Query name.
    pub name: String,
}

/// Arguments for `kdns parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Resolver configuration file (JSON).
    #[arg(short, long, env = "KDNS_CONFIG")]
    pub config: PathBuf,

    /// Zone to parse in; defaults to the most specific configured zone.
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Query name.
    pub name: String,
}

/// Arguments for `kdns check-config`.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Resolver configuration file (JSON).
    #[arg(short, long, env = "KDNS_CONFIG")]
    pub config: PathBuf,
}
