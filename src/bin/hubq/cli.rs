//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// hubq - query a capability manifest Hub or a local manifest directory
#[derive(Parser)]
#[command(name = "hubq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load manifests from a local directory instead of querying the Hub (wins over --endpoint)
    #[arg(long, global = true, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Hub GraphQL endpoint (overrides configuration)
    #[arg(long, global = true, value_name = "URL", env = "HUBQ_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Also load TypeInstance documents from the local directory
    #[arg(long, global = true)]
    pub type_instances: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one Interface revision (latest by default)
    Interface(InterfaceArgs),

    /// List Interfaces
    Interfaces(InterfacesArgs),

    /// Print the latest revision of an Interface
    Latest(LatestArgs),

    /// List Implementation revisions, optionally for one Interface
    Implementations(ImplementationsArgs),

    /// Check which manifest revisions exist
    Exists(ExistsArgs),

    /// Show a TypeInstance from the local directory
    TypeInstance(TypeInstanceArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InterfaceArgs {
    /// Interface path (e.g. cap.interface.database.postgresql.install)
    pub path: String,

    /// Exact revision (defaults to the latest)
    #[arg(long)]
    pub revision: Option<String>,
}

#[derive(Args)]
pub struct InterfacesArgs {
    /// Only list Interfaces whose whole path matches this regex
    #[arg(long)]
    pub path_pattern: Option<String>,

    /// Include the latest revision of each Interface
    #[arg(long)]
    pub latest: bool,

    /// Include every revision of each Interface
    #[arg(long)]
    pub revisions: bool,
}

#[derive(Args)]
pub struct LatestArgs {
    /// Interface path
    pub path: String,
}

#[derive(Args)]
pub struct ImplementationsArgs {
    /// Only list Implementations of this Interface
    pub interface: Option<String>,

    /// Interface revision (defaults to the latest)
    #[arg(long, requires = "interface")]
    pub revision: Option<String>,

    /// Only list Implementations whose whole path matches this regex
    #[arg(long)]
    pub path_pattern: Option<String>,

    /// Require an attribute (PATH or PATH:REVISION)
    #[arg(long = "require-attr", value_name = "ATTR")]
    pub require_attr: Vec<String>,

    /// Reject an attribute (PATH or PATH:REVISION)
    #[arg(long = "reject-attr", value_name = "ATTR")]
    pub reject_attr: Vec<String>,

    /// Type available to satisfy requirements (PATH:REVISION)
    #[arg(long = "satisfied-by", value_name = "TYPE")]
    pub satisfied_by: Vec<String>,
}

#[derive(Args)]
pub struct ExistsArgs {
    /// Manifest references (PATH:REVISION)
    #[arg(required = true)]
    pub refs: Vec<String>,
}

#[derive(Args)]
pub struct TypeInstanceArgs {
    /// TypeInstance ID; lists the type references of all TypeInstances when omitted
    pub id: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
