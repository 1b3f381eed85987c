//! The `cc-tools` clap surface: one subcommand per row of the external
//! interface table.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "cc-tools",
    version,
    about = "Hook dispatch companion and parallel validation gate for an LLM coding assistant host"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dispatch a hook event read from stdin to the default handler registry.
    Hook,

    /// Run the parallel validation gate for an edit-tool hook event.
    Validate {
        /// Override the wall-clock budget for the parallel runner, in seconds.
        #[arg(long)]
        timeout: Option<u64>,
        /// Override the minimum gap between successive validations, in seconds.
        #[arg(long)]
        cooldown: Option<u64>,
    },

    /// Add a skip-registry entry for a project directory, or list every
    /// directory with an active entry when `--list` is given.
    Skip {
        #[arg(value_enum, required_unless_present = "list")]
        category: Option<SkipCategoryArg>,
        #[arg(required_unless_present = "list")]
        dir: Option<PathBuf>,
        /// List every directory with an active skip-registry entry instead
        /// of adding one.
        #[arg(long)]
        list: bool,
    },

    /// Remove a skip-registry entry for a project directory.
    Unskip {
        #[arg(value_enum)]
        category: SkipCategoryArg,
        dir: PathBuf,
    },

    /// Typed configuration accessors.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Session metadata store (external collaborator; thin stub surface).
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// MCP plugin enable/disable (external collaborator; thin stub surface).
    Mcp {
        #[command(subcommand)]
        action: McpAction,
    },

    /// Debug log inspection (external collaborator; thin stub surface).
    Debug {
        #[command(subcommand)]
        action: DebugAction,
    },

    /// Print the build version.
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SkipCategoryArg {
    Lint,
    Test,
    All,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Get { key: String },
    Set { key: String, value: String },
    List,
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    List,
    Show { id: String },
}

#[derive(Debug, Subcommand)]
pub enum McpAction {
    List,
    Enable { name: String },
    Disable { name: String },
}

#[derive(Debug, Subcommand)]
pub enum DebugAction {
    Tail { lines: Option<usize> },
}
