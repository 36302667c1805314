//! CLI command handling.
//!
//! Provides subcommands for:
//! - Listing available tools (`tools`)
//! - Running a single tool (`invoke`)
//! - Checking provider credentials (`validate`)

mod tool;

pub use tool::{parse_key_value, run_invoke_command, run_tools_command, run_validate_command};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(about = "Run LLM agent tools (Wolfram Alpha, time, registered HTTP APIs) from the shell")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that build the tool registry.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// User the tools run for
    #[arg(short, long, default_value = "default")]
    pub user: String,

    /// Tenant whose registered APIs should be included
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// JSON file with registered API providers
    #[arg(long)]
    pub api_providers: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List available tools
    Tools {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Print full JSON schemas
        #[arg(short, long)]
        verbose: bool,
    },

    /// Invoke a tool once and print its message
    Invoke {
        /// Tool name
        tool: String,

        /// Tool parameter as key=value (value parsed as JSON when possible)
        #[arg(short, long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Credential as key=value
        #[arg(short, long = "credential", value_parser = parse_key_value)]
        credentials: Vec<(String, String)>,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Validate credentials for a provider
    Validate {
        /// Provider name (wolframalpha, time, api)
        provider: String,

        /// Credential as key=value
        #[arg(short, long = "credential", value_parser = parse_key_value)]
        credentials: Vec<(String, String)>,
    },
}
