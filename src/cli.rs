// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "caravel")]
#[command(about = "Build-from-source container deployment for a single host")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new caravel.yml configuration file
    Init {
        /// Service name (container name on the host)
        #[arg(short, long)]
        service: Option<String>,

        /// Image repository to build into
        #[arg(short, long)]
        repository: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the full pipeline: checkout, build, test, deploy, cleanup
    Deploy {
        /// Image tag for this run (defaults to the revision)
        #[arg(short, long)]
        tag: Option<String>,

        /// Source revision to check out (branch, tag, or commit)
        #[arg(short, long)]
        revision: Option<String>,

        /// Break an existing deploy lock
        #[arg(long)]
        force: bool,

        /// Minimal output for CI
        #[arg(short, long, conflicts_with = "json")]
        quiet: bool,

        /// JSON lines output for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the configured service and its container status
    Status,
}
