//! threadline - comment thread lifecycle and sync engine
//!
//! This is the binary entry point. The thread logic lives in the workspace
//! crates; this binary wires configuration, logging and the headless runner.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use threadline_core::prelude::*;

use headless::runner::{run_headless, Overrides};

/// threadline - drive a comment thread from the command line
#[derive(Parser, Debug)]
#[command(name = "threadline")]
#[command(about = "Comment thread lifecycle and optimistic sync engine", long_about = None)]
struct Args {
    /// Project directory holding `.threadline/`
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Comment service base URL (overrides remote.base_url)
    #[arg(long)]
    base_url: Option<String>,

    /// Thread seed file (overrides thread.seed)
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Page fragment for the deep-link highlight, e.g. `#comment-12`
    #[arg(long)]
    fragment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;
    threadline_core::logging::init()?;

    let args = Args::parse();

    // Get project path from args or use current directory
    let project_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let overrides = Overrides {
        base_url: args.base_url,
        seed: args.seed,
        fragment: args.fragment,
    };

    run_headless(&project_path, overrides).await
}
