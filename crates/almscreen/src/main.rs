//! Almscreen launcher
//!
//! Maps every alarm-bearing DMS datapoint to the PSC screen file best suited
//! to show the fault, so the alarm viewer can open the right picture
//! directly.

use almscreen::cli;
use almscreen_logging::{init_logging, LogConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "almscreen", about = "Maps alarm datapoints to PSC screen files")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve screen mappings and write them into the DMS
    Sync {
        /// Hostname or IP address of the DMS server
        #[arg(short = 's', long, default_value = "127.0.0.1")]
        host: String,

        /// TCP port of the DMS server
        #[arg(short = 'p', long, default_value_t = 9020)]
        port: u16,

        /// Compute the change set but write nothing
        #[arg(short = 'd', long)]
        dry_run: bool,

        /// Export a backup of the stored mappings before writing
        #[arg(short = 'b', long)]
        backup: bool,
    },

    /// Inspect a screen directory without a DMS
    Scan {
        /// Directory containing the PSC files
        path: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig {
        verbose: cli.verbose,
    }) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Sync {
            host,
            port,
            dry_run,
            backup,
        } => cli::sync::run(cli::sync::SyncArgs {
            host,
            port,
            dry_run,
            backup,
        }),
        Commands::Scan { path, json } => cli::scan::run(cli::scan::ScanArgs { path, json }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
