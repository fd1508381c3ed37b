//! Scans the roster folders and writes the roster manifest.
//!
//! Run this whenever images are added to or removed from a roster folder:
//! `build-rosters` (all flags are optional)

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use frame_flip::config::{DEFAULT_MANIFEST_FILE, DEFAULT_ROSTER_PREFIX, DEFAULT_ROSTER_ROOT};
use frame_flip::roster::RosterManifest;
use frame_flip::BuildError;

#[derive(Parser, Debug)]
#[command(name = "build-rosters", version, about = "Generate the roster manifest from the roster folders")]
struct Cli {
    /// Directory holding one subdirectory per roster
    #[arg(long, default_value = DEFAULT_ROSTER_ROOT)]
    root: PathBuf,

    /// Manifest file to write (overwritten)
    #[arg(long, default_value_t = format!("./{DEFAULT_MANIFEST_FILE}"))]
    output: String,

    /// Base path recorded for each roster
    #[arg(long, default_value = DEFAULT_ROSTER_PREFIX)]
    prefix: String,
}

fn run(cli: &Cli) -> Result<usize, BuildError> {
    let report = RosterManifest::build(&cli.root, &cli.prefix)?;
    let output = PathBuf::from(&cli.output);
    report.manifest.save(&output)?;

    tracing::info!(output = %output.display(), "generated roster manifest");
    if !report.skipped.is_empty() {
        tracing::warn!(skipped = report.skipped.len(), "some roster folders were left out");
    }

    Ok(report.manifest.len())
}

fn main() -> ExitCode {
    frame_flip::logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(total) => {
            tracing::info!(total, "total rosters");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "error generating roster manifest");
            ExitCode::FAILURE
        }
    }
}
