//! Round-trip fidelity checker for annotated matrix containers.
//!
//! `adcheck generate <path>` writes the canonical fixture in the container
//! format selected by the path's extension. `adcheck validate <path>` reads
//! a container back and compares it field-by-field against a freshly
//! generated fixture. Diagnostics go to stderr; the process exits non-zero
//! on any store or validation failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ad_compare::{CompareConfig, LabelCodec, compare_aggregates};
use ad_fixture::test_fixture;
use ad_store::{Format, read_aggregate, write_aggregate};

#[derive(Parser)]
#[command(name = "adcheck", about = "Annotated matrix container round-trip checker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the canonical fixture and write it to the given path.
    Generate {
        /// Output path; the extension selects the container format.
        path: PathBuf,
    },
    /// Read a container back and validate it against the canonical fixture.
    Validate {
        /// Container path; the extension selects the container format.
        path: PathBuf,
    },
}

fn generate(path: &Path) -> Result<(), String> {
    eprintln!("Writing annotated matrix to: {}", path.display());
    let aggregate = test_fixture();
    write_aggregate(&aggregate, path).map_err(|e| e.to_string())
}

fn validate(path: &Path) -> Result<(), String> {
    eprintln!("Reading annotated matrix for validation: {}", path.display());
    let format = Format::from_path(path).map_err(|e| e.to_string())?;

    let expected = test_fixture();
    let actual = read_aggregate(path).map_err(|e| e.to_string())?;

    // Byte-native backends hand categorical labels back as raw byte
    // strings; reconcile them through the UTF-8 codec.
    let config = CompareConfig {
        label_codec: if format.is_byte_native() {
            LabelCodec::utf8()
        } else {
            LabelCodec::identity()
        },
        ..Default::default()
    };

    compare_aggregates(&expected, &actual, &config)
        .map_err(|e| format!("Validation failed: {e}"))?;

    eprintln!("Validation successful");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Generate { path } => generate(path),
        Command::Validate { path } => validate(path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
