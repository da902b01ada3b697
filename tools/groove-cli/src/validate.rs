//! Validate a container without modifying it

use anyhow::{Context, Result};
use clap::Args;
use groove_format::{read_container, validate};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args)]
pub struct ValidateArgs {
    /// Container file
    pub container: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs) -> Result<()> {
    let mut reader = BufReader::new(
        File::open(&args.container)
            .with_context(|| format!("Failed to open {}", args.container.display()))?,
    );
    let container = read_container(&mut reader)
        .with_context(|| format!("Failed to read container {}", args.container.display()))?;
    let report = validate(&container)
        .with_context(|| format!("Invalid container {}", args.container.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Container Valid ===");
    println!("File: {}", args.container.display());
    println!("Version: 0x{:02X} ({})", report.version, report.version_name);
    println!("Encrypted: {}", report.encrypted);
    println!("Audio offset: {}", report.audio_offset);
    println!();
    println!("Index version: {}", report.index_version);
    println!("Chunk size: {} samples", report.chunk_size);
    println!("Entries: {}", report.entry_count);
    println!("Max sample offset: {}", report.max_sample_offset);
    println!("Monotonic: {}", report.monotonic);
    println!();
    println!("Payload: {} bytes", report.payload_len);
    println!("Total: {} bytes", report.total_len);

    Ok(())
}
