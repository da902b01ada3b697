//! Display container header, seek index and cipher parameters

use anyhow::{Context, Result};
use clap::Args;
use groove_cli::load_container;
use groove_format::{cipher, version_name};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Container file
    pub container: PathBuf,

    /// Resolve the red-variant key
    #[arg(long)]
    pub red: bool,

    /// List every seek index entry
    #[arg(long)]
    pub entries: bool,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let (container, data) = load_container(&args.container)?;
    let payload = container
        .payload(&data)
        .context("Container payload lies outside the file")?;

    println!("=== {} ===", args.container.display());
    println!();
    println!(
        "Version: 0x{:02X} ({})",
        container.version,
        version_name(container.version).unwrap_or("unknown")
    );
    println!("Audio offset: {}", container.audio_offset);
    println!("File size: {} bytes", container.total_len);

    let index = &container.index;
    println!();
    println!("--- Seek Index ---");
    println!("Format version: {}", index.format_version);
    println!("Chunk size: {} samples", index.chunk_size);
    println!("Entries: {}", index.entries.len());
    if let (Some(first), Some(last)) = (index.entries.first(), index.entries.last()) {
        println!(
            "Range: byte {}..{}, sample {}..{}",
            first.byte_offset, last.byte_offset, first.sample_offset, last.sample_offset
        );
    }
    if !index.is_monotonic() {
        println!("WARNING: byte offsets are not monotonic");
    }
    if args.entries {
        for (i, entry) in index.entries.iter().enumerate() {
            println!(
                "  [{:5}] sample {:>10} -> byte {:>10} (target {})",
                i,
                entry.sample_offset,
                entry.byte_offset,
                i as u64 * index.chunk_size as u64
            );
        }
    }

    println!();
    println!("--- Cipher ---");
    let header_region = &data[..container.payload_offset() as usize];
    match cipher::resolve(container.version, header_region, args.red)? {
        None => println!("Unencrypted"),
        Some(params) => {
            println!("Variant: {}", if args.red { "red" } else { "plain" });
            println!("Initial counter: {}", hex::encode(params.counter));
            if let Some(slot) = params.slot {
                println!("Key slot: {}", slot);
            }
        }
    }

    println!();
    println!("--- Payload ---");
    println!("Length: {} bytes", payload.len());
    println!("SHA-256: {}", hex::encode(Sha256::digest(payload)));

    Ok(())
}
