//! Create a container from one audio file

use anyhow::Result;
use clap::Args;
use groove_cli::{CreateOptions, create_container};
use groove_format::{CONTAINER_EXT, DEFAULT_CHUNK_SIZE, UNENCRYPTED_VERSION};
use std::path::PathBuf;

/// Arguments for the create command
#[derive(Args)]
pub struct CreateArgs {
    /// Input audio file (any format the decoder can seek)
    pub input: PathBuf,

    /// Output .gsnd file (default: input with .gsnd extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Samples between seek index entries
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u32,

    /// Container version: name (gen2), hex (0x0D) or decimal
    #[arg(long, value_parser = crate::parse_version_arg, default_value = "0x0A")]
    pub version: i32,

    /// Use the red-variant key
    #[arg(long)]
    pub red: bool,
}

/// Execute the create command
pub fn execute(args: CreateArgs) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension(CONTAINER_EXT));
    if output == args.input {
        anyhow::bail!(
            "Output would overwrite the input: {} (pass -o)",
            output.display()
        );
    }

    let opts = CreateOptions {
        chunk_size: args.chunk_size,
        version: args.version,
        red_variant: args.red,
    };
    if opts.version == UNENCRYPTED_VERSION && opts.red_variant {
        tracing::warn!("--red has no effect on an unencrypted container");
    }

    let summary = create_container(&args.input, &output, &opts)?;
    println!(
        "{} -> {} ({} samples, {} index entries, {} bytes)",
        args.input.display(),
        output.display(),
        summary.total_samples,
        summary.entries,
        summary.bytes
    );
    Ok(())
}
