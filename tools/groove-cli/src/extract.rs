//! Extract the raw payload of a container

use anyhow::{Context, Result};
use clap::Args;
use groove_cli::pipeline::payload_extension;
use groove_format::{extract, read_container, validate};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::PathBuf;

/// Arguments for the extract command
#[derive(Args)]
pub struct ExtractArgs {
    /// Container file
    pub container: PathBuf,

    /// Output file (default: <name>.payload.<ext>, extension guessed from the payload)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the extract command
pub fn execute(args: ExtractArgs) -> Result<()> {
    let mut reader = BufReader::new(
        File::open(&args.container)
            .with_context(|| format!("Failed to open {}", args.container.display()))?,
    );
    let container = read_container(&mut reader)
        .with_context(|| format!("Failed to read container {}", args.container.display()))?;
    validate(&container).context("Container failed validation")?;

    if container.is_encrypted() {
        tracing::warn!(
            version = container.version,
            "Payload is encrypted; extracting ciphertext (run `groove decrypt` first for audio)"
        );
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            let mut head = [0u8; 4];
            let n = reader.read(&mut head)?;
            args.container
                .with_extension(format!("payload.{}", payload_extension(&head[..n])))
        }
    };
    let same_file = output == args.container
        || matches!(
            (output.canonicalize(), args.container.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    if same_file {
        anyhow::bail!(
            "Output would overwrite the container: {} (pass a different -o)",
            output.display()
        );
    }

    let mut out = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    let copied = extract(&container, &mut reader, &mut out)
        .with_context(|| format!("Failed to extract payload to {}", output.display()))?;

    println!("Extracted {} bytes -> {}", copied, output.display());
    Ok(())
}
