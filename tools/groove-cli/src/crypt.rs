//! Decrypt and encrypt container payloads

use anyhow::{Context, Result};
use clap::Args;
use groove_cli::load_container;
use groove_format::{Container, UNENCRYPTED_VERSION, cipher, version_name};
use std::path::{Path, PathBuf};

/// Arguments for the decrypt command
#[derive(Args)]
pub struct DecryptArgs {
    /// Encrypted container file
    pub container: PathBuf,

    /// Output .gsnd file (default: <name>.decrypted.gsnd)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the red-variant key
    #[arg(long)]
    pub red: bool,
}

/// Arguments for the encrypt command
#[derive(Args)]
pub struct EncryptArgs {
    /// Unencrypted container file
    pub container: PathBuf,

    /// Target container version: name (gen2), hex (0x0D) or decimal
    #[arg(long, value_parser = crate::parse_version_arg)]
    pub version: i32,

    /// Output .gsnd file (default: <name>.encrypted.gsnd)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the red-variant key
    #[arg(long)]
    pub red: bool,
}

/// Execute the decrypt command
///
/// The output header is re-tagged as unencrypted so it reads back as a
/// plain container.
pub fn execute_decrypt(args: DecryptArgs) -> Result<()> {
    let (container, mut data) = load_container(&args.container)?;

    if container.is_encrypted() {
        cipher::transform(&container, &mut data, args.red).with_context(|| {
            format!("Failed to decrypt {}", args.container.display())
        })?;
        cipher::retag(&mut data, UNENCRYPTED_VERSION)?;
    } else {
        tracing::warn!("Container is already unencrypted, copying as-is");
    }

    let output = args
        .output
        .unwrap_or_else(|| args.container.with_extension("decrypted.gsnd"));
    write_output(&output, &data)?;

    println!(
        "Decrypted {} ({}{}) -> {}",
        args.container.display(),
        describe(&container),
        if args.red { ", red" } else { "" },
        output.display()
    );
    Ok(())
}

/// Execute the encrypt command
pub fn execute_encrypt(args: EncryptArgs) -> Result<()> {
    let (container, mut data) = load_container(&args.container)?;

    if container.is_encrypted() {
        anyhow::bail!(
            "{} is already encrypted ({}); decrypt it first",
            args.container.display(),
            describe(&container)
        );
    }
    if args.version == UNENCRYPTED_VERSION {
        anyhow::bail!("Target version must be an encrypted one");
    }

    cipher::retag(&mut data, args.version)?;
    let retagged = Container {
        version: args.version,
        ..container
    };
    cipher::transform(&retagged, &mut data, args.red)
        .with_context(|| format!("Failed to encrypt {}", args.container.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| args.container.with_extension("encrypted.gsnd"));
    write_output(&output, &data)?;

    println!(
        "Encrypted {} as {}{} -> {}",
        args.container.display(),
        describe(&retagged),
        if args.red { ", red" } else { "" },
        output.display()
    );
    Ok(())
}

fn describe(container: &Container) -> String {
    format!(
        "0x{:02X} {}",
        container.version,
        version_name(container.version).unwrap_or("unknown")
    )
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}
