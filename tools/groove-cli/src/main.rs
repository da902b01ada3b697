//! Groove CLI - Build and inspect .gsnd audio containers
//!
//! # Commands
//!
//! - `groove create` - Probe an audio file and wrap it in a container
//! - `groove extract` - Copy the raw payload out of a container
//! - `groove validate` - Check container structure and print a report
//! - `groove decrypt` - Decrypt the payload into an unencrypted container
//! - `groove encrypt` - Encrypt an unencrypted container for a target version
//! - `groove info` - Show header, seek index and cipher details
//! - `groove build` - Create every track listed in groove.toml
//! - `groove check` - Validate groove.toml without building
//!
//! # Usage
//!
//! ```bash
//! # Unencrypted container with the default 4096-sample index stride
//! groove create song.ogg -o song.gsnd
//!
//! # Encrypted for a gen2 target, red-variant key
//! groove create song.ogg --version gen2 --red
//!
//! # Back to plain audio
//! groove decrypt song.gsnd --red -o song.plain.gsnd
//! groove extract song.plain.gsnd -o song.ogg
//! ```
//!
//! # Manifest (groove.toml)
//!
//! ```toml
//! [defaults]
//! chunk_size = 4096
//! version = 0x0A
//! output_dir = "out"
//!
//! [[tracks]]
//! id = "song_intro"
//! input = "audio/song_intro.ogg"
//! version = 0x0D
//! red_variant = true
//! ```

mod build;
mod create;
mod crypt;
mod extract;
mod info;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Groove CLI - Build and inspect .gsnd audio containers
#[derive(Parser)]
#[command(name = "groove")]
#[command(about = "Build and inspect .gsnd audio containers")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe an audio file and wrap it in a container
    Create(create::CreateArgs),

    /// Copy the raw payload out of a container (no decryption)
    Extract(extract::ExtractArgs),

    /// Check container structure and print a report
    Validate(validate::ValidateArgs),

    /// Decrypt the payload into an unencrypted container
    Decrypt(crypt::DecryptArgs),

    /// Encrypt an unencrypted container for a target version
    Encrypt(crypt::EncryptArgs),

    /// Show header, seek index and cipher details
    Info(info::InfoArgs),

    /// Create every track listed in groove.toml
    Build(build::BuildArgs),

    /// Validate groove.toml without building
    Check(build::CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        tracing::Level::WARN
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Initialize logging (stderr keeps stdout clean for reports)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Create(args) => create::execute(args),
        Commands::Extract(args) => extract::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Decrypt(args) => crypt::execute_decrypt(args),
        Commands::Encrypt(args) => crypt::execute_encrypt(args),
        Commands::Info(args) => info::execute(args),
        Commands::Build(args) => build::execute_build(args),
        Commands::Check(args) => build::execute_check(args),
    }
}

/// clap value parser for container version tags (`gen2`, `0x0D`, `13`)
fn parse_version_arg(s: &str) -> Result<i32, String> {
    groove_format::parse_version(s).ok_or_else(|| {
        let known = groove_format::known_versions()
            .filter_map(|t| groove_format::version_name(t).map(|n| format!("{n} (0x{t:02X})")))
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown container version '{s}' (known: {known})")
    })
}
