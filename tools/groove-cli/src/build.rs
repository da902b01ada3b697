//! Batch build and check from a groove.toml manifest

use anyhow::{Context, Result};
use clap::Args;
use groove_cli::{GrooveManifest, ResolvedTrack, create_container};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Arguments for the build command
#[derive(Args)]
pub struct BuildArgs {
    /// Path to groove.toml manifest
    #[arg(default_value = "groove.toml")]
    pub manifest: PathBuf,

    /// Output directory (overrides manifest)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Path to groove.toml manifest
    #[arg(default_value = "groove.toml")]
    pub manifest: PathBuf,
}

fn load(path: &Path) -> Result<(GrooveManifest, PathBuf)> {
    let manifest = GrooveManifest::load(path)?;
    manifest.validate()?;
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((manifest, dir))
}

/// Execute the build command
///
/// Tracks are independent, so they are built in parallel.
pub fn execute_build(args: BuildArgs) -> Result<()> {
    tracing::info!("Building containers from {:?}", args.manifest);
    let (manifest, dir) = load(&args.manifest)?;
    let tracks = manifest.resolve_tracks(&dir, args.output.as_deref());

    let mut dirs: Vec<&Path> = tracks.iter().filter_map(|t| t.output.parent()).collect();
    dirs.dedup();
    for out_dir in dirs {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }

    let results: Vec<Result<u64>> = tracks.par_iter().map(build_track).collect();

    let mut failed = 0;
    for (track, result) in tracks.iter().zip(&results) {
        match result {
            Ok(bytes) => println!("  {} -> {} ({} bytes)", track.id, track.output.display(), bytes),
            Err(e) => {
                failed += 1;
                eprintln!("  {} FAILED: {:#}", track.id, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} track(s) failed", failed, tracks.len());
    }
    tracing::info!("Build complete! {} container(s)", tracks.len());
    Ok(())
}

fn build_track(track: &ResolvedTrack) -> Result<u64> {
    let summary = create_container(&track.input, &track.output, &track.options)
        .with_context(|| format!("Track '{}'", track.id))?;
    Ok(summary.bytes)
}

/// Execute the check command
pub fn execute_check(args: CheckArgs) -> Result<()> {
    tracing::info!("Checking manifest {:?}", args.manifest);
    let (manifest, dir) = load(&args.manifest)?;

    let missing: Vec<_> = manifest
        .resolve_tracks(&dir, None)
        .into_iter()
        .filter(|t| !t.input.is_file())
        .collect();
    for track in &missing {
        eprintln!("  {}: input not found: {}", track.id, track.input.display());
    }
    if !missing.is_empty() {
        anyhow::bail!("{} track input(s) missing", missing.len());
    }

    println!("Manifest is valid! {} track(s)", manifest.tracks.len());
    Ok(())
}
