//! groove.toml manifest parsing
//!
//! Batch description of tracks to package, used by the `build` and `check`
//! commands.

use anyhow::{Context, Result};
use groove_format::{CONTAINER_EXT, DEFAULT_CHUNK_SIZE, UNENCRYPTED_VERSION, is_known_version};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::pipeline::CreateOptions;

/// groove.toml manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct GrooveManifest {
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

/// Settings applied to every track unless the track overrides them
#[derive(Debug, Deserialize)]
pub struct DefaultsSection {
    /// Samples between seek index entries.
    /// Default: 4096
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Container version tag (0x0A = unencrypted).
    /// Default: 0x0A
    #[serde(default = "default_version")]
    pub version: i32,

    /// Use the red-variant key of paired-key generations
    #[serde(default)]
    pub red_variant: bool,

    /// Output directory, relative to the manifest
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            version: default_version(),
            red_variant: false,
            output_dir: None,
        }
    }
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

fn default_version() -> i32 {
    UNENCRYPTED_VERSION
}

/// Single track entry
#[derive(Debug, Deserialize)]
pub struct TrackEntry {
    pub id: String,
    pub input: String,

    /// Output file name. Default: `<id>.gsnd`
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub red_variant: Option<bool>,
    #[serde(default)]
    pub chunk_size: Option<u32>,
}

impl TrackEntry {
    /// Output file name, relative to the output directory
    pub fn output_name(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.id, CONTAINER_EXT))
    }
}

/// A track with paths and options fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub id: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: CreateOptions,
}

impl GrooveManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse groove.toml")
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<()> {
        check_chunk_size(self.defaults.chunk_size, "defaults")?;
        check_version(self.defaults.version, "defaults")?;

        let mut seen = HashSet::new();
        let mut outputs = HashSet::new();
        for track in &self.tracks {
            if track.id.trim().is_empty() {
                anyhow::bail!("Track with input '{}' has an empty id", track.input);
            }
            if !seen.insert(track.id.as_str()) {
                anyhow::bail!("Duplicate track id '{}' in groove.toml", track.id);
            }
            // Tracks build in parallel; a shared output would be clobbered
            let output = track.output_name();
            if !outputs.insert(output.clone()) {
                anyhow::bail!(
                    "Track '{}' writes to '{}', which another track already uses",
                    track.id,
                    output
                );
            }
            if track.input.trim().is_empty() {
                anyhow::bail!("Track '{}' has an empty input path", track.id);
            }
            if let Some(chunk_size) = track.chunk_size {
                check_chunk_size(chunk_size, &track.id)?;
            }
            if let Some(version) = track.version {
                check_version(version, &track.id)?;
            }
        }

        if self.tracks.is_empty() {
            tracing::warn!("groove.toml declares no tracks");
        }

        Ok(())
    }

    /// Resolve every track against the manifest directory.
    ///
    /// `output_dir` overrides `[defaults].output_dir`.
    pub fn resolve_tracks(
        &self,
        manifest_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Vec<ResolvedTrack> {
        let out_dir = match (output_dir, &self.defaults.output_dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => manifest_dir.join(dir),
            (None, None) => manifest_dir.to_path_buf(),
        };

        self.tracks
            .iter()
            .map(|track| ResolvedTrack {
                id: track.id.clone(),
                input: manifest_dir.join(&track.input),
                output: out_dir.join(track.output_name()),
                options: CreateOptions {
                    chunk_size: track.chunk_size.unwrap_or(self.defaults.chunk_size),
                    version: track.version.unwrap_or(self.defaults.version),
                    red_variant: track.red_variant.unwrap_or(self.defaults.red_variant),
                },
            })
            .collect()
    }
}

fn check_chunk_size(chunk_size: u32, owner: &str) -> Result<()> {
    if chunk_size == 0 || chunk_size > i32::MAX as u32 {
        anyhow::bail!(
            "Invalid chunk_size {} for '{}' (must be 1-{})",
            chunk_size,
            owner,
            i32::MAX
        );
    }
    Ok(())
}

fn check_version(version: i32, owner: &str) -> Result<()> {
    if !is_known_version(version) {
        anyhow::bail!(
            "Unknown container version 0x{:02X} for '{}'",
            version,
            owner
        );
    }
    Ok(())
}
