//! groove-cli library
//!
//! Container pipeline and manifest handling shared by the `groove` binary
//! commands (and usable from other build tools).

pub mod manifest;
pub mod pipeline;

pub use manifest::{GrooveManifest, ResolvedTrack};
pub use pipeline::{CreateOptions, CreateSummary, create_container, load_container};
