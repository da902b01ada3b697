//! Audio file -> container pipeline

use anyhow::{Context, Result};
use groove_format::probe::SymphoniaProbe;
use groove_format::{
    AudioDecodeProbe, Container, DEFAULT_CHUNK_SIZE, SeekIndexBuilder, UNENCRYPTED_VERSION,
    cipher, write_container_with_version,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Container parameters for one created file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    pub chunk_size: u32,
    pub version: i32,
    pub red_variant: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            version: UNENCRYPTED_VERSION,
            red_variant: false,
        }
    }
}

/// What [`create_container`] produced
#[derive(Debug, Clone, Copy)]
pub struct CreateSummary {
    pub total_samples: u64,
    pub entries: usize,
    pub bytes: u64,
}

/// Probe `input`, build its seek index and write a container to `output`.
///
/// Unencrypted containers stream the payload straight from the input file.
/// Encrypted ones are assembled in memory so the payload can be transformed
/// before anything touches the disk.
pub fn create_container(input: &Path, output: &Path, opts: &CreateOptions) -> Result<CreateSummary> {
    let mut probe = SymphoniaProbe::open(input)
        .with_context(|| format!("Failed to open audio: {}", input.display()))?;
    let total_samples = probe
        .total_samples()
        .with_context(|| format!("Failed to probe audio: {}", input.display()))?;

    let index = SeekIndexBuilder::new(opts.chunk_size)
        .build(&mut probe)
        .with_context(|| format!("Failed to build seek index for {}", input.display()))?;
    drop(probe);

    let mut source = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
    );

    let bytes = if opts.version == UNENCRYPTED_VERSION {
        let mut out = BufWriter::new(
            File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?,
        );
        write_container_with_version(opts.version, &index, &mut source, &mut out)
            .with_context(|| format!("Failed to write {}", output.display()))?
    } else {
        let mut data = Vec::new();
        write_container_with_version(opts.version, &index, &mut source, &mut data)
            .context("Failed to assemble container")?;
        let container = Container::parse(&data).context("Assembled container is invalid")?;
        cipher::transform(&container, &mut data, opts.red_variant)
            .context("Failed to encrypt payload")?;
        std::fs::write(output, &data)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        data.len() as u64
    };

    info!(
        input = %input.display(),
        output = %output.display(),
        version = %format!("0x{:02X}", opts.version),
        entries = index.entries.len(),
        bytes,
        "Created container"
    );

    Ok(CreateSummary {
        total_samples,
        entries: index.entries.len(),
        bytes,
    })
}

/// Read a whole container file and parse its header and index
pub fn load_container(path: &Path) -> Result<(Container, Vec<u8>)> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let container = Container::parse(&data)
        .with_context(|| format!("Failed to parse container {}", path.display()))?;
    debug!(
        path = %path.display(),
        version = container.version,
        entries = container.index.entries.len(),
        "Loaded container"
    );
    Ok((container, data))
}

/// Best-guess file extension for an extracted payload, from its magic bytes
pub fn payload_extension(head: &[u8]) -> &'static str {
    match head {
        [b'O', b'g', b'g', b'S', ..] => "ogg",
        [b'R', b'I', b'F', b'F', ..] => "wav",
        [b'f', b'L', b'a', b'C', ..] => "flac",
        [b'I', b'D', b'3', ..] => "mp3",
        [0xFF, b, ..] if b & 0xE0 == 0xE0 => "mp3",
        _ => "bin",
    }
}
