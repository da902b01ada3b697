//! Seek index construction from decode probe observations
//!
//! Building happens in two passes:
//!
//! 1. Walk the stream in fixed [`PROBE_STRIDE`] sample steps, asking the probe
//!    to seek to each boundary and recording where it actually landed
//!    together with an estimated byte offset.
//! 2. Lay a `chunk_size` grid over the whole stream and, for every grid
//!    point, take the closest observation that does not lie after it.
//!
//! Picking the preceding observation keeps the map conservative: a decoder
//! starting at `entries[i].byte_offset` always begins at or before sample
//! `i * chunk_size`, never after it.

use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::index::{SeekIndex, SeekIndexEntry};
use crate::probe::AudioDecodeProbe;
use crate::{DEFAULT_CHUNK_SIZE, SEEK_INDEX_VERSION};

/// Sample distance between probe seeks (independent of the chunk size)
pub const PROBE_STRIDE: u64 = 0x8000;

/// One probe answer: decoding up to `byte_offset` reaches `sample_offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub byte_offset: u32,
    pub sample_offset: u32,
}

/// Builds a [`SeekIndex`] for one stream
#[derive(Debug, Clone, Copy)]
pub struct SeekIndexBuilder {
    chunk_size: u32,
    stride: u64,
}

impl Default for SeekIndexBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl SeekIndexBuilder {
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_size,
            stride: PROBE_STRIDE,
        }
    }

    /// Override the probe stride (mostly useful for tests on short streams)
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Probe the stream and derive the fixed-stride map
    pub fn build<P: AudioDecodeProbe + ?Sized>(&self, probe: &mut P) -> Result<SeekIndex, BuildError> {
        if self.chunk_size == 0 || self.chunk_size > i32::MAX as u32 {
            return Err(BuildError::InvalidChunkSize(self.chunk_size));
        }

        let total_samples = probe.total_samples()?;
        let entry_count = total_samples.div_ceil(self.chunk_size as u64);
        if entry_count > i32::MAX as u64 {
            return Err(BuildError::TooManyEntries(entry_count));
        }

        let observations = self.observe(probe, total_samples);
        debug!(
            total_samples,
            observations = observations.len(),
            entry_count,
            "Probe walk finished"
        );

        let entries = (0..entry_count)
            .map(|i| select_preceding(&observations, i * self.chunk_size as u64))
            .collect::<Vec<_>>();

        info!(
            chunk_size = self.chunk_size,
            entries = entries.len(),
            "Built seek index"
        );

        Ok(SeekIndex::new(
            SEEK_INDEX_VERSION,
            self.chunk_size as i32,
            entries,
        ))
    }

    /// Walk the stream in stride steps. Failed seeks are skipped.
    ///
    /// The returned table is ordered by sample offset.
    pub fn observe<P: AudioDecodeProbe + ?Sized>(
        &self,
        probe: &mut P,
        total_samples: u64,
    ) -> Vec<Observation> {
        let stream_len = probe.stream_len();
        let mut observations = Vec::with_capacity((total_samples / self.stride) as usize + 1);

        let mut target = 0u64;
        while target < total_samples {
            match probe.seek(target) {
                Ok(actual) => {
                    let actual = actual.min(total_samples);
                    observations.push(Observation {
                        byte_offset: estimate_byte_offset(actual, total_samples, stream_len),
                        sample_offset: actual.min(u32::MAX as u64) as u32,
                    });
                }
                Err(e) => warn!(target, error = %e, "Probe seek failed, skipping stride"),
            }
            target += self.stride;
        }

        // A coarse decoder can land behind an earlier answer; keep the table
        // sorted so "closest preceding" is well defined. Stable, so equal
        // positions stay in traversal order.
        observations.sort_by_key(|o| o.sample_offset);
        observations
    }
}

/// `floor(actual / total * stream_len)`, clamped to u32
pub fn estimate_byte_offset(actual: u64, total_samples: u64, stream_len: u64) -> u32 {
    if total_samples == 0 {
        return 0;
    }
    let estimate = actual as u128 * stream_len as u128 / total_samples as u128;
    estimate.min(u32::MAX as u128) as u32
}

/// Last observation whose sample offset does not exceed `desired`,
/// or a zero entry when nothing precedes it.
fn select_preceding(observations: &[Observation], desired: u64) -> SeekIndexEntry {
    let idx = observations.partition_point(|o| o.sample_offset as u64 <= desired);
    match idx.checked_sub(1).map(|i| observations[i]) {
        Some(o) => SeekIndexEntry::new(o.byte_offset, o.sample_offset),
        None => SeekIndexEntry::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeProbeError;

    /// Probe over a constant-bitrate stream that lands `lag` samples early
    /// or `overshoot` samples late
    struct FakeProbe {
        total: Option<u64>,
        stream_len: u64,
        lag: u64,
        overshoot: u64,
        fail_at: Vec<u64>,
        seeks: Vec<u64>,
    }

    impl FakeProbe {
        fn new(total: u64, stream_len: u64) -> Self {
            Self {
                total: Some(total),
                stream_len,
                lag: 0,
                overshoot: 0,
                fail_at: Vec::new(),
                seeks: Vec::new(),
            }
        }
    }

    impl AudioDecodeProbe for FakeProbe {
        fn total_samples(&mut self) -> Result<u64, DecodeProbeError> {
            self.total.ok_or(DecodeProbeError::UnknownLength)
        }

        fn sample_rate(&self) -> Option<u32> {
            Some(48000)
        }

        fn stream_len(&self) -> u64 {
            self.stream_len
        }

        fn seek(&mut self, target: u64) -> Result<u64, DecodeProbeError> {
            self.seeks.push(target);
            if self.fail_at.contains(&target) {
                return Err(DecodeProbeError::Seek {
                    target,
                    reason: "corrupt page".into(),
                });
            }
            Ok(target.saturating_sub(self.lag) + self.overshoot)
        }
    }

    #[test]
    fn test_entry_count_and_first_entry() {
        let mut probe = FakeProbe::new(200_000, 1_000_000);
        let index = SeekIndexBuilder::new(20_000).build(&mut probe).unwrap();

        assert_eq!(index.entries.len(), 10);
        assert_eq!(index.chunk_size, 20_000);
        assert_eq!(index.format_version, SEEK_INDEX_VERSION);
        assert_eq!(index.entries[0], SeekIndexEntry::new(0, 0));
    }

    #[test]
    fn test_entry_count_rounds_up() {
        let mut probe = FakeProbe::new(200_001, 1_000_000);
        let index = SeekIndexBuilder::new(20_000).build(&mut probe).unwrap();
        assert_eq!(index.entries.len(), 11);
    }

    #[test]
    fn test_probe_walks_fixed_stride() {
        let mut probe = FakeProbe::new(100_000, 400_000);
        SeekIndexBuilder::new(1000).build(&mut probe).unwrap();
        assert_eq!(probe.seeks, vec![0, 0x8000, 0x10000, 0x18000]);
    }

    #[test]
    fn test_selects_closest_preceding_observation() {
        // Observations at 0, 32768, 65536, 98304 on a 4 bytes/sample stream
        let mut probe = FakeProbe::new(131_072, 524_288);
        let index = SeekIndexBuilder::new(16_384).build(&mut probe).unwrap();

        let samples: Vec<u32> = index.entries.iter().map(|e| e.sample_offset).collect();
        assert_eq!(
            samples,
            vec![0, 0, 32768, 32768, 65536, 65536, 98304, 98304]
        );
        // Never rounded forward past the grid point
        for (i, entry) in index.entries.iter().enumerate() {
            assert!(entry.sample_offset as u64 <= i as u64 * 16_384);
            assert_eq!(entry.byte_offset, entry.sample_offset * 4);
        }
    }

    #[test]
    fn test_exact_hit_is_selected() {
        let observations = [
            Observation { byte_offset: 0, sample_offset: 0 },
            Observation { byte_offset: 50, sample_offset: 100 },
            Observation { byte_offset: 90, sample_offset: 200 },
        ];
        assert_eq!(select_preceding(&observations, 100).byte_offset, 50);
        assert_eq!(select_preceding(&observations, 199).byte_offset, 50);
        assert_eq!(select_preceding(&observations, 200).byte_offset, 90);
    }

    #[test]
    fn test_nothing_preceding_defaults_to_zero() {
        let observations = [Observation { byte_offset: 70, sample_offset: 500 }];
        assert_eq!(select_preceding(&observations, 10), SeekIndexEntry::default());
        assert_eq!(select_preceding(&[], 10), SeekIndexEntry::default());
    }

    #[test]
    fn test_failed_seek_is_skipped() {
        let mut probe = FakeProbe::new(131_072, 131_072);
        probe.fail_at = vec![0x8000];
        let index = SeekIndexBuilder::new(0x8000).build(&mut probe).unwrap();

        // Entry 1 falls back to the observation at sample 0
        assert_eq!(index.entries[1], SeekIndexEntry::new(0, 0));
        assert_eq!(index.entries[2].sample_offset, 0x10000);
        assert_eq!(probe.seeks.len(), 4);
    }

    #[test]
    fn test_all_seeks_failing_yields_zero_map() {
        let mut probe = FakeProbe::new(65_536, 1000);
        probe.fail_at = vec![0, 0x8000];
        let index = SeekIndexBuilder::new(4096).build(&mut probe).unwrap();
        assert_eq!(index.entries.len(), 16);
        assert!(index.entries.iter().all(|e| *e == SeekIndexEntry::default()));
    }

    #[test]
    fn test_unknown_length_is_fatal() {
        let mut probe = FakeProbe::new(0, 0);
        probe.total = None;
        let result = SeekIndexBuilder::default().build(&mut probe);
        assert!(matches!(
            result,
            Err(BuildError::Probe(DecodeProbeError::UnknownLength))
        ));
    }

    #[test]
    fn test_invalid_chunk_size() {
        let mut probe = FakeProbe::new(1000, 1000);
        assert!(matches!(
            SeekIndexBuilder::new(0).build(&mut probe),
            Err(BuildError::InvalidChunkSize(0))
        ));
        assert!(matches!(
            SeekIndexBuilder::new(u32::MAX).build(&mut probe),
            Err(BuildError::InvalidChunkSize(_))
        ));
    }

    #[test]
    fn test_empty_stream() {
        let mut probe = FakeProbe::new(0, 0);
        let index = SeekIndexBuilder::default().build(&mut probe).unwrap();
        assert!(index.entries.is_empty());
        assert!(probe.seeks.is_empty());
    }

    #[test]
    fn test_lagging_probe_stays_monotonic() {
        let mut probe = FakeProbe::new(1_000_000, 3_000_000);
        probe.lag = 1500;
        let index = SeekIndexBuilder::new(3000)
            .with_stride(10_000)
            .build(&mut probe)
            .unwrap();

        assert!(index.is_monotonic());
        for (i, entry) in index.entries.iter().enumerate() {
            assert!(entry.sample_offset as u64 <= i as u64 * 3000);
            assert!(entry.sample_offset as u64 <= 1_000_000);
        }
    }

    #[test]
    fn test_overshooting_probe_is_clamped() {
        let mut probe = FakeProbe::new(100_000, 1000);
        probe.overshoot = 90_000;
        let index = SeekIndexBuilder::new(10_000).build(&mut probe).unwrap();

        assert_eq!(index.entries.len(), 10);
        for entry in &index.entries {
            assert!(entry.sample_offset as u64 <= 100_000);
            assert!(entry.byte_offset as u64 <= 1000);
        }
        // Only the first seek lands inside the stream; later ones clamp to
        // the end and precede no grid point
        assert_eq!(index.entries[9], SeekIndexEntry::new(900, 90_000));
        assert!(index.entries[..9].iter().all(|e| *e == SeekIndexEntry::default()));
        assert!(index.is_monotonic());
    }

    #[test]
    fn test_estimate_byte_offset() {
        assert_eq!(estimate_byte_offset(0, 100, 1000), 0);
        assert_eq!(estimate_byte_offset(50, 100, 1000), 500);
        assert_eq!(estimate_byte_offset(1, 3, 10), 3);
        assert_eq!(estimate_byte_offset(10, 0, 1000), 0);
        assert_eq!(estimate_byte_offset(u64::MAX, 1, u64::MAX), u32::MAX);
    }
}
