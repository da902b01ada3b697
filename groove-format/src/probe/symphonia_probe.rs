//! [`AudioDecodeProbe`] backed by symphonia's format readers

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;
use symphonia::default::get_probe;
use tracing::debug;

use super::AudioDecodeProbe;
use crate::error::DecodeProbeError;

/// Decode probe over any container/codec pair symphonia can demux
pub struct SymphoniaProbe {
    reader: Box<dyn FormatReader>,
    track_id: u32,
    total_samples: Option<u64>,
    sample_rate: Option<u32>,
    time_base: Option<TimeBase>,
    stream_len: u64,
}

impl SymphoniaProbe {
    /// Open an audio file, using its extension as a format hint
    pub fn open(path: &Path) -> Result<Self, DecodeProbeError> {
        let file = File::open(path)?;
        let stream_len = file.metadata()?.len();

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        Self::from_source(Box::new(file), hint, stream_len)
    }

    /// Probe an in-memory stream
    pub fn from_bytes(data: Vec<u8>, extension: Option<&str>) -> Result<Self, DecodeProbeError> {
        let stream_len = data.len() as u64;
        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }
        Self::from_source(Box::new(Cursor::new(data)), hint, stream_len)
    }

    fn from_source(
        source: Box<dyn MediaSource>,
        hint: Hint,
        stream_len: u64,
    ) -> Result<Self, DecodeProbeError> {
        let mss = MediaSourceStream::new(source, Default::default());
        let probed = get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeProbeError::Open(e.to_string()))?;

        let reader = probed.format;
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeProbeError::NoTrack)?;

        let params = &track.codec_params;
        debug!(
            track_id = track.id,
            n_frames = ?params.n_frames,
            sample_rate = ?params.sample_rate,
            stream_len,
            "Opened audio stream"
        );

        Ok(Self {
            track_id: track.id,
            total_samples: params.n_frames,
            sample_rate: params.sample_rate,
            time_base: params.time_base,
            stream_len,
            reader,
        })
    }

    /// Sample position -> track timestamp
    fn sample_to_ts(&self, sample: u64) -> u64 {
        match (self.time_base, self.sample_rate) {
            (Some(tb), Some(rate)) if tb.numer > 0 && rate > 0 => {
                let ts = sample as u128 * tb.denom as u128 / (tb.numer as u128 * rate as u128);
                ts.min(u64::MAX as u128) as u64
            }
            _ => sample,
        }
    }

    /// Track timestamp -> sample position
    fn ts_to_sample(&self, ts: u64) -> u64 {
        match (self.time_base, self.sample_rate) {
            (Some(tb), Some(rate)) if tb.denom > 0 => {
                let sample = ts as u128 * tb.numer as u128 * rate as u128 / tb.denom as u128;
                sample.min(u64::MAX as u128) as u64
            }
            _ => ts,
        }
    }
}

impl AudioDecodeProbe for SymphoniaProbe {
    fn total_samples(&mut self) -> Result<u64, DecodeProbeError> {
        self.total_samples.ok_or(DecodeProbeError::UnknownLength)
    }

    fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    fn stream_len(&self) -> u64 {
        self.stream_len
    }

    fn seek(&mut self, target: u64) -> Result<u64, DecodeProbeError> {
        let ts = self.sample_to_ts(target);
        let seeked = self
            .reader
            .seek(
                SeekMode::Accurate,
                SeekTo::TimeStamp {
                    ts,
                    track_id: self.track_id,
                },
            )
            .map_err(|e| DecodeProbeError::Seek {
                target,
                reason: e.to_string(),
            })?;

        Ok(self.ts_to_sample(seeked.actual_ts))
    }
}
