//! Audio decode probe
//!
//! The container never decodes audio itself. Index building only needs a
//! decoder that can answer three questions about a compressed stream: how
//! many samples it holds, how long the byte stream is, and which sample
//! position a seek to a requested sample actually lands on.

#[cfg(feature = "symphonia")]
mod symphonia_probe;

#[cfg(feature = "symphonia")]
pub use symphonia_probe::SymphoniaProbe;

use crate::error::DecodeProbeError;

/// Position queries against an externally decodable audio stream
pub trait AudioDecodeProbe {
    /// Total samples (per channel) in the stream
    fn total_samples(&mut self) -> Result<u64, DecodeProbeError>;

    /// Sample rate in Hz, if the decoder knows it
    fn sample_rate(&self) -> Option<u32>;

    /// Length of the compressed byte stream
    fn stream_len(&self) -> u64;

    /// Seek to `target` and return the sample position actually reached
    fn seek(&mut self, target: u64) -> Result<u64, DecodeProbeError>;
}

impl<P: AudioDecodeProbe + ?Sized> AudioDecodeProbe for Box<P> {
    fn total_samples(&mut self) -> Result<u64, DecodeProbeError> {
        (**self).total_samples()
    }

    fn sample_rate(&self) -> Option<u32> {
        (**self).sample_rate()
    }

    fn stream_len(&self) -> u64 {
        (**self).stream_len()
    }

    fn seek(&mut self, target: u64) -> Result<u64, DecodeProbeError> {
        (**self).seek(target)
    }
}
