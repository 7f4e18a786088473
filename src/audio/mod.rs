//! Host audio record and WAV glue.
//!
//! The graph host passes audio between nodes as a waveform tensor of shape
//! `(batch=1, channels, samples)` plus an integer sample rate. The batch
//! dimension is squeezed away at this crate's boundary: an [`AudioFrame`]
//! holds one sample vector per channel.

pub mod resample;

use std::path::Path;

use crate::error::{NodeError, Result};

/// A decoded audio clip: one `Vec<f32>` per channel plus its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioFrame {
    /// Build a frame from per-channel sample vectors.
    ///
    /// All channels must have the same length and there must be at least
    /// one non-empty channel.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(NodeError::UnsupportedRate(sample_rate));
        }
        let Some(first) = channels.first() else {
            return Err(NodeError::EmptyAudio);
        };
        if first.is_empty() {
            return Err(NodeError::EmptyAudio);
        }
        if channels.iter().any(|c| c.len() != first.len()) {
            return Err(NodeError::ChannelMismatch);
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a single-channel frame.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Read a WAV file into a frame, converting integer formats to f32.
    pub fn read_wav(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let n_channels = spec.channels as usize;
        if n_channels == 0 {
            return Err(NodeError::EmptyAudio);
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<std::result::Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let mut channels = vec![Vec::with_capacity(interleaved.len() / n_channels); n_channels];
        for (i, sample) in interleaved.into_iter().enumerate() {
            channels[i % n_channels].push(sample);
        }
        // Drop a trailing partial frame if the file is truncated mid-frame.
        let min_len = channels.iter().map(Vec::len).min().unwrap_or(0);
        for ch in &mut channels {
            ch.truncate(min_len);
        }

        Self::new(channels, spec.sample_rate)
    }

    /// Write the frame to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channels.len() as u16,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for i in 0..self.len() {
            for ch in &self.channels {
                writer.write_sample(ch[i])?;
            }
        }
        writer.finalize()?;
        Ok(())
    }
}
