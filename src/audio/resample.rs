//! Sample-rate normalization for prompt audio.
//!
//! The engine's enrollment and prompt inputs expect mono 16 kHz audio while
//! callers hand us clips at whatever rate their source produced. Conversion
//! is deterministic linear interpolation; both upsampling and downsampling
//! occur in practice.

use crate::audio::AudioFrame;
use crate::error::{NodeError, Result};

/// Sample rate the engine requires for reference/prompt audio.
pub const PROMPT_RATE: u32 = 16_000;

/// Reduce a frame to mono by averaging its channels.
///
/// This is the single channel-reduction rule used everywhere in the crate;
/// a mono frame comes back as a plain copy of its only channel.
pub fn downmix(frame: &AudioFrame) -> Vec<f32> {
    let channels = frame.channels();
    if channels.len() == 1 {
        return channels[0].clone();
    }
    let n = channels.len() as f32;
    (0..frame.len())
        .map(|i| channels.iter().map(|ch| ch[i]).sum::<f32>() / n)
        .collect()
}

/// Resample `samples` from `source_rate` to `target_rate` by linear
/// interpolation.
///
/// Identity when the rates match. The output length is
/// `round(len * target_rate / source_rate)`. Zero rates are rejected.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == 0 {
        return Err(NodeError::UnsupportedRate(source_rate));
    }
    if target_rate == 0 {
        return Err(NodeError::UnsupportedRate(target_rate));
    }
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let out_len =
        ((samples.len() as f64) * (target_rate as f64) / (source_rate as f64)).round() as usize;
    if out_len == 0 {
        return Ok(Vec::new());
    }

    let step = samples.len() as f64 / out_len as f64;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * step;
        let idx = pos as usize;
        if idx + 1 >= samples.len() {
            out.push(samples[samples.len() - 1]);
        } else {
            let frac = (pos - idx as f64) as f32;
            out.push(samples[idx] * (1.0 - frac) + samples[idx + 1] * frac);
        }
    }
    Ok(out)
}

/// Downmix a frame to mono and resample it to `target_rate`.
///
/// Every node uses this to turn caller-supplied reference audio into the
/// engine's prompt format.
pub fn prepare_prompt(frame: &AudioFrame, target_rate: u32) -> Result<Vec<f32>> {
    let mono = downmix(frame);
    resample(&mono, frame.sample_rate(), target_rate)
}
