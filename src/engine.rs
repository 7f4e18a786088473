//! The external synthesis engine seam.
//!
//! The neural model (transformer LM, flow-matching decoder, vocoder) lives in
//! a separate runtime this crate does not reimplement. Everything the nodes
//! need from it is captured by [`SpeechEngine`]; the concrete implementation
//! is supplied by the host at startup through
//! [`SharedEngine::install`](crate::shared::install).

use std::path::PathBuf;

use crate::embedding::SpeakerEmbedding;
use crate::error::Result;

/// Construction parameters for the synthesis engine.
///
/// The lifecycle manager builds the shared instance with all acceleration
/// flags off and full precision; hosts that want JIT/TensorRT/vLLM paths or
/// fp16 set the flags before installing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the model weights and the speaker registry file.
    pub model_dir: PathBuf,
    pub load_jit: bool,
    pub load_trt: bool,
    pub load_vllm: bool,
    pub fp16: bool,
}

impl EngineConfig {
    /// Default configuration: no accelerated-runtime paths, full precision.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            load_jit: false,
            load_trt: false,
            load_vllm: false,
            fp16: false,
        }
    }
}

/// Which synthesis entry point of the engine a request dispatches to.
///
/// The engine exposes several inference modes that differ only in how the
/// text and voice conditioning are combined; one enum covers them all so a
/// single adapter can serve every mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisMode {
    /// Speak in a voice described by a short reference clip (or a saved
    /// speaker), without retraining.
    ZeroShot,
    /// Speak text in a different language than the reference clip.
    CrossLingual,
    /// Zero-shot synthesis steered by a natural-language instruction
    /// ("speak slowly, in a sad tone").
    Instruct { instruction: String },
}

/// Voice conditioning for a synthesis call.
#[derive(Debug, Clone)]
pub enum Voice {
    /// A raw reference clip, already mono at the engine's prompt rate,
    /// with an optional transcript of the clip.
    Reference {
        prompt_16k: Vec<f32>,
        transcript: String,
    },
    /// A previously enrolled speaker embedding.
    Saved(SpeakerEmbedding),
}

/// The synthesis engine as seen by this crate.
///
/// All calls are synchronous and block the caller for their full duration;
/// there is no cancellation. Dropping the engine must release any
/// accelerator-resident memory it holds.
pub trait SpeechEngine: Send {
    /// Sample rate of every waveform the engine produces.
    fn output_sample_rate(&self) -> u32;

    /// Derive a voice embedding from a mono 16 kHz reference clip and an
    /// optional transcript of it.
    fn embed_speaker(&mut self, transcript: &str, prompt_16k: &[f32])
        -> Result<SpeakerEmbedding>;

    /// Synthesize `text` in the given voice, returning one or more chunks of
    /// samples at [`output_sample_rate`](Self::output_sample_rate). `speed`
    /// is a playback-speed multiplier, 1.0 = natural.
    fn synthesize(
        &mut self,
        mode: &SynthesisMode,
        text: &str,
        voice: &Voice,
        speed: f32,
    ) -> Result<Vec<Vec<f32>>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! A deterministic stand-in engine for lifecycle and adapter tests.

    use super::{SpeechEngine, SynthesisMode, Voice};
    use crate::embedding::SpeakerEmbedding;
    use crate::error::Result;

    pub const STUB_OUTPUT_RATE: u32 = 24_000;

    /// Emits one sample per input text byte, split into two chunks, and
    /// derives embeddings whose first value is the prompt's first sample.
    pub struct StubEngine {
        pub embed_calls: usize,
        pub synth_calls: usize,
    }

    impl StubEngine {
        pub fn new() -> Self {
            Self {
                embed_calls: 0,
                synth_calls: 0,
            }
        }
    }

    impl SpeechEngine for StubEngine {
        fn output_sample_rate(&self) -> u32 {
            STUB_OUTPUT_RATE
        }

        fn embed_speaker(
            &mut self,
            transcript: &str,
            prompt_16k: &[f32],
        ) -> Result<SpeakerEmbedding> {
            self.embed_calls += 1;
            let mut data = vec![prompt_16k.first().copied().unwrap_or(0.0)];
            data.push(transcript.len() as f32);
            Ok(SpeakerEmbedding::new(2, data))
        }

        fn synthesize(
            &mut self,
            _mode: &SynthesisMode,
            text: &str,
            _voice: &Voice,
            speed: f32,
        ) -> Result<Vec<Vec<f32>>> {
            self.synth_calls += 1;
            let total = ((text.len() as f32) / speed).max(1.0) as usize;
            let samples = vec![0.25f32; total];
            let mid = total / 2;
            Ok(vec![samples[..mid].to_vec(), samples[mid..].to_vec()])
        }
    }
}
