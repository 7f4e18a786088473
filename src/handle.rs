//! The engine handle: one constructed engine plus the speaker registry it
//! owns for its lifetime.
//!
//! Registry mutations follow an explicit two-step contract inherited from the
//! engine's own lazy-write policy: `enroll`/`delete` change only the
//! in-memory map, and the caller makes the change durable with `persist`.
//! The clone node is the one call site that persists immediately.

use crate::audio::resample::{prepare_prompt, PROMPT_RATE};
use crate::audio::AudioFrame;
use crate::engine::{EngineConfig, SpeechEngine, SynthesisMode, Voice};
use crate::error::{NodeError, Result};
use crate::registry::SpeakerRegistry;

/// Which voice a synthesis request should use.
#[derive(Debug, Clone)]
pub enum VoiceSelector {
    /// A caller-supplied reference clip (any rate, any channel count) plus
    /// an optional transcript of it.
    Reference {
        audio: AudioFrame,
        transcript: String,
    },
    /// The name of a previously enrolled speaker.
    Saved(String),
}

/// A live synthesis engine together with its speaker registry.
pub struct EngineHandle {
    engine: Box<dyn SpeechEngine>,
    registry: SpeakerRegistry,
}

impl EngineHandle {
    /// Wrap a constructed engine, loading the registry from the model
    /// directory named in `config`.
    pub fn new(engine: Box<dyn SpeechEngine>, config: &EngineConfig) -> Result<Self> {
        let registry = SpeakerRegistry::load(&config.model_dir)?;
        Ok(Self { engine, registry })
    }

    /// Sample rate of all synthesized output.
    pub fn output_sample_rate(&self) -> u32 {
        self.engine.output_sample_rate()
    }

    /// Derive an embedding from `reference` and store it under `name`,
    /// overwriting any existing entry. Not durable until [`persist`](Self::persist).
    pub fn enroll(&mut self, name: &str, reference: &AudioFrame, transcript: &str) -> Result<()> {
        let prompt = prepare_prompt(reference, PROMPT_RATE)?;
        if prompt.is_empty() {
            return Err(NodeError::EmptyAudio);
        }
        let embedding = self.engine.embed_speaker(transcript, &prompt)?;
        self.registry.insert(name, embedding);
        log::info!("Enrolled speaker '{name}'");
        Ok(())
    }

    /// Write the registry to disk. See [`SpeakerRegistry::persist`].
    pub fn persist(&self) -> Result<()> {
        self.registry.persist()
    }

    /// Remove a speaker from the in-memory registry.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.registry.delete(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&crate::embedding::SpeakerEmbedding> {
        self.registry.lookup(name)
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Re-read the registry file, discarding unpersisted in-memory changes.
    pub fn reload_registry(&mut self) -> Result<()> {
        self.registry.reload()
    }

    pub fn registry(&self) -> &SpeakerRegistry {
        &self.registry
    }

    /// Synthesize `text` in the selected voice and mode.
    ///
    /// Reference audio is downmixed and resampled to the engine's prompt
    /// rate here; chunked engine output is concatenated into one mono frame
    /// at the engine's output rate.
    pub fn speak(
        &mut self,
        mode: &SynthesisMode,
        text: &str,
        voice: &VoiceSelector,
        speed: f32,
    ) -> Result<AudioFrame> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(NodeError::InvalidInput(format!(
                "speed multiplier must be positive, got {speed}"
            )));
        }

        let voice = match voice {
            VoiceSelector::Reference { audio, transcript } => Voice::Reference {
                prompt_16k: prepare_prompt(audio, PROMPT_RATE)?,
                transcript: transcript.clone(),
            },
            VoiceSelector::Saved(name) => Voice::Saved(self.registry.lookup(name)?.clone()),
        };

        let chunks = self.engine.synthesize(mode, text, &voice, speed)?;
        let total: usize = chunks.iter().map(Vec::len).sum();
        if total == 0 {
            return Err(NodeError::EmptyAudio);
        }

        let mut samples = Vec::with_capacity(total);
        for chunk in chunks {
            samples.extend_from_slice(&chunk);
        }
        AudioFrame::mono(samples, self.engine.output_sample_rate())
    }
}
