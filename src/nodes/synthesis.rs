//! The synthesis adapter.
//!
//! The engine exposes several inference entry points that share all of their
//! setup; one node parameterized by [`SynthesisMode`] covers them, instead
//! of a near-identical adapter per mode.

use derive_builder::Builder;

use crate::audio::AudioFrame;
use crate::engine::SynthesisMode;
use crate::error::{NodeError, Result};
use crate::handle::VoiceSelector;
use crate::nodes::{NodeDescriptor, SocketKind, SocketSpec, NODE_CATEGORY};
use crate::shared::SharedEngine;

/// Everything one synthesis execution needs.
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned")]
pub struct SynthesisRequest {
    /// Text to speak.
    pub text: String,
    /// Voice conditioning: a reference clip or a saved speaker name.
    pub voice: VoiceSelector,
    /// Which engine entry point to dispatch to.
    #[builder(default = "SynthesisMode::ZeroShot")]
    pub mode: SynthesisMode,
    /// Playback-speed multiplier, 1.0 = natural.
    #[builder(default = "1.0")]
    pub speed: f32,
}

/// Text-to-speech node: one adapter for every synthesis mode.
pub struct SynthesisNode;

impl SynthesisNode {
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "VoiceSynthesis",
            display_name: "Voice Synthesis",
            category: NODE_CATEGORY,
            inputs: vec![
                SocketSpec::required("text", SocketKind::Text),
                SocketSpec::required("speed", SocketKind::Number),
                SocketSpec::optional("reference_audio", SocketKind::Audio),
                SocketSpec::optional("reference_transcript", SocketKind::Text),
                SocketSpec::optional("speaker_name", SocketKind::SpeakerName),
                SocketSpec::optional("instruction", SocketKind::Text),
            ],
            outputs: vec![SocketSpec::required("tts_speech", SocketKind::Audio)],
        }
    }

    /// Run one synthesis pass through the shared engine.
    ///
    /// Keeps the shared instance alive afterwards so back-to-back syntheses
    /// do not reload the model.
    pub fn run(&self, shared: &SharedEngine, request: &SynthesisRequest) -> Result<AudioFrame> {
        if request.text.trim().is_empty() {
            return Err(NodeError::InvalidInput(
                "synthesis text is empty".to_string(),
            ));
        }
        log::debug!(
            "Synthesis: mode {:?}, {} chars, speed {}",
            request.mode,
            request.text.len(),
            request.speed
        );

        let handle = shared.acquire()?;
        let mut handle = handle.lock().expect("engine handle poisoned");
        handle.speak(&request.mode, &request.text, &request.voice, request.speed)
    }
}
