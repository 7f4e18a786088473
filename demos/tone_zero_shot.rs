//! End-to-end walk through the node API with a toy engine.
//!
//! The real synthesis engine is a multi-gigabyte neural model the host
//! supplies at startup; here a tiny tone generator stands in for it so the
//! lifecycle, registry and adapter plumbing can be exercised anywhere.

use std::path::PathBuf;
use std::time::Instant;

use voicenodes::embedding::SpeakerEmbedding;
use voicenodes::engine::{EngineConfig, SpeechEngine, SynthesisMode, Voice};
use voicenodes::handle::VoiceSelector;
use voicenodes::nodes::{
    CloneSpeakerNode, DeleteSpeakerNode, ListSpeakersNode, SynthesisNode,
    SynthesisRequestBuilder,
};
use voicenodes::AudioFrame;

const TONE_RATE: u32 = 24_000;

/// A stand-in engine: embeddings capture the prompt's RMS level, synthesis
/// produces a sine tone whose pitch follows that level and whose duration
/// follows the text length.
struct ToneEngine;

impl SpeechEngine for ToneEngine {
    fn output_sample_rate(&self) -> u32 {
        TONE_RATE
    }

    fn embed_speaker(
        &mut self,
        _transcript: &str,
        prompt_16k: &[f32],
    ) -> voicenodes::Result<SpeakerEmbedding> {
        let rms = (prompt_16k.iter().map(|s| s * s).sum::<f32>() / prompt_16k.len() as f32).sqrt();
        Ok(SpeakerEmbedding::new(1, vec![rms]))
    }

    fn synthesize(
        &mut self,
        _mode: &SynthesisMode,
        text: &str,
        voice: &Voice,
        speed: f32,
    ) -> voicenodes::Result<Vec<Vec<f32>>> {
        let level = match voice {
            Voice::Saved(embedding) => embedding.data().first().copied().unwrap_or(0.1),
            Voice::Reference { prompt_16k, .. } => {
                prompt_16k.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
            }
        };
        let pitch = 220.0 + 880.0 * level.clamp(0.0, 1.0);
        let n = ((text.len() as f32 * 0.06 / speed) * TONE_RATE as f32) as usize;
        let tone = (0..n.max(TONE_RATE as usize / 4))
            .map(|i| {
                let t = i as f32 / TONE_RATE as f32;
                0.3 * (2.0 * std::f32::consts::PI * pitch * t).sin()
            })
            .collect();
        Ok(vec![tone])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let model_dir = std::env::temp_dir().join("voicenodes-demo");
    std::fs::create_dir_all(&model_dir)?;

    voicenodes::shared::install(
        EngineConfig::new(&model_dir),
        Box::new(|_config| Ok(Box::new(ToneEngine))),
    );
    let shared = voicenodes::shared::global()?;

    // A fake 3-second reference clip at 44.1 kHz.
    let reference = AudioFrame::mono(
        (0..3 * 44_100)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 330.0 * i as f32 / 44_100.0).sin())
            .collect(),
        44_100,
    )?;

    let clone_start = Instant::now();
    CloneSpeakerNode.run(shared, "alice", &reference, "a test reference clip")?;
    println!("Enrolled 'alice' in {:.2?}", clone_start.elapsed());
    println!("Speakers: {:?}", ListSpeakersNode.run(shared)?);

    let request = SynthesisRequestBuilder::default()
        .text("Hello from the node graph!".to_string())
        .voice(VoiceSelector::Saved("alice".to_string()))
        .speed(1.0)
        .build()?;

    let synth_start = Instant::now();
    let speech = SynthesisNode.run(shared, &request)?;
    println!(
        "Synthesized {:.2}s of audio in {:.2?}",
        speech.duration_secs(),
        synth_start.elapsed()
    );

    let out = PathBuf::from("demo_output.wav");
    speech.write_wav(&out)?;
    println!("Saved to {}", out.display());

    println!("{}", DeleteSpeakerNode.run(shared, "alice")?);
    shared.release();
    Ok(())
}
