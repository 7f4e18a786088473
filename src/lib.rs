//! # voicenodes
//!
//! Node-graph adapters for a speaker-conditioned text-to-speech engine.
//!
//! The heavy lifting (the neural synthesis model and its runtime) is an
//! external collaborator behind the [`SpeechEngine`](engine::SpeechEngine)
//! trait. This crate owns the glue around it:
//!
//! - a **shared engine lifecycle**: one lazily-constructed instance per
//!   process, handed to every node, with explicit teardown to release
//!   accelerator memory ([`shared`]),
//! - a **speaker registry**: a persisted name → embedding map with an
//!   explicit two-step mutate-then-persist contract ([`registry`]),
//! - **sample-rate normalization** of caller audio to the engine's 16 kHz
//!   prompt format ([`audio::resample`]),
//! - the **node adapters** the graph host executes ([`nodes`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use voicenodes::engine::EngineConfig;
//! use voicenodes::nodes::{CloneSpeakerNode, SynthesisNode, SynthesisRequestBuilder};
//! use voicenodes::handle::VoiceSelector;
//!
//! // Host startup: install the engine factory once.
//! voicenodes::shared::install(
//!     EngineConfig::new("pretrained_models/tts-0.5B"),
//!     Box::new(|config| build_my_engine(config)),
//! );
//!
//! let shared = voicenodes::shared::global()?;
//! CloneSpeakerNode.run(shared, "alice", &reference_clip, "hello there")?;
//!
//! let request = SynthesisRequestBuilder::default()
//!     .text("Nice to meet you.".to_string())
//!     .voice(VoiceSelector::Saved("alice".to_string()))
//!     .build()?;
//! let speech = SynthesisNode.run(shared, &request)?;
//! speech.write_wav(&std::path::PathBuf::from("out.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod handle;
pub mod nodes;
pub mod registry;
pub mod shared;

pub use audio::AudioFrame;
pub use embedding::SpeakerEmbedding;
pub use error::{NodeError, Result};
