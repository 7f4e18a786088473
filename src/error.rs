use std::path::PathBuf;

/// Errors surfaced by node adapters, the speaker registry and the shared
/// engine lifecycle.
///
/// There is no retry policy anywhere in this crate: every error propagates
/// to the immediate caller of the failing operation.
#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    #[error("Speaker '{0}' not found. Enroll it first or check list_names().")]
    SpeakerNotFound(String),

    #[error("Engine construction failed: {0}")]
    ConstructionFailed(String),

    #[error("Speaker registry at {path} is corrupt: {detail}")]
    CorruptRegistry { path: PathBuf, detail: String },

    #[error("Unsupported sample rate: {0} Hz")]
    UnsupportedRate(u32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Audio channels have mismatched lengths")]
    ChannelMismatch,

    #[error("Audio input contains no samples")]
    EmptyAudio,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;
