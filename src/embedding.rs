use serde::{Deserialize, Serialize};

/// Opaque voice embedding produced by the engine during enrollment.
///
/// The crate never interprets the numbers; it only stores and forwards them.
/// The payload is a flat buffer of `frames * dim` floats, where `dim` is the
/// engine's embedding width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerEmbedding {
    dim: usize,
    data: Vec<f32>,
}

impl SpeakerEmbedding {
    pub fn new(dim: usize, data: Vec<f32>) -> Self {
        Self { dim, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of `dim`-wide frames in the payload.
    pub fn frames(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }
}
