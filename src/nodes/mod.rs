//! Host-facing node adapters.
//!
//! Each node is a thin shim between the graph editor and the shared engine:
//! it declares typed input/output sockets, forwards caller data to the
//! engine, and repackages the result as a host audio record. The host's own
//! registration metadata format is out of scope; nodes only report the
//! socket schema they are asked for.
//!
//! # Available Nodes
//!
//! | Node | Purpose |
//! |---|---|
//! | [`SynthesisNode`] | Text-to-speech in any synthesis mode |
//! | [`CloneSpeakerNode`] | Enroll a named speaker from a reference clip |
//! | [`DeleteSpeakerNode`] | Remove a speaker from the registry |
//! | [`RefreshSpeakersNode`] | Re-read the registry file |
//! | [`ListSpeakersNode`] | Names for combo-socket population |

pub mod speakers;
pub mod synthesis;

use serde::Serialize;

pub use speakers::{CloneSpeakerNode, DeleteSpeakerNode, ListSpeakersNode, RefreshSpeakersNode};
pub use synthesis::{SynthesisNode, SynthesisRequest, SynthesisRequestBuilder};

/// Category under which every node appears in the host's menu.
pub const NODE_CATEGORY: &str = "Voice Nodes";

/// Data type carried by a socket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketKind {
    Audio,
    Text,
    Number,
    SpeakerName,
}

/// One typed input or output slot of a node.
#[derive(Debug, Clone, Serialize)]
pub struct SocketSpec {
    pub name: &'static str,
    pub kind: SocketKind,
    pub required: bool,
}

impl SocketSpec {
    pub const fn required(name: &'static str, kind: SocketKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: SocketKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// What a node tells the host about itself.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: Vec<SocketSpec>,
    pub outputs: Vec<SocketSpec>,
}

/// Descriptors for every node this crate ships.
pub fn descriptors() -> Vec<NodeDescriptor> {
    vec![
        SynthesisNode::descriptor(),
        CloneSpeakerNode::descriptor(),
        DeleteSpeakerNode::descriptor(),
        RefreshSpeakersNode::descriptor(),
        ListSpeakersNode::descriptor(),
    ]
}
