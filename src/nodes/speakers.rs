//! Registry-maintenance nodes: clone, delete, refresh, list.
//!
//! Clone is the one operation that persists immediately; everything else
//! that mutates goes through the same explicit persist step. Delete and
//! list read the registry file directly so they work without paying for
//! engine construction.

use crate::audio::AudioFrame;
use crate::error::{NodeError, Result};
use crate::nodes::{NodeDescriptor, SocketKind, SocketSpec, NODE_CATEGORY};
use crate::registry::SpeakerRegistry;
use crate::shared::SharedEngine;

/// Placeholder shown in speaker combo sockets when the registry is empty.
pub const NO_SPEAKERS_PLACEHOLDER: &str = "no_speakers_available";

/// Enroll a named speaker from a reference clip and persist the registry.
pub struct CloneSpeakerNode;

impl CloneSpeakerNode {
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "VoiceCloneSpeaker",
            display_name: "Clone Speaker",
            category: NODE_CATEGORY,
            inputs: vec![
                SocketSpec::required("audio", SocketKind::Audio),
                SocketSpec::required("prompt_text", SocketKind::Text),
                SocketSpec::required("speaker_name", SocketKind::Text),
            ],
            outputs: vec![SocketSpec::required("speaker_name", SocketKind::Text)],
        }
    }

    /// Derive an embedding from `reference`, store it under `name`, and
    /// write the registry to disk.
    ///
    /// Releases the shared engine afterwards: enrollment is rare and the
    /// host usually wants the accelerator memory back.
    pub fn run(
        &self,
        shared: &SharedEngine,
        name: &str,
        reference: &AudioFrame,
        transcript: &str,
    ) -> Result<String> {
        if name.trim().is_empty() {
            return Err(NodeError::InvalidInput("speaker name is empty".to_string()));
        }

        let result: Result<String> = (|| {
            let handle = shared.acquire()?;
            let mut handle = handle.lock().expect("engine handle poisoned");
            handle.enroll(name, reference, transcript)?;
            handle.persist()?;
            Ok(name.to_string())
        })();
        shared.release();
        result
    }
}

/// Remove a speaker from the registry file.
pub struct DeleteSpeakerNode;

impl DeleteSpeakerNode {
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "VoiceDeleteSpeaker",
            display_name: "Delete Speaker",
            category: NODE_CATEGORY,
            inputs: vec![SocketSpec::required("speaker_name", SocketKind::SpeakerName)],
            outputs: vec![SocketSpec::required("deleted_speaker", SocketKind::Text)],
        }
    }

    /// Delete `name` from the registry and persist, verifying by reload
    /// that the name is gone. Works directly on the file; the engine is
    /// never constructed for a delete.
    pub fn run(&self, shared: &SharedEngine, name: &str) -> Result<String> {
        let mut registry = SpeakerRegistry::load(&shared.config().model_dir)?;
        registry.delete(name)?;
        registry.persist()?;

        registry.reload()?;
        if registry.contains(name) {
            return Err(NodeError::Engine(format!(
                "speaker '{name}' still present after delete"
            )));
        }

        log::info!("Deleted speaker '{name}'");
        // A live engine still holds the old map; drop it so the next
        // acquire reloads the registry from disk.
        shared.release();
        Ok(format!("deleted {name}"))
    }
}

/// Force the live engine to re-read the registry file.
pub struct RefreshSpeakersNode;

impl RefreshSpeakersNode {
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "VoiceRefreshSpeakers",
            display_name: "Refresh Speakers",
            category: NODE_CATEGORY,
            inputs: vec![],
            outputs: vec![SocketSpec::required("refresh_status", SocketKind::Text)],
        }
    }

    /// Reload the registry into the live engine and report the count.
    pub fn run(&self, shared: &SharedEngine) -> Result<String> {
        let handle = shared.acquire()?;
        let mut handle = handle.lock().expect("engine handle poisoned");
        handle.reload_registry()?;
        let count = handle.list_names().len();
        Ok(format!("registry refreshed, {count} speaker(s) available"))
    }
}

/// Speaker names for combo-socket population.
pub struct ListSpeakersNode;

impl ListSpeakersNode {
    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: "VoiceListSpeakers",
            display_name: "List Speakers",
            category: NODE_CATEGORY,
            inputs: vec![],
            outputs: vec![SocketSpec::required("speaker_names", SocketKind::SpeakerName)],
        }
    }

    /// Names currently in the registry file, sorted; a single placeholder
    /// entry when the registry is empty so combo sockets are never blank.
    pub fn run(&self, shared: &SharedEngine) -> Result<Vec<String>> {
        let registry = SpeakerRegistry::load(&shared.config().model_dir)?;
        let names: Vec<String> = registry.names().iter().map(|s| s.to_string()).collect();
        if names.is_empty() {
            return Ok(vec![NO_SPEAKERS_PLACEHOLDER.to_string()]);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CloneSpeakerNode, DeleteSpeakerNode, ListSpeakersNode, RefreshSpeakersNode,
        NO_SPEAKERS_PLACEHOLDER,
    };
    use crate::audio::AudioFrame;
    use crate::engine::testing::StubEngine;
    use crate::engine::EngineConfig;
    use crate::error::NodeError;
    use crate::shared::SharedEngine;

    fn shared(dir: &std::path::Path) -> SharedEngine {
        SharedEngine::new(
            EngineConfig::new(dir),
            Box::new(|_| Ok(Box::new(StubEngine::new()))),
        )
    }

    fn clip() -> AudioFrame {
        AudioFrame::mono(vec![0.5; 3 * 44_100], 44_100).unwrap()
    }

    #[test]
    fn clone_enrolls_persists_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());

        let name = CloneSpeakerNode
            .run(&engine, "alice", &clip(), "hello")
            .unwrap();
        assert_eq!(name, "alice");
        assert!(!engine.is_live());

        // Durable: a fresh list sees the speaker.
        let names = ListSpeakersNode.run(&engine).unwrap();
        assert_eq!(names, vec!["alice"]);
    }

    #[test]
    fn clone_rejects_blank_names() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());
        let err = CloneSpeakerNode
            .run(&engine, "  ", &clip(), "hi")
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidInput(_)));
        assert!(!engine.is_live());
    }

    #[test]
    fn delete_removes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());
        CloneSpeakerNode
            .run(&engine, "alice", &clip(), "hello")
            .unwrap();

        let status = DeleteSpeakerNode.run(&engine, "alice").unwrap();
        assert!(status.contains("alice"));
        assert_eq!(
            ListSpeakersNode.run(&engine).unwrap(),
            vec![NO_SPEAKERS_PLACEHOLDER]
        );
    }

    #[test]
    fn delete_of_unknown_speaker_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());
        let err = DeleteSpeakerNode.run(&engine, "nobody").unwrap_err();
        assert!(matches!(err, NodeError::SpeakerNotFound(_)));
    }

    #[test]
    fn list_is_placeholder_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());
        assert_eq!(
            ListSpeakersNode.run(&engine).unwrap(),
            vec![NO_SPEAKERS_PLACEHOLDER]
        );
    }

    #[test]
    fn refresh_picks_up_external_registry_changes() {
        let dir = tempfile::tempdir().unwrap();
        let engine = shared(dir.path());

        // Live engine with an empty registry.
        {
            let handle = engine.acquire().unwrap();
            assert!(handle.lock().unwrap().list_names().is_empty());
        }

        // Another registry instance writes a speaker behind its back.
        {
            let mut registry =
                crate::registry::SpeakerRegistry::load(&engine.config().model_dir).unwrap();
            registry.insert("bob", crate::embedding::SpeakerEmbedding::new(2, vec![0.0; 2]));
            registry.persist().unwrap();
        }

        let status = RefreshSpeakersNode.run(&engine).unwrap();
        assert!(status.contains("1 speaker(s)"));
        let handle = engine.acquire().unwrap();
        assert_eq!(handle.lock().unwrap().list_names(), vec!["bob"]);
    }
}
