//! Persisted speaker registry.
//!
//! The registry is a name → embedding map backed by a single serialized file
//! at a fixed path under the engine's model directory. The file is the
//! durable source of truth: it is reloaded whenever the engine is
//! (re)constructed, and every mutation becomes durable only through an
//! explicit [`SpeakerRegistry::persist`] call that rewrites the whole map.
//!
//! Persist writes to a temporary file in the same directory and renames it
//! over the target, so a crash mid-write leaves the previous file intact.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::embedding::SpeakerEmbedding;
use crate::error::{NodeError, Result};

/// File name of the serialized registry inside the model directory.
pub const SPEAKER_INFO_FILE: &str = "spk2info.pt";

/// In-memory speaker map plus its on-disk location.
#[derive(Debug)]
pub struct SpeakerRegistry {
    path: PathBuf,
    speakers: HashMap<String, SpeakerEmbedding>,
}

impl SpeakerRegistry {
    /// Load the registry from `<model_dir>/spk2info.pt`.
    ///
    /// A missing file is an empty registry, not an error. A file that exists
    /// but does not decode is fatal for every registry operation.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let path = model_dir.join(SPEAKER_INFO_FILE);
        let speakers = Self::read_map(&path)?;
        log::info!(
            "Loaded {} speaker(s) from {}",
            speakers.len(),
            path.display()
        );
        Ok(Self { path, speakers })
    }

    fn read_map(path: &Path) -> Result<HashMap<String, SpeakerEmbedding>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let bytes = fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| NodeError::CorruptRegistry {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Store an embedding under `name`, overwriting any existing entry.
    pub fn insert(&mut self, name: &str, embedding: SpeakerEmbedding) {
        if self.speakers.insert(name.to_string(), embedding).is_some() {
            log::warn!("Overwriting existing speaker '{name}'");
        }
    }

    /// Remove `name` from the in-memory map.
    ///
    /// The removal is durable only after the next [`persist`](Self::persist).
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.speakers.remove(name).is_none() {
            return Err(NodeError::SpeakerNotFound(name.to_string()));
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&SpeakerEmbedding> {
        self.speakers
            .get(name)
            .ok_or_else(|| NodeError::SpeakerNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.speakers.contains_key(name)
    }

    /// All known speaker names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.speakers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Write the full map to disk, replacing the previous file atomically.
    pub fn persist(&self) -> Result<()> {
        let bytes = bincode::serialize(&self.speakers).map_err(|e| NodeError::CorruptRegistry {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;

        let tmp = self.path.with_extension("pt.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!(
            "Persisted {} speaker(s) to {}",
            self.speakers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Replace the in-memory map with whatever the file currently holds.
    pub fn reload(&mut self) -> Result<()> {
        self.speakers = Self::read_map(&self.path)?;
        log::info!(
            "Reloaded registry: {} speaker(s) in {}",
            self.speakers.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SpeakerRegistry, SPEAKER_INFO_FILE};
    use crate::embedding::SpeakerEmbedding;
    use crate::error::NodeError;

    fn embedding() -> SpeakerEmbedding {
        SpeakerEmbedding::new(4, vec![0.5; 8])
    }

    #[test]
    fn missing_file_is_an_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SpeakerRegistry::load(dir.path()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }

    #[test]
    fn insert_persist_reload_keeps_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());
        registry.persist().unwrap();

        let fresh = SpeakerRegistry::load(dir.path()).unwrap();
        assert_eq!(fresh.names(), vec!["alice"]);
        assert_eq!(fresh.lookup("alice").unwrap(), &embedding());
    }

    #[test]
    fn insert_without_persist_is_not_durable() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());

        let fresh = SpeakerRegistry::load(dir.path()).unwrap();
        assert!(fresh.is_empty());
    }

    #[test]
    fn delete_persist_reload_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());
        registry.persist().unwrap();

        registry.delete("alice").unwrap();
        registry.persist().unwrap();

        let fresh = SpeakerRegistry::load(dir.path()).unwrap();
        assert!(fresh.names().is_empty());
    }

    #[test]
    fn delete_of_unknown_name_fails_and_keeps_map() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());

        let err = registry.delete("nobody").unwrap_err();
        assert!(matches!(err, NodeError::SpeakerNotFound(name) if name == "nobody"));
        assert_eq!(registry.names(), vec!["alice"]);
    }

    #[test]
    fn overwrite_replaces_previous_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());
        registry.insert("alice", SpeakerEmbedding::new(4, vec![1.0; 4]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("alice").unwrap().frames(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("zoe", embedding());
        registry.insert("alice", embedding());
        registry.insert("bob", embedding());
        assert_eq!(registry.names(), vec!["alice", "bob", "zoe"]);
    }

    #[test]
    fn corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SPEAKER_INFO_FILE), b"not a registry").unwrap();
        let err = SpeakerRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(err, NodeError::CorruptRegistry { .. }));
    }

    #[test]
    fn persist_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = SpeakerRegistry::load(dir.path()).unwrap();
        registry.insert("alice", embedding());
        registry.persist().unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SpeakerRegistry::load(dir.path()).unwrap();
        let mut reader = SpeakerRegistry::load(dir.path()).unwrap();

        writer.insert("alice", embedding());
        writer.persist().unwrap();
        assert!(reader.is_empty());

        reader.reload().unwrap();
        assert_eq!(reader.names(), vec!["alice"]);
    }
}
