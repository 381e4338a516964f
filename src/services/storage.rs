use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ChatMessage, Sender};

/// Errors that can occur with transcript persistence
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Chat transcript and display language persisted between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredState {
    pub messages: Vec<ChatMessage>,
    pub language: String,
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                id: "1".to_string(),
                text: "Sure, I can assist you with that. Please provide more details about your \
                       property dispute, such as the location and the nature of the issue."
                    .to_string(),
                sender: Sender::Bot,
            }],
            language: "en".to_string(),
        }
    }
}

/// Key-value persistence for the chat transcript and selected language
///
/// A single JSON file loaded at startup and saved on every change. Failures
/// are logged and otherwise ignored; the system continues with in-memory
/// defaults.
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted state, falling back to defaults on any failure
    pub fn load(&self) -> StoredState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => StoredState::default(),
            Err(e) => {
                tracing::warn!(
                    "Failed to load transcript from {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                StoredState::default()
            }
        }
    }

    /// Persist the state; failures are logged and swallowed
    pub fn save(&self, state: &StoredState) {
        if let Err(e) = self.try_save(state) {
            tracing::warn!(
                "Failed to save transcript to {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn try_load(&self) -> Result<Option<StoredState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn try_save(&self, state: &StoredState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
