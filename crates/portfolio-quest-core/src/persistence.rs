//! Save/Load of the whole game state.
//!
//! The state is stored as one JSON record under a fixed key. Field names
//! are camelCase, the same layout the browser build wrote, so an exported
//! local-storage value can be dropped into a [`FileStorage`] directory.
//!
//! [`FileStorage`]: crate::storage::FileStorage

use portfolio_quest_logic::GameState;
use thiserror::Error;

use crate::storage::StorageBackend;

/// Key the state is stored under.
pub const STORAGE_KEY: &str = "portfolio-game-state";

/// Errors that can occur during save/clear
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a state to its stored form.
pub fn encode_state(state: &GameState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a stored state.
pub fn decode_state(raw: &str) -> Result<GameState, PersistError> {
    Ok(serde_json::from_str(raw)?)
}

/// Durable save/restore of the game state through a storage backend.
#[derive(Debug)]
pub struct PersistenceAdapter<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> PersistenceAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Overwrite the stored state with `state`.
    pub fn save(&mut self, state: &GameState) -> Result<(), PersistError> {
        let encoded = encode_state(state)?;
        self.backend.set(&self.key, &encoded)?;
        Ok(())
    }

    /// Stored state, or `None` when nothing usable is stored.
    ///
    /// Unreadable storage and malformed saves are logged and treated as
    /// absent so a bad save never blocks a new game.
    pub fn load(&self) -> Option<GameState> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read saved game '{}': {}", self.key, e);
                return None;
            }
        };
        match decode_state(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Ignoring malformed saved game '{}': {}", self.key, e);
                None
            }
        }
    }

    /// Delete the stored state.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.backend.remove(&self.key)?;
        Ok(())
    }
}
