//! Intents: the requests UI collaborators raise against the store.
//!
//! Intents serialize as `{"type": "VISIT_AREA", "area": "stats"}` so a host
//! can record or replay a session as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::GameState;

/// A player name accepted by the start screen: trimmed, 1–20 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("player name is empty")]
    Empty,
    #[error("player name has {0} characters, at most {max} allowed", max = PlayerName::MAX_CHARS)]
    TooLong(usize),
}

impl PlayerName {
    pub const MAX_CHARS: usize = 20;

    /// Trim surrounding whitespace and check the length in characters.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();
        if chars == 0 {
            return Err(NameError::Empty);
        }
        if chars > Self::MAX_CHARS {
            return Err(NameError::TooLong(chars));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every state change the store accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    StartGame {
        #[serde(rename = "playerName")]
        player_name: PlayerName,
    },
    VisitArea {
        area: String,
    },
    UnlockAchievement {
        id: String,
    },
    DiscoverLore {
        id: String,
    },
    SolvePuzzle {
        id: String,
    },
    /// Experience without points; the only intent that decouples the two.
    AddExperience {
        amount: u64,
    },
    LoadState {
        state: Box<GameState>,
    },
    ResetGame,
    IncrementClick,
    FindSecret {
        #[serde(rename = "secretId")]
        secret_id: String,
    },
}

impl Intent {
    pub fn start_game(name: PlayerName) -> Self {
        Intent::StartGame { player_name: name }
    }

    pub fn visit_area(area: impl Into<String>) -> Self {
        Intent::VisitArea { area: area.into() }
    }

    pub fn unlock_achievement(id: impl Into<String>) -> Self {
        Intent::UnlockAchievement { id: id.into() }
    }

    pub fn discover_lore(id: impl Into<String>) -> Self {
        Intent::DiscoverLore { id: id.into() }
    }

    pub fn solve_puzzle(id: impl Into<String>) -> Self {
        Intent::SolvePuzzle { id: id.into() }
    }

    pub fn find_secret(secret_id: impl Into<String>) -> Self {
        Intent::FindSecret {
            secret_id: secret_id.into(),
        }
    }

    pub fn load_state(state: GameState) -> Self {
        Intent::LoadState {
            state: Box::new(state),
        }
    }

    /// Short name for logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Intent::StartGame { .. } => "StartGame",
            Intent::VisitArea { .. } => "VisitArea",
            Intent::UnlockAchievement { .. } => "UnlockAchievement",
            Intent::DiscoverLore { .. } => "DiscoverLore",
            Intent::SolvePuzzle { .. } => "SolvePuzzle",
            Intent::AddExperience { .. } => "AddExperience",
            Intent::LoadState { .. } => "LoadState",
            Intent::ResetGame => "ResetGame",
            Intent::IncrementClick => "IncrementClick",
            Intent::FindSecret { .. } => "FindSecret",
        }
    }
}
