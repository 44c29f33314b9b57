//! Canonical game state and the entities it owns.
//!
//! [`GameState`] is the single snapshot the progress store holds. It is
//! serialized with camelCase field names so saved games keep the same
//! layout the browser build wrote under `portfolio-game-state`.
//!
//! # Invariants
//!
//! * `level == experience / experience_per_level + 1` after every transition
//! * `experience` and `total_points` never decrease
//! * achievements and lore fragments only move toward unlocked/discovered
//! * `visited_areas`, `puzzles_solved`, `secrets_found` never hold duplicates

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::content;

/// Absolute instant in milliseconds since the Unix epoch.
///
/// Zero means "never set"; a game that has not started has no session
/// start time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const UNSET: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub const fn is_set(self) -> bool {
        self.0 > 0
    }

    /// Time elapsed from `earlier` to `self`; zero if `earlier` is later.
    pub fn elapsed_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

/// A one-way unlockable milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Points (and experience) awarded once, on unlock.
    pub points: u64,
    pub unlocked: bool,
    pub icon: String,
}

/// A one-way discoverable piece of narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreFragment {
    pub id: String,
    pub title: String,
    pub content: String,
    pub discovered: bool,
    /// Section the fragment is hidden in (see [`content::lore_locations`]).
    pub location: String,
}

/// Complete player progress for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player_name: String,
    pub level: u32,
    pub experience: u64,
    pub total_points: u64,
    pub achievements: Vec<Achievement>,
    pub lore_fragments: Vec<LoreFragment>,
    pub visited_areas: Vec<String>,
    pub puzzles_solved: Vec<String>,
    pub game_started: bool,
    pub click_count: u32,
    /// Instant the current session started.
    pub time_spent: Timestamp,
    pub secrets_found: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    /// The fixed snapshot every new game (and every reset) starts from.
    pub fn initial() -> Self {
        Self {
            player_name: content::DEFAULT_PLAYER_NAME.to_string(),
            level: 1,
            experience: 0,
            total_points: 0,
            achievements: content::initial_achievements(),
            lore_fragments: content::initial_lore_fragments(),
            visited_areas: Vec::new(),
            puzzles_solved: Vec::new(),
            game_started: false,
            click_count: 0,
            time_spent: Timestamp::UNSET,
            secrets_found: Vec::new(),
        }
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn lore_fragment(&self, id: &str) -> Option<&LoreFragment> {
        self.lore_fragments.iter().find(|l| l.id == id)
    }

    /// Whether the achievement exists and is unlocked.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.achievement(id).is_some_and(|a| a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    pub fn discovered_lore_count(&self) -> usize {
        self.lore_fragments.iter().filter(|l| l.discovered).count()
    }

    pub fn has_visited(&self, area: &str) -> bool {
        self.visited_areas.iter().any(|a| a == area)
    }

    pub fn has_solved(&self, puzzle_id: &str) -> bool {
        self.puzzles_solved.iter().any(|p| p == puzzle_id)
    }

    pub fn has_found_secret(&self, secret_id: &str) -> bool {
        self.secrets_found.iter().any(|s| s == secret_id)
    }

    /// First undiscovered fragment hidden at `location`, in catalog order.
    ///
    /// Sections use this to decide which fragment a local interaction
    /// reveals.
    pub fn next_undiscovered_lore_at(&self, location: &str) -> Option<&LoreFragment> {
        self.lore_fragments
            .iter()
            .find(|l| !l.discovered && l.location == location)
    }

    /// Add points to both totals and recompute the level.
    pub(crate) fn award(&mut self, points: u64, experience_per_level: u64) {
        self.total_points = self.total_points.saturating_add(points);
        self.add_experience(points, experience_per_level);
    }

    /// Add experience only; `total_points` is untouched.
    pub(crate) fn add_experience(&mut self, amount: u64, experience_per_level: u64) {
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_experience(self.experience, experience_per_level);
    }

    /// Mark an achievement unlocked. Returns its points if it was locked,
    /// `None` if unknown or already unlocked.
    pub(crate) fn unlock(&mut self, id: &str) -> Option<u64> {
        let achievement = self
            .achievements
            .iter_mut()
            .find(|a| a.id == id && !a.unlocked)?;
        achievement.unlocked = true;
        Some(achievement.points)
    }

    /// Mark a lore fragment discovered. Returns `false` if unknown or
    /// already discovered.
    pub(crate) fn discover(&mut self, id: &str) -> bool {
        match self
            .lore_fragments
            .iter_mut()
            .find(|l| l.id == id && !l.discovered)
        {
            Some(fragment) => {
                fragment.discovered = true;
                true
            }
            None => false,
        }
    }
}

/// Level for an experience total: `experience / experience_per_level + 1`.
///
/// A zero `experience_per_level` is treated as 1 so the formula stays total.
pub fn level_for_experience(experience: u64, experience_per_level: u64) -> u32 {
    let completed = experience / experience_per_level.max(1);
    u32::try_from(completed)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}
