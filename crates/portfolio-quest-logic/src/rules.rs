//! Tunable rewards, thresholds, and time limits.
//!
//! [`ProgressionRules::default`] is the canonical game balance. Hosts may
//! load an override from configuration; missing fields fall back to the
//! defaults.
//!
//! ```
//! use portfolio_quest_logic::rules::ProgressionRules;
//!
//! let rules = ProgressionRules::default();
//! assert!(rules.validate().is_empty());
//! assert_eq!(rules.explorer_area_count, 5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content;

/// Reward and threshold configuration used by every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRules {
    /// Experience needed per level.
    pub experience_per_level: u64,
    /// Base reward for visiting a new area.
    pub visit_reward: u64,
    /// Base reward for discovering a lore fragment.
    pub lore_reward: u64,
    /// Base reward for solving a puzzle.
    pub puzzle_reward: u64,
    /// Base reward for finding a secret.
    pub secret_reward: u64,
    /// Distinct areas required for `explorer`.
    pub explorer_area_count: usize,
    /// `speed_runner` requires all areas strictly within this many seconds.
    pub speed_run_limit_secs: u64,
    /// Clicks required for `curious_one`.
    pub curious_click_count: u32,
    /// Fragments required for `lore_hunter`.
    pub lore_hunter_count: usize,
    /// Puzzles required for `puzzle_solver`.
    pub puzzle_solver_count: usize,
    /// Session length that unlocks `dedicated`.
    pub dedicated_after_secs: u64,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
            visit_reward: 5,
            lore_reward: 10,
            puzzle_reward: 15,
            secret_reward: 15,
            explorer_area_count: content::areas::ALL.len(),
            speed_run_limit_secs: 60,
            curious_click_count: 50,
            lore_hunter_count: 3,
            puzzle_solver_count: content::puzzles::ALL.len(),
            dedicated_after_secs: 300,
        }
    }
}

impl ProgressionRules {
    pub fn speed_run_limit(&self) -> Duration {
        Duration::from_secs(self.speed_run_limit_secs)
    }

    pub fn dedicated_after(&self) -> Duration {
        Duration::from_secs(self.dedicated_after_secs)
    }

    /// Check the rules for values that would make achievements unreachable
    /// or fire without any progress.
    pub fn validate(&self) -> Vec<RulesError> {
        let mut errors = Vec::new();

        if self.experience_per_level == 0 {
            errors.push(RulesError::ZeroExperiencePerLevel);
        }
        if self.explorer_area_count == 0 {
            errors.push(RulesError::ZeroThreshold("explorer_area_count"));
        }
        if self.curious_click_count == 0 {
            errors.push(RulesError::ZeroThreshold("curious_click_count"));
        }
        if self.lore_hunter_count == 0 {
            errors.push(RulesError::ZeroThreshold("lore_hunter_count"));
        }
        if self.puzzle_solver_count == 0 {
            errors.push(RulesError::ZeroThreshold("puzzle_solver_count"));
        }
        if self.explorer_area_count > content::areas::ALL.len() {
            errors.push(RulesError::ExceedsContent {
                field: "explorer_area_count",
                value: self.explorer_area_count,
                available: content::areas::ALL.len(),
            });
        }
        let lore_total = content::initial_lore_fragments().len();
        if self.lore_hunter_count > lore_total {
            errors.push(RulesError::ExceedsContent {
                field: "lore_hunter_count",
                value: self.lore_hunter_count,
                available: lore_total,
            });
        }

        errors
    }
}

/// Problems reported by [`ProgressionRules::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("experience_per_level must be positive")]
    ZeroExperiencePerLevel,
    #[error("{0} must be positive")]
    ZeroThreshold(&'static str),
    #[error("{field} is {value} but only {available} exist")]
    ExceedsContent {
        field: &'static str,
        value: usize,
        available: usize,
    },
}
