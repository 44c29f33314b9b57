//! HUD and stats-screen projection.
//!
//! Pure read-only view of a [`GameState`] with the derived numbers the
//! top bar and stats chamber display.

use serde::{Deserialize, Serialize};

use crate::content;
use crate::rules::ProgressionRules;
use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSummary {
    pub player_name: String,
    pub level: u32,
    pub experience: u64,
    /// Experience still needed to reach the next level.
    pub experience_to_next_level: u64,
    /// Progress through the current level, 0–99.
    pub level_progress_percent: u8,
    pub total_points: u64,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub lore_discovered: usize,
    pub lore_total: usize,
    pub areas_visited: usize,
    pub areas_total: usize,
    pub puzzles_solved: usize,
    pub puzzles_total: usize,
    /// Share of achievements unlocked, 0–100.
    pub completion_percent: u8,
}

/// Summarize `state` for display.
pub fn summarize(state: &GameState, rules: &ProgressionRules) -> HudSummary {
    let per_level = rules.experience_per_level.max(1);
    let next_level_at = u64::from(state.level).saturating_mul(per_level);
    let into_level = state.experience % per_level;

    let achievements_unlocked = state.unlocked_count();
    let achievements_total = state.achievements.len();

    HudSummary {
        player_name: state.player_name.clone(),
        level: state.level,
        experience: state.experience,
        experience_to_next_level: next_level_at.saturating_sub(state.experience),
        level_progress_percent: percent(into_level, per_level),
        total_points: state.total_points,
        achievements_unlocked,
        achievements_total,
        lore_discovered: state.discovered_lore_count(),
        lore_total: state.lore_fragments.len(),
        areas_visited: state.visited_areas.len(),
        areas_total: content::areas::ALL.len(),
        puzzles_solved: state.puzzles_solved.len(),
        puzzles_total: rules.puzzle_solver_count,
        completion_percent: percent(achievements_unlocked as u64, achievements_total as u64),
    }
}

fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = part.saturating_mul(100) / whole;
    u8::try_from(pct.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Timestamp;
    use crate::{apply, Intent, PlayerName};

    #[test]
    fn fresh_game_summary() {
        let hud = summarize(&GameState::initial(), &ProgressionRules::default());
        assert_eq!(hud.level, 1);
        assert_eq!(hud.experience_to_next_level, 100);
        assert_eq!(hud.level_progress_percent, 0);
        assert_eq!(hud.achievements_total, 13);
        assert_eq!(hud.lore_total, 7);
        assert_eq!(hud.areas_total, 5);
        assert_eq!(hud.puzzles_total, 3);
        assert_eq!(hud.completion_percent, 0);
    }

    #[test]
    fn progress_within_level() {
        let rules = ProgressionRules::default();
        let name = PlayerName::parse("Ada").unwrap();
        let s = apply(&GameState::initial(), &Intent::start_game(name), Timestamp::from_millis(1), &rules);
        let s = apply(&s, &Intent::AddExperience { amount: 135 }, Timestamp::from_millis(2), &rules);
        let hud = summarize(&s, &rules);
        assert_eq!(hud.experience, 145);
        assert_eq!(hud.level, 2);
        assert_eq!(hud.experience_to_next_level, 55);
        assert_eq!(hud.level_progress_percent, 45);
        assert_eq!(hud.achievements_unlocked, 1);
        assert_eq!(hud.completion_percent, 7);
    }

    #[test]
    fn full_completion_is_hundred() {
        let mut s = GameState::initial();
        for a in s.achievements.iter_mut() {
            a.unlocked = true;
        }
        assert_eq!(summarize(&s, &ProgressionRules::default()).completion_percent, 100);
    }
}
