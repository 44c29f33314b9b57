//! The reducer: `(state, intent, now) -> state`.
//!
//! [`apply`] never fails and never touches anything outside its arguments.
//! The caller supplies `now` so time-gated rules (`speed_runner`) and the
//! session start stamp stay deterministic under test. Persistence and
//! publishing are layered on top by the store.
//!
//! ```
//! use portfolio_quest_logic::{apply, GameState, Intent, PlayerName, ProgressionRules, Timestamp};
//!
//! let rules = ProgressionRules::default();
//! let start = Intent::start_game(PlayerName::parse("Ada").unwrap());
//! let s = apply(&GameState::initial(), &start, Timestamp::from_millis(1_000), &rules);
//! assert!(s.game_started);
//! assert_eq!(s.total_points, 10); // first_spawn
//! ```

use crate::content::achievement_ids;
use crate::evaluator::{unlock_derived, Trigger};
use crate::intent::{Intent, PlayerName};
use crate::rules::ProgressionRules;
use crate::state::{GameState, Timestamp};

/// Result of one transition, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReport {
    pub state: GameState,
    /// Points added to `total_points` by this transition.
    pub points_awarded: u64,
    /// Achievements unlocked by this transition, in unlock order.
    pub unlocked: Vec<String>,
    /// `false` when the intent was a no-op.
    pub changed: bool,
}

/// Apply one intent and return the next state.
pub fn apply(
    state: &GameState,
    intent: &Intent,
    now: Timestamp,
    rules: &ProgressionRules,
) -> GameState {
    apply_with_report(state, intent, now, rules).state
}

/// Like [`apply`], but also reports what the transition awarded.
pub fn apply_with_report(
    state: &GameState,
    intent: &Intent,
    now: Timestamp,
    rules: &ProgressionRules,
) -> TransitionReport {
    let next = match intent {
        Intent::StartGame { player_name } => Some(start_game(state, player_name, now, rules)),
        Intent::VisitArea { area } => visit_area(state, area, now, rules),
        Intent::IncrementClick => Some(increment_click(state, now, rules)),
        Intent::FindSecret { secret_id } => find_secret(state, secret_id, now, rules),
        Intent::UnlockAchievement { id } => unlock_achievement(state, id, now, rules),
        Intent::DiscoverLore { id } => discover_lore(state, id, now, rules),
        Intent::SolvePuzzle { id } => solve_puzzle(state, id, now, rules),
        Intent::AddExperience { amount } => {
            let mut next = state.clone();
            next.add_experience(*amount, rules.experience_per_level);
            Some(next)
        }
        Intent::LoadState { state: snapshot } => Some(snapshot.as_ref().clone()),
        Intent::ResetGame => Some(GameState::initial()),
    };

    match next {
        Some(next) => report(state, next),
        None => TransitionReport {
            state: state.clone(),
            points_awarded: 0,
            unlocked: Vec::new(),
            changed: false,
        },
    }
}

fn report(before: &GameState, after: GameState) -> TransitionReport {
    let unlocked = after
        .achievements
        .iter()
        .filter(|a| a.unlocked && !before.is_unlocked(&a.id))
        .map(|a| a.id.clone())
        .collect();
    TransitionReport {
        points_awarded: after.total_points.saturating_sub(before.total_points),
        changed: &after != before,
        unlocked,
        state: after,
    }
}

fn start_game(
    state: &GameState,
    name: &PlayerName,
    now: Timestamp,
    rules: &ProgressionRules,
) -> GameState {
    let mut next = state.clone();
    next.player_name = name.as_str().to_string();
    next.game_started = true;
    next.time_spent = now;
    unlock_derived(&mut next, Trigger::GameStarted, now, rules);
    next
}

fn visit_area(
    state: &GameState,
    area: &str,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Option<GameState> {
    if state.has_visited(area) {
        return None;
    }
    let mut next = state.clone();
    next.visited_areas.push(area.to_string());
    next.award(rules.visit_reward, rules.experience_per_level);
    unlock_derived(&mut next, Trigger::AreaVisited, now, rules);
    Some(next)
}

fn increment_click(state: &GameState, now: Timestamp, rules: &ProgressionRules) -> GameState {
    let mut next = state.clone();
    next.click_count = next.click_count.saturating_add(1);
    unlock_derived(&mut next, Trigger::Clicked, now, rules);
    next
}

fn find_secret(
    state: &GameState,
    secret_id: &str,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Option<GameState> {
    if state.has_found_secret(secret_id) {
        return None;
    }
    let mut next = state.clone();
    next.secrets_found.push(secret_id.to_string());
    next.award(rules.secret_reward, rules.experience_per_level);
    unlock_derived(&mut next, Trigger::SecretFound, now, rules);
    Some(next)
}

fn unlock_achievement(
    state: &GameState,
    id: &str,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Option<GameState> {
    let mut next = state.clone();
    let points = next.unlock(id)?;
    next.award(points, rules.experience_per_level);
    // Unlocking completionist directly leaves nothing for the rule to do.
    if id != achievement_ids::COMPLETIONIST {
        unlock_derived(&mut next, Trigger::AchievementUnlocked, now, rules);
    }
    Some(next)
}

fn discover_lore(
    state: &GameState,
    id: &str,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Option<GameState> {
    let mut next = state.clone();
    if !next.discover(id) {
        return None;
    }
    next.award(rules.lore_reward, rules.experience_per_level);
    unlock_derived(&mut next, Trigger::LoreDiscovered, now, rules);
    Some(next)
}

fn solve_puzzle(
    state: &GameState,
    id: &str,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Option<GameState> {
    if state.has_solved(id) {
        return None;
    }
    let mut next = state.clone();
    next.puzzles_solved.push(id.to_string());
    next.award(rules.puzzle_reward, rules.experience_per_level);
    unlock_derived(&mut next, Trigger::PuzzleSolved, now, rules);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{achievement_ids as ids, areas, puzzles};

    const T0: u64 = 1_700_000_000_000;

    fn rules() -> ProgressionRules {
        ProgressionRules::default()
    }

    fn at(offset_ms: u64) -> Timestamp {
        Timestamp::from_millis(T0 + offset_ms)
    }

    fn started() -> GameState {
        let name = PlayerName::parse("Tester").unwrap();
        apply(&GameState::initial(), &Intent::start_game(name), at(0), &rules())
    }

    #[test]
    fn start_game_sets_session() {
        let s = started();
        assert!(s.game_started);
        assert_eq!(s.player_name, "Tester");
        assert_eq!(s.time_spent, at(0));
        assert!(s.is_unlocked(ids::FIRST_SPAWN));
        assert_eq!(s.total_points, 10);
        assert_eq!(s.experience, 10);
    }

    #[test]
    fn start_game_twice_does_not_double_award() {
        let s = started();
        let name = PlayerName::parse("Again").unwrap();
        let again = apply(&s, &Intent::start_game(name), at(5_000), &rules());
        assert_eq!(again.total_points, 10);
        assert_eq!(again.player_name, "Again");
        assert_eq!(again.time_spent, at(5_000));
    }

    #[test]
    fn visit_area_awards_base_reward() {
        let r = apply_with_report(&started(), &Intent::visit_area(areas::STATS), at(1_000), &rules());
        assert!(r.changed);
        assert_eq!(r.points_awarded, 5);
        assert_eq!(r.state.visited_areas, vec!["stats".to_string()]);
    }

    #[test]
    fn revisit_is_noop() {
        let s = apply(&started(), &Intent::visit_area(areas::STATS), at(1_000), &rules());
        let r = apply_with_report(&s, &Intent::visit_area(areas::STATS), at(2_000), &rules());
        assert!(!r.changed);
        assert_eq!(r.state, s);
    }

    #[test]
    fn slow_exploration_skips_speed_runner() {
        let mut s = started();
        for (i, area) in areas::ALL.iter().enumerate() {
            s = apply(&s, &Intent::visit_area(*area), at(20_000 * (i as u64 + 1)), &rules());
        }
        assert!(s.is_unlocked(ids::EXPLORER));
        assert!(!s.is_unlocked(ids::SPEED_RUNNER));
        assert_eq!(s.total_points, 10 + 25 + 50);
    }

    #[test]
    fn unknown_achievement_is_noop() {
        let s = started();
        let r = apply_with_report(&s, &Intent::unlock_achievement("nope"), at(1), &rules());
        assert!(!r.changed);
    }

    #[test]
    fn unlock_achievement_awards_its_points() {
        let r = apply_with_report(
            &started(),
            &Intent::unlock_achievement(ids::STORY_SEEKER),
            at(1),
            &rules(),
        );
        assert_eq!(r.points_awarded, 15);
        assert_eq!(r.unlocked, vec![ids::STORY_SEEKER.to_string()]);
    }

    #[test]
    fn unknown_lore_is_noop() {
        let s = started();
        assert_eq!(apply(&s, &Intent::discover_lore("lore_99"), at(1), &rules()), s);
    }

    #[test]
    fn lore_awards_ten() {
        let s = apply(&started(), &Intent::discover_lore("lore_1"), at(1), &rules());
        assert_eq!(s.total_points, 20);
        assert_eq!(s.discovered_lore_count(), 1);
    }

    #[test]
    fn first_puzzle_unlocks_puzzle_master() {
        let s = apply(&started(), &Intent::solve_puzzle(puzzles::WORD_PUZZLE), at(1), &rules());
        assert!(s.is_unlocked(ids::PUZZLE_MASTER));
        assert_eq!(s.total_points, 10 + 15 + 25);
    }

    #[test]
    fn all_puzzles_unlock_puzzle_solver() {
        let mut s = started();
        for id in puzzles::ALL {
            s = apply(&s, &Intent::solve_puzzle(id), at(1), &rules());
        }
        assert!(s.is_unlocked(ids::PUZZLE_SOLVER));
        assert_eq!(s.total_points, 10 + 3 * 15 + 25 + 60);
    }

    #[test]
    fn first_secret_unlocks_secret_finder_only_once() {
        let s = apply(&started(), &Intent::find_secret("secret_top"), at(1), &rules());
        assert_eq!(s.total_points, 10 + 15 + 35);
        let s = apply(&s, &Intent::find_secret("secret_corner"), at(2), &rules());
        assert_eq!(s.total_points, 10 + 15 + 35 + 15);
        assert_eq!(s.secrets_found.len(), 2);
    }

    #[test]
    fn add_experience_leaves_points() {
        let s = apply(&started(), &Intent::AddExperience { amount: 195 }, at(1), &rules());
        assert_eq!(s.experience, 205);
        assert_eq!(s.total_points, 10);
        assert_eq!(s.level, 3);
    }

    #[test]
    fn load_state_replaces_verbatim() {
        let mut snapshot = GameState::initial();
        snapshot.player_name = "Loaded".into();
        snapshot.click_count = 7;
        let s = apply(&started(), &Intent::load_state(snapshot.clone()), at(1), &rules());
        assert_eq!(s, snapshot);
    }

    #[test]
    fn reset_restores_initial() {
        let s = apply(&started(), &Intent::visit_area(areas::SPAWN), at(1), &rules());
        assert_eq!(apply(&s, &Intent::ResetGame, at(2), &rules()), GameState::initial());
    }

    #[test]
    fn clicks_below_threshold_do_nothing_else() {
        let r = apply_with_report(&started(), &Intent::IncrementClick, at(1), &rules());
        assert!(r.changed);
        assert_eq!(r.points_awarded, 0);
        assert_eq!(r.state.click_count, 1);
    }

    #[test]
    fn direct_completionist_unlock_does_not_cascade() {
        let r = apply_with_report(
            &started(),
            &Intent::unlock_achievement(ids::COMPLETIONIST),
            at(1),
            &rules(),
        );
        assert_eq!(r.unlocked, vec![ids::COMPLETIONIST.to_string()]);
        assert_eq!(r.points_awarded, 100);
    }
}
