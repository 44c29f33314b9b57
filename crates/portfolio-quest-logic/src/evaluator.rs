//! Derived achievements: threshold rules checked after each transition.
//!
//! A transition first applies its primary mutation (append the area, mark
//! the fragment, bump the click counter) and then runs [`unlock_derived`]
//! with a [`Trigger`] naming what happened. Rules run in [`Rule::ORDER`];
//! each one sees the unlocks made by the rules before it, which is what
//! lets `completionist` fire in the same transition as the last unlock.
//!
//! Every rule is guarded by its achievement's own `unlocked` flag, so
//! re-evaluating is always safe.

use crate::content::achievement_ids;
use crate::rules::ProgressionRules;
use crate::state::{GameState, Timestamp};

/// What the transition that is running the rules just did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    GameStarted,
    AreaVisited,
    Clicked,
    SecretFound,
    LoreDiscovered,
    PuzzleSolved,
    AchievementUnlocked,
}

/// One derived-achievement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    FirstSpawn,
    Explorer,
    SpeedRunner,
    CuriousOne,
    SecretFinder,
    LoreHunter,
    LoreMaster,
    PuzzleMaster,
    PuzzleSolver,
    Completionist,
}

impl Rule {
    /// Evaluation order. `Completionist` must stay last.
    pub const ORDER: [Rule; 10] = [
        Rule::FirstSpawn,
        Rule::Explorer,
        Rule::SpeedRunner,
        Rule::CuriousOne,
        Rule::SecretFinder,
        Rule::LoreHunter,
        Rule::LoreMaster,
        Rule::PuzzleMaster,
        Rule::PuzzleSolver,
        Rule::Completionist,
    ];

    pub fn achievement_id(self) -> &'static str {
        match self {
            Rule::FirstSpawn => achievement_ids::FIRST_SPAWN,
            Rule::Explorer => achievement_ids::EXPLORER,
            Rule::SpeedRunner => achievement_ids::SPEED_RUNNER,
            Rule::CuriousOne => achievement_ids::CURIOUS_ONE,
            Rule::SecretFinder => achievement_ids::SECRET_FINDER,
            Rule::LoreHunter => achievement_ids::LORE_HUNTER,
            Rule::LoreMaster => achievement_ids::LORE_MASTER,
            Rule::PuzzleMaster => achievement_ids::PUZZLE_MASTER,
            Rule::PuzzleSolver => achievement_ids::PUZZLE_SOLVER,
            Rule::Completionist => achievement_ids::COMPLETIONIST,
        }
    }

    /// Whether this rule is evaluated for `trigger` at all.
    pub fn listens_to(self, trigger: Trigger) -> bool {
        match self {
            Rule::FirstSpawn => trigger == Trigger::GameStarted,
            Rule::Explorer | Rule::SpeedRunner => trigger == Trigger::AreaVisited,
            Rule::CuriousOne => trigger == Trigger::Clicked,
            Rule::SecretFinder => trigger == Trigger::SecretFound,
            Rule::LoreHunter | Rule::LoreMaster => trigger == Trigger::LoreDiscovered,
            Rule::PuzzleMaster | Rule::PuzzleSolver => trigger == Trigger::PuzzleSolved,
            Rule::Completionist => true,
        }
    }

    /// Whether the rule's condition holds in `state`, ignoring whether
    /// the achievement is already unlocked.
    pub fn condition_holds(self, state: &GameState, now: Timestamp, rules: &ProgressionRules) -> bool {
        match self {
            Rule::FirstSpawn | Rule::SecretFinder => true,
            Rule::Explorer => explored_everything(state, rules),
            Rule::SpeedRunner => {
                explored_everything(state, rules)
                    && state.time_spent.is_set()
                    && now.elapsed_since(state.time_spent) < rules.speed_run_limit()
            }
            Rule::CuriousOne => state.click_count >= rules.curious_click_count,
            Rule::LoreHunter => state.discovered_lore_count() >= rules.lore_hunter_count,
            Rule::LoreMaster => state.discovered_lore_count() == state.lore_fragments.len(),
            Rule::PuzzleMaster => state.puzzles_solved.len() == 1,
            Rule::PuzzleSolver => state.puzzles_solved.len() >= rules.puzzle_solver_count,
            Rule::Completionist => {
                let others = state
                    .achievements
                    .iter()
                    .filter(|a| a.id != achievement_ids::COMPLETIONIST);
                let mut total = 0;
                let mut unlocked = 0;
                for achievement in others {
                    total += 1;
                    if achievement.unlocked {
                        unlocked += 1;
                    }
                }
                total > 0 && unlocked == total
            }
        }
    }

    /// The achievement id to unlock now, if any.
    pub fn check(
        self,
        state: &GameState,
        trigger: Trigger,
        now: Timestamp,
        rules: &ProgressionRules,
    ) -> Option<&'static str> {
        let id = self.achievement_id();
        let locked = state.achievement(id).is_some_and(|a| !a.unlocked);
        (locked && self.listens_to(trigger) && self.condition_holds(state, now, rules))
            .then_some(id)
    }
}

fn explored_everything(state: &GameState, rules: &ProgressionRules) -> bool {
    state.visited_areas.len() >= rules.explorer_area_count
}

/// Run every rule in order, unlocking and awarding as they fire.
///
/// Returns the ids unlocked, in the order they fired.
pub fn unlock_derived(
    state: &mut GameState,
    trigger: Trigger,
    now: Timestamp,
    rules: &ProgressionRules,
) -> Vec<&'static str> {
    let mut unlocked = Vec::new();
    for rule in Rule::ORDER {
        if let Some(id) = rule.check(state, trigger, now, rules) {
            if let Some(points) = state.unlock(id) {
                state.award(points, rules.experience_per_level);
                unlocked.push(id);
            }
        }
    }
    unlocked
}

/// Host-polled check for `dedicated`: the game is running, the
/// achievement is still locked, and the session has lasted long enough.
pub fn should_unlock_dedicated(state: &GameState, now: Timestamp, rules: &ProgressionRules) -> bool {
    state.game_started
        && state.time_spent.is_set()
        && state
            .achievement(achievement_ids::DEDICATED)
            .is_some_and(|a| !a.unlocked)
        && now.elapsed_since(state.time_spent) >= rules.dedicated_after()
}
