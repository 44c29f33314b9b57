//! Pure progression logic for Portfolio Quest.
//!
//! This crate contains the whole progression engine of the portfolio game
//! independent of any storage, UI, or clock. Transitions take plain data
//! (the current state, an intent, and the current instant) and return the
//! next state, making every rule unit-testable and deterministic.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`content`] | Canonical areas, puzzles, secrets, achievement and lore catalog |
//! | [`evaluator`] | Derived-achievement rules evaluated after each transition |
//! | [`hud`] | Read-only HUD/stats projection of a state |
//! | [`intent`] | Intent vocabulary raised by UI collaborators, player-name validation |
//! | [`notifications`] | Toast notifications derived from two consecutive states |
//! | [`rules`] | Tunable rewards, thresholds, and time limits |
//! | [`state`] | `GameState`, achievements, lore fragments, timestamps, level formula |
//! | [`transition`] | The pure `(state, intent, now) -> state` reducer |

pub mod content;
pub mod evaluator;
pub mod hud;
pub mod intent;
pub mod notifications;
pub mod rules;
pub mod state;
pub mod transition;

pub use intent::{Intent, NameError, PlayerName};
pub use rules::ProgressionRules;
pub use state::{Achievement, GameState, LoreFragment, Timestamp};
pub use transition::{apply, apply_with_report, TransitionReport};
