//! Toast notifications derived from consecutive states.
//!
//! The host keeps the last published state and calls
//! [`diff_notifications`] with the new one; display and expiry are the
//! host's business.

use serde::{Deserialize, Serialize};

use crate::rules::ProgressionRules;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Achievement,
    Lore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub points: u64,
}

/// Notifications for everything unlocked or discovered between `previous`
/// and `next`: achievements first, then lore, each in catalog order.
pub fn diff_notifications(
    previous: &GameState,
    next: &GameState,
    rules: &ProgressionRules,
) -> Vec<Notification> {
    let achievements = next
        .achievements
        .iter()
        .filter(|a| a.unlocked && !previous.is_unlocked(&a.id))
        .map(|a| Notification {
            kind: NotificationKind::Achievement,
            title: "Achievement Unlocked!".to_string(),
            message: a.title.clone(),
            points: a.points,
        });

    let lore = next
        .lore_fragments
        .iter()
        .filter(|l| {
            l.discovered
                && !previous
                    .lore_fragment(&l.id)
                    .is_some_and(|before| before.discovered)
        })
        .map(|l| Notification {
            kind: NotificationKind::Lore,
            title: "Lore Discovered!".to_string(),
            message: l.title.clone(),
            points: rules.lore_reward,
        });

    achievements.chain(lore).collect()
}
