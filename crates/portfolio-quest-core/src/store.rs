//! Progress store: the one owner of the game state.
//!
//! Every change goes through [`ProgressStore::dispatch`]: the pure
//! transition runs, subscribers see the new state, and the state is saved.
//! Save failures are logged and swallowed; losing persistence must not end
//! an otherwise playable session.

use portfolio_quest_logic::{
    apply_with_report, GameState, Intent, ProgressionRules, Timestamp, TransitionReport,
};

use crate::clock::Clock;
use crate::persistence::PersistenceAdapter;
use crate::storage::StorageBackend;

type Subscriber = Box<dyn FnMut(&GameState)>;

/// Handle returned by [`ProgressStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ProgressStore<B, C> {
    state: GameState,
    rules: ProgressionRules,
    persistence: PersistenceAdapter<B>,
    clock: C,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<B: StorageBackend, C: Clock> ProgressStore<B, C> {
    /// A store holding the initial state. Nothing is read from storage.
    pub fn new(persistence: PersistenceAdapter<B>, clock: C, rules: ProgressionRules) -> Self {
        Self {
            state: GameState::initial(),
            rules,
            persistence,
            clock,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Cold start: restore the saved game if there is a usable one.
    pub fn open(persistence: PersistenceAdapter<B>, clock: C, rules: ProgressionRules) -> Self {
        let mut store = Self::new(persistence, clock, rules);
        match store.persistence.load() {
            Some(saved) => {
                log::info!(
                    "Restored saved game for {} (level {}, {} points)",
                    saved.player_name,
                    saved.level,
                    saved.total_points
                );
                store.dispatch(Intent::load_state(saved));
            }
            None => log::info!("No saved game, starting fresh"),
        }
        store
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    pub fn persistence(&self) -> &PersistenceAdapter<B> {
        &self.persistence
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Call `callback` with the new state after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Apply `intent`, publish, and persist.
    pub fn dispatch(&mut self, intent: Intent) -> TransitionReport {
        let now = self.clock.now();
        let report = apply_with_report(&self.state, &intent, now, &self.rules);

        if report.changed {
            log::debug!(
                "{}: +{} points, level {}",
                intent.short_name(),
                report.points_awarded,
                report.state.level
            );
            for id in &report.unlocked {
                log::debug!("Achievement unlocked: {}", id);
            }
        }

        self.state = report.state.clone();

        if matches!(intent, Intent::ResetGame) {
            log::info!("Game reset");
            if let Err(e) = self.persistence.clear() {
                log::warn!("Failed to clear saved game: {}", e);
            }
        } else if report.changed && self.state.game_started {
            if let Err(e) = self.persistence.save(&self.state) {
                log::warn!("Failed to save game: {}", e);
            }
        }

        if report.changed {
            self.publish();
        }

        report
    }

    fn publish(&mut self) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }
}
