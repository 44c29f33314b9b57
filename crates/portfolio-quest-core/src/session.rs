//! Game session: the surface UI collaborators talk to.
//!
//! A [`GameSession`] wraps the store with one method per intent, the
//! delayed start, and the recurring `dedicated` check. Only `start_game`
//! and `request_start` validate input (the player name); every other
//! method forwards straight to the store.
//!
//! Ending a session consumes it, which cancels both timers and returns
//! the store.

use portfolio_quest_logic::content::achievement_ids;
use portfolio_quest_logic::evaluator::should_unlock_dedicated;
use portfolio_quest_logic::hud::{summarize, HudSummary};
use portfolio_quest_logic::{GameState, Intent, NameError, PlayerName, TransitionReport};

use crate::clock::Clock;
use crate::config::QuestConfig;
use crate::storage::StorageBackend;
use crate::store::{ProgressStore, SubscriptionId};
use crate::timers::{DeferredStart, RecurringCheck};

use std::time::Duration;

pub struct GameSession<B, C> {
    store: ProgressStore<B, C>,
    start_delay: Duration,
    pending_start: Option<DeferredStart>,
    dedicated_check: RecurringCheck,
}

impl<B: StorageBackend, C: Clock> GameSession<B, C> {
    pub fn new(store: ProgressStore<B, C>, start_delay: Duration, dedicated_poll: Duration) -> Self {
        let mut session = Self {
            store,
            start_delay,
            pending_start: None,
            dedicated_check: RecurringCheck::new(dedicated_poll),
        };
        session.sync_dedicated_check();
        session
    }

    /// Session with the delays from `config`.
    pub fn with_config(store: ProgressStore<B, C>, config: &QuestConfig) -> Self {
        Self::new(store, config.start_delay(), config.dedicated_poll())
    }

    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn hud(&self) -> HudSummary {
        summarize(self.store.state(), self.store.rules())
    }

    pub fn store(&self) -> &ProgressStore<B, C> {
        &self.store
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Submit the start screen. The game starts on the first [`tick`]
    /// after the start delay.
    ///
    /// [`tick`]: Self::tick
    pub fn request_start(&mut self, raw_name: &str) -> Result<(), NameError> {
        let name = PlayerName::parse(raw_name)?;
        let pending = DeferredStart::new(name, self.store.now(), self.start_delay);
        log::debug!("Game start scheduled for {}", pending.due_at().as_millis());
        self.pending_start = Some(pending);
        Ok(())
    }

    pub fn is_start_pending(&self) -> bool {
        self.pending_start.is_some()
    }

    /// Start immediately, skipping the delay. A pending start still fires.
    pub fn start_game(&mut self, raw_name: &str) -> Result<TransitionReport, NameError> {
        let name = PlayerName::parse(raw_name)?;
        Ok(self.start_now(name))
    }

    fn start_now(&mut self, name: PlayerName) -> TransitionReport {
        log::info!("Starting game for {}", name);
        let report = self.store.dispatch(Intent::start_game(name));
        self.sync_dedicated_check();
        report
    }

    pub fn visit_area(&mut self, area: &str) -> TransitionReport {
        self.store.dispatch(Intent::visit_area(area))
    }

    pub fn unlock_achievement(&mut self, id: &str) -> TransitionReport {
        let report = self.store.dispatch(Intent::unlock_achievement(id));
        self.sync_dedicated_check();
        report
    }

    pub fn discover_lore(&mut self, id: &str) -> TransitionReport {
        self.store.dispatch(Intent::discover_lore(id))
    }

    /// Discover the next hidden fragment at `location`, if any remain.
    pub fn discover_lore_at(&mut self, location: &str) -> Option<TransitionReport> {
        let id = self
            .store
            .state()
            .next_undiscovered_lore_at(location)?
            .id
            .clone();
        Some(self.discover_lore(&id))
    }

    pub fn solve_puzzle(&mut self, id: &str) -> TransitionReport {
        self.store.dispatch(Intent::solve_puzzle(id))
    }

    pub fn find_secret(&mut self, secret_id: &str) -> TransitionReport {
        self.store.dispatch(Intent::find_secret(secret_id))
    }

    pub fn increment_click(&mut self) -> TransitionReport {
        self.store.dispatch(Intent::IncrementClick)
    }

    pub fn add_experience(&mut self, amount: u64) -> TransitionReport {
        self.store.dispatch(Intent::AddExperience { amount })
    }

    /// Reset progress. A pending start is not cancelled; only [`end`]
    /// drops it.
    ///
    /// [`end`]: Self::end
    pub fn reset_game(&mut self) -> TransitionReport {
        let report = self.store.dispatch(Intent::ResetGame);
        self.sync_dedicated_check();
        report
    }

    /// Drive the timers. Returns the reports of any intents raised.
    pub fn tick(&mut self) -> Vec<TransitionReport> {
        let now = self.store.now();
        let mut reports = Vec::new();

        if self.pending_start.as_ref().is_some_and(|p| p.is_due(now)) {
            if let Some(pending) = self.pending_start.take() {
                reports.push(self.store.dispatch(pending.into_intent()));
                self.sync_dedicated_check();
            }
        }

        if self.dedicated_check.poll(now)
            && should_unlock_dedicated(self.store.state(), now, self.store.rules())
        {
            log::info!("Session passed the dedicated threshold");
            reports.push(
                self.store
                    .dispatch(Intent::unlock_achievement(achievement_ids::DEDICATED)),
            );
            self.sync_dedicated_check();
        }

        reports
    }

    /// Tear down: cancel both timers and hand back the store.
    pub fn end(mut self) -> ProgressStore<B, C> {
        self.pending_start = None;
        self.dedicated_check.cancel();
        log::info!("Session ended");
        self.store
    }

    /// Keep the poll armed exactly while a game is running.
    fn sync_dedicated_check(&mut self) {
        let active = self.store.state().game_started
            && !self.store.state().is_unlocked(achievement_ids::DEDICATED);
        match (active, self.dedicated_check.is_armed()) {
            (true, false) => self.dedicated_check.arm(self.store.now()),
            (false, true) => self.dedicated_check.cancel(),
            _ => {}
        }
    }

    pub fn is_dedicated_check_armed(&self) -> bool {
        self.dedicated_check.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::persistence::PersistenceAdapter;
    use crate::storage::MemoryStorage;
    use portfolio_quest_logic::{ProgressionRules, Timestamp};

    const START: u64 = 1_700_000_000_000;

    fn session() -> (GameSession<MemoryStorage, ManualClock>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_millis(START));
        let store = ProgressStore::new(
            PersistenceAdapter::new(MemoryStorage::new()),
            clock.clone(),
            ProgressionRules::default(),
        );
        let session = GameSession::new(store, Duration::from_secs(1), Duration::from_secs(10));
        (session, clock)
    }

    #[test]
    fn request_start_waits_for_delay() {
        let (mut s, clock) = session();
        s.request_start("  Ada  ").unwrap();
        assert!(s.is_start_pending());
        assert!(s.tick().is_empty());
        assert!(!s.state().game_started);

        clock.advance(Duration::from_millis(1_000));
        let reports = s.tick();
        assert_eq!(reports.len(), 1);
        assert_eq!(s.state().player_name, "Ada");
        assert!(s.state().game_started);
        assert!(!s.is_start_pending());
        assert!(s.is_dedicated_check_armed());
    }

    #[test]
    fn invalid_name_rejected_without_side_effects() {
        let (mut s, _) = session();
        assert_eq!(s.request_start("   "), Err(NameError::Empty));
        assert!(s.start_game(&"x".repeat(21)).is_err());
        assert!(!s.is_start_pending());
        assert!(!s.state().game_started);
    }

    #[test]
    fn dedicated_unlocks_after_threshold() {
        let (mut s, clock) = session();
        s.start_game("Ada").unwrap();

        clock.advance(Duration::from_secs(290));
        assert!(s.tick().is_empty());

        clock.advance(Duration::from_secs(20));
        let reports = s.tick();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].unlocked, vec![achievement_ids::DEDICATED.to_string()]);
        assert!(s.state().is_unlocked(achievement_ids::DEDICATED));

        clock.advance(Duration::from_secs(60));
        assert!(s.tick().is_empty());
    }

    #[test]
    fn check_not_armed_before_start() {
        let (mut s, clock) = session();
        assert!(!s.is_dedicated_check_armed());
        clock.advance(Duration::from_secs(600));
        assert!(s.tick().is_empty());
    }

    #[test]
    fn reset_cancels_dedicated_check() {
        let (mut s, clock) = session();
        s.start_game("Ada").unwrap();
        s.reset_game();
        assert!(!s.is_dedicated_check_armed());

        clock.advance(Duration::from_secs(600));
        assert!(s.tick().is_empty());
        assert_eq!(s.state(), &GameState::initial());
    }

    #[test]
    fn reset_during_start_delay_still_starts() {
        let (mut s, clock) = session();
        s.request_start("Ada").unwrap();
        s.reset_game();
        assert!(s.is_start_pending());

        clock.advance(Duration::from_secs(1));
        assert_eq!(s.tick().len(), 1);
        assert!(s.state().game_started);
        assert_eq!(s.state().player_name, "Ada");
        assert!(s.is_dedicated_check_armed());
    }

    #[test]
    fn dedicated_check_disarms_once_unlocked() {
        let (mut s, clock) = session();
        s.start_game("Ada").unwrap();
        clock.advance(Duration::from_secs(310));
        s.tick();
        assert!(s.state().is_unlocked(achievement_ids::DEDICATED));
        assert!(!s.is_dedicated_check_armed());

        let (mut s, _) = session();
        s.start_game("Ada").unwrap();
        s.unlock_achievement(achievement_ids::DEDICATED);
        assert!(!s.is_dedicated_check_armed());
    }

    #[test]
    fn discover_lore_at_takes_next_hidden_fragment() {
        let (mut s, _) = session();
        s.start_game("Ada").unwrap();
        let first = s.discover_lore_at("map").unwrap();
        assert!(first.changed);
        assert!(s.state().lore_fragment("lore_1").unwrap().discovered);
        s.discover_lore_at("map").unwrap();
        assert!(s.state().lore_fragment("lore_5").unwrap().discovered);
        assert!(s.discover_lore_at("map").is_none());
        assert!(s.discover_lore_at("nowhere").is_none());
    }

    #[test]
    fn hud_tracks_session() {
        let (mut s, _) = session();
        s.start_game("Ada").unwrap();
        s.visit_area("spawn");
        let hud = s.hud();
        assert_eq!(hud.player_name, "Ada");
        assert_eq!(hud.total_points, 15);
        assert_eq!(hud.areas_visited, 1);
    }

    #[test]
    fn end_returns_store_with_state() {
        let (mut s, _) = session();
        s.start_game("Ada").unwrap();
        s.find_secret("secret_corner");
        let store = s.end();
        assert!(store.state().has_found_secret("secret_corner"));
        assert!(store.persistence().load().is_some());
    }
}
