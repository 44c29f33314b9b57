//! End-to-end session tests: cold start, play, persistence, timers, reset.
//!
//! Time is driven by a `ManualClock`; storage is in memory unless a test
//! needs files on disk.

use std::time::Duration;

use portfolio_quest_core::{
    open_file_session, FileStorage, GameSession, ManualClock, MemoryStorage, PersistenceAdapter,
    ProgressStore, QuestConfig, StorageBackend, STORAGE_KEY,
};
use portfolio_quest_logic::content::{achievement_ids, areas};
use portfolio_quest_logic::notifications::{diff_notifications, NotificationKind};
use portfolio_quest_logic::{GameState, ProgressionRules, Timestamp};

// ── Helpers ──

const T0: u64 = 1_700_000_000_000;

fn memory_session(
    storage: MemoryStorage,
    clock: &ManualClock,
) -> GameSession<MemoryStorage, ManualClock> {
    let store = ProgressStore::open(
        PersistenceAdapter::new(storage),
        clock.clone(),
        ProgressionRules::default(),
    );
    GameSession::with_config(store, &QuestConfig::default())
}

// ── Cold start ──

#[test]
fn test_fresh_start_has_no_save() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let session = memory_session(MemoryStorage::new(), &clock);
    assert_eq!(session.state(), &GameState::initial());
    assert!(session.store().persistence().load().is_none());
}

#[test]
fn test_progress_survives_restart() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut session = memory_session(MemoryStorage::new(), &clock);
    session.start_game("Ada").unwrap();
    session.visit_area("stats");
    session.solve_puzzle("word_puzzle");
    let played = session.state().clone();

    let store = session.end();
    let storage = store.persistence().backend().clone();

    let reopened = memory_session(storage, &clock);
    assert_eq!(reopened.state(), &played);
    assert!(reopened.is_dedicated_check_armed());
}

#[test]
fn test_reset_then_restart_is_fresh() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut session = memory_session(MemoryStorage::new(), &clock);
    session.start_game("Ada").unwrap();
    session.discover_lore("lore_4");
    session.reset_game();

    let storage = session.end().persistence().backend().clone();
    assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
    let reopened = memory_session(storage, &clock);
    assert_eq!(reopened.state(), &GameState::initial());
}

#[test]
fn test_malformed_save_starts_fresh() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut storage = MemoryStorage::new();
    storage.set(STORAGE_KEY, "[1, 2, 3]").unwrap();
    let session = memory_session(storage, &clock);
    assert_eq!(session.state(), &GameState::initial());
}

// ── Timers ──

#[test]
fn test_delayed_start_then_dedicated() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut session = memory_session(MemoryStorage::new(), &clock);

    session.request_start("Grace").unwrap();
    clock.advance(Duration::from_millis(999));
    assert!(session.tick().is_empty());
    clock.advance(Duration::from_millis(1));
    assert_eq!(session.tick().len(), 1);
    assert_eq!(session.state().time_spent, Timestamp::from_millis(T0 + 1_000));

    // Poll every ten seconds until the five-minute mark.
    let mut unlocked_at = None;
    for step in 1..=40u64 {
        clock.advance(Duration::from_secs(10));
        let reports = session.tick();
        if reports
            .iter()
            .any(|r| r.unlocked.iter().any(|id| id == achievement_ids::DEDICATED))
        {
            unlocked_at = Some(step * 10);
            break;
        }
    }
    assert_eq!(unlocked_at, Some(300));
}

#[test]
fn test_speed_run_inside_a_minute() {
    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut session = memory_session(MemoryStorage::new(), &clock);
    session.start_game("Speedy").unwrap();
    for area in areas::ALL {
        clock.advance(Duration::from_secs(5));
        session.visit_area(area);
    }
    assert!(session.state().is_unlocked(achievement_ids::EXPLORER));
    assert!(session.state().is_unlocked(achievement_ids::SPEED_RUNNER));
}

// ── Notifications ──

#[test]
fn test_subscriber_builds_notifications() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let clock = ManualClock::new(Timestamp::from_millis(T0));
    let mut session = memory_session(MemoryStorage::new(), &clock);
    let rules = ProgressionRules::default();
    let last = Rc::new(RefCell::new(session.state().clone()));
    let toasts = Rc::new(RefCell::new(Vec::new()));

    let (last_sink, toast_sink) = (Rc::clone(&last), Rc::clone(&toasts));
    session.subscribe(move |state| {
        let mut prev = last_sink.borrow_mut();
        toast_sink
            .borrow_mut()
            .extend(diff_notifications(&prev, state, &rules));
        *prev = state.clone();
    });

    session.start_game("Ada").unwrap();
    session.discover_lore("lore_7");

    let toasts = toasts.borrow();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[0].kind, NotificationKind::Achievement);
    assert_eq!(toasts[1].kind, NotificationKind::Lore);
}

// ── File storage ──

#[test]
fn test_file_session_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("saves");
    let config = QuestConfig {
        storage_dir: Some(dir.clone()),
        start_delay_ms: 0,
        ..Default::default()
    };

    let mut session = open_file_session(&config);
    session.start_game("Disk").unwrap();
    session.find_secret("secret_top");
    let played = session.state().clone();
    drop(session.end());

    let storage = FileStorage::new(&dir);
    assert!(storage.get(STORAGE_KEY).unwrap().is_some());

    let reopened = open_file_session(&config);
    assert_eq!(reopened.state(), &played);
}

#[test]
fn test_config_with_unusable_key_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("quest.json");
    std::fs::write(&path, r#"{"storage_key": "saves/game"}"#).unwrap();
    assert!(QuestConfig::load(&path).is_err());

    // Falling back keeps saving under the default key.
    let config = QuestConfig {
        storage_dir: Some(tmp.path().join("saves")),
        ..QuestConfig::load_or_default(&path)
    };
    let mut session = open_file_session(&config);
    session.start_game("Keyed").unwrap();
    session.visit_area("stats");
    drop(session.end());
    let storage = FileStorage::new(tmp.path().join("saves"));
    assert!(storage.get(STORAGE_KEY).unwrap().is_some());
}
