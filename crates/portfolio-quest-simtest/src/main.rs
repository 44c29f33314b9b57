//! Portfolio Quest Headless Progression Harness
//!
//! Replays scripted and randomized play sessions against the store with a
//! hand-driven clock and in-memory storage. No UI, no files, no wall time.
//!
//! Usage:
//!   cargo run -p portfolio-quest-simtest
//!   cargo run -p portfolio-quest-simtest -- --verbose
//!   cargo run -p portfolio-quest-simtest -- --seed 42 --sessions 200
//!   cargo run -p portfolio-quest-simtest -- --dump

use std::time::Duration;

use portfolio_quest_core::{
    GameSession, ManualClock, MemoryStorage, PersistenceAdapter, ProgressStore, QuestConfig,
    StorageBackend, STORAGE_KEY,
};
use portfolio_quest_logic::content::{achievement_ids as ids, areas, puzzles, secrets};
use portfolio_quest_logic::hud::summarize;
use portfolio_quest_logic::notifications::diff_notifications;
use portfolio_quest_logic::state::level_for_experience;
use portfolio_quest_logic::{GameState, ProgressionRules, Timestamp, TransitionReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const T0: u64 = 1_700_000_000_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    dump: bool,
    seed: u64,
    sessions: usize,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let value_after = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
                .and_then(|v| v.parse::<u64>().ok())
        };
        Self {
            verbose: args.iter().any(|a| a == "--verbose"),
            dump: args.iter().any(|a| a == "--dump"),
            seed: value_after("--seed").unwrap_or(0x5EED),
            sessions: value_after("--sessions").map_or(100, |n| n as usize),
        }
    }
}

type Session = GameSession<MemoryStorage, ManualClock>;

fn new_session(storage: MemoryStorage, clock: &ManualClock) -> Session {
    let config = QuestConfig::default();
    let store = ProgressStore::open(
        PersistenceAdapter::with_key(storage, config.storage_key.clone()),
        clock.clone(),
        config.rules.clone(),
    );
    GameSession::with_config(store, &config)
}

fn fresh(clock_start: u64) -> (Session, ManualClock) {
    let clock = ManualClock::new(Timestamp::from_millis(clock_start));
    (new_session(MemoryStorage::new(), &clock), clock)
}

fn check(results: &mut Vec<TestResult>, name: &str, passed: bool, detail: String) {
    results.push(TestResult {
        name: name.into(),
        passed,
        detail,
    });
}

/// Fresh session with a started game. A rejected start is recorded as a
/// failed `name` result and `None` is returned so the scenario can bail.
fn started(
    results: &mut Vec<TestResult>,
    name: &str,
    player: &str,
) -> Option<(Session, ManualClock, TransitionReport)> {
    let (mut s, clock) = fresh(T0);
    match s.start_game(player) {
        Ok(report) => Some((s, clock, report)),
        Err(e) => {
            check(results, name, false, format!("start rejected for {:?}: {}", player, e));
            None
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = Options::from_args();
    println!("=== Portfolio Quest Progression Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog sanity
    results.extend(validate_catalog(&opts));

    // 2. Scripted scenarios
    results.extend(validate_scenarios(&opts));

    // 3. Persistence through the store
    results.extend(validate_persistence(&opts));

    // 4. Host timers
    results.extend(validate_timers(&opts));

    // 5. Randomized sessions
    results.extend(validate_random_sessions(&opts));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(opts: &Options) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();
    let initial = GameState::initial();
    let rules = ProgressionRules::default();

    check(
        &mut results,
        "catalog_sizes",
        initial.achievements.len() == 13 && initial.lore_fragments.len() == 7,
        format!(
            "{} achievements, {} lore fragments",
            initial.achievements.len(),
            initial.lore_fragments.len()
        ),
    );

    let total_points: u64 = initial.achievements.iter().map(|a| a.points).sum();
    check(
        &mut results,
        "catalog_points",
        total_points == 515,
        format!("achievement points sum to {}", total_points),
    );

    let rules_errors = rules.validate();
    check(
        &mut results,
        "default_rules_valid",
        rules_errors.is_empty(),
        format!("{} rule errors", rules_errors.len()),
    );

    if opts.verbose {
        println!("  Achievements:");
        for a in &initial.achievements {
            println!("    {:14} {:>4} pts  {}", a.id, a.points, a.title);
        }
    }

    results
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(_opts: &Options) -> Vec<TestResult> {
    println!("--- Scripted Scenarios ---");
    let mut results = Vec::new();

    scenario_first_session(&mut results);
    scenario_levelling(&mut results);

    // Blank and overlong names never start a game
    let (mut s, _) = fresh(T0);
    let blank = s.start_game("   ").is_err();
    let long = s.start_game(&"n".repeat(21)).is_err();
    check(
        &mut results,
        "name_validation",
        blank && long && !s.state().game_started,
        format!("blank_rejected={} long_rejected={}", blank, long),
    );

    results
}

fn scenario_first_session(results: &mut Vec<TestResult>) {
    // Start: first_spawn, 10 points
    let Some((mut s, _, report)) = started(results, "start_unlocks_first_spawn", "Ada") else {
        return;
    };
    check(
        results,
        "start_unlocks_first_spawn",
        s.state().total_points == 10 && report.unlocked == vec![ids::FIRST_SPAWN.to_string()],
        format!("points={} unlocked={:?}", s.state().total_points, report.unlocked),
    );

    // Visiting the same area twice rewards once
    s.visit_area("projects");
    s.visit_area("projects");
    check(
        results,
        "visit_idempotent",
        s.state().total_points == 15 && s.state().visited_areas.len() == 1,
        format!(
            "points={} visited={:?}",
            s.state().total_points,
            s.state().visited_areas
        ),
    );

    // Third lore fragment unlocks lore_hunter
    for id in ["lore_1", "lore_2", "lore_3"] {
        s.discover_lore(id);
    }
    check(
        results,
        "lore_hunter_on_third",
        s.state().is_unlocked(ids::LORE_HUNTER) && s.state().total_points == 75,
        format!("points={}", s.state().total_points),
    );

    // Fifty clicks unlock curious_one
    for _ in 0..49 {
        s.increment_click();
    }
    let before = s.state().is_unlocked(ids::CURIOUS_ONE);
    s.increment_click();
    check(
        results,
        "curious_on_fiftieth_click",
        !before && s.state().is_unlocked(ids::CURIOUS_ONE),
        format!("clicks={}", s.state().click_count),
    );
}

fn scenario_levelling(results: &mut Vec<TestResult>) {
    // Level follows experience
    let Some((mut s, _, _)) = started(results, "level_from_experience", "Leveller") else {
        return;
    };
    s.add_experience(185);
    check(
        results,
        "level_from_experience",
        s.state().experience == 195 && s.state().level == 2,
        format!("exp={} level={}", s.state().experience, s.state().level),
    );
}

// ── 3. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(opts: &Options) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let Some((mut s, clock, _)) = started(&mut results, "save_written", "Saver") else {
        return results;
    };
    s.visit_area("stats");
    s.solve_puzzle("cipher_puzzle");
    s.find_secret("secret_corner");
    let played = s.state().clone();
    let storage = s.end().persistence().backend().clone();

    let stored = storage.get(STORAGE_KEY).ok().flatten();
    check(
        &mut results,
        "save_written",
        stored.is_some(),
        format!("{} bytes stored", stored.as_ref().map_or(0, |s| s.len())),
    );
    if opts.dump {
        if let Some(raw) = &stored {
            match serde_json::from_str::<serde_json::Value>(raw)
                .and_then(|v| serde_json::to_string_pretty(&v))
            {
                Ok(pretty) => println!("{}", pretty),
                Err(e) => println!("  (unparseable save: {})", e),
            }
        }
    }

    let mut reopened = new_session(storage, &clock);
    check(
        &mut results,
        "restart_restores_state",
        reopened.state() == &played,
        format!("level={} points={}", reopened.state().level, reopened.state().total_points),
    );

    reopened.reset_game();
    let storage = reopened.end().persistence().backend().clone();
    let cleared = storage.get(STORAGE_KEY).ok().flatten().is_none();
    let fresh_again = new_session(storage, &clock);
    check(
        &mut results,
        "reset_clears_save",
        cleared && fresh_again.state() == &GameState::initial(),
        format!("cleared={}", cleared),
    );

    results
}

// ── 4. Timers ───────────────────────────────────────────────────────────

fn validate_timers(_opts: &Options) -> Vec<TestResult> {
    println!("--- Host Timers ---");
    let mut results = Vec::new();

    let (mut s, clock) = fresh(T0);
    let requested = s.request_start("Patient").is_ok();
    let early = s.tick().is_empty();
    clock.advance(Duration::from_secs(1));
    let started = s.tick().len() == 1 && s.state().game_started;
    check(
        &mut results,
        "deferred_start",
        requested && early && started,
        format!("early_noop={} started={}", early, started),
    );

    let mut unlocked_after = None;
    for step in 1..=60u64 {
        clock.advance(Duration::from_secs(10));
        s.tick();
        if s.state().is_unlocked(ids::DEDICATED) {
            unlocked_after = Some(step * 10);
            break;
        }
    }
    check(
        &mut results,
        "dedicated_after_five_minutes",
        unlocked_after == Some(300),
        format!("unlocked after {:?} s", unlocked_after),
    );

    // Speed run: every area inside a minute
    scenario_speed_run(&mut results, "speed_runner_inside_limit", "Quick", 10, true);
    scenario_speed_run(&mut results, "speed_runner_outside_limit", "Slow", 15, false);

    results
}

fn scenario_speed_run(
    results: &mut Vec<TestResult>,
    name: &str,
    player: &str,
    secs_per_area: u64,
    expect_unlock: bool,
) {
    let Some((mut s, clock, _)) = started(results, name, player) else {
        return;
    };
    for area in areas::ALL {
        clock.advance(Duration::from_secs(secs_per_area));
        s.visit_area(area);
    }
    let total = secs_per_area * areas::ALL.len() as u64;
    check(
        results,
        name,
        s.state().is_unlocked(ids::EXPLORER)
            && s.state().is_unlocked(ids::SPEED_RUNNER) == expect_unlock,
        format!("{} areas in {} s", areas::ALL.len(), total),
    );
}

// ── 5. Random Sessions ──────────────────────────────────────────────────

fn random_step(s: &mut Session, rng: &mut StdRng, lore_ids: &[String], achievement_ids: &[String]) {
    match rng.gen_range(0..8) {
        0 => {
            let area = areas::ALL[rng.gen_range(0..areas::ALL.len())];
            s.visit_area(area);
        }
        1 => {
            let id = &lore_ids[rng.gen_range(0..lore_ids.len())];
            s.discover_lore(id);
        }
        2 => {
            let id = puzzles::ALL[rng.gen_range(0..puzzles::ALL.len())];
            s.solve_puzzle(id);
        }
        3 => {
            let id = secrets::ALL[rng.gen_range(0..secrets::ALL.len())];
            s.find_secret(id);
        }
        4 => {
            let id = &achievement_ids[rng.gen_range(0..achievement_ids.len())];
            s.unlock_achievement(id);
        }
        5 => {
            s.add_experience(rng.gen_range(0..150));
        }
        _ => {
            s.increment_click();
        }
    }
}

/// Invariants every reachable state must hold. Returns the first breach.
fn invariant_breach(state: &GameState, rules: &ProgressionRules) -> Option<String> {
    if state.level != level_for_experience(state.experience, rules.experience_per_level) {
        return Some(format!(
            "level {} for experience {}",
            state.level, state.experience
        ));
    }
    let others_done = state
        .achievements
        .iter()
        .filter(|a| a.id != ids::COMPLETIONIST)
        .all(|a| a.unlocked);
    if others_done && !state.is_unlocked(ids::COMPLETIONIST) {
        return Some("all achievements unlocked but not completionist".into());
    }
    let hud = summarize(state, rules);
    if hud.level_progress_percent > 99 || hud.completion_percent > 100 {
        return Some(format!(
            "hud out of range: progress={} completion={}",
            hud.level_progress_percent, hud.completion_percent
        ));
    }
    None
}

fn validate_random_sessions(opts: &Options) -> Vec<TestResult> {
    println!("--- Random Sessions (seed {}) ---", opts.seed);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let rules = ProgressionRules::default();

    let initial = GameState::initial();
    let lore_ids: Vec<String> = initial.lore_fragments.iter().map(|l| l.id.clone()).collect();
    let achievement_ids: Vec<String> = initial.achievements.iter().map(|a| a.id.clone()).collect();

    let mut breaches = Vec::new();
    let mut regressions = 0usize;
    let mut completionists = 0usize;
    let mut toasts = 0usize;

    for session_index in 0..opts.sessions {
        let (mut s, clock) = fresh(T0 + session_index as u64 * 1_000);
        if s.start_game(&format!("Player{}", session_index)).is_err() {
            breaches.push(format!("session {}: start rejected", session_index));
            continue;
        }
        let steps = rng.gen_range(10..200);
        for _ in 0..steps {
            clock.advance(Duration::from_millis(rng.gen_range(0..5_000)));
            let before = s.state().clone();
            random_step(&mut s, &mut rng, &lore_ids, &achievement_ids);
            s.tick();
            let after = s.state();

            toasts += diff_notifications(&before, after, &rules).len();
            if after.total_points < before.total_points
                || after.unlocked_count() < before.unlocked_count()
                || after.discovered_lore_count() < before.discovered_lore_count()
            {
                regressions += 1;
            }
            if let Some(breach) = invariant_breach(after, &rules) {
                breaches.push(format!("session {}: {}", session_index, breach));
                break;
            }
        }
        if s.state().is_unlocked(ids::COMPLETIONIST) {
            completionists += 1;
        }
        if opts.verbose {
            log::info!(
                "session {}: level {} points {} achievements {}/13",
                session_index,
                s.state().level,
                s.state().total_points,
                s.state().unlocked_count()
            );
        }
    }

    check(
        &mut results,
        "random_invariants_hold",
        breaches.is_empty(),
        breaches
            .first()
            .cloned()
            .unwrap_or_else(|| format!("{} sessions clean", opts.sessions)),
    );
    check(
        &mut results,
        "random_progress_monotonic",
        regressions == 0,
        format!("{} regressions", regressions),
    );
    check(
        &mut results,
        "random_notifications_emitted",
        opts.sessions == 0 || toasts > 0,
        format!("{} toasts, {} completionists", toasts, completionists),
    );

    results
}
