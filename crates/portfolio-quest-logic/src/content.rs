//! Game content: areas, puzzles, secrets, achievements, lore.
//!
//! Identifiers are plain `&str` constants so UI collaborators and tests can
//! refer to them without pulling in any state type. The catalog functions
//! build the fixed initial entity lists every new game starts from.

use crate::state::{Achievement, LoreFragment};

/// Player name used before the start screen has been submitted.
pub const DEFAULT_PLAYER_NAME: &str = "Adventurer";

pub mod achievement_ids {
    pub const FIRST_SPAWN: &str = "first_spawn";
    pub const EXPLORER: &str = "explorer";
    pub const LORE_HUNTER: &str = "lore_hunter";
    pub const PUZZLE_MASTER: &str = "puzzle_master";
    pub const STORY_SEEKER: &str = "story_seeker";
    pub const PROJECT_VIEWER: &str = "project_viewer";
    pub const SPEED_RUNNER: &str = "speed_runner";
    pub const CURIOUS_ONE: &str = "curious_one";
    pub const LORE_MASTER: &str = "lore_master";
    pub const PUZZLE_SOLVER: &str = "puzzle_solver";
    pub const SECRET_FINDER: &str = "secret_finder";
    pub const DEDICATED: &str = "dedicated";
    pub const COMPLETIONIST: &str = "completionist";
}

/// Map areas. Each one is also a page section.
pub mod areas {
    pub const SPAWN: &str = "spawn";
    pub const STATS: &str = "stats";
    pub const INVENTORY: &str = "inventory";
    pub const JOURNEY: &str = "journey";
    pub const PUZZLE: &str = "puzzle";

    pub const ALL: [&str; 5] = [SPAWN, STATS, INVENTORY, JOURNEY, PUZZLE];
}

/// Where a lore fragment is hidden.
pub mod lore_locations {
    pub const MAP: &str = "map";
    pub const PUZZLE: &str = "puzzle";
    pub const STORY: &str = "story";
    pub const PROJECTS: &str = "projects";
    pub const JOURNEY: &str = "journey";
    pub const SPAWN: &str = "spawn";
}

pub mod puzzles {
    pub const WORD_PUZZLE: &str = "word_puzzle";
    pub const CIPHER_PUZZLE: &str = "cipher_puzzle";
    pub const MEMORY_PUZZLE: &str = "memory_puzzle";

    pub const ALL: [&str; 3] = [WORD_PUZZLE, CIPHER_PUZZLE, MEMORY_PUZZLE];
}

pub mod secrets {
    pub const SECRET_CORNER: &str = "secret_corner";
    pub const SECRET_TOP: &str = "secret_top";

    pub const ALL: [&str; 2] = [SECRET_CORNER, SECRET_TOP];
}

fn achievement(id: &str, title: &str, description: &str, points: u64, icon: &str) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        points,
        unlocked: false,
        icon: icon.to_string(),
    }
}

fn lore(id: &str, title: &str, content: &str, location: &str) -> LoreFragment {
    LoreFragment {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        discovered: false,
        location: location.to_string(),
    }
}

/// All achievements in display order, every one locked.
pub fn initial_achievements() -> Vec<Achievement> {
    use achievement_ids::*;

    vec![
        achievement(FIRST_SPAWN, "First Spawn", "Enter the world for the first time", 10, "⚔"),
        achievement(EXPLORER, "Explorer", "Visit all areas on the map", 50, "🗺"),
        achievement(LORE_HUNTER, "Lore Hunter", "Discover 3 lore fragments", 30, "📜"),
        achievement(PUZZLE_MASTER, "Puzzle Master", "Solve your first puzzle", 25, "🧩"),
        achievement(STORY_SEEKER, "Story Seeker", "Read the developer's story", 15, "📖"),
        achievement(PROJECT_VIEWER, "Project Viewer", "View a project in the inventory", 20, "🎮"),
        achievement(SPEED_RUNNER, "Speed Runner", "Visit all areas in under 60 seconds", 40, "⚡"),
        achievement(CURIOUS_ONE, "Curious One", "Click on 50 interactive elements", 25, "🔍"),
        achievement(LORE_MASTER, "Lore Master", "Discover all lore fragments", 75, "📚"),
        achievement(PUZZLE_SOLVER, "All Puzzles Complete", "Solve all available puzzles", 60, "🏆"),
        achievement(SECRET_FINDER, "Secret Finder", "Discover a hidden secret", 35, "🔮"),
        achievement(DEDICATED, "Dedicated Explorer", "Spend 5 minutes exploring", 30, "⏰"),
        achievement(COMPLETIONIST, "Completionist", "Unlock all other achievements", 100, "👑"),
    ]
}

/// All lore fragments in discovery-priority order, none discovered.
pub fn initial_lore_fragments() -> Vec<LoreFragment> {
    use lore_locations::*;

    vec![
        lore(
            "lore_1",
            "The Beginning",
            "Every great developer starts with a simple 'Hello World'...",
            MAP,
        ),
        lore(
            "lore_2",
            "The First Bug",
            "It was 3 AM when the bug was found. Coffee was the only ally...",
            PUZZLE,
        ),
        lore(
            "lore_3",
            "The Revelation",
            "Games aren't just played. They're experienced, lived, remembered...",
            STORY,
        ),
        lore(
            "lore_4",
            "The Code",
            "Behind every pixel lies a thousand lines of passion...",
            PROJECTS,
        ),
        lore(
            "lore_5",
            "The Dream",
            "To create worlds where others can escape, even for a moment...",
            MAP,
        ),
        lore(
            "lore_6",
            "The Journey",
            "Every game shipped is a battle won. Every bug fixed, a lesson learned.",
            JOURNEY,
        ),
        lore(
            "lore_7",
            "The Philosophy",
            "Code is poetry. Games are symphonies. Players are the audience that makes it real.",
            SPAWN,
        ),
    ]
}
