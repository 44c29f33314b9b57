//! Portfolio Quest Core: the stateful shell around the pure game logic.
//!
//! | Module          | Purpose                                              |
//! |-----------------|------------------------------------------------------|
//! | [`clock`]       | System and hand-driven time sources                  |
//! | [`storage`]     | Key/value backends (memory, directory of files)      |
//! | [`persistence`] | JSON save/load of the whole state under one key      |
//! | [`store`]       | Single owner of the state; dispatch, publish, save   |
//! | [`timers`]      | Deferred start and the recurring `dedicated` poll    |
//! | [`session`]     | Per-intent entry points plus timer driving           |
//! | [`config`]      | Host configuration file                              |

pub mod clock;
pub mod config;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod store;
pub mod timers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, QuestConfig};
pub use persistence::{PersistError, PersistenceAdapter, STORAGE_KEY};
pub use session::GameSession;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::{ProgressStore, SubscriptionId};

/// Open the saved game described by `config` on disk and wrap it in a
/// session driven by the wall clock.
pub fn open_file_session(config: &QuestConfig) -> GameSession<FileStorage, SystemClock> {
    let storage = FileStorage::new(config.resolved_storage_dir());
    let persistence = PersistenceAdapter::with_key(storage, config.storage_key.clone());
    let store = ProgressStore::open(persistence, SystemClock, config.rules.clone());
    GameSession::with_config(store, config)
}
