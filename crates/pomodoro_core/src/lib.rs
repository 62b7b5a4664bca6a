//! Core state for the Pomodoro timer client.
//! This crate is the single source of truth for to-do, preference and
//! sound-effect invariants; presentation layers only call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod observable;
pub mod preferences;
pub mod sound;
pub mod stats;
pub mod storage;
pub mod todo_store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{TodoId, TodoItem};
pub use observable::{Observable, Subscription};
pub use preferences::{
    default_preference_values, find_preference, preference_sections, validate_preference_value,
    Preference, PreferenceError, PreferenceKind, PreferenceValue, PreferencesSection,
};
pub use sound::{
    default_sound_catalog, AudioError, AudioOutput, NullAudioOutput, PlaybackOutcome,
    SoundCatalog, SoundPlayer, SoundSource, SILENCE_SOUND_NAME,
};
pub use stats::{median, PomodoroCycle, Segment, Statistics};
pub use storage::{
    KeyValueStore, MemoryStore, NullStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use todo_store::{
    decode_snapshot, encode_snapshot, Clock, LoadPolicy, SnapshotError, SystemClock, TodoError,
    TodoResult, TodoStore, TodoStoreOptions, DEFAULT_TODOS_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
