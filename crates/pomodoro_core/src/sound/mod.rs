//! Sound effects: named catalog plus a playback helper over an injected
//! audio output.
//!
//! # Invariants
//! - An empty locator means silence; resolving to it stops playback.
//! - A new playback request interrupts whatever is currently playing.

pub mod catalog;
pub mod player;

pub use catalog::{default_sound_catalog, SoundCatalog, SILENCE_SOUND_NAME};
pub use player::{
    AudioError, AudioOutput, NullAudioOutput, PlaybackOutcome, SoundPlayer, SoundSource,
};
