//! Volume-controlled playback of catalog sounds.

use super::catalog::SoundCatalog;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_VOLUME_PERCENT: f32 = 100.0;

/// Failure reported by an audio backend when starting playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioError(pub String);

impl Display for AudioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "audio playback failed: {}", self.0)
    }
}

impl Error for AudioError {}

/// Single shared audio output channel.
pub trait AudioOutput {
    /// Replaces the current source.
    fn load(&mut self, locator: &str);
    /// Moves the playback position back to the start.
    fn rewind(&mut self);
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}

/// Output that accepts every call and plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioOutput;

impl AudioOutput for NullAudioOutput {
    fn load(&mut self, _locator: &str) {}
    fn rewind(&mut self) {}
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
}

/// What to play: a catalog name or a direct locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSource<'a> {
    Named(&'a str),
    Uri(&'a str),
}

/// Result of a playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Playback of the resolved locator was requested.
    Started { locator: String },
    /// Nothing resolved; current playback was paused.
    Stopped,
}

/// Plays sound effects through one long-lived output.
pub struct SoundPlayer<A: AudioOutput> {
    output: A,
    catalog: SoundCatalog,
}

impl<A: AudioOutput> SoundPlayer<A> {
    pub fn new(output: A, catalog: SoundCatalog) -> Self {
        Self { output, catalog }
    }

    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    /// Resolves `source` and restarts playback from the beginning.
    ///
    /// Unknown names and the silence entry pause the output instead. Backend
    /// playback failures are logged, not returned.
    pub fn play_sound_effect(&mut self, source: SoundSource<'_>) -> PlaybackOutcome {
        let locator = match source {
            SoundSource::Uri(uri) => Some(uri),
            SoundSource::Named(name) => self.catalog.locator(name),
        }
        .filter(|locator| !locator.is_empty())
        .map(str::to_owned);

        let Some(locator) = locator else {
            debug!("event=sound_stop module=sound status=ok source={source:?}");
            self.output.pause();
            return PlaybackOutcome::Stopped;
        };

        debug!("event=sound_play module=sound status=start locator={locator}");
        self.output.load(&locator);
        self.output.rewind();
        if let Err(err) = self.output.play() {
            warn!("event=sound_play module=sound status=error locator={locator} error={err}");
        }
        PlaybackOutcome::Started { locator }
    }

    /// Sets output volume from a percentage, clamped to `0..=100`.
    ///
    /// Returns the applied `0.0..=1.0` volume.
    pub fn set_volume(&mut self, percent: f32) -> f32 {
        let clamped = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, MAX_VOLUME_PERCENT)
        };
        let volume = clamped / MAX_VOLUME_PERCENT;
        self.output.set_volume(volume);
        volume
    }
}

#[cfg(test)]
mod tests {
    use super::{NullAudioOutput, PlaybackOutcome, SoundPlayer, SoundSource};
    use crate::sound::catalog::default_sound_catalog;

    #[test]
    fn named_source_resolves_through_catalog() {
        let mut player = SoundPlayer::new(NullAudioOutput, default_sound_catalog().clone());
        assert_eq!(
            player.play_sound_effect(SoundSource::Named("Minecraft")),
            PlaybackOutcome::Started {
                locator: "sound/minecraft.mp3".to_string()
            }
        );
    }

    #[test]
    fn volume_scales_and_clamps() {
        let mut player = SoundPlayer::new(NullAudioOutput, default_sound_catalog().clone());
        assert_eq!(player.set_volume(50.0), 0.5);
        assert_eq!(player.set_volume(100.0), 1.0);
        assert_eq!(player.set_volume(250.0), 1.0);
        assert_eq!(player.set_volume(-3.0), 0.0);
        assert_eq!(player.set_volume(f32::NAN), 0.0);
    }
}
