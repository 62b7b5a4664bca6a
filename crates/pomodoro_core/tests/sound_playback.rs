use pomodoro_core::{
    default_sound_catalog, AudioError, AudioOutput, PlaybackOutcome, SoundCatalog, SoundPlayer,
    SoundSource, SILENCE_SOUND_NAME,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Rewind,
    Play,
    Pause,
    Volume(f32),
}

#[derive(Default)]
struct RecordingOutput {
    calls: Vec<Call>,
    fail_play: bool,
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, locator: &str) {
        self.calls.push(Call::Load(locator.to_string()));
    }

    fn rewind(&mut self) {
        self.calls.push(Call::Rewind);
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.calls.push(Call::Play);
        if self.fail_play {
            return Err(AudioError("autoplay blocked".to_string()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
    }
}

fn player() -> SoundPlayer<RecordingOutput> {
    SoundPlayer::new(RecordingOutput::default(), default_sound_catalog().clone())
}

#[test]
fn named_sound_loads_rewinds_and_plays() {
    let mut player = player();
    let outcome = player.play_sound_effect(SoundSource::Named("Kaķis"));

    assert_eq!(
        outcome,
        PlaybackOutcome::Started {
            locator: "sound/meow.mp3".to_string()
        }
    );
    assert_eq!(
        player.output().calls,
        vec![
            Call::Load("sound/meow.mp3".to_string()),
            Call::Rewind,
            Call::Play
        ]
    );
}

#[test]
fn uri_bypasses_catalog() {
    let mut player = SoundPlayer::new(RecordingOutput::default(), SoundCatalog::new());
    let outcome = player.play_sound_effect(SoundSource::Uri("file:///tmp/bell.ogg"));
    assert_eq!(
        outcome,
        PlaybackOutcome::Started {
            locator: "file:///tmp/bell.ogg".to_string()
        }
    );
}

#[test]
fn silence_unknown_and_empty_sources_stop_playback() {
    let mut player = player();
    for source in [
        SoundSource::Named(SILENCE_SOUND_NAME),
        SoundSource::Named("Trombone"),
        SoundSource::Uri(""),
    ] {
        assert_eq!(player.play_sound_effect(source), PlaybackOutcome::Stopped);
    }
    assert_eq!(
        player.output().calls,
        vec![Call::Pause, Call::Pause, Call::Pause]
    );
}

#[test]
fn new_request_restarts_from_the_beginning() {
    let mut player = player();
    player.play_sound_effect(SoundSource::Named("Windows"));
    player.play_sound_effect(SoundSource::Named("Windows"));

    let rewinds = player
        .output()
        .calls
        .iter()
        .filter(|call| **call == Call::Rewind)
        .count();
    assert_eq!(rewinds, 2);
}

#[test]
fn play_failure_is_swallowed() {
    let output = RecordingOutput {
        fail_play: true,
        ..RecordingOutput::default()
    };
    let mut player = SoundPlayer::new(output, default_sound_catalog().clone());
    let outcome = player.play_sound_effect(SoundSource::Named("Sirēna"));
    assert!(matches!(outcome, PlaybackOutcome::Started { .. }));
}

#[test]
fn volume_percent_maps_to_unit_range() {
    let mut player = player();
    assert_eq!(player.set_volume(50.0), 0.5);
    assert_eq!(player.set_volume(100.0), 1.0);
    assert_eq!(
        player.output().calls,
        vec![Call::Volume(0.5), Call::Volume(1.0)]
    );
}
