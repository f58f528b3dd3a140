//! Audio cues
//!
//! Fire-and-forget: the simulation never waits on playback. Cues are derived
//! from `GameEvent`s after each frame and handed to an `AudioSink`.

use serde::{Deserialize, Serialize};

use crate::sim::state::{GameEvent, Overlay};

/// Sounds the host must be able to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Looping background music, started once at boot
    StartMusic,
    /// Shockwave released
    BombRelease,
    /// Bomb detonated before it was armed
    BombFail,
    /// Silence any playing one-shot effects
    StopEffects,
}

impl AudioCue {
    /// Asset the cue plays, if any
    pub fn asset(&self) -> Option<&'static str> {
        match self {
            AudioCue::StartMusic => Some("background.mp3"),
            AudioCue::BombRelease => Some("bombRelease.wav"),
            AudioCue::BombFail => Some("bombFail.wav"),
            AudioCue::StopEffects => None,
        }
    }

    pub fn for_event(event: &GameEvent) -> Option<AudioCue> {
        match event {
            GameEvent::Booted => Some(AudioCue::StartMusic),
            GameEvent::BombReleased { .. } => Some(AudioCue::BombRelease),
            GameEvent::BombFailed { .. } => Some(AudioCue::BombFail),
            GameEvent::OverlayDismissed {
                overlay: Overlay::GameOver,
            } => Some(AudioCue::StopEffects),
            _ => None,
        }
    }
}

/// Receiver for audio cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

impl AudioSink for Vec<AudioCue> {
    fn play(&mut self, cue: AudioCue) {
        self.push(cue);
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: u32,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues played while unmuted
    pub fn played(&self) -> u32 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        if self.muted {
            return;
        }
        self.played += 1;
        match cue.asset() {
            Some(asset) => log::debug!("Audio: {:?} ({})", cue, asset),
            None => log::debug!("Audio: {:?}", cue),
        }
    }
}

/// Play the cue for every event that has one. Returns the number of cues sent.
pub fn dispatch<'a, S, I>(events: I, sink: &mut S) -> usize
where
    S: AudioSink + ?Sized,
    I: IntoIterator<Item = &'a GameEvent>,
{
    let mut sent = 0;
    for cue in events.into_iter().filter_map(AudioCue::for_event) {
        sink.play(cue);
        sent += 1;
    }
    sent
}
