//! Audio cues driven by game events
//!
//! Procedurally generated sound effects - no external files needed! The
//! director turns each tick's events into [`AudioCommand`]s; a host plays
//! them on whatever device it has, or renders them to PCM with
//! [`ToneSpec::render`] and [`MusicLoop::render`].

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;
use crate::tuning::Variant;

/// Peak gain at the start of a cue
const CUE_START_GAIN: f32 = 0.3;
/// Gain the exponential ramp reaches at the end of a cue
const CUE_END_GAIN: f32 = 0.01;

/// Oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// One sample at `phase` cycles (fractional part used)
    pub fn sample(&self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }
}

/// A single decaying tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
}

impl ToneSpec {
    pub const fn new(frequency_hz: f32, duration_secs: f32, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration_secs,
            waveform,
        }
    }

    /// Gain at `t` seconds: exponential ramp from 0.3 to 0.01 over the duration
    pub fn gain_at(&self, t: f32) -> f32 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        let progress = (t / self.duration_secs).clamp(0.0, 1.0);
        CUE_START_GAIN * (CUE_END_GAIN / CUE_START_GAIN).powf(progress)
    }

    /// Mono f32 PCM at `sample_rate`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let samples = (self.duration_secs.max(0.0) * rate).round() as usize;
        (0..samples)
            .map(|i| {
                let t = i as f32 / rate;
                self.waveform.sample(self.frequency_hz * t) * self.gain_at(t)
            })
            .collect()
    }
}

/// A looping background track built from sine partials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicLoop {
    pub duration_secs: f32,
    /// (frequency Hz, amplitude) pairs
    pub partials: Vec<(f32, f32)>,
    /// Playback volume
    pub volume: f32,
}

impl MusicLoop {
    /// Mono f32 PCM for one loop, shaped by a slow sine swell
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let samples = (self.duration_secs.max(0.0) * rate).round() as usize;
        (0..samples)
            .map(|i| {
                let t = i as f32 / rate;
                let mix: f32 = self
                    .partials
                    .iter()
                    .map(|&(freq, amp)| (TAU * freq * t).sin() * amp)
                    .sum();
                let envelope = (TAU * t / self.duration_secs).sin() * 0.5 + 0.5;
                mix * envelope
            })
            .collect()
    }
}

/// Cues for one variant
#[derive(Debug, Clone, PartialEq)]
pub struct CueTable {
    pub point: ToneSpec,
    pub life_lost: ToneSpec,
    pub game_over: ToneSpec,
    pub music: Option<MusicLoop>,
}

impl CueTable {
    pub fn for_variant(variant: Variant) -> Self {
        let game_over = ToneSpec::new(150.0, 1.5, Waveform::Sawtooth);
        match variant {
            Variant::Aquatic => Self {
                point: ToneSpec::new(1000.0, 0.2, Waveform::Sine),
                life_lost: ToneSpec::new(250.0, 0.7, Waveform::Square),
                game_over,
                music: None,
            },
            Variant::Aviation => Self {
                point: ToneSpec::new(600.0, 0.1, Waveform::Sine),
                life_lost: ToneSpec::new(250.0, 0.8, Waveform::Triangle),
                game_over,
                music: Some(MusicLoop {
                    duration_secs: 4.0,
                    partials: vec![(440.0, 0.1), (220.0, 0.08), (60.0, 0.05)],
                    volume: 0.3,
                }),
            },
            Variant::ObstacleCourse => Self {
                point: ToneSpec::new(1000.0, 0.2, Waveform::Sine),
                life_lost: ToneSpec::new(250.0, 0.7, Waveform::Square),
                game_over,
                music: Some(MusicLoop {
                    duration_secs: 3.0,
                    partials: vec![(440.0, 0.1), (554.0, 0.05), (2.0, 0.03)],
                    volume: 0.2,
                }),
            },
        }
    }
}

/// What the host audio device should do
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    PlayTone { tone: ToneSpec, volume: f32 },
    StartMusic { track: MusicLoop, volume: f32 },
    StopMusic,
}

/// Maps game events to audio commands under the user's audio preferences
#[derive(Debug, Clone)]
pub struct AudioDirector {
    cues: CueTable,
    sfx_enabled: bool,
    music_enabled: bool,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl AudioDirector {
    pub fn new(variant: Variant) -> Self {
        Self {
            cues: CueTable::for_variant(variant),
            sfx_enabled: true,
            music_enabled: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_playing: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut director = Self::new(settings.variant);
        director.sfx_enabled = settings.sfx_enabled;
        director.music_enabled = settings.music_enabled;
        director.set_master_volume(settings.master_volume);
        director.set_sfx_volume(settings.sfx_volume);
        director.set_music_volume(settings.music_volume);
        director
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted || !self.sfx_enabled {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn tone(&self, tone: ToneSpec) -> Option<AudioCommand> {
        let volume = self.effective_sfx_volume();
        (volume > 0.0).then_some(AudioCommand::PlayTone { tone, volume })
    }

    fn start_music(&mut self) -> Option<AudioCommand> {
        if self.music_playing || !self.music_enabled || self.muted {
            return None;
        }
        let track = self.cues.music.clone()?;
        self.music_playing = true;
        let volume = track.volume * self.music_volume * self.master_volume;
        Some(AudioCommand::StartMusic { track, volume })
    }

    fn stop_music(&mut self) -> Option<AudioCommand> {
        if !self.music_playing {
            return None;
        }
        self.music_playing = false;
        Some(AudioCommand::StopMusic)
    }

    /// Commands for one tick's events, in event order
    pub fn handle_events(&mut self, events: &[GameEvent]) -> Vec<AudioCommand> {
        let mut commands = Vec::new();
        for event in events {
            let command = match event {
                GameEvent::Collected { .. } => self.tone(self.cues.point),
                GameEvent::Penalized { .. } => self.tone(self.cues.life_lost),
                GameEvent::GameOver { .. } => {
                    commands.extend(self.stop_music());
                    self.tone(self.cues.game_over)
                }
            };
            commands.extend(command);
        }
        commands
    }

    /// A new game started
    pub fn on_reset(&mut self) -> Option<AudioCommand> {
        self.start_music()
    }

    pub fn toggle_music(&mut self) -> Option<AudioCommand> {
        self.music_enabled = !self.music_enabled;
        if self.music_enabled {
            self.start_music()
        } else {
            self.stop_music()
        }
    }

    pub fn toggle_sfx(&mut self) {
        self.sfx_enabled = !self.sfx_enabled;
    }
}
