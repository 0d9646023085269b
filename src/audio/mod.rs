//! Tone output.
//!
//! The game never talks to a sound device directly. It is handed an
//! [`AudioBackend`] and asks it to play a [`Tone`] for a duration. When no
//! device is available the game runs with [`SilentAudio`] and stays fully
//! playable through its visual feedback alone.
//!
//! With the `playback` feature a rodio-based backend is available through
//! [`open_default`], which falls back to [`SilentAudio`] when the system
//! has no usable output device.

use std::time::Duration;

#[cfg(feature = "playback")]
pub mod rodio_backend;

/// Gain applied to every tone.
pub const DEFAULT_GAIN: f32 = 0.3;

/// Frequency of the game-over buzz.
pub const ERROR_TONE_HZ: f32 = 150.0;

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Sawtooth => "sawtooth",
        }
    }

    /// Sample the waveform at `phase` in cycles, in the range -1.0..=1.0.
    pub fn sample(&self, phase: f32) -> f32 {
        let phase = phase.fract();
        match self {
            Self::Sine => (phase * std::f32::consts::TAU).sin(),
            Self::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// A single audible cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub gain: f32,
}

impl Tone {
    pub const fn sine(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            waveform: Waveform::Sine,
            gain: DEFAULT_GAIN,
        }
    }

    /// The buzz played when the player makes a mistake.
    pub const fn error() -> Self {
        Self {
            frequency_hz: ERROR_TONE_HZ,
            waveform: Waveform::Sawtooth,
            gain: DEFAULT_GAIN,
        }
    }

    /// Render the tone into mono samples.
    pub fn render(&self, sample_rate: u32, duration: Duration) -> Vec<f32> {
        let count = (duration.as_secs_f64() * sample_rate as f64).round() as usize;
        let step = self.frequency_hz / sample_rate as f32;
        (0..count)
            .map(|i| self.waveform.sample(i as f32 * step) * self.gain)
            .collect()
    }
}

/// Audio errors.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// No output device could be opened
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device refused to play a tone
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Something that can make a noise.
///
/// `play` must not block; the tone is expected to run in the background for
/// `duration`.
pub trait AudioBackend {
    fn play(&mut self, tone: Tone, duration: Duration) -> Result<(), AudioError>;

    /// Name used in log output.
    fn name(&self) -> &'static str;
}

/// Backend that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn play(&mut self, _tone: Tone, _duration: Duration) -> Result<(), AudioError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

/// Open the system output device, or fall back to silence.
#[cfg(feature = "playback")]
pub fn open_default() -> Box<dyn AudioBackend> {
    match rodio_backend::RodioAudio::open() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            Box::new(SilentAudio)
        }
    }
}

/// Open the system output device, or fall back to silence.
#[cfg(not(feature = "playback"))]
pub fn open_default() -> Box<dyn AudioBackend> {
    log::debug!("built without the playback feature; using silent audio");
    Box::new(SilentAudio)
}
