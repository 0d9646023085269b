//! Audio output through rodio.

use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};

use super::{AudioBackend, AudioError, Tone};

const SAMPLE_RATE: u32 = 44_100;

/// Plays tones on the default output device.
///
/// Each tone is rendered up front and handed to the mixer, so overlapping
/// tones (an echo on top of a fading presentation tone) simply mix.
pub struct RodioAudio {
    /// Must outlive the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioAudio {
    pub fn open() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        log::debug!("opened default audio output");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioBackend for RodioAudio {
    fn play(&mut self, tone: Tone, duration: Duration) -> Result<(), AudioError> {
        let samples = tone.render(SAMPLE_RATE, duration);
        self.handle
            .play_raw(SamplesBuffer::new(1, SAMPLE_RATE, samples))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

impl std::fmt::Debug for RodioAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudio").finish_non_exhaustive()
    }
}
