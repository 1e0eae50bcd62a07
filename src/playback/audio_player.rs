use miniaudio::{Device, DeviceConfig, DeviceType, Format};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{PlaybackDevice, PlaybackState};
use crate::data::AudioData;
use crate::error::{PipelineError, Result};

/// miniaudio output. The device callback runs on miniaudio's thread and
/// pulls interleaved frames out of the shared `PlaybackData`.
pub struct AudioPlayer {
    device: Option<Device>,
    device_format: Option<(u32, u16)>,
    playback_data: Arc<Mutex<PlaybackData>>,
}

struct PlaybackData {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    /// In frames, not samples
    position: usize,
    state: PlaybackState,
}

impl PlaybackData {
    fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Copy the next interleaved frames into `out`. Silence unless playing;
    /// running past the end goes quiet and stops reporting busy.
    fn fill(&mut self, out: &mut [f32]) {
        if self.state != PlaybackState::Playing {
            out.fill(0.0);
            return;
        }

        let channels = self.channels.max(1) as usize;
        let total = self.frame_count();
        for frame in out.chunks_mut(channels) {
            if self.position >= total {
                self.state = PlaybackState::Stopped;
                frame.fill(0.0);
                continue;
            }
            let start = self.position * channels;
            frame.copy_from_slice(&self.samples[start..start + frame.len()]);
            self.position += 1;
        }
    }
}

fn lock(data: &Mutex<PlaybackData>) -> MutexGuard<'_, PlaybackData> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self {
            device: None,
            device_format: None,
            playback_data: Arc::new(Mutex::new(PlaybackData {
                samples: Vec::new(),
                sample_rate: 48000,
                channels: 1,
                position: 0,
                state: PlaybackState::Stopped,
            })),
        }
    }

    fn init_device(&mut self, sample_rate: u32, channels: u16) -> Result<()> {
        let playback_data = Arc::clone(&self.playback_data);

        let mut config = DeviceConfig::new(DeviceType::Playback);
        config.playback_mut().set_format(Format::F32);
        config.playback_mut().set_channels(u32::from(channels));
        config.set_sample_rate(sample_rate);

        config.set_data_callback(move |_device, output, _input| {
            lock(&playback_data).fill(output.as_samples_mut::<f32>());
        });

        let device = Device::new(None, &config)
            .map_err(|e| PipelineError::Device(format!("Failed to create audio device: {:?}", e)))?;

        device
            .start()
            .map_err(|e| PipelineError::Device(format!("Failed to start audio device: {:?}", e)))?;

        tracing::debug!("audio device started: {} Hz, {} ch", sample_rate, channels);
        self.device = Some(device);
        self.device_format = Some((sample_rate, channels));

        Ok(())
    }
}

impl PlaybackDevice for AudioPlayer {
    fn load(&mut self, audio: &AudioData) -> Result<()> {
        {
            let mut data = lock(&self.playback_data);
            data.state = PlaybackState::Stopped;
            data.samples = audio.samples.clone();
            data.sample_rate = audio.sample_rate;
            data.channels = audio.channels.max(1);
            data.position = 0;
        }

        let format = (audio.sample_rate, audio.channels.max(1));
        if self.device_format != Some(format) {
            // Dropping the old device stops its callback
            self.device = None;
            self.init_device(format.0, format.1)?;
        }

        Ok(())
    }

    fn play(&mut self) {
        let mut data = lock(&self.playback_data);
        data.position = 0;
        data.state = PlaybackState::Playing;
    }

    fn pause(&mut self) {
        let mut data = lock(&self.playback_data);
        if data.state == PlaybackState::Playing {
            data.state = PlaybackState::Paused;
        }
    }

    fn unpause(&mut self) {
        let mut data = lock(&self.playback_data);
        if data.state == PlaybackState::Paused {
            data.state = PlaybackState::Playing;
        }
    }

    fn seek(&mut self, seconds: f64) {
        let mut data = lock(&self.playback_data);
        let frame = (seconds.max(0.0) * data.sample_rate as f64) as usize;
        data.position = frame.min(data.frame_count());
    }

    fn position_seconds(&self) -> f64 {
        let data = lock(&self.playback_data);
        data.position as f64 / data.sample_rate as f64
    }

    fn is_busy(&self) -> bool {
        lock(&self.playback_data).state == PlaybackState::Playing
    }

    fn has_media(&self) -> bool {
        !lock(&self.playback_data).samples.is_empty()
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}
