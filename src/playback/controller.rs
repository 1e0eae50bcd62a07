use super::PlaybackDevice;
use super::sync_loop::seek_target_seconds;
use crate::data::AudioData;
use crate::error::{ControlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Play/pause/seek state machine in front of an output device.
///
/// ```text
///   Stopped --start--> Playing <--pause/resume--> Paused
///   Playing --(device runs out of media, seen by poll)--> Stopped
/// ```
///
/// Every command checks the current state first; refused commands leave the
/// device untouched, log a warning and return the reason.
pub struct PlaybackController<D: PlaybackDevice> {
    device: D,
    state: PlaybackState,
    sample_rate: u32,
    slice_columns: usize,
}

impl<D: PlaybackDevice> PlaybackController<D> {
    pub fn new(device: D, slice_columns: usize) -> Self {
        Self {
            device,
            state: PlaybackState::Stopped,
            sample_rate: 0,
            slice_columns,
        }
    }

    /// Load the media and start playing from the top.
    pub fn start(&mut self, audio: &AudioData) -> Result<()> {
        self.device.load(audio)?;
        self.sample_rate = audio.sample_rate;
        self.device.play();
        self.state = PlaybackState::Playing;
        tracing::info!(
            "Playing {:.2}s of audio ({} Hz, {} ch)",
            audio.duration_seconds(),
            audio.sample_rate,
            audio.channels
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.poll();
        if self.state != PlaybackState::Playing {
            return Err(self.refuse(ControlError::NotPlaying));
        }
        self.device.pause();
        self.state = PlaybackState::Paused;
        tracing::debug!("paused at {:.3}s", self.device.position_seconds());
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), ControlError> {
        if self.state != PlaybackState::Paused {
            return Err(self.refuse(ControlError::NotPaused));
        }
        self.device.unpause();
        self.state = PlaybackState::Playing;
        tracing::debug!("resumed at {:.3}s", self.device.position_seconds());
        Ok(())
    }

    /// Slider moved to `frame`. Seeks only while actually playing; never
    /// starts playback. Returns the target time in seconds.
    pub fn seek(&mut self, frame: usize) -> Result<f64, ControlError> {
        if !self.device.has_media() {
            return Err(self.refuse(ControlError::NotLoaded));
        }
        self.poll();
        if self.state != PlaybackState::Playing || !self.device.is_busy() {
            return Err(self.refuse(ControlError::NotPlaying));
        }
        let target = seek_target_seconds(frame, self.slice_columns, self.sample_rate);
        self.device.seek(target);
        tracing::debug!("seek frame {} -> {:.4}s", frame, target);
        Ok(target)
    }

    /// Catch the device finishing on its own.
    pub fn poll(&mut self) -> PlaybackState {
        if self.state == PlaybackState::Playing && !self.device.is_busy() {
            tracing::info!("Playback finished");
            self.state = PlaybackState::Stopped;
        }
        self.state
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position_seconds(&self) -> f64 {
        self.device.position_seconds()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn refuse(&self, reason: ControlError) -> ControlError {
        tracing::warn!("{}", reason);
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory device: position only moves when a test advances it.
    #[derive(Default)]
    struct FakeDevice {
        pub loaded: bool,
        pub playing: bool,
        pub paused: bool,
        pub position: f64,
        pub duration: f64,
        pub seeks: Vec<f64>,
        pub play_calls: usize,
    }

    impl FakeDevice {
        pub fn advance(&mut self, seconds: f64) {
            if self.playing && !self.paused {
                self.position += seconds;
                if self.position >= self.duration {
                    self.position = self.duration;
                    self.playing = false;
                }
            }
        }
    }

    impl PlaybackDevice for FakeDevice {
        fn load(&mut self, audio: &AudioData) -> Result<()> {
            self.loaded = true;
            self.position = 0.0;
            self.duration = audio.duration_seconds();
            Ok(())
        }
        fn play(&mut self) {
            self.play_calls += 1;
            self.position = 0.0;
            self.playing = true;
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn unpause(&mut self) {
            self.paused = false;
        }
        fn seek(&mut self, seconds: f64) {
            self.seeks.push(seconds);
            self.position = seconds;
        }
        fn position_seconds(&self) -> f64 {
            self.position
        }
        fn is_busy(&self) -> bool {
            self.playing && !self.paused
        }
        fn has_media(&self) -> bool {
            self.loaded
        }
    }

    fn ten_seconds() -> AudioData {
        AudioData {
            samples: vec![0.0; 441000],
            sample_rate: 44100,
            channels: 1,
        }
    }

    fn started() -> PlaybackController<FakeDevice> {
        let mut c = PlaybackController::new(FakeDevice::default(), 10);
        c.start(&ten_seconds()).unwrap();
        c
    }

    #[test]
    fn test_starts_playing() {
        let c = started();
        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.device().play_calls, 1);
    }

    #[test]
    fn test_pause_resume_keeps_position() {
        let mut c = started();
        c.device.advance(1.25);
        c.pause().unwrap();
        let at_pause = c.position_seconds();

        c.device.advance(3.0); // wall clock passes while paused
        c.resume().unwrap();

        assert_eq!(c.state(), PlaybackState::Playing);
        assert!((c.position_seconds() - at_pause).abs() < 1e-9);
        assert!(c.device().seeks.is_empty());
        assert_eq!(c.device().play_calls, 1);
    }

    #[test]
    fn test_seek_while_playing_uses_literal_formula() {
        let mut c = started();
        let target = c.seek(215).unwrap();
        assert!((target - 215.0 * 10.0 / 44100.0).abs() < 1e-12);
        assert!((target - 0.0488).abs() < 1e-4);
        assert_eq!(c.device().seeks, vec![target]);
    }

    #[test]
    fn test_seek_while_paused_is_refused() {
        let mut c = started();
        c.device.advance(2.0);
        c.pause().unwrap();

        assert_eq!(c.seek(100), Err(ControlError::NotPlaying));
        assert_eq!(c.state(), PlaybackState::Paused);
        assert!(!c.device().is_busy());
        assert_eq!(c.position_seconds(), 2.0);
        assert!(c.device().seeks.is_empty());
    }

    #[test]
    fn test_seek_before_load_is_refused() {
        let mut c = PlaybackController::new(FakeDevice::default(), 10);
        assert_eq!(c.seek(3), Err(ControlError::NotLoaded));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut c = started();
        assert_eq!(c.resume(), Err(ControlError::NotPaused));
        c.pause().unwrap();
        assert_eq!(c.pause(), Err(ControlError::NotPlaying));
        assert_eq!(c.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_end_of_media_stops() {
        let mut c = started();
        c.device.advance(11.0);
        assert_eq!(c.poll(), PlaybackState::Stopped);
        assert_eq!(c.seek(5), Err(ControlError::NotPlaying));
        assert_eq!(c.resume(), Err(ControlError::NotPaused));
    }
}
