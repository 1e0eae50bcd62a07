use wavescope::ControlError;
use wavescope::data::AudioData;
use wavescope::error::Result;
use wavescope::playback::{PlaybackController, PlaybackDevice, PlaybackState, SliceAnimator};

/// Device whose clock only moves when the test says so.
#[derive(Default)]
struct ManualClock {
    media_seconds: Option<f64>,
    position: f64,
    running: bool,
    paused: bool,
    seeks: Vec<f64>,
}

impl ManualClock {
    fn run_for(&mut self, seconds: f64) {
        let Some(total) = self.media_seconds else { return };
        if self.running && !self.paused {
            self.position = (self.position + seconds).min(total);
            if self.position >= total {
                self.running = false;
            }
        }
    }
}

impl PlaybackDevice for ManualClock {
    fn load(&mut self, audio: &AudioData) -> Result<()> {
        self.media_seconds = Some(audio.duration_seconds());
        self.position = 0.0;
        Ok(())
    }
    fn play(&mut self) {
        self.position = 0.0;
        self.running = true;
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
        self.running && !self.paused
    }
    fn has_media(&self) -> bool {
        self.media_seconds.is_some()
    }
}

fn ten_second_clip() -> AudioData {
    AudioData {
        samples: vec![0.0; 441_000],
        sample_rate: 44100,
        channels: 1,
    }
}

/// Mirrors one window session: the controller and the animator share no
/// clock, just like the timer and the device in the viewer.
struct Session {
    controller: PlaybackController<ManualClock>,
    animator: SliceAnimator,
}

impl Session {
    fn start() -> Self {
        let mut controller = PlaybackController::new(ManualClock::default(), 10);
        controller.start(&ten_second_clip()).unwrap();
        Self {
            controller,
            animator: SliceAnimator::new(430, 10),
        }
    }

    /// One timer tick of `seconds` of device time.
    fn tick(&mut self, seconds: f64) {
        self.animator.tick();
        self.controller.device_mut().run_for(seconds);
        self.controller.poll();
    }

    fn slide_to(&mut self, frame: usize) -> std::result::Result<f64, ControlError> {
        self.animator.jump_to(frame);
        self.controller.seek(frame)
    }
}

#[test]
fn pause_and_resume_keep_the_device_position() {
    let mut s = Session::start();
    for _ in 0..5 {
        s.tick(0.05);
    }
    s.controller.pause().unwrap();
    let paused_at = s.controller.position_seconds();

    // Timer keeps running while paused; the device does not
    for _ in 0..5 {
        s.tick(0.05);
    }
    assert_eq!(s.controller.position_seconds(), paused_at);

    s.controller.resume().unwrap();
    assert!((s.controller.position_seconds() - paused_at).abs() < 1e-9);
    assert_eq!(s.controller.state(), PlaybackState::Playing);
    // The animation walked on regardless
    assert_eq!(s.animator.counter(), 10);
}

#[test]
fn slider_seeks_with_the_literal_formula() {
    let mut s = Session::start();
    let target = s.slide_to(215).unwrap();

    assert!((target - 0.0488).abs() < 1e-4);
    assert_eq!(s.animator.displayed(), 215..225);
    assert_eq!(s.controller.device().seeks, vec![target]);
}

#[test]
fn slider_while_paused_moves_the_picture_only() {
    let mut s = Session::start();
    s.tick(2.0);
    s.controller.pause().unwrap();

    assert_eq!(s.slide_to(300), Err(ControlError::NotPlaying));
    assert_eq!(s.animator.displayed(), 300..310);
    assert_eq!(s.controller.state(), PlaybackState::Paused);
    assert_eq!(s.controller.position_seconds(), 2.0);
    assert!(s.controller.device().seeks.is_empty());
}

#[test]
fn slider_does_not_reset_the_animation_counter() {
    let mut s = Session::start();
    s.tick(0.05);
    s.tick(0.05);
    s.slide_to(400).unwrap();

    s.tick(0.05);
    // Next tick follows the timer's own counter, not the slider
    assert_eq!(s.animator.displayed(), 20..30);
}

#[test]
fn end_of_media_stops_while_the_animation_may_still_run() {
    let mut s = Session::start();
    s.tick(10.5);
    assert_eq!(s.controller.state(), PlaybackState::Stopped);
    assert!(!s.animator.is_finished());

    assert_eq!(s.slide_to(10), Err(ControlError::NotPlaying));
    assert_eq!(s.controller.resume(), Err(ControlError::NotPaused));
}

#[test]
fn animation_stops_after_all_slices_and_does_not_repeat() {
    let mut s = Session::start();
    for _ in 0..43 {
        s.tick(0.01);
    }
    assert!(s.animator.is_finished());
    let last = s.animator.displayed();
    s.tick(0.01);
    assert_eq!(s.animator.displayed(), last);
    assert_eq!(last, 420..430);
}
