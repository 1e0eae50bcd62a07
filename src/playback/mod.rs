pub mod audio_player;
pub mod controller;
pub mod sync_loop;

pub use audio_player::AudioPlayer;
pub use controller::{PlaybackController, PlaybackState};
pub use sync_loop::{SliceAnimator, seek_target_seconds};

use crate::data::AudioData;
use crate::error::Result;

/// The commands the controller issues to an output device. The device runs
/// on its own clock; these calls only change what it does next.
pub trait PlaybackDevice {
    /// Replace the device's media and rewind. Does not start output.
    fn load(&mut self, audio: &AudioData) -> Result<()>;
    /// Start from the beginning of the loaded media.
    fn play(&mut self);
    fn pause(&mut self);
    /// Continue from wherever `pause` left off.
    fn unpause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn position_seconds(&self) -> f64;
    /// True while output is actively advancing (not paused, not finished).
    fn is_busy(&self) -> bool;
    fn has_media(&self) -> bool;
}
