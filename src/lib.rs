//! wavescope: inspect a WAV file.
//!
//! Exports the RIFF header as text, computes a dB mel spectrogram and, with
//! the `gui` feature, animates it in a window while the audio plays.

pub mod data;
pub mod error;
pub mod pipeline;
pub mod playback;
pub mod processing;
pub mod rendering;
pub mod settings;

#[cfg(feature = "gui")]
pub mod ui;

pub use error::{ControlError, PipelineError};
pub use pipeline::{PreparedAudio, prepare};
pub use settings::Settings;
