use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One variant per pipeline stage. Each stage reports its own failure and
/// the run stops there.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read RIFF container {path:?}: {source}")]
    ContainerRead {
        path: PathBuf,
        #[source]
        source: HeaderError,
    },

    #[error("could not decode audio {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("mel spectrogram failed: {0}")]
    Transform(String),

    #[error("audio device error: {0}")]
    Device(String),
}

impl PipelineError {
    pub fn container(path: impl Into<PathBuf>, source: impl Into<HeaderError>) -> Self {
        Self::ContainerRead { path: path.into(), source: source.into() }
    }

    pub fn decode(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Decode { path: path.into(), source }
    }
}

/// What went wrong walking a RIFF/WAVE header or writing its text export.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("truncated RIFF header")]
    Truncated(#[source] io::Error),

    #[error("missing RIFF tag")]
    NotRiff,

    #[error("RIFF form type is not WAVE")]
    NotWave,

    #[error("fmt chunk too short ({0} bytes)")]
    FmtTooShort(u64),

    #[error("no fmt chunk")]
    MissingFmt,

    #[error("no data chunk")]
    MissingData,

    #[error("fmt chunk declares zero {0}")]
    ZeroField(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Refusals from the playback state machine. These are warnings for the
/// user, not failures of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Music not loaded. Load music first.")]
    NotLoaded,

    #[error("Music isn't playing. Start playing music first.")]
    NotPlaying,

    #[error("Music isn't paused.")]
    NotPaused,
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
