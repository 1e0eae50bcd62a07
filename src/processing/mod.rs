pub mod mel_engine;

pub use mel_engine::{MelEngine, MelFilterbank};
