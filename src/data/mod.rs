pub mod audio_data;
pub mod container_info;
pub mod mel_params;
pub mod spectrogram;

pub use audio_data::AudioData;
pub use container_info::{ContainerInfo, export_riff_info, info_path_for, read_riff_info_text};
pub use mel_params::{AMIN, DB_FLOOR, MelParams};
pub use spectrogram::MelSpectrogram;
