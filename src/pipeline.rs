// ============================================================================
// PIPELINE.RS - Everything that runs before the window opens
// ============================================================================
//
// 1. Export the RIFF header to <stem>_riff_info.txt and print it
// 2. Decode the WAV
// 3. Compute the dB mel spectrogram
//
// Each stage reports its own failure once and the run stops there. The
// results travel to the caller by value; nothing is kept in shared state.
// ============================================================================

use std::path::{Path, PathBuf};

use crate::data::{self, AudioData, ContainerInfo, MelSpectrogram};
use crate::error::{PipelineError, Result};
use crate::processing::MelEngine;
use crate::settings::Settings;

/// Static data the viewer runs against.
#[derive(Debug, Clone)]
pub struct PreparedAudio {
    pub info: ContainerInfo,
    pub info_path: PathBuf,
    pub audio: AudioData,
    pub spectrogram: MelSpectrogram,
}

pub fn prepare(wav_path: &Path, settings: &Settings, show_progress: bool) -> Result<PreparedAudio> {
    let (info, info_path) = data::export_riff_info(wav_path, show_progress)
        .inspect_err(|e| tracing::error!("Error exporting RIFF information: {}", e))?;

    // Display failure is reported but does not stop the run
    match data::read_riff_info_text(&info_path) {
        Ok(text) => {
            println!("\nRIFF Information:\n");
            println!("{}", text);
        }
        Err(e) => tracing::error!("Error displaying RIFF information: {}", e),
    }

    tracing::info!("Loading audio file...");
    let audio = AudioData::from_wav_file(wav_path)
        .inspect_err(|e| tracing::error!("Error loading audio file: {}", e))?;

    tracing::info!("Computing mel spectrogram...");
    let spectrogram = compute_spectrogram(&audio, settings)
        .inspect_err(|e| tracing::error!("Error computing mel spectrogram: {}", e))?;

    tracing::info!(
        "Mel spectrogram: {} bands x {} frames ({:.2}s)",
        spectrogram.num_bands(),
        spectrogram.num_frames(),
        spectrogram.duration()
    );

    Ok(PreparedAudio {
        info,
        info_path,
        audio,
        spectrogram,
    })
}

/// Mono downmix -> mel grid. A grid with no frames has nothing to animate
/// and is reported as a transform failure.
pub fn compute_spectrogram(audio: &AudioData, settings: &Settings) -> Result<MelSpectrogram> {
    let params = settings.mel_params();
    let spectrogram = MelEngine::process(&audio.to_mono(), audio.sample_rate, &params)?;
    if spectrogram.num_frames() == 0 {
        return Err(PipelineError::Transform(format!(
            "audio is shorter than one hop ({} frames < {})",
            audio.frame_count(),
            params.hop_length
        )));
    }
    Ok(spectrogram)
}
