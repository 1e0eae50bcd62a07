use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Decoded WAV contents at the file's native rate and channel layout.
/// Samples are interleaved and normalized to [-1, 1].
#[derive(Debug, Clone)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioData {
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path).map_err(|e| PipelineError::decode(path, e))?;

        let spec = reader.spec();
        let bits_per_sample = spec.bits_per_sample;
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(PipelineError::decode(
                path,
                hound::Error::FormatError("header declares zero channels or zero rate"),
            ));
        }

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| PipelineError::decode(path, e))?,
            SampleFormat::Int => {
                let scale = match bits_per_sample {
                    8 => 128.0,
                    16 => 32768.0,
                    24 => 8388608.0,
                    32 => 2147483648.0,
                    other => {
                        tracing::warn!("unsupported bit depth: {}", other);
                        return Err(PipelineError::decode(path, hound::Error::Unsupported));
                    }
                };
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| PipelineError::decode(path, e))?
            }
        };

        Ok(AudioData {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Writes 16-bit PCM with the buffer's channel layout.
    pub fn save_wav<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        use anyhow::Context;

        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", path.as_ref()))?;

        for &sample in &self.samples {
            let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            writer.write_sample(s)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Channel average, one value per frame.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }
        let channels = self.channels as usize;
        self.samples
            .chunks_exact(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}
