use rayon::prelude::*;
use realfft::RealFftPlanner;

use crate::data::{AMIN, DB_FLOOR, MelParams, MelSpectrogram};
use crate::error::{PipelineError, Result};

// ─── Mel scale (Slaney) ────────────────────────────────────────────────────────
//
// Linear below 1 kHz (200/3 Hz per mel), logarithmic above, 27 mels per
// factor of 6.4 in frequency.

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular filters over the FFT bins, area normalized. Each filter only
/// stores the span of bins where it is non-zero.
pub struct MelFilterbank {
    filters: Vec<(usize, Vec<f32>)>,
    center_freqs: Vec<f32>,
}

impl MelFilterbank {
    pub fn new(params: &MelParams, sample_rate: u32) -> Self {
        let n_bins = params.num_frequency_bins();
        let n_mels = params.n_mels;
        let fmax = params.fmax_for(sample_rate) as f64;

        let mel_min = hz_to_mel(params.fmin as f64);
        let mel_max = hz_to_mel(fmax);
        let mel_f: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
            .collect();

        let bin_hz = sample_rate as f64 / params.n_fft as f64;

        let filters = (0..n_mels)
            .map(|m| {
                let (left, center, right) = (mel_f[m], mel_f[m + 1], mel_f[m + 2]);
                let enorm = 2.0 / (right - left);
                let weights: Vec<f32> = (0..n_bins)
                    .map(|k| {
                        let f = k as f64 * bin_hz;
                        let lower = (f - left) / (center - left);
                        let upper = (right - f) / (right - center);
                        (lower.min(upper).max(0.0) * enorm) as f32
                    })
                    .collect();

                // Keep only the non-zero span
                let first = weights.iter().position(|&w| w > 0.0);
                let last = weights.iter().rposition(|&w| w > 0.0);
                match (first, last) {
                    (Some(a), Some(b)) => (a, weights[a..=b].to_vec()),
                    _ => (0, Vec::new()),
                }
            })
            .collect();

        let center_freqs = mel_f[1..=n_mels].iter().map(|&f| f as f32).collect();

        Self { filters, center_freqs }
    }

    pub fn num_bands(&self) -> usize {
        self.filters.len()
    }

    pub fn center_freqs(&self) -> &[f32] {
        &self.center_freqs
    }

    /// Dot product of every filter with one power spectrum.
    pub fn apply(&self, power: &[f32], out: &mut [f32]) {
        for (band, (start, weights)) in self.filters.iter().enumerate() {
            out[band] = weights
                .iter()
                .zip(&power[*start..])
                .map(|(w, p)| w * p)
                .sum();
        }
    }

    /// Number of bins covered by a band's filter (0 = empty filter).
    pub fn filter_width(&self, band: usize) -> usize {
        self.filters.get(band).map(|(_, w)| w.len()).unwrap_or(0)
    }
}

pub struct MelEngine;

impl MelEngine {
    /// Mono samples -> dB mel spectrogram, 0 dB at the loudest cell.
    /// Frames run in parallel on rayon threads.
    pub fn process(samples: &[f32], sample_rate: u32, params: &MelParams) -> Result<MelSpectrogram> {
        params.validate().map_err(PipelineError::Transform)?;
        if sample_rate == 0 {
            return Err(PipelineError::Transform("sample rate is zero".to_string()));
        }

        let n_fft = params.n_fft;
        let hop = params.hop_length;
        let pad = n_fft / 2;
        let num_frames = params.num_frames(samples.len());
        let filterbank = MelFilterbank::new(params, sample_rate);
        let n_mels = filterbank.num_bands();

        tracing::debug!(
            "mel engine: {} samples @ {} Hz -> {} frames x {} bands",
            samples.len(),
            sample_rate,
            num_frames,
            n_mels
        );

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let window = params.generate_window();

        // Frame-major mel power
        let mel_frames: Vec<Vec<f32>> = (0..num_frames)
            .into_par_iter()
            .map_init(
                || (fft.make_input_vec(), fft.make_output_vec(), vec![0.0f32; n_fft / 2 + 1]),
                |(indata, spectrum, power), frame_idx| {
                    // Frame is centered on frame_idx * hop; outside the signal is zero
                    let origin = frame_idx * hop;
                    for (i, slot) in indata.iter_mut().enumerate() {
                        let pos = origin + i;
                        *slot = if pos >= pad && pos - pad < samples.len() {
                            samples[pos - pad] * window[i]
                        } else {
                            0.0
                        };
                    }

                    fft.process(indata, spectrum)
                        .map_err(|e| PipelineError::Transform(format!("FFT failed: {e}")))?;

                    for (p, c) in power.iter_mut().zip(spectrum.iter()) {
                        *p = c.norm_sqr();
                    }

                    let mut mel = vec![0.0f32; n_mels];
                    filterbank.apply(power, &mut mel);
                    Ok(mel)
                },
            )
            .collect::<Result<Vec<Vec<f32>>>>()?;

        let peak = mel_frames
            .iter()
            .flat_map(|f| f.iter())
            .copied()
            .fold(0.0f32, f32::max);

        // Silence has no reference level: fixed floor regardless of top_db
        let mut db = vec![DB_FLOOR; n_mels * num_frames];

        if peak > AMIN {
            let floor = -params.top_db;
            let ref_db = 10.0 * peak.log10();
            for (frame_idx, frame) in mel_frames.iter().enumerate() {
                for (band, &p) in frame.iter().enumerate() {
                    let v = 10.0 * p.max(AMIN).log10() - ref_db;
                    db[band * num_frames + frame_idx] = v.max(floor);
                }
            }
        }

        Ok(MelSpectrogram::from_band_major(
            db,
            n_mels,
            num_frames,
            sample_rate,
            hop,
            filterbank.center_freqs().to_vec(),
        ))
    }
}
