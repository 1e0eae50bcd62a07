use std::f32::consts::PI;

/// Floor of the decibel scale. Silent input maps every cell here.
pub const DB_FLOOR: f32 = -80.0;

/// Power values below this are clamped before taking the log.
pub const AMIN: f32 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct MelParams {
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub fmin: f32,
    /// None = Nyquist
    pub fmax: Option<f32>,
    /// Dynamic range kept below the peak, in dB
    pub top_db: f32,
}

impl Default for MelParams {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 1024,
            n_mels: 128,
            fmin: 0.0,
            fmax: None,
            top_db: -DB_FLOOR,
        }
    }
}

impl MelParams {
    pub fn num_frequency_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Centered framing keeps one frame per full hop of input.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        if self.hop_length == 0 {
            return 0;
        }
        num_samples / self.hop_length
    }

    pub fn fmax_for(&self, sample_rate: u32) -> f32 {
        self.fmax.unwrap_or(sample_rate as f32 / 2.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_fft < 2 {
            return Err(format!("n_fft must be at least 2 (got {})", self.n_fft));
        }
        if self.hop_length == 0 {
            return Err("hop_length must be positive".to_string());
        }
        if self.n_mels == 0 {
            return Err("n_mels must be positive".to_string());
        }
        if !(self.top_db > 0.0) {
            return Err(format!("top_db must be positive (got {})", self.top_db));
        }
        Ok(())
    }

    /// Periodic Hann window of length `n_fft`.
    pub fn generate_window(&self) -> Vec<f32> {
        let n = self.n_fft;
        (0..n)
            .map(|i| 0.5 * (1.0 - ((2.0 * PI * i as f32) / n as f32).cos()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = MelParams::default();
        assert_eq!(p.num_frequency_bins(), 1025);
        assert_eq!(p.top_db, 80.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_frame_count_floors() {
        let p = MelParams::default();
        assert_eq!(p.num_frames(441000), 430);
        assert_eq!(p.num_frames(1023), 0);
        assert_eq!(p.num_frames(2048), 2);
    }

    #[test]
    fn test_periodic_hann() {
        let p = MelParams { n_fft: 8, ..Default::default() };
        let w = p.generate_window();
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-6);
        assert!((w[2] - 0.5).abs() < 1e-6);
        assert!((w[6] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_zero_hop() {
        let p = MelParams { hop_length: 0, ..Default::default() };
        assert!(p.validate().is_err());
    }
}
