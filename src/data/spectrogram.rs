use std::ops::Range;

/// Decibel-scaled mel spectrogram. Stored band-major: row `band` holds one
/// value per time frame.
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    db: Vec<f32>,
    num_bands: usize,
    num_frames: usize,
    pub sample_rate: u32,
    pub hop_length: usize,
    /// Center frequency of each band in Hz, lowest first
    pub band_freqs: Vec<f32>,
}

impl MelSpectrogram {
    /// `db` must be `num_bands * num_frames` long, band-major.
    pub fn from_band_major(
        db: Vec<f32>,
        num_bands: usize,
        num_frames: usize,
        sample_rate: u32,
        hop_length: usize,
        band_freqs: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(db.len(), num_bands * num_frames);
        Self {
            db,
            num_bands,
            num_frames,
            sample_rate,
            hop_length,
            band_freqs,
        }
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    #[inline]
    pub fn get(&self, band: usize, frame: usize) -> Option<f32> {
        if band < self.num_bands && frame < self.num_frames {
            Some(self.db[band * self.num_frames + frame])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.db
    }

    /// Column range clamped to the grid: `frames [start, start + width)`.
    pub fn column_range(&self, start: usize, width: usize) -> Range<usize> {
        let start = start.min(self.num_frames);
        let end = start.saturating_add(width).min(self.num_frames);
        start..end
    }

    pub fn frame_to_time(&self, frame: usize) -> f64 {
        (frame * self.hop_length) as f64 / self.sample_rate as f64
    }

    pub fn duration(&self) -> f64 {
        self.frame_to_time(self.num_frames)
    }

    pub fn max_db(&self) -> f32 {
        self.db.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_db(&self) -> f32 {
        self.db.iter().copied().fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> MelSpectrogram {
        // 2 bands x 3 frames
        MelSpectrogram::from_band_major(
            vec![0.0, -1.0, -2.0, -10.0, -11.0, -12.0],
            2,
            3,
            1000,
            100,
            vec![50.0, 150.0],
        )
    }

    #[test]
    fn test_band_major_indexing() {
        let g = grid();
        assert_eq!(g.get(0, 2), Some(-2.0));
        assert_eq!(g.get(1, 0), Some(-10.0));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.values()[3..6], [-10.0, -11.0, -12.0]);
    }

    #[test]
    fn test_column_range_clamps() {
        let g = grid();
        assert_eq!(g.column_range(1, 10), 1..3);
        assert_eq!(g.column_range(5, 10), 3..3);
    }

    #[test]
    fn test_time_mapping() {
        let g = grid();
        assert_eq!(g.frame_to_time(2), 0.2);
        assert!((g.duration() - 0.3).abs() < 1e-12);
        assert_eq!(g.max_db(), 0.0);
        assert_eq!(g.min_db(), -12.0);
    }
}
