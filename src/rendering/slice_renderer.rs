use rayon::prelude::*;
use std::ops::Range;

use super::color_lut::ColorLut;
use crate::data::MelSpectrogram;

const BACKGROUND: (u8, u8, u8) = (0x1e, 0x1e, 0x2e);

/// Rasterizes a column slice of the mel grid into an RGB8 buffer.
/// Band 0 sits on the bottom row; a short trailing slice leaves the
/// remaining columns at the background color.
pub struct SliceRenderer {
    lut: ColorLut,
    buffer: Vec<u8>,
    last_key: Option<(Range<usize>, usize, usize)>,
}

impl SliceRenderer {
    pub fn new(lut: ColorLut) -> Self {
        Self {
            lut,
            buffer: Vec::new(),
            last_key: None,
        }
    }

    pub fn lut(&self) -> &ColorLut {
        &self.lut
    }

    /// `columns` is the visible frame range, `slice_columns` the nominal
    /// slice width the pixels are spread over.
    pub fn render(
        &mut self,
        spec: &MelSpectrogram,
        columns: Range<usize>,
        slice_columns: usize,
        width: usize,
        height: usize,
    ) -> &[u8] {
        let key = (columns.clone(), width, height);
        if self.last_key.as_ref() == Some(&key) {
            return &self.buffer;
        }

        let buffer_size = width * height * 3;
        if self.buffer.len() != buffer_size {
            self.buffer = vec![0u8; buffer_size];
        }
        if width == 0 || height == 0 {
            self.last_key = Some(key);
            return &self.buffer;
        }

        let num_bands = spec.num_bands();
        let slice_columns = slice_columns.max(1);

        // Grid column for each pixel column (None = past the end of the data)
        let col_frames: Vec<Option<usize>> = (0..width)
            .map(|px| {
                let frame = columns.start + px * slice_columns / width;
                (frame < columns.end).then_some(frame)
            })
            .collect();

        let lut = &self.lut;
        let row_size = width * 3;
        self.buffer
            .par_chunks_mut(row_size)
            .enumerate()
            .for_each(|(py, row)| {
                let flipped = height - 1 - py;
                let band = (flipped * num_bands / height).min(num_bands.saturating_sub(1));

                for (px, frame) in col_frames.iter().enumerate() {
                    let (r, g, b) = match frame.and_then(|f| spec.get(band, f)) {
                        Some(db) => lut.lookup_db(db),
                        None => BACKGROUND,
                    };
                    let idx = px * 3;
                    row[idx] = r;
                    row[idx + 1] = g;
                    row[idx + 2] = b;
                }
            });

        self.last_key = Some(key);
        &self.buffer
    }

    /// Vertical legend: ceiling at the top row, floor at the bottom.
    pub fn render_colorbar(&self, width: usize, height: usize) -> Vec<u8> {
        let mut out = vec![0u8; width * height * 3];
        let floor = self.lut.floor_db();
        let ceiling = self.lut.ceiling_db();
        for (py, row) in out.chunks_mut(width * 3).enumerate() {
            let t = if height > 1 {
                1.0 - py as f32 / (height - 1) as f32
            } else {
                1.0
            };
            let (r, g, b) = self.lut.lookup_db(floor + (ceiling - floor) * t);
            for px in row.chunks_mut(3) {
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        }
        out
    }
}

/// Legend tick values from ceiling down to floor, every `step_db`.
pub fn colorbar_ticks(floor_db: f32, ceiling_db: f32, step_db: f32) -> Vec<f32> {
    if step_db <= 0.0 || ceiling_db < floor_db {
        return Vec::new();
    }
    let mut ticks = Vec::new();
    let mut db = ceiling_db;
    while db >= floor_db - 1e-3 {
        ticks.push(db);
        db -= step_db;
    }
    ticks
}

/// Signed, no decimals: `+0 dB`, `-40 dB`.
pub fn db_label(db: f32) -> String {
    // -0.0 would print as "-0"
    let db = if db.abs() < 0.5 { 0.0 } else { db };
    format!("{:+.0} dB", db)
}

/// Human-readable frequency for the mel axis.
pub fn freq_label(hz: f32) -> String {
    if hz >= 1000.0 {
        format!("{:.1}k", hz / 1000.0)
    } else {
        format!("{:.0}", hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::ColormapId;

    fn ramp_grid() -> MelSpectrogram {
        // 2 bands x 4 frames: band 0 silent, band 1 loud
        MelSpectrogram::from_band_major(
            vec![-80.0, -80.0, -80.0, -80.0, 0.0, 0.0, 0.0, 0.0],
            2,
            4,
            1000,
            10,
            vec![100.0, 200.0],
        )
    }

    #[test]
    fn test_low_band_drawn_at_bottom() {
        let spec = ramp_grid();
        let mut r = SliceRenderer::new(ColorLut::new(-80.0, 0.0, ColormapId::Greyscale));
        let buf = r.render(&spec, 0..2, 2, 2, 2).to_vec();
        // top row = band 1 = white, bottom row = band 0 = black
        assert_eq!(&buf[0..3], &[255, 255, 255]);
        assert_eq!(&buf[6..9], &[0, 0, 0]);
    }

    #[test]
    fn test_short_slice_pads_with_background() {
        let spec = ramp_grid();
        let mut r = SliceRenderer::new(ColorLut::new(-80.0, 0.0, ColormapId::Greyscale));
        // slice starts at frame 3: only one real column out of a nominal 2
        let range = spec.column_range(3, 2);
        let buf = r.render(&spec, range, 2, 2, 1).to_vec();
        assert_eq!(&buf[3..6], &[BACKGROUND.0, BACKGROUND.1, BACKGROUND.2]);
    }

    #[test]
    fn test_colorbar_top_is_ceiling() {
        let r = SliceRenderer::new(ColorLut::new(-80.0, 0.0, ColormapId::Greyscale));
        let bar = r.render_colorbar(1, 3);
        assert_eq!(&bar[0..3], &[255, 255, 255]);
        assert_eq!(&bar[6..9], &[0, 0, 0]);
    }

    #[test]
    fn test_ticks_and_labels() {
        assert_eq!(colorbar_ticks(-80.0, 0.0, 20.0), vec![0.0, -20.0, -40.0, -60.0, -80.0]);
        assert_eq!(db_label(0.0), "+0 dB");
        assert_eq!(db_label(-0.2), "+0 dB");
        assert_eq!(db_label(-40.0), "-40 dB");
        assert_eq!(freq_label(512.0), "512");
        assert_eq!(freq_label(2048.0), "2.0k");
    }
}
