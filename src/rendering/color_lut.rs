use crate::data::DB_FLOOR;

const LUT_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColormapId {
    Viridis,
    Magma,
    Inferno,
    Greyscale,
}

impl ColormapId {
    pub const ALL: &'static [ColormapId] = &[
        ColormapId::Viridis,
        ColormapId::Magma,
        ColormapId::Inferno,
        ColormapId::Greyscale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColormapId::Viridis => "Viridis",
            ColormapId::Magma => "Magma",
            ColormapId::Inferno => "Inferno",
            ColormapId::Greyscale => "Greyscale",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Maps a dB value in `[floor_db, ceiling_db]` to an RGB triple through a
/// pre-built table.
#[derive(Clone)]
pub struct ColorLut {
    table: Vec<(u8, u8, u8)>,
    floor_db: f32,
    ceiling_db: f32,
    colormap: ColormapId,
}

impl ColorLut {
    pub fn new(floor_db: f32, ceiling_db: f32, colormap: ColormapId) -> Self {
        let mut lut = Self {
            table: vec![(0, 0, 0); LUT_SIZE],
            floor_db,
            ceiling_db,
            colormap,
        };
        lut.rebuild();
        lut
    }

    fn rebuild(&mut self) {
        for i in 0..LUT_SIZE {
            let t = i as f32 / (LUT_SIZE - 1) as f32;
            self.table[i] = map_color(self.colormap, t);
        }
    }

    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }

    pub fn ceiling_db(&self) -> f32 {
        self.ceiling_db
    }

    #[inline(always)]
    pub fn lookup_db(&self, db: f32) -> (u8, u8, u8) {
        let range = self.ceiling_db - self.floor_db;
        if range <= 0.0 || db.is_nan() {
            return self.table[0];
        }
        let t = (db - self.floor_db) / range;
        let index = (t * (LUT_SIZE - 1) as f32).clamp(0.0, (LUT_SIZE - 1) as f32) as usize;
        self.table[index]
    }
}

impl Default for ColorLut {
    fn default() -> Self {
        Self::new(DB_FLOOR, 0.0, ColormapId::Viridis)
    }
}

fn to_rgb8(r: f32, g: f32, b: f32) -> (u8, u8, u8) {
    (
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn map_color(colormap: ColormapId, t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    match colormap {
        ColormapId::Viridis => {
            // Approximate viridis: dark purple -> blue -> teal -> green -> yellow
            let r = ((-1.33 * t + 1.62) * t + 0.27) * t + 0.04;
            let g = ((0.57 * t - 1.30) * t + 1.42) * t + 0.01;
            let b = ((-2.40 * t + 2.26) * t - 0.15) * t + 0.33;
            to_rgb8(r, g, b)
        }
        ColormapId::Magma => {
            // black -> dark purple -> red -> yellow -> white
            let r = ((-2.10 * t + 3.30) * t - 0.22) * t;
            let g = ((-0.73 * t - 0.39) * t + 1.14) * t - 0.01;
            let b = ((0.69 * t - 2.49) * t + 2.13) * t + 0.16;
            to_rgb8(r, g, b)
        }
        ColormapId::Inferno => {
            // black -> purple -> red -> orange -> yellow
            let r = ((-1.83 * t + 2.96) * t + 0.03) * t;
            let g = ((-0.84 * t + 0.03) * t + 0.82) * t - 0.01;
            let b = ((2.36 * t - 4.80) * t + 2.76) * t + 0.17;
            to_rgb8(r, g, b)
        }
        ColormapId::Greyscale => {
            let v = (t * 255.0) as u8;
            (v, v, v)
        }
    }
}
