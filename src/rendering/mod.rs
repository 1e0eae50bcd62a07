pub mod color_lut;
pub mod slice_renderer;

pub use color_lut::{ColorLut, ColormapId};
pub use slice_renderer::{SliceRenderer, colorbar_ticks, db_label, freq_label};
