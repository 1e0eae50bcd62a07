//! Slice animation and slider-to-playback mapping.
//!
//! The animation counter and the device clock are independent: the timer
//! walks the grid at a fixed pace, the slider moves the displayed slice and
//! seeks the device, and neither corrects the other. Over a long file the
//! picture and the sound can drift apart.

use std::ops::Range;

/// Seek target for a slider position: `frame * slice_columns / sample_rate`.
///
/// This treats the frame index as a sample count scaled by the slice width;
/// it does not account for the hop length.
pub fn seek_target_seconds(frame: usize, slice_columns: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    (frame * slice_columns) as f64 / sample_rate as f64
}

/// Timer-driven walk over fixed-width column slices.
#[derive(Debug, Clone)]
pub struct SliceAnimator {
    counter: usize,
    total_steps: usize,
    slice_columns: usize,
    num_frames: usize,
    displayed_start: usize,
}

impl SliceAnimator {
    pub fn new(num_frames: usize, slice_columns: usize) -> Self {
        let slice_columns = slice_columns.max(1);
        Self {
            counter: 0,
            total_steps: num_frames / slice_columns,
            slice_columns,
            num_frames,
            displayed_start: 0,
        }
    }

    /// Advance one step. Returns the newly displayed columns, or None once
    /// all `num_frames / slice_columns` steps have run.
    pub fn tick(&mut self) -> Option<Range<usize>> {
        if self.counter >= self.total_steps {
            return None;
        }
        self.displayed_start = self.counter * self.slice_columns;
        self.counter += 1;
        Some(self.displayed())
    }

    /// Slider moved: show the slice starting at `frame`. The timer counter is
    /// left alone, so the next tick overwrites this.
    pub fn jump_to(&mut self, frame: usize) -> Range<usize> {
        self.displayed_start = frame.min(self.num_frames.saturating_sub(1));
        self.displayed()
    }

    pub fn displayed(&self) -> Range<usize> {
        let start = self.displayed_start.min(self.num_frames);
        let end = (start + self.slice_columns).min(self.num_frames);
        start..end
    }

    pub fn is_finished(&self) -> bool {
        self.counter >= self.total_steps
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn slice_columns(&self) -> usize {
        self.slice_columns
    }

    /// Inclusive slider bounds `[0, num_frames - 1]`.
    pub fn slider_bounds(&self) -> (usize, usize) {
        (0, self.num_frames.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_formula() {
        assert!((seek_target_seconds(215, 10, 44100) - 0.048752834).abs() < 1e-8);
        assert_eq!(seek_target_seconds(0, 10, 44100), 0.0);
        assert_eq!(seek_target_seconds(5, 10, 0), 0.0);
    }

    #[test]
    fn test_walks_slices_then_stops() {
        let mut a = SliceAnimator::new(35, 10);
        assert_eq!(a.displayed(), 0..10);
        assert_eq!(a.tick(), Some(0..10));
        assert_eq!(a.tick(), Some(10..20));
        assert_eq!(a.tick(), Some(20..30));
        assert!(a.is_finished());
        assert_eq!(a.tick(), None);
        // does not repeat
        assert_eq!(a.tick(), None);
        assert_eq!(a.displayed(), 20..30);
    }

    #[test]
    fn test_430_frames_run_43_steps() {
        let mut a = SliceAnimator::new(430, 10);
        let mut steps = 0;
        while a.tick().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 43);
        assert_eq!(a.slider_bounds(), (0, 429));
    }

    #[test]
    fn test_slider_jump_does_not_move_counter() {
        let mut a = SliceAnimator::new(100, 10);
        a.tick();
        a.tick();
        assert_eq!(a.jump_to(75), 75..85);
        assert_eq!(a.counter(), 2);
        // timer resumes its own walk
        assert_eq!(a.tick(), Some(20..30));
    }

    #[test]
    fn test_jump_clamps_to_last_frame() {
        let mut a = SliceAnimator::new(12, 10);
        assert_eq!(a.jump_to(500), 11..12);
    }

    #[test]
    fn test_empty_grid() {
        let mut a = SliceAnimator::new(0, 10);
        assert_eq!(a.tick(), None);
        assert_eq!(a.displayed(), 0..0);
        assert_eq!(a.slider_bounds(), (0, 0));
    }
}
