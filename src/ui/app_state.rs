use std::cell::RefCell;
use std::rc::Rc;

use crate::data::MelSpectrogram;
use crate::playback::{AudioPlayer, PlaybackController, PlaybackState, SliceAnimator};
use crate::rendering::{ColorLut, SliceRenderer};
use crate::settings::Settings;

// ─── App State ─────────────────────────────────────────────────────────────────
//
// Owned by the FLTK thread; every timer, button, slider and draw callback
// reaches it through the same Rc<RefCell<_>>.

pub struct AppState {
    pub spectrogram: MelSpectrogram,
    pub controller: PlaybackController<AudioPlayer>,
    pub animator: SliceAnimator,
    pub renderer: SliceRenderer,
    pub settings: Settings,
    pub duration_seconds: f64,
    /// Last refusal from the controller, shown until the next action
    pub warning: Option<String>,
}

pub type SharedState = Rc<RefCell<AppState>>;

impl AppState {
    pub fn new(
        spectrogram: MelSpectrogram,
        controller: PlaybackController<AudioPlayer>,
        settings: Settings,
        duration_seconds: f64,
    ) -> Self {
        let animator = SliceAnimator::new(spectrogram.num_frames(), settings.slice_columns);
        let lut = ColorLut::new(-settings.top_db, 0.0, settings.colormap_id());
        Self {
            spectrogram,
            controller,
            animator,
            renderer: SliceRenderer::new(lut),
            settings,
            duration_seconds,
            warning: None,
        }
    }

    pub fn status_line(&self) -> String {
        let state = match self.controller.state() {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        };
        let shown = self.animator.displayed();
        let mut line = format!(
            "{} | {} / {} | frames {}-{} of {}",
            state,
            format_time(self.controller.position_seconds()),
            format_time(self.duration_seconds),
            shown.start,
            shown.end.saturating_sub(1),
            self.spectrogram.num_frames()
        );
        if self.animator.is_finished() {
            line.push_str(" | animation done");
        }
        if let Some(ref warning) = self.warning {
            line.push_str(" | ");
            line.push_str(warning);
        }
        line
    }
}

// ─── Format time as M:SS.ms ───────────────────────────────────────────────────

pub fn format_time(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = seconds % 60.0;
    format!("{}:{:05.2}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.00");
        assert_eq!(format_time(9.5), "0:09.50");
        assert_eq!(format_time(75.25), "1:15.25");
    }
}
