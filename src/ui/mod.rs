pub mod app_state;
pub mod callbacks;
pub mod layout;
pub mod theme;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use fltk::{app, prelude::*};

use crate::pipeline::PreparedAudio;
use crate::playback::{AudioPlayer, PlaybackController};
use crate::settings::Settings;
use app_state::AppState;

/// Open the animation window and start playback. Returns when the window
/// is closed.
pub fn run(prepared: PreparedAudio, settings: Settings) -> anyhow::Result<()> {
    let PreparedAudio {
        audio, spectrogram, ..
    } = prepared;

    let app = app::App::default();
    theme::apply_dark_theme();

    let slider_max = spectrogram.num_frames().saturating_sub(1);
    let (mut win, widgets) = layout::build_ui(settings.window_width, settings.window_height, slider_max);

    // Audio starts before the window first appears
    let mut controller = PlaybackController::new(AudioPlayer::new(), settings.slice_columns);
    controller
        .start(&audio)
        .context("Error playing audio")?;

    let duration = audio.duration_seconds();
    let state = Rc::new(RefCell::new(AppState::new(
        spectrogram,
        controller,
        settings,
        duration,
    )));

    callbacks::setup_callbacks(&widgets, &state);
    callbacks::start_animation_timer(&widgets, &state);

    win.show();
    app.run().context("FLTK event loop failed")?;
    tracing::info!("Window closed");
    Ok(())
}
