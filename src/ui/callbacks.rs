use fltk::{
    app,
    enums::{ColorDepth, Font},
    frame::Frame,
    image::RgbImage,
    prelude::*,
};

use super::app_state::{AppState, SharedState};
use super::layout::Widgets;
use super::theme;
use crate::rendering::{colorbar_ticks, db_label, freq_label};

const DB_TICK_STEP: f32 = 10.0;
const TIME_LABEL_SPACING_PX: i32 = 80;
const FREQ_LABEL_SPACING_PX: i32 = 28;

/// Status line turns red while a refused command is being reported.
fn show_status(status_bar: &mut Frame, st: &AppState) {
    let color = if st.warning.is_some() {
        theme::ACCENT_RED
    } else {
        theme::TEXT_SECONDARY
    };
    status_bar.set_label_color(theme::color(color));
    status_bar.set_label(&st.status_line());
}

pub fn setup_callbacks(widgets: &Widgets, state: &SharedState) {
    setup_spectrogram_draw(widgets, state);
    setup_freq_axis_draw(widgets, state);
    setup_time_axis_draw(widgets, state);
    setup_colorbar_draw(widgets, state);
    setup_transport_callbacks(widgets, state);
    setup_slider_callback(widgets, state);
}

// ── Spectrogram slice ──
fn setup_spectrogram_draw(widgets: &Widgets, state: &SharedState) {
    let state = state.clone();
    let mut spec_display = widgets.spec_display.clone();
    spec_display.draw(move |w| {
        if w.w() <= 0 || w.h() <= 0 {
            return;
        }
        let Ok(mut st) = state.try_borrow_mut() else { return; };
        let st = &mut *st;

        let columns = st.animator.displayed();
        let slice_columns = st.animator.slice_columns();
        let buffer = st.renderer.render(
            &st.spectrogram,
            columns,
            slice_columns,
            w.w() as usize,
            w.h() as usize,
        );

        match RgbImage::new(buffer, w.w(), w.h(), ColorDepth::Rgb8) {
            Ok(mut image) => image.draw(w.x(), w.y(), w.w(), w.h()),
            Err(e) => {
                tracing::warn!("Failed to create spectrogram image: {:?}", e);
                fltk::draw::set_draw_color(theme::color(theme::BG_DARK));
                fltk::draw::draw_rectf(w.x(), w.y(), w.w(), w.h());
            }
        }
    });
}

// ── Mel band labels, band 0 at the bottom ──
fn setup_freq_axis_draw(widgets: &Widgets, state: &SharedState) {
    let state = state.clone();
    let mut freq_axis = widgets.freq_axis.clone();
    freq_axis.draw(move |w| {
        if w.w() <= 0 || w.h() <= 0 {
            return;
        }
        fltk::draw::set_draw_color(theme::color(theme::BG_DARK));
        fltk::draw::draw_rectf(w.x(), w.y(), w.w(), w.h());

        let Ok(st) = state.try_borrow() else { return; };
        let freqs = &st.spectrogram.band_freqs;
        if freqs.is_empty() {
            return;
        }

        fltk::draw::set_font(Font::Helvetica, 9);
        let band_h = w.h() as f32 / freqs.len() as f32;
        let every = ((FREQ_LABEL_SPACING_PX as f32 / band_h).ceil() as usize).max(1);

        for (band, &hz) in freqs.iter().enumerate().step_by(every) {
            let py = w.y() + w.h() - ((band as f32 + 0.5) * band_h) as i32;
            fltk::draw::set_draw_color(theme::color(theme::TEXT_SECONDARY));
            fltk::draw::draw_text(&freq_label(hz), w.x() + 2, py + 3);
            fltk::draw::set_draw_color(theme::color(theme::BORDER));
            fltk::draw::draw_line(w.x() + w.w() - 4, py, w.x() + w.w(), py);
        }

        fltk::draw::set_draw_color(theme::color(theme::TEXT_DISABLED));
        fltk::draw::draw_text("Hz", w.x() + 2, w.y() + 10);
    });
}

// ── Time labels for the columns on screen ──
fn setup_time_axis_draw(widgets: &Widgets, state: &SharedState) {
    let state = state.clone();
    let mut time_axis = widgets.time_axis.clone();
    time_axis.draw(move |w| {
        if w.w() <= 0 || w.h() <= 0 {
            return;
        }
        fltk::draw::set_draw_color(theme::color(theme::BG_DARK));
        fltk::draw::draw_rectf(w.x(), w.y(), w.w(), w.h());

        let Ok(st) = state.try_borrow() else { return; };
        let shown = st.animator.displayed();
        let slice_columns = st.animator.slice_columns();

        fltk::draw::set_font(Font::Helvetica, 9);
        let col_w = w.w() as f32 / slice_columns as f32;
        let every = ((TIME_LABEL_SPACING_PX as f32 / col_w).ceil() as usize).max(1);

        for offset in (0..slice_columns).step_by(every) {
            let frame = shown.start + offset;
            if frame >= shown.end {
                break;
            }
            let px = w.x() + (offset as f32 * col_w) as i32;
            let label = format!("{:.2}s", st.spectrogram.frame_to_time(frame));
            fltk::draw::set_draw_color(theme::color(theme::BORDER));
            fltk::draw::draw_line(px, w.y(), px, w.y() + 4);
            fltk::draw::set_draw_color(theme::color(theme::TEXT_SECONDARY));
            fltk::draw::draw_text(&label, px + 2, w.y() + w.h() - 4);
        }
    });
}

// ── Color bar and its dB labels ──
fn setup_colorbar_draw(widgets: &Widgets, state: &SharedState) {
    {
        let state = state.clone();
        let mut colorbar = widgets.colorbar.clone();
        colorbar.draw(move |w| {
            if w.w() <= 0 || w.h() <= 0 {
                return;
            }
            let Ok(st) = state.try_borrow() else { return; };
            let buffer = st.renderer.render_colorbar(w.w() as usize, w.h() as usize);
            if let Ok(mut image) = RgbImage::new(&buffer, w.w(), w.h(), ColorDepth::Rgb8) {
                image.draw(w.x(), w.y(), w.w(), w.h());
            }
            fltk::draw::set_draw_color(theme::color(theme::BORDER));
            fltk::draw::draw_rect(w.x(), w.y(), w.w(), w.h());
        });
    }
    {
        let state = state.clone();
        let mut colorbar_labels = widgets.colorbar_labels.clone();
        colorbar_labels.draw(move |w| {
            if w.w() <= 0 || w.h() <= 0 {
                return;
            }
            fltk::draw::set_draw_color(theme::color(theme::BG_DARK));
            fltk::draw::draw_rectf(w.x(), w.y(), w.w(), w.h());

            let Ok(st) = state.try_borrow() else { return; };
            let lut = st.renderer.lut();
            let (floor, ceiling) = (lut.floor_db(), lut.ceiling_db());
            let span = (ceiling - floor).max(f32::EPSILON);

            fltk::draw::set_font(Font::Helvetica, 9);
            for db in colorbar_ticks(floor, ceiling, DB_TICK_STEP) {
                let t = (ceiling - db) / span;
                let py = w.y() + (t * (w.h() - 1) as f32) as i32;
                fltk::draw::set_draw_color(theme::color(theme::BORDER));
                fltk::draw::draw_line(w.x(), py, w.x() + 4, py);
                fltk::draw::set_draw_color(theme::color(theme::TEXT_SECONDARY));
                fltk::draw::draw_text(&db_label(db), w.x() + 6, py + 3);
            }
        });
    }
}

// ── Pause / Resume ──
fn setup_transport_callbacks(widgets: &Widgets, state: &SharedState) {
    {
        let state = state.clone();
        let mut status_bar = widgets.status_bar.clone();
        let mut btn_pause = widgets.btn_pause.clone();
        btn_pause.set_callback(move |_| {
            let mut st = state.borrow_mut();
            let refused = st.controller.pause().err();
            st.warning = refused.map(|e| e.to_string());
            show_status(&mut status_bar, &st);
        });
    }
    {
        let state = state.clone();
        let mut status_bar = widgets.status_bar.clone();
        let mut btn_resume = widgets.btn_resume.clone();
        btn_resume.set_callback(move |_| {
            let mut st = state.borrow_mut();
            let refused = st.controller.resume().err();
            st.warning = refused.map(|e| e.to_string());
            show_status(&mut status_bar, &st);
        });
    }
}

// ── Time slider: show the slice at the slider frame, then try to seek ──
fn setup_slider_callback(widgets: &Widgets, state: &SharedState) {
    let state = state.clone();
    let mut spec_display = widgets.spec_display.clone();
    let mut time_axis = widgets.time_axis.clone();
    let mut status_bar = widgets.status_bar.clone();
    let mut time_slider = widgets.time_slider.clone();
    time_slider.set_callback(move |s| {
        let frame = s.value().max(0.0).round() as usize;
        {
            let mut st = state.borrow_mut();
            st.animator.jump_to(frame);
            let refused = st.controller.seek(frame).err();
            st.warning = refused.map(|e| e.to_string());
            show_status(&mut status_bar, &st);
        }
        spec_display.redraw();
        time_axis.redraw();
    });
}

/// Animation timer: one slice step per tick until the walk is done, then
/// keeps refreshing the status line while the window is open.
pub fn start_animation_timer(widgets: &Widgets, state: &SharedState) {
    let interval = {
        let st = state.borrow();
        st.settings.interval_ms as f64 / 1000.0
    };

    let state = state.clone();
    let mut spec_display = widgets.spec_display.clone();
    let mut time_axis = widgets.time_axis.clone();
    let mut status_bar = widgets.status_bar.clone();

    app::add_timeout3(interval, move |handle| {
        let advanced = {
            let Ok(mut st) = state.try_borrow_mut() else {
                app::repeat_timeout3(interval, handle);
                return;
            };
            let advanced = st.animator.tick().is_some();
            st.controller.poll();
            show_status(&mut status_bar, &st);
            advanced
        };
        if advanced {
            spec_display.redraw();
            time_axis.redraw();
        }
        app::repeat_timeout3(interval, handle);
    });
}
