use fltk::{
    button::Button,
    enums::{Align, FrameType},
    frame::Frame,
    group::Flex,
    prelude::*,
    valuator::HorNiceSlider,
    widget::Widget,
    window::Window,
};

use super::theme;

// ─── Window Layout Constants ────────────────────────────────────────────────────
const TITLE_H: i32 = 28;
const FREQ_AXIS_W: i32 = 56;
const COLORBAR_W: i32 = 24;
const COLORBAR_LABEL_W: i32 = 52;
const TIME_AXIS_H: i32 = 20;
const CONTROLS_H: i32 = 30;
const STATUS_H: i32 = 22;

// ─── Widgets struct ─────────────────────────────────────────────────────────────
// Holds cloneable handles to every widget that callbacks need to access.

pub struct Widgets {
    pub freq_axis: Widget,
    pub spec_display: Widget,
    pub colorbar: Widget,
    pub colorbar_labels: Widget,
    pub time_axis: Widget,
    pub time_slider: HorNiceSlider,
    pub btn_pause: Button,
    pub btn_resume: Button,
    pub status_bar: Frame,
}

// ─── Build UI ───────────────────────────────────────────────────────────────────

/// `slider_max` is the last valid frame index.
pub fn build_ui(width: i32, height: i32, slider_max: usize) -> (Window, Widgets) {
    let mut win = Window::new(50, 50, width, height, "Mel Spectrogram Animation");
    win.make_resizable(true);
    win.set_color(theme::color(theme::BG_DARK));

    let mut root = Flex::default_fill().column();
    root.set_margin(6);
    root.set_pad(2);

    let mut title = Frame::default().with_label("Mel Spectrogram Animation");
    title.set_label_size(15);
    title.set_label_color(theme::color(theme::ACCENT_BLUE));
    root.fixed(&title, TITLE_H);

    // ── Plot row: freq axis | spectrogram | color bar | dB labels ──
    let mut plot_row = Flex::default().row();
    plot_row.set_pad(4);

    let mut freq_axis = Widget::default();
    freq_axis.set_frame(FrameType::FlatBox);
    freq_axis.set_color(theme::color(theme::BG_DARK));
    plot_row.fixed(&freq_axis, FREQ_AXIS_W);

    let mut spec_display = Widget::default();
    spec_display.set_frame(FrameType::FlatBox);
    spec_display.set_color(theme::color(theme::BG_DARK));

    let mut colorbar = Widget::default();
    colorbar.set_frame(FrameType::FlatBox);
    plot_row.fixed(&colorbar, COLORBAR_W);

    let mut colorbar_labels = Widget::default();
    colorbar_labels.set_frame(FrameType::FlatBox);
    colorbar_labels.set_color(theme::color(theme::BG_DARK));
    plot_row.fixed(&colorbar_labels, COLORBAR_LABEL_W);

    plot_row.end();

    // ── Time axis, lined up under the spectrogram ──
    let mut time_row = Flex::default().row();
    time_row.set_pad(4);
    let spacer_left = Frame::default();
    time_row.fixed(&spacer_left, FREQ_AXIS_W);
    let mut time_axis = Widget::default();
    time_axis.set_frame(FrameType::FlatBox);
    time_axis.set_color(theme::color(theme::BG_DARK));
    let spacer_right = Frame::default();
    time_row.fixed(&spacer_right, COLORBAR_W + COLORBAR_LABEL_W + 4);
    time_row.end();
    root.fixed(&time_row, TIME_AXIS_H);

    // ── Controls: Time slider, Pause, Resume ──
    let mut controls = Flex::default().row();
    controls.set_pad(6);

    let mut lbl_time = Frame::default().with_label("Time");
    lbl_time.set_label_color(theme::color(theme::TEXT_SECONDARY));
    lbl_time.set_label_size(12);
    controls.fixed(&lbl_time, 40);

    let mut time_slider = HorNiceSlider::default();
    time_slider.set_minimum(0.0);
    time_slider.set_maximum(slider_max as f64);
    time_slider.set_step(1.0, 1);
    time_slider.set_value(0.0);
    time_slider.set_color(theme::color(theme::BG_WIDGET));
    time_slider.set_selection_color(theme::accent_color());
    time_slider.set_tooltip("Spectrogram frame.\nSeeks the audio while it is playing.");

    let mut btn_pause = Button::default().with_label("Pause");
    btn_pause.set_color(theme::color(theme::BG_WIDGET));
    btn_pause.set_label_color(theme::color(theme::ACCENT_YELLOW));
    controls.fixed(&btn_pause, 70);

    let mut btn_resume = Button::default().with_label("Resume");
    btn_resume.set_color(theme::color(theme::BG_WIDGET));
    btn_resume.set_label_color(theme::color(theme::ACCENT_GREEN));
    controls.fixed(&btn_resume, 70);

    controls.end();
    root.fixed(&controls, CONTROLS_H);

    // ─── STATUS BAR ───────────────────────────────────────────────────────────

    let mut status_bar = Frame::default().with_label("Playing");
    status_bar.set_frame(FrameType::FlatBox);
    status_bar.set_color(theme::color(theme::BG_PANEL));
    status_bar.set_label_color(theme::color(theme::TEXT_SECONDARY));
    status_bar.set_label_size(11);
    status_bar.set_align(Align::Inside | Align::Left);
    root.fixed(&status_bar, STATUS_H);

    root.end();
    win.end();
    win.resizable(&root);

    let widgets = Widgets {
        freq_axis,
        spec_display,
        colorbar,
        colorbar_labels,
        time_axis,
        time_slider,
        btn_pause,
        btn_resume,
        status_bar,
    };

    (win, widgets)
}
