use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{GridInput, GridMark, Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use rusty_stopflow::state::AppState;
use rusty_stopflow::trace::DrawStyle;
use rusty_stopflow::view::LOG_EPSILON;

// ---------------------------------------------------------------------------
// Trace plot (central panel)
// ---------------------------------------------------------------------------

/// Render the active surface in the central panel.
///
/// egui_plot has no log axes, so log-scaled axes are drawn in log10 space
/// with decade labels; points that are not positive on such an axis are
/// left out.
pub fn trace_plot(ui: &mut Ui, state: &mut AppState) {
    let font_size = state.settings.style.font_size;
    let surface = state.active;
    let surface_state = state.surface_mut(surface);

    if surface_state.traces.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Import a file and add curves to plot  (File → Import…)");
        });
        return;
    }

    let view = surface_state.view.clone();
    let new_limits = surface_state.view.take_changed_limits();
    let draw_list = surface_state.traces.draw_list();

    ui.scope(|ui: &mut Ui| {
        for font in ui.style_mut().text_styles.values_mut() {
            font.size = font_size;
        }

        let mut plot = Plot::new(("trace_plot", surface.index()))
            .x_axis_label(RichText::new(surface.x_axis_label()).size(font_size))
            .y_axis_label(RichText::new("Signal").size(font_size))
            .show_grid(view.grid)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true);
        if view.legend {
            plot = plot.legend(Legend::default());
        }
        if view.x_log {
            plot = plot.x_grid_spacer(log_spacer).x_axis_formatter(log_formatter);
        }
        if view.y_log {
            plot = plot.y_grid_spacer(log_spacer).y_axis_formatter(log_formatter);
        }

        plot.show(ui, |plot_ui| {
            if let Some(b) = new_limits {
                let (x_min, x_max) = axis_range(b.x_min, b.x_max, view.x_log);
                let (y_min, y_max) = axis_range(b.y_min, b.y_max, view.y_log);
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            }

            for item in draw_list {
                let points: PlotPoints = item
                    .points
                    .iter()
                    .filter_map(|&[x, y]| Some([to_axis(x, view.x_log)?, to_axis(y, view.y_log)?]))
                    .collect();

                match item.style {
                    DrawStyle::Line { width } => {
                        plot_ui.line(Line::new(points).name(&item.name).color(item.color).width(width));
                    }
                    DrawStyle::Scatter { radius } => {
                        plot_ui.points(
                            Points::new(points)
                                .name(&item.name)
                                .color(item.color)
                                .radius(radius),
                        );
                    }
                }
            }
        });
    });
}

/// Map a data value onto a plot axis; `None` if it cannot be shown.
fn to_axis(v: f64, log: bool) -> Option<f64> {
    match log {
        false => Some(v),
        true if v > 0.0 => Some(v.log10()),
        true => None,
    }
}

fn axis_range(min: f64, max: f64, log: bool) -> (f64, f64) {
    if !log {
        return (min, max);
    }
    let lo = min.max(LOG_EPSILON);
    (lo.log10(), max.max(lo * 10.0).log10())
}

// ---------------------------------------------------------------------------
// Log axis ticks
// ---------------------------------------------------------------------------

/// Decades plus the 2..9 multiples in between.
fn log_spacer(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let mut marks = Vec::new();
    for decade in min.floor() as i32..=max.ceil() as i32 {
        for m in 1..10 {
            let value = decade as f64 + (m as f64).log10();
            if (min..=max).contains(&value) {
                let step_size = if m == 1 { 1.0 } else { 0.1 };
                marks.push(GridMark { value, step_size });
            }
        }
    }
    marks
}

/// Label decades as plain numbers; intermediate ticks stay unlabelled.
fn log_formatter(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.step_size < 1.0 {
        return String::new();
    }
    let value = 10f64.powf(mark.value.round());
    if (1e-3..1e4).contains(&value) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}
