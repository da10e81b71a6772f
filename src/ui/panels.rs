use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use rusty_stopflow::config::{Settings, StyleConfig};
use rusty_stopflow::data::range::RangeMode;
use rusty_stopflow::error::SessionError;
use rusty_stopflow::state::{AppState, Request};
use rusty_stopflow::trace::algebra::Operation;
use rusty_stopflow::trace::{Surface, Visibility};

/// Widget values that only become state once a button is pressed.
pub struct PanelInputs {
    pub scalar: f64,
    pub reference: Option<usize>,
    pub internal_x: f64,
    pub command: String,
    pub style: StyleConfig,
}

impl PanelInputs {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scalar: 1.0,
            reference: None,
            internal_x: 0.0,
            command: String::new(),
            style: settings.style,
        }
    }
}

/// Log a failed action and show it in the top bar.
fn report<T>(state: &mut AppState, result: Result<T, SessionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{e}");
            state.status_message = Some(format!("Error: {e}"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import…").clicked() {
                import_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export selected…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for surface in Surface::ALL {
            let count = state.surface(surface).traces.len();
            let text = format!("{surface} ({count})");
            if ui.selectable_label(state.active == surface, text).clicked() {
                state.active = surface;
            }
        }

        ui.separator();

        if ui.button("Reset plot").clicked() {
            state.reset_surface();
        }
        if ui.button("Autoscale").clicked() {
            state.auto_range();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – files, projection and curve selection
// ---------------------------------------------------------------------------

/// Render the left data panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.files.is_empty() {
        ui.label("No file imported.");
        if ui.button("Import…").clicked() {
            import_dialog(state);
        }
        return;
    }

    let names: Vec<String> = state
        .files
        .iter()
        .enumerate()
        .map(|(i, f)| format!("File{i}: {}", f.name()))
        .collect();
    let current = state.current_file.unwrap_or(0);
    egui::ComboBox::from_id_salt("current_file")
        .selected_text(names.get(current).cloned().unwrap_or_default())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for (i, name) in names.iter().enumerate() {
                if ui.selectable_label(i == current, name).clicked() {
                    state.select_file(i);
                }
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Remove file").clicked() {
            state.remove_current_file();
        }
        if ui
            .button(format!("Select by: {}", state.axis.description()))
            .on_hover_text("Switch between wavelengths and timepoints")
            .clicked()
        {
            state.toggle_axis();
        }
    });
    ui.separator();

    // ---- Projection rows ----
    let labels: Vec<String> = state
        .projection()
        .map(|p| p.rows().iter().map(|r| r.label.to_string()).collect())
        .unwrap_or_default();
    ui.strong(format!(
        "{} ({}/{})",
        state.axis.description(),
        state.projection_selection.len(),
        labels.len()
    ));
    ScrollArea::vertical()
        .id_salt("projection_rows")
        .max_height(ui.available_height() * 0.45)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (i, label) in labels.iter().enumerate() {
                let selected = state.projection_selection.contains(&i);
                if ui.selectable_label(selected, label).clicked() {
                    state.toggle_projection_row(i);
                }
            }
        });
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("None").clicked() {
            state.projection_selection.clear();
        }
    });
    ui.separator();

    // ---- Range selection ----
    egui::CollapsingHeader::new(RichText::new("Range select").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let settings = &mut state.settings;
            egui::Grid::new("range_grid").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                ui.add(egui::DragValue::new(&mut settings.range_from).speed(0.01));
                ui.end_row();
                ui.label("To");
                ui.add(egui::DragValue::new(&mut settings.range_to).speed(0.01));
                ui.end_row();
                ui.label("Steps");
                ui.add(egui::DragValue::new(&mut settings.range_steps).range(1..=1000));
                ui.end_row();
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut settings.range_mode, RangeMode::Linear, "Linear");
                ui.radio_value(&mut settings.range_mode, RangeMode::Log, "Log");
            });
            if ui.button("Select range").clicked() {
                let (from, to, steps, mode) = (
                    settings.range_from,
                    settings.range_to,
                    settings.range_steps,
                    settings.range_mode,
                );
                if state.range_select(from, to, steps, mode).is_none() {
                    state.status_message = Some("Range rejected: log ranges need positive limits".into());
                }
            }
        });
    ui.separator();

    // ---- Plot / SVD ----
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add to plot").clicked() {
            let result = state.add_selected_to_plot();
            report(state, result);
        }
        if ui
            .button("Add from all files")
            .on_hover_text("Also add rows with the same label from every other file")
            .clicked()
        {
            let result = state.add_from_all_files();
            report(state, result);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("SVD components");
        ui.add(egui::DragValue::new(&mut state.settings.svd_components).range(0..=50));
    });
    ui.checkbox(&mut state.settings.scale_by_singular_value, "Scale by singular value");
    if ui.button("Run SVD").clicked() {
        let (components, scale) = (
            state.settings.svd_components,
            state.settings.scale_by_singular_value,
        );
        let result = state.run_svd(components, scale);
        report(state, result);
    }
}

// ---------------------------------------------------------------------------
// Right side panel – trace table, algebra, style, plot commands
// ---------------------------------------------------------------------------

pub fn trace_panel(ui: &mut Ui, state: &mut AppState, inputs: &mut PanelInputs) {
    ui.heading(state.active.to_string());
    ui.separator();

    trace_table(ui, state);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_traces();
        }
        if ui.small_button("None").clicked() {
            state.select_no_traces();
        }
        for (label, visibility) in [
            ("Line", Visibility::Line),
            ("Scatter", Visibility::Scatter),
            ("Hide", Visibility::Hidden),
        ] {
            if ui.small_button(label).clicked() {
                let result = state.set_selected_visibility(visibility);
                report(state, result);
            }
        }
        if ui.small_button("Remove").clicked() {
            let result = state.remove_selected_traces();
            report(state, result);
        }
    });
    ui.separator();

    algebra_controls(ui, state, inputs);
    ui.separator();
    style_controls(ui, state, inputs);
    ui.separator();

    // ---- Plot command ----
    ui.strong("Plot command");
    let response = ui.add(
        egui::TextEdit::singleline(&mut inputs.command)
            .hint_text("xlim 0 1 | yscale log | grid off")
            .desired_width(f32::INFINITY),
    );
    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        let result = state.apply_plot_command(&inputs.command);
        if report(state, result).is_some() {
            inputs.command.clear();
        }
    }
}

fn trace_table(ui: &mut Ui, state: &mut AppState) {
    let surface = state.surface(state.active);
    let rows: Vec<(String, Visibility, bool)> = surface
        .traces
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name().to_string(), t.visibility(), surface.selection.contains(&i)))
        .collect();

    let mut toggled = Vec::new();
    TableBuilder::new(ui)
        .id_salt("trace_table")
        .striped(true)
        .max_scroll_height(260.0)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Shown");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let i = row.index();
                let (name, visibility, selected) = &rows[i];
                row.set_selected(*selected);
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui| {
                    if ui.selectable_label(*selected, name).clicked() {
                        toggled.push(i);
                    }
                });
                row.col(|ui| {
                    ui.label(match visibility {
                        Visibility::Line => "line",
                        Visibility::Scatter => "scatter",
                        Visibility::Hidden => "hidden",
                    });
                });
            });
        });

    for i in toggled {
        state.toggle_trace(i);
    }
}

fn algebra_controls(ui: &mut Ui, state: &mut AppState, inputs: &mut PanelInputs) {
    ui.strong("Trace algebra");

    let mut operation = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::DragValue::new(&mut inputs.scalar).speed(0.01));
        if ui.button("Add").clicked() {
            operation = Some(Operation::AddScalar(inputs.scalar));
        }
        if ui.button("Multiply").clicked() {
            operation = Some(Operation::MulScalar(inputs.scalar));
        }
    });

    let names: Vec<String> = state
        .surface(state.active)
        .traces
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    if inputs.reference.is_some_and(|r| r >= names.len()) {
        inputs.reference = None;
    }
    ui.horizontal(|ui: &mut Ui| {
        let selected_text = inputs
            .reference
            .and_then(|r| names.get(r).cloned())
            .unwrap_or_else(|| "Reference…".to_string());
        egui::ComboBox::from_id_salt("reference_trace")
            .selected_text(selected_text)
            .width(160.0)
            .show_ui(ui, |ui: &mut Ui| {
                for (i, name) in names.iter().enumerate() {
                    ui.selectable_value(&mut inputs.reference, Some(i), name);
                }
            });
        if ui
            .add_enabled(inputs.reference.is_some(), egui::Button::new("Subtract"))
            .clicked()
        {
            operation = inputs.reference.map(Operation::ReferenceTo);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("x =");
        ui.add(egui::DragValue::new(&mut inputs.internal_x).speed(0.01));
        if ui
            .button("Subtract value at x")
            .on_hover_text("Subtract each trace's own value nearest to x")
            .clicked()
        {
            operation = Some(Operation::InternalReference(inputs.internal_x));
        }
    });

    if let Some(operation) = operation {
        let result = state.request_algebra(operation);
        if let Some(Request::NoOp) = report(state, result) {
            state.status_message = Some("Nothing to do: select traces first".into());
        }
    }
}

fn style_controls(ui: &mut Ui, state: &mut AppState, inputs: &mut PanelInputs) {
    egui::CollapsingHeader::new(RichText::new("Style").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let style = &mut inputs.style;
            egui::Grid::new("style_grid").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Font size");
                ui.add(egui::DragValue::new(&mut style.font_size).range(6.0..=40.0));
                ui.end_row();
                ui.label("Line width");
                ui.add(egui::DragValue::new(&mut style.line_width).speed(0.1).range(0.1..=20.0));
                ui.end_row();
                ui.label("Marker / line");
                ui.add(egui::DragValue::new(&mut style.marker_ratio).speed(0.1).range(0.1..=20.0));
                ui.end_row();
                ui.label("Marker every");
                ui.add(egui::DragValue::new(&mut style.marker_stride).range(1..=1000));
                ui.end_row();
            });
            if ui.button("Apply style").clicked() {
                state.set_style(inputs.style);
            }
        });
}

// ---------------------------------------------------------------------------
// Proceed / abort prompt
// ---------------------------------------------------------------------------

/// Ask whether to continue an action that would skip incompatible traces.
pub fn confirm_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.pending.as_ref().map(|p| p.message()) else {
        return;
    };

    let mut proceed = false;
    let mut abort = false;
    egui::Window::new("Different x axes")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            ui.horizontal(|ui: &mut Ui| {
                proceed = ui.button("Proceed").clicked();
                abort = ui.button("Abort").clicked();
            });
        });

    if proceed {
        let result = state.confirm_pending();
        report(state, result);
    } else if abort {
        state.cancel_pending();
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn import_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Import stopped-flow data")
        .add_filter("Supported files", &["txt", "csv"])
        .add_filter("KinTek text", &["txt"])
        .add_filter("Pro-Data CSV", &["csv"]);
    if let Some(dir) = &state.settings.last_directory {
        dialog = dialog.set_directory(dir);
    }

    if let Some(paths) = dialog.pick_files() {
        let imported = state.import_paths(&paths);
        for (path, e) in &imported.failed {
            log::error!("Failed to load {}: {e}", path.display());
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Export selected traces")
        .add_filter("Tab-delimited text", &["txt"])
        .set_file_name("export.txt");
    if let Some(dir) = &state.settings.last_directory {
        dialog = dialog.set_directory(dir);
    }

    if let Some(path) = dialog.save_file() {
        let result = state.request_export(path);
        if let Some(Request::NoOp) = report(state, result) {
            state.status_message = Some("Nothing to export: select traces first".into());
        }
    }
}
