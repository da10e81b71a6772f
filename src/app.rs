use std::path::PathBuf;

use eframe::egui;
use rusty_stopflow::config::Settings;
use rusty_stopflow::state::AppState;

use crate::ui::panels::{self, PanelInputs};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StopflowApp {
    pub state: AppState,
    inputs: PanelInputs,
    settings_path: PathBuf,
}

impl StopflowApp {
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            inputs: PanelInputs::from_settings(&settings),
            state: AppState::new(settings),
            settings_path,
        }
    }
}

impl eframe::App for StopflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: files and projection ----
        egui::SidePanel::left("data_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: traces, algebra, style ----
        egui::SidePanel::right("trace_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::trace_panel(ui, &mut self.state, &mut self.inputs);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trace_plot(ui, &mut self.state);
        });

        panels::confirm_dialog(ctx, &mut self.state);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.state.settings.save(&self.settings_path) {
            log::error!("Failed to save settings: {e:#}");
        }
    }
}
