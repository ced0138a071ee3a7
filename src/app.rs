use eframe::egui;

use county_dashboard::config::DashboardConfig;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub title: String,
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            title: config.title().to_string(),
            state: AppState::new(config.registry()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: coverage, chart, rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a session log to begin  (File → Open…)");
                });
                return;
            }
            panels::coverage_alert(ui, &self.state);
            ui.separator();
            plot::coverage_chart(ui, &self.state);
            ui.separator();
            table::records_table(ui, &self.state);
        });
    }
}
