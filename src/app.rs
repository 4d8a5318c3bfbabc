use std::time::Duration;

use eframe::egui::{self, RichText, Ui};

use crate::settings::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

/// How often the source file is checked for changes, in seconds.
const SOURCE_CHECK_INTERVAL: f64 = 2.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct JobsDashboardApp {
    pub state: AppState,
    last_source_check: f64,
}

impl JobsDashboardApp {
    /// Build the app and load the configured source once.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load();
        Self {
            state,
            last_source_check: 0.0,
        }
    }

    fn poll_source(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if now - self.last_source_check >= SOURCE_CHECK_INTERVAL {
            self.last_source_check = now;
            self.state.reload_if_changed();
        }
        ctx.request_repaint_after(Duration::from_secs_f64(SOURCE_CHECK_INTERVAL));
    }
}

impl eframe::App for JobsDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_source(ctx);

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

        // ---- Central panel: metrics, table, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("📊 Job Postings Dashboard");
    ui.separator();

    let Some(result) = &state.result else {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(egui::Color32::RED)),
                None => ui.heading("Open a file to explore postings  (File → Open…)"),
            };
        });
        return;
    };

    table::metrics(ui, state);
    ui.separator();

    if let Some(warning) = result.warning() {
        ui.label(RichText::new(format!("⚠ {warning}")).color(egui::Color32::YELLOW));
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("📋 Matching postings");
            table::postings_table(ui, state, 360.0);
            ui.add_space(12.0);

            ui.strong("📈 Charts");
            ui.columns(2, |cols| {
                charts::experience_chart(&mut cols[0], state);
                charts::city_chart(&mut cols[1], state);
            });
        });
}
