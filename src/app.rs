use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StudentDashboardApp {
    pub state: AppState,
    title: String,
}

impl StudentDashboardApp {
    pub fn new(state: AppState, title: impl Into<String>) -> Self {
        Self {
            state,
            title: title.into(),
        }
    }
}

impl eframe::App for StudentDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title + counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &self.title);
        });

        // ---- Left side panel: overview + insights ----
        egui::SidePanel::left("summary_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: charts + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::skill_bar_chart(ui, &self.state);
                    ui.separator();
                    plot::attention_scatter_chart(ui, &self.state);
                    ui.separator();
                    plot::profile_radar_chart(ui, &mut self.state);
                    ui.separator();
                    table::student_table(ui, &mut self.state);
                });
        });
    }
}
