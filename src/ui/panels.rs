use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::persona_label;
use crate::state::AppState;

/// Findings from the offline analysis, shown as-is.
pub const INSIGHTS: [&str; 4] = [
    "Cognitive skills show strong correlation with assessment scores.",
    "ML model predicts scores accurately for synthetic data.",
    "Students grouped into three learning personas.",
    "Personas can help tailor learning strategies.",
];

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts and the status message.
pub fn top_bar(ui: &mut Ui, state: &AppState, title: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new(title).strong());

        ui.separator();

        if let Some(ds) = state.dataset() {
            ui.label(format!(
                "{} students loaded, {} visible",
                ds.len(),
                state.visible_indices().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – overview, correlations, insights
// ---------------------------------------------------------------------------

/// Render the left summary panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Overview");
            ui.separator();
            overview_cards(ui, state);

            ui.add_space(12.0);
            ui.heading("Correlation with score");
            ui.separator();
            correlations(ui, state);

            ui.add_space(12.0);
            ui.heading("Personas");
            ui.separator();
            personas(ui, state);

            ui.add_space(12.0);
            insights(ui);
        });
}

fn overview_cards(ui: &mut Ui, state: &AppState) {
    egui::Grid::new("overview_cards")
        .num_columns(2)
        .spacing([8.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            for (i, (title, value)) in state.overview.cards().into_iter().enumerate() {
                egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                    ui.set_min_width(90.0);
                    ui.label(RichText::new(title).strong());
                    ui.label(RichText::new(value).size(18.0));
                });
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });
}

fn correlations(ui: &mut Ui, state: &AppState) {
    if state.correlations.is_empty() {
        ui.label("No data.");
        return;
    }
    egui::Grid::new("score_correlations")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (metric, r) in &state.correlations {
                ui.label(metric.label());
                ui.monospace(format!("{r:+.2}"));
                ui.end_row();
            }
        });
}

fn personas(ui: &mut Ui, state: &AppState) {
    let counts = match state.dataset() {
        Some(ds) => ds.persona_counts(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    for (persona, color) in state.persona_colors.legend_entries() {
        let n = counts.get(&persona).copied().unwrap_or(0);
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(color, "●");
            ui.label(format!("{}: {n} students", persona_label(persona)));
        });
    }
}

/// The canned findings list.
pub fn insights(ui: &mut Ui) {
    ui.heading("Insights & Key Findings");
    ui.separator();
    for line in INSIGHTS {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.label("•");
            ui.label(line);
        });
    }
}
