use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::chart::{self, ChartData};
use crate::state::AppState;

const BAR_WIDTH: f64 = 0.2;

// ---------------------------------------------------------------------------
// Skill vs score (grouped bars)
// ---------------------------------------------------------------------------

/// Score and three skills per student, one bar group per student.
pub fn skill_bar_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Skill vs Score (Bar Chart)");

    let data = chart::skill_bars(state.students());
    let n_series = data.series.len() as f64;
    let labels = data.labels.clone();

    Plot::new("skill_bars")
        .legend(Legend::default())
        .height(300.0)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (k, series) in data.series.iter().enumerate() {
                // Centre the group of bars on the integer x of each student.
                let offset = (k as f64 - (n_series - 1.0) / 2.0) * BAR_WIDTH;
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(i as f64 + offset, v).width(BAR_WIDTH))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&series.name)
                        .color(series.style.fill),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Attention vs performance (scatter)
// ---------------------------------------------------------------------------

/// Attention against assessment score, coloured by persona.
pub fn attention_scatter_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Attention vs Performance (Scatter Chart)");

    let data = chart::attention_scatter(state.students(), &state.persona_colors);

    Plot::new("attention_scatter")
        .legend(Legend::default())
        .height(300.0)
        .x_axis_label(data.x_title)
        .y_axis_label(data.y_title)
        .show(ui, |plot_ui| {
            for series in &data.series {
                plot_ui.points(
                    Points::new(PlotPoints::from(series.points.clone()))
                        .name(&series.name)
                        .color(series.color)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Student profile (radar)
// ---------------------------------------------------------------------------

/// Radar of the selected student's six metrics, with a student picker.
pub fn profile_radar_chart(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Student Profile (Radar Chart)");

    let Some(student) = state.selected() else {
        ui.label("No student to profile.");
        return;
    };
    let data = chart::profile_radar(student);

    let mut selected = state.selected_index();
    egui::ComboBox::from_id_salt("radar_student")
        .selected_text(&student.name)
        .show_ui(ui, |ui: &mut Ui| {
            for (i, s) in state.students().iter().enumerate() {
                ui.selectable_value(&mut selected, i, format!("{} (#{})", s.name, s.student_id));
            }
        });

    radar_plot(ui, &data);

    if selected != state.selected_index() {
        state.select_student(selected);
    }
}

/// Outer ring radius: the largest value rounded up to a multiple of 20.
fn radar_scale(data: &ChartData) -> f64 {
    let max = data
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    ((max / 20.0).ceil() * 20.0).max(20.0)
}

/// Unit vector of axis `i` out of `n`, first axis pointing up, clockwise.
fn spoke(i: usize, n: usize) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    [angle.cos(), angle.sin()]
}

fn radar_plot(ui: &mut Ui, data: &ChartData) {
    let n = data.labels.len();
    if n < 3 {
        return;
    }
    let scale = radar_scale(data);
    let grid = Color32::from_gray(160);

    Plot::new("profile_radar")
        .legend(Legend::default())
        .height(340.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ring in 1..=4 {
                let r = scale * ring as f64 / 4.0;
                let points: PlotPoints = (0..=n)
                    .map(|i| {
                        let [x, y] = spoke(i % n, n);
                        [x * r, y * r]
                    })
                    .collect();
                plot_ui.line(Line::new(points).color(grid).width(0.5));
            }

            for (i, label) in data.labels.iter().enumerate() {
                let [x, y] = spoke(i, n);
                let axis: PlotPoints = vec![[0.0, 0.0], [x * scale, y * scale]].into();
                plot_ui.line(Line::new(axis).color(grid).width(0.5));
                plot_ui.text(Text::new(
                    PlotPoint::new(x * scale * 1.15, y * scale * 1.15),
                    RichText::new(label).size(12.0),
                ));
            }

            for series in &data.series {
                let vertices: Vec<[f64; 2]> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        let [x, y] = spoke(i, n);
                        [x * v, y * v]
                    })
                    .collect();
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(vertices.clone()))
                        .name(&series.name)
                        .fill_color(series.style.fill)
                        .stroke(Stroke::new(2.0, series.style.stroke)),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(vertices))
                        .color(series.style.stroke)
                        .filled(true)
                        .radius(3.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::student;

    #[test]
    fn radar_scale_rounds_up_to_twenty() {
        let s = student(1, "Alice", 5, 81.0);
        assert_eq!(radar_scale(&chart::profile_radar(&s)), 100.0);

        let mut low = student(2, "Bob", 5, 0.0);
        low.comprehension = 0.0;
        low.attention = 0.0;
        low.focus = 0.0;
        low.retention = 0.0;
        low.engagement_time = 0.0;
        assert_eq!(radar_scale(&chart::profile_radar(&low)), 20.0);
    }

    #[test]
    fn first_spoke_points_up() {
        let [x, y] = spoke(0, 6);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        let [x, _] = spoke(1, 6);
        assert!(x > 0.0, "axes run clockwise");
    }
}
