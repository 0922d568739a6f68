//! Chart adapters: project students into the shapes the plots draw.
//!
//! Nothing here touches egui widgets; `ui::plot` turns these into
//! `egui_plot` items.

use std::collections::BTreeMap;

use eframe::egui::Color32;

use crate::color::{self, PersonaColors};
use crate::data::model::{Metric, Student};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub fill: Color32,
    pub stroke: Color32,
}

impl SeriesStyle {
    fn solid(fill: Color32) -> Self {
        Self { fill, stroke: fill }
    }
}

/// One named series of values, aligned with [`ChartData::labels`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// Category chart input (bars, radar).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// A set of `[x, y]` points drawn in one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
}

/// Scatter chart input.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterData {
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub series: Vec<PointSeries>,
}

const BAR_METRICS: [(Metric, (u8, u8, u8)); 4] = [
    (Metric::AssessmentScore, color::BLUE),
    (Metric::Comprehension, color::GREEN),
    (Metric::Attention, color::YELLOW),
    (Metric::Focus, color::RED),
];

const RADAR_METRICS: [Metric; 6] = [
    Metric::Comprehension,
    Metric::Attention,
    Metric::Focus,
    Metric::Retention,
    Metric::EngagementTime,
    Metric::AssessmentScore,
];

/// Grouped bars of score and three skills, one group per student.
pub fn skill_bars(records: &[Student]) -> ChartData {
    ChartData {
        labels: records.iter().map(|s| s.name.clone()).collect(),
        series: BAR_METRICS
            .iter()
            .map(|&(metric, rgb)| Series {
                name: metric.label().to_string(),
                values: records.iter().map(|s| s.metric(metric)).collect(),
                style: SeriesStyle::solid(color::with_alpha(rgb, 0.6)),
            })
            .collect(),
    }
}

/// Attention against assessment score, one point series per persona.
pub fn attention_scatter(records: &[Student], colors: &PersonaColors) -> ScatterData {
    let mut by_persona: BTreeMap<i64, PointSeries> = BTreeMap::new();
    for s in records {
        by_persona
            .entry(s.persona)
            .or_insert_with(|| PointSeries {
                name: color::persona_label(s.persona),
                points: Vec::new(),
                color: colors.color_for(s.persona),
            })
            .points
            .push([s.attention, s.assessment_score]);
    }
    let series = by_persona.into_values().collect();

    ScatterData {
        x_title: Metric::Attention.label(),
        y_title: Metric::AssessmentScore.label(),
        series,
    }
}

/// Single-student profile across all six metrics.
pub fn profile_radar(student: &Student) -> ChartData {
    ChartData {
        labels: RADAR_METRICS.iter().map(|m| m.label().to_string()).collect(),
        series: vec![Series {
            name: student.name.clone(),
            values: RADAR_METRICS.iter().map(|&m| student.metric(m)).collect(),
            style: SeriesStyle {
                fill: color::with_alpha(color::BLUE, 0.2),
                stroke: color::with_alpha(color::BLUE, 1.0),
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::student;

    #[test]
    fn bars_follow_record_order() {
        let records = vec![student(1, "Alice", 5, 80.0), student(2, "Bob", 5, 95.0)];
        let chart = skill_bars(&records);
        assert_eq!(chart.labels, ["Alice", "Bob"]);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Assessment Score", "Comprehension", "Attention", "Focus"]);
        assert_eq!(chart.series[0].values, [80.0, 95.0]);
        assert_eq!(chart.series[0].style.fill, color::rgba(59, 130, 246, 0.6));
    }

    #[test]
    fn bars_for_no_students_are_empty() {
        let chart = skill_bars(&[]);
        assert!(chart.labels.is_empty());
        assert!(chart.series.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn scatter_groups_by_persona() {
        let mut a = student(1, "Alice", 5, 80.0);
        a.attention = 40.0;
        let mut b = student(2, "Bob", 5, 95.0);
        b.persona = 1;
        let c = student(3, "Cara", 9, 70.0);
        let colors = PersonaColors::new(&BTreeSet::from([0, 1]));

        let scatter = attention_scatter(&[a, b, c], &colors);
        assert_eq!(scatter.x_title, "Attention");
        assert_eq!(scatter.y_title, "Assessment Score");
        assert_eq!(scatter.series.len(), 2);
        assert_eq!(scatter.series[0].name, "Persona 0");
        assert_eq!(scatter.series[0].points, [[40.0, 80.0], [50.0, 70.0]]);
        assert_eq!(scatter.series[1].color, colors.color_for(1));
    }

    #[test]
    fn radar_lists_six_metrics() {
        let mut s = student(1, "Alice", 5, 80.0);
        s.engagement_time = 12.0;
        let chart = profile_radar(&s);
        assert_eq!(chart.labels.len(), 6);
        assert_eq!(chart.labels[4], "Engagement Time");
        assert_eq!(chart.series[0].name, "Alice");
        assert_eq!(chart.series[0].values, [50.0, 50.0, 50.0, 50.0, 12.0, 80.0]);
    }
}
