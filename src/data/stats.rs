use super::model::{Metric, Student};

// ---------------------------------------------------------------------------
// Aggregates over a student sequence
// ---------------------------------------------------------------------------

/// Arithmetic mean of `metric` over `records`; `0.0` for an empty slice.
pub fn average(records: &[Student], metric: Metric) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|s| s.metric(metric)).sum();
    sum / records.len() as f64
}

/// Pearson correlation between two metrics.
///
/// Returns `0.0` when fewer than two records are given or either metric has
/// no variance, so the display layer never sees NaN.
pub fn correlation(records: &[Student], a: Metric, b: Metric) -> f64 {
    if records.len() < 2 {
        return 0.0;
    }
    // r is scale-invariant; dividing by the largest magnitude keeps the
    // sums finite for huge metrics and the variance floor relative.
    let (Some(xs), Some(ys)) = (unit_scaled(records, a), unit_scaled(records, b)) else {
        return 0.0;
    };
    let n = records.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let floor = n * f64::EPSILON * f64::EPSILON;
    if var_x <= floor || var_y <= floor {
        return 0.0;
    }
    let r = cov / (var_x * var_y).sqrt();
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// `metric` of every record divided by its largest magnitude, or `None`
/// when that magnitude is zero or not finite.
fn unit_scaled(records: &[Student], metric: Metric) -> Option<Vec<f64>> {
    let scale = records
        .iter()
        .map(|s| s.metric(metric).abs())
        .fold(0.0, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    Some(records.iter().map(|s| s.metric(metric) / scale).collect())
}

/// Headline numbers shown in the overview cards.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewStats {
    pub count: usize,
    pub avg_score: f64,
    pub avg_comprehension: f64,
    pub avg_attention: f64,
    pub avg_focus: f64,
}

impl OverviewStats {
    pub fn compute(records: &[Student]) -> Self {
        OverviewStats {
            count: records.len(),
            avg_score: average(records, Metric::AssessmentScore),
            avg_comprehension: average(records, Metric::Comprehension),
            avg_attention: average(records, Metric::Attention),
            avg_focus: average(records, Metric::Focus),
        }
    }

    /// `(card title, value formatted to two decimals)` in display order.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Avg Score", format!("{:.2}", self.avg_score)),
            ("Avg Comprehension", format!("{:.2}", self.avg_comprehension)),
            ("Avg Attention", format!("{:.2}", self.avg_attention)),
            ("Avg Focus", format!("{:.2}", self.avg_focus)),
        ]
    }
}

/// Correlation of each skill with the assessment score, strongest first.
pub fn score_correlations(records: &[Student]) -> Vec<(Metric, f64)> {
    let mut out: Vec<(Metric, f64)> = Metric::ALL
        .into_iter()
        .filter(|&m| m != Metric::AssessmentScore)
        .map(|m| (m, correlation(records, m, Metric::AssessmentScore)))
        .collect();
    out.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    out
}
