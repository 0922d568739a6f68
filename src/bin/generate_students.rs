use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_json::Value as JsonValue;

const N_STUDENTS: usize = 60;
const N_PERSONAS: usize = 3;
const KMEANS_ITERATIONS: usize = 25;

const FIRST_NAMES: [&str; 20] = [
    "Aarav", "Bianca", "Chen", "Diego", "Elif", "Farah", "Gustav", "Hana", "Ismael", "Jade",
    "Kofi", "Lena", "Mateo", "Nadia", "Oskar", "Priya", "Quinn", "Rosa", "Samir", "Tara",
];
const LAST_INITIALS: [&str; 3] = ["A.", "B.", "C."];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

#[derive(Debug, Clone, Serialize)]
struct StudentRow {
    student_id: i64,
    name: String,
    class: i64,
    comprehension: f64,
    attention: f64,
    focus: f64,
    retention: f64,
    assessment_score: f64,
    engagement_time: f64,
    persona: i64,
}

impl StudentRow {
    fn skills(&self) -> [f64; 5] {
        [
            self.comprehension,
            self.attention,
            self.focus,
            self.retention,
            self.engagement_time,
        ]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate_cohort(rng: &mut SimpleRng) -> Vec<StudentRow> {
    (0..N_STUDENTS)
        .map(|i| {
            // A shared aptitude term makes the skills correlate with each other.
            let aptitude = rng.gauss(0.0, 12.0);
            let mut skill = |mean: f64, sd: f64| (mean + aptitude + rng.gauss(0.0, sd)).clamp(0.0, 100.0);
            let comprehension = skill(65.0, 10.0);
            let attention = skill(60.0, 12.0);
            let focus = skill(62.0, 11.0);
            let retention = skill(64.0, 10.0);
            let engagement_time = (35.0 + aptitude * 0.5 + rng.gauss(0.0, 8.0)).clamp(5.0, 90.0);

            let assessment_score = (0.3 * comprehension
                + 0.25 * attention
                + 0.2 * focus
                + 0.15 * retention
                + 0.3 * engagement_time
                + rng.gauss(0.0, 4.0))
            .clamp(0.0, 100.0);

            StudentRow {
                student_id: i as i64 + 1,
                name: format!(
                    "{} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_INITIALS[i / FIRST_NAMES.len() % LAST_INITIALS.len()]
                ),
                class: 5 + rng.below(6) as i64,
                comprehension: round2(comprehension),
                attention: round2(attention),
                focus: round2(focus),
                retention: round2(retention),
                assessment_score: round2(assessment_score),
                engagement_time: round2(engagement_time),
                persona: 0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Persona clustering: k-means over standardised skills
// ---------------------------------------------------------------------------

fn standardise(rows: &[StudentRow]) -> Vec<[f64; 5]> {
    let n = rows.len().max(1) as f64;
    let mut mean = [0.0; 5];
    for r in rows {
        for (m, v) in mean.iter_mut().zip(r.skills()) {
            *m += v / n;
        }
    }
    let mut sd = [0.0; 5];
    for r in rows {
        for ((s, v), m) in sd.iter_mut().zip(r.skills()).zip(mean) {
            *s += (v - m).powi(2) / n;
        }
    }
    rows.iter()
        .map(|r| {
            let mut z = [0.0; 5];
            for (k, v) in r.skills().into_iter().enumerate() {
                let s = sd[k].sqrt();
                z[k] = if s > f64::EPSILON { (v - mean[k]) / s } else { 0.0 };
            }
            z
        })
        .collect()
}

fn distance2(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Lloyd's algorithm. Centroids start at the low/middle/high overall-skill
/// students, so persona 0 is the weakest group and the labels are stable.
fn assign_personas(rows: &mut [StudentRow]) {
    if rows.len() < N_PERSONAS {
        return;
    }
    let points = standardise(rows);

    let mut by_total: Vec<usize> = (0..points.len()).collect();
    by_total.sort_by(|&a, &b| points[a].iter().sum::<f64>().total_cmp(&points[b].iter().sum()));
    let mut centroids: Vec<[f64; 5]> = (0..N_PERSONAS)
        .map(|k| points[by_total[(2 * k + 1) * points.len() / (2 * N_PERSONAS)]])
        .collect();

    let mut labels = vec![0usize; points.len()];
    for _ in 0..KMEANS_ITERATIONS {
        for (label, p) in labels.iter_mut().zip(&points) {
            *label = (0..N_PERSONAS)
                .min_by(|&a, &b| distance2(p, &centroids[a]).total_cmp(&distance2(p, &centroids[b])))
                .unwrap_or(0);
        }
        for (k, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&[f64; 5]> = labels
                .iter()
                .zip(&points)
                .filter(|(l, _)| **l == k)
                .map(|(_, p)| p)
                .collect();
            if members.is_empty() {
                continue;
            }
            let mut next = [0.0; 5];
            for p in &members {
                for (c, v) in next.iter_mut().zip(p.iter()) {
                    *c += v / members.len() as f64;
                }
            }
            *centroid = next;
        }
    }

    for (row, label) in rows.iter_mut().zip(labels) {
        row.persona = label as i64;
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_parquet(rows: &[StudentRow], path: &str) -> Result<()> {
    let float_col = |f: fn(&StudentRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("student_id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("comprehension", DataType::Float64, false),
        Field::new("attention", DataType::Float64, false),
        Field::new("focus", DataType::Float64, false),
        Field::new("retention", DataType::Float64, false),
        Field::new("assessment_score", DataType::Float64, false),
        Field::new("engagement_time", DataType::Float64, false),
        Field::new("persona", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.student_id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.class).collect::<Vec<_>>())),
            float_col(|r| r.comprehension),
            float_col(|r| r.attention),
            float_col(|r| r.focus),
            float_col(|r| r.retention),
            float_col(|r| r.assessment_score),
            float_col(|r| r.engagement_time),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.persona).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

/// Records-oriented JSON. Every third row carries some numbers as strings,
/// the way a loosely typed export does.
fn write_json(rows: &[StudentRow], path: &str) -> Result<()> {
    let mut values = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut value = serde_json::to_value(row).context("serialising row")?;
        if i % 3 == 0 {
            if let JsonValue::Object(obj) = &mut value {
                for key in ["class", "comprehension", "focus"] {
                    if let Some(v) = obj.get_mut(key) {
                        *v = JsonValue::String(v.to_string());
                    }
                }
            }
        }
        values.push(value);
    }
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, &values).context("writing JSON")?;
    Ok(())
}

fn write_csv(rows: &[StudentRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut rows = generate_cohort(&mut rng);
    assign_personas(&mut rows);

    write_parquet(&rows, "students_processed.parquet")?;
    write_json(&rows, "students_processed.json")?;
    write_csv(&rows, "students_processed.csv")?;

    let mut counts = [0usize; N_PERSONAS];
    for r in &rows {
        counts[r.persona as usize] += 1;
    }
    println!(
        "Wrote {} students (personas {:?}) to students_processed.{{parquet,json,csv}}",
        rows.len(),
        counts
    );
    Ok(())
}
