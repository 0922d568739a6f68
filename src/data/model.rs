use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Field – the static column schema of a student record
// ---------------------------------------------------------------------------

/// How a field's values compare and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
}

/// Every column of a [`Student`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    StudentId,
    Name,
    Class,
    Comprehension,
    Attention,
    Focus,
    Retention,
    AssessmentScore,
    EngagementTime,
    Persona,
}

impl Field {
    /// The table schema. Columns never depend on which rows are visible.
    pub const ALL: [Field; 10] = [
        Field::StudentId,
        Field::Name,
        Field::Class,
        Field::Comprehension,
        Field::Attention,
        Field::Focus,
        Field::Retention,
        Field::AssessmentScore,
        Field::EngagementTime,
        Field::Persona,
    ];

    /// Source record key, e.g. `assessment_score`.
    pub fn key(self) -> &'static str {
        match self {
            Field::StudentId => "student_id",
            Field::Name => "name",
            Field::Class => "class",
            Field::Comprehension => "comprehension",
            Field::Attention => "attention",
            Field::Focus => "focus",
            Field::Retention => "retention",
            Field::AssessmentScore => "assessment_score",
            Field::EngagementTime => "engagement_time",
            Field::Persona => "persona",
        }
    }

    /// Look a field up by its source key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Column header text: the first underscore becomes a space.
    pub fn header(self) -> String {
        self.key().replacen('_', " ", 1)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::StudentId | Field::Class | Field::Persona => FieldKind::Integer,
            Field::Name => FieldKind::Text,
            _ => FieldKind::Float,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Metric – the six floating-point measurements
// ---------------------------------------------------------------------------

/// The numeric metrics that can be averaged and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Comprehension,
    Attention,
    Focus,
    Retention,
    AssessmentScore,
    EngagementTime,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Comprehension,
        Metric::Attention,
        Metric::Focus,
        Metric::Retention,
        Metric::AssessmentScore,
        Metric::EngagementTime,
    ];

    /// Human label used in charts and stat cards.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Comprehension => "Comprehension",
            Metric::Attention => "Attention",
            Metric::Focus => "Focus",
            Metric::Retention => "Retention",
            Metric::AssessmentScore => "Assessment Score",
            Metric::EngagementTime => "Engagement Time",
        }
    }
}

// ---------------------------------------------------------------------------
// FieldValue – a single borrowed cell
// ---------------------------------------------------------------------------

/// One cell of a student row, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Order two values of the same field.
    ///
    /// Numbers compare numerically, so `-0.0` ties with `0.0`; text compares
    /// case-insensitively. Mixed kinds never occur for a single field; they
    /// fall back to Equal, as do unordered floats.
    pub fn compare(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Text(a), Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.2}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Student – one row of the processed dataset
// ---------------------------------------------------------------------------

/// A single student's precomputed metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub student_id: i64,
    pub name: String,
    pub class: i64,
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub assessment_score: f64,
    pub engagement_time: f64,
    /// Cluster assignment from the offline persona model.
    pub persona: i64,
}

impl Student {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Comprehension => self.comprehension,
            Metric::Attention => self.attention,
            Metric::Focus => self.focus,
            Metric::Retention => self.retention,
            Metric::AssessmentScore => self.assessment_score,
            Metric::EngagementTime => self.engagement_time,
        }
    }

    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::StudentId => FieldValue::Integer(self.student_id),
            Field::Name => FieldValue::Text(&self.name),
            Field::Class => FieldValue::Integer(self.class),
            Field::Comprehension => FieldValue::Float(self.comprehension),
            Field::Attention => FieldValue::Float(self.attention),
            Field::Focus => FieldValue::Float(self.focus),
            Field::Retention => FieldValue::Float(self.retention),
            Field::AssessmentScore => FieldValue::Float(self.assessment_score),
            Field::EngagementTime => FieldValue::Float(self.engagement_time),
            Field::Persona => FieldValue::Integer(self.persona),
        }
    }
}

// ---------------------------------------------------------------------------
// StudentDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded, read-only student sequence in source order.
#[derive(Debug, Clone, Default)]
pub struct StudentDataset {
    students: Vec<Student>,
    /// Sorted set of persona labels present.
    personas: BTreeSet<i64>,
}

impl StudentDataset {
    pub fn from_students(students: Vec<Student>) -> Self {
        let personas = students.iter().map(|s| s.persona).collect();
        StudentDataset { students, personas }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn personas(&self) -> &BTreeSet<i64> {
        &self.personas
    }

    /// Number of students per persona label.
    pub fn persona_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.students {
            *counts.entry(s.persona).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn student(id: i64, name: &str, class: i64, score: f64) -> Student {
    Student {
        student_id: id,
        name: name.to_string(),
        class,
        comprehension: 50.0,
        attention: 50.0,
        focus: 50.0,
        retention: 50.0,
        assessment_score: score,
        engagement_time: 30.0,
        persona: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip_through_lookup() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("shoe_size"), None);
    }

    #[test]
    fn header_replaces_first_underscore_only() {
        assert_eq!(Field::AssessmentScore.header(), "assessment score");
        assert_eq!(Field::StudentId.header(), "student id");
        assert_eq!(Field::Name.header(), "name");
    }

    #[test]
    fn field_kinds_match_record_types() {
        assert_eq!(Field::Name.kind(), FieldKind::Text);
        assert_eq!(Field::Class.kind(), FieldKind::Integer);
        assert_eq!(Field::EngagementTime.kind(), FieldKind::Float);
    }

    #[test]
    fn text_compares_case_insensitively() {
        let a = FieldValue::Text("alice");
        let b = FieldValue::Text("Bob");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            FieldValue::Text("CARA").compare(&FieldValue::Text("cara")),
            Ordering::Equal
        );
    }

    #[test]
    fn floats_display_with_two_decimals() {
        assert_eq!(FieldValue::Float(85.0).to_string(), "85.00");
        assert_eq!(FieldValue::Integer(5).to_string(), "5");
    }

    #[test]
    fn dataset_tracks_personas() {
        let mut a = student(1, "Alice", 5, 80.0);
        a.persona = 2;
        let b = student(2, "Bob", 5, 95.0);
        let c = student(3, "Cara", 9, 80.0);
        let ds = StudentDataset::from_students(vec![a, b, c]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.personas().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(ds.persona_counts().get(&0), Some(&2));
        assert_eq!(ds.persona_counts().get(&2), Some(&1));
    }
}
