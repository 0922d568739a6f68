use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Field, Student, StudentDataset};

/// The processed dataset shipped with the binary.
const EMBEDDED_STUDENTS: &str = include_str!("../../assets/students_processed.json");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset compiled into the binary.
pub fn load_embedded() -> Result<StudentDataset> {
    load_json_str(EMBEDDED_STUDENTS).context("loading embedded student data")
}

/// Load a student dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field, numeric or string typed
/// * `.json`    – `[{ "student_id": 1, "name": "...", ... }, ...]`
/// * `.csv`     – header row with the field names
pub fn load_file(path: &Path) -> Result<StudentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json_str(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv(file)
        }
        other => Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Loosely typed source records
// ---------------------------------------------------------------------------

/// A source cell before coercion. Numbers may arrive as text.
#[derive(Debug, Clone, PartialEq)]
enum RawValue {
    Number(f64),
    Text(String),
    /// Present but unusable (null, bool, nested); holds the type name.
    Invalid(&'static str),
}

type RawRecord = BTreeMap<String, RawValue>;

/// Coerce every source record, preserving order. Fails on the first bad row.
fn dataset_from_records<I>(records: I) -> Result<StudentDataset, LoadError>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut seen = HashSet::new();
    let mut students = Vec::new();
    for (row, raw) in records.into_iter().enumerate() {
        let student = student_from_raw(row, &raw)?;
        if !seen.insert(student.student_id) {
            return Err(LoadError::malformed(
                row,
                Field::StudentId.key(),
                format!("duplicates id {}", student.student_id),
            ));
        }
        students.push(student);
    }
    Ok(StudentDataset::from_students(students))
}

fn student_from_raw(row: usize, raw: &RawRecord) -> Result<Student, LoadError> {
    let id = coerce_integer(row, raw, Field::StudentId)?;
    if id <= 0 {
        return Err(LoadError::malformed(
            row,
            Field::StudentId.key(),
            format!("{id} is not a positive id"),
        ));
    }

    Ok(Student {
        student_id: id,
        name: coerce_text(row, raw, Field::Name)?,
        class: coerce_integer(row, raw, Field::Class)?,
        comprehension: coerce_number(row, raw, Field::Comprehension)?,
        attention: coerce_number(row, raw, Field::Attention)?,
        focus: coerce_number(row, raw, Field::Focus)?,
        retention: coerce_number(row, raw, Field::Retention)?,
        assessment_score: coerce_number(row, raw, Field::AssessmentScore)?,
        engagement_time: coerce_number(row, raw, Field::EngagementTime)?,
        persona: coerce_integer(row, raw, Field::Persona)?,
    })
}

fn coerce_number(row: usize, raw: &RawRecord, field: Field) -> Result<f64, LoadError> {
    let key = field.key();
    let value = match raw.get(key) {
        None => return Err(LoadError::malformed(row, key, "is missing")),
        Some(RawValue::Number(v)) => *v,
        Some(RawValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(LoadError::malformed(row, key, "is empty"));
            }
            s.parse::<f64>()
                .map_err(|_| LoadError::malformed(row, key, format!("'{s}' is not a number")))?
        }
        Some(RawValue::Invalid(kind)) => {
            return Err(LoadError::malformed(row, key, format!("is {kind}, expected a number")))
        }
    };
    if !value.is_finite() {
        return Err(LoadError::malformed(row, key, format!("{value} is not finite")));
    }
    Ok(value)
}

fn coerce_integer(row: usize, raw: &RawRecord, field: Field) -> Result<i64, LoadError> {
    let value = coerce_number(row, raw, field)?;
    // `i64::MAX as f64` rounds up to 2^63, which no longer fits.
    if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(LoadError::malformed(
            row,
            field.key(),
            format!("{value} is not an integer"),
        ));
    }
    Ok(value as i64)
}

fn coerce_text(row: usize, raw: &RawRecord, field: Field) -> Result<String, LoadError> {
    let key = field.key();
    match raw.get(key) {
        Some(RawValue::Text(s)) => Ok(s.clone()),
        Some(RawValue::Number(v)) => Ok(v.to_string()),
        Some(RawValue::Invalid(kind)) => {
            Err(LoadError::malformed(row, key, format!("is {kind}, expected text")))
        }
        None => Err(LoadError::malformed(row, key, "is missing")),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "student_id": 1, "name": "Aarav", "class": "9", "comprehension": "55.4", ... },
///   ...
/// ]
/// ```
pub fn load_json_str(text: &str) -> Result<StudentDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let raw = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_raw(val)))
                .collect())
        })
        .collect::<Result<Vec<RawRecord>>>()?;

    Ok(dataset_from_records(raw)?)
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .map(RawValue::Number)
            .unwrap_or_else(|| RawValue::Text(n.to_string())),
        JsonValue::String(s) => RawValue::Text(s.clone()),
        JsonValue::Null => RawValue::Invalid("null"),
        JsonValue::Bool(_) => RawValue::Invalid("a boolean"),
        JsonValue::Array(_) => RawValue::Invalid("an array"),
        JsonValue::Object(_) => RawValue::Invalid("an object"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with field names, one student per row.
/// Every cell is text and goes through the same coercion as JSON strings.
pub fn load_csv<R: Read>(input: R) -> Result<StudentDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut raw = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), RawValue::Text(cell.to_string())))
            .collect();
        raw.push(row);
    }

    Ok(dataset_from_records(raw)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Integer, float and string columns are accepted for every field, which
/// covers files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<StudentDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raw = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns: Vec<(String, &ArrayRef)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(f, col)| (f.name().clone(), col))
            .collect();

        for row in 0..batch.num_rows() {
            let record: RawRecord = columns
                .iter()
                .map(|(name, col)| (name.clone(), arrow_to_raw(col, row)))
                .collect();
            raw.push(record);
        }
    }

    Ok(dataset_from_records(raw)?)
}

/// Read a single cell from an Arrow column.
fn arrow_to_raw(col: &ArrayRef, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Invalid("null");
    }
    match col.data_type() {
        DataType::Utf8 => RawValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => RawValue::Number(col.as_primitive::<Int8Type>().value(row) as f64),
        DataType::Int16 => RawValue::Number(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int32 => RawValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => RawValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::UInt8 => RawValue::Number(col.as_primitive::<UInt8Type>().value(row) as f64),
        DataType::UInt16 => RawValue::Number(col.as_primitive::<UInt16Type>().value(row) as f64),
        DataType::UInt32 => RawValue::Number(col.as_primitive::<UInt32Type>().value(row) as f64),
        DataType::UInt64 => RawValue::Number(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => {
            RawValue::Number(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => RawValue::Number(col.as_primitive::<Float64Type>().value(row)),
        _ => RawValue::Invalid("an unsupported column type"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field as ArrowField, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "student_id,name,class,comprehension,attention,focus,retention,assessment_score,engagement_time,persona";

    fn malformed(err: &anyhow::Error) -> Option<(usize, String)> {
        match err.downcast_ref::<LoadError>()? {
            LoadError::MalformedRecord { row, field, .. } => Some((*row, field.clone())),
            _ => None,
        }
    }

    #[test]
    fn embedded_dataset_loads() {
        let ds = load_embedded().unwrap();
        assert!(!ds.is_empty());
        assert_eq!(ds.students()[0].name, "Aarav");
        // "9" and "55.4" arrive as strings in the source file.
        assert_eq!(ds.students()[0].class, 9);
        assert_eq!(ds.students()[0].comprehension, 55.4);
    }

    #[test]
    fn json_coerces_numeric_strings_and_keeps_order() {
        let text = r#"[
            {"student_id": "2", "name": "Bob", "class": 5, "comprehension": " 61.5 ",
             "attention": 70, "focus": "80", "retention": 1e1, "assessment_score": 95,
             "engagement_time": "12.25", "persona": "1"},
            {"student_id": 1, "name": "Alice", "class": "5.0", "comprehension": 1,
             "attention": 2, "focus": 3, "retention": 4, "assessment_score": 80,
             "engagement_time": 5, "persona": 0}
        ]"#;
        let ds = load_json_str(text).unwrap();
        let s = ds.students();
        assert_eq!(s[0].name, "Bob");
        assert_eq!(s[0].student_id, 2);
        assert_eq!(s[0].comprehension, 61.5);
        assert_eq!(s[0].retention, 10.0);
        assert_eq!(s[0].engagement_time, 12.25);
        assert_eq!(s[0].persona, 1);
        assert_eq!(s[1].class, 5);
    }

    #[test]
    fn json_unparseable_number_is_malformed() {
        let text = r#"[{"student_id": 1, "name": "A", "class": 5, "comprehension": "n/a",
            "attention": 1, "focus": 1, "retention": 1, "assessment_score": 1,
            "engagement_time": 1, "persona": 0}]"#;
        let err = load_json_str(text).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "comprehension".to_string())));
    }

    #[test]
    fn json_null_and_missing_fields_are_malformed() {
        let null_focus = r#"[{"student_id": 1, "name": "A", "class": 5, "comprehension": 1,
            "attention": 1, "focus": null, "retention": 1, "assessment_score": 1,
            "engagement_time": 1, "persona": 0}]"#;
        let err = load_json_str(null_focus).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "focus".to_string())));

        let no_persona = r#"[{"student_id": 1, "name": "A", "class": 5, "comprehension": 1,
            "attention": 1, "focus": 1, "retention": 1, "assessment_score": 1,
            "engagement_time": 1}]"#;
        let err = load_json_str(no_persona).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "persona".to_string())));
    }

    #[test]
    fn nan_and_fractional_ids_are_rejected() {
        let csv = format!("{HEADER}\n1,A,5,NaN,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "comprehension".to_string())));

        let csv = format!("{HEADER}\n1.5,A,5,1,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "student_id".to_string())));

        let csv = format!("{HEADER}\n0,A,5,1,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "student_id".to_string())));
    }

    #[test]
    fn duplicate_ids_fail_the_whole_load() {
        let csv = format!("{HEADER}\n1,A,5,1,1,1,1,1,1,0\n1,B,6,1,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((1, "student_id".to_string())));
    }

    #[test]
    fn ids_beyond_32_bits_are_accepted() {
        let text = r#"[{"student_id": 5000000000, "name": "A", "class": 5, "comprehension": 1,
            "attention": 1, "focus": 1, "retention": 1, "assessment_score": 1,
            "engagement_time": 1, "persona": 0}]"#;
        let ds = load_json_str(text).unwrap();
        assert_eq!(ds.students()[0].student_id, 5_000_000_000);
    }

    #[test]
    fn integers_at_two_to_the_63_are_rejected() {
        let csv = format!("{HEADER}\n9223372036854775808,A,5,1,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "student_id".to_string())));

        let csv = format!("{HEADER}\n1,A,-9223372036854775808,1,1,1,1,1,1,0\n");
        let err = load_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(malformed(&err), Some((0, "class".to_string())));
    }

    #[test]
    fn csv_loads_rows() {
        let csv = format!("{HEADER}\n7,Dana Ray,8,60,61,62,63,64.5,20,2\n");
        let ds = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        let s = &ds.students()[0];
        assert_eq!(s.name, "Dana Ray");
        assert_eq!(s.assessment_score, 64.5);
        assert_eq!(s.persona, 2);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("students.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_file_loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, EMBEDDED_STUDENTS).unwrap();
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), load_embedded().unwrap().len());
    }

    #[test]
    fn parquet_accepts_mixed_column_types() {
        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("student_id", DataType::Int64, false),
            ArrowField::new("name", DataType::Utf8, false),
            ArrowField::new("class", DataType::Utf8, false),
            ArrowField::new("comprehension", DataType::Float64, false),
            ArrowField::new("attention", DataType::Float64, false),
            ArrowField::new("focus", DataType::Float64, false),
            ArrowField::new("retention", DataType::Float64, false),
            ArrowField::new("assessment_score", DataType::Float64, false),
            ArrowField::new("engagement_time", DataType::Float64, false),
            ArrowField::new("persona", DataType::Int64, false),
        ]));
        let metric = || Arc::new(Float64Array::from(vec![50.0, 60.0])) as ArrayRef;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["Alice", "Bob"])),
                Arc::new(StringArray::from(vec!["5", "9"])),
                metric(),
                metric(),
                metric(),
                metric(),
                Arc::new(Float64Array::from(vec![80.0, 95.0])),
                metric(),
                Arc::new(Int64Array::from(vec![0, 1])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.students()[1].name, "Bob");
        assert_eq!(ds.students()[1].class, 9);
        assert_eq!(ds.students()[1].assessment_score, 95.0);
    }
}
