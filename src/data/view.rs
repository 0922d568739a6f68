use std::cmp::Ordering;

use super::model::{Field, Student};

// ---------------------------------------------------------------------------
// Table view state: search text + sort key/direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// `asc` / `desc` (any case); anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    /// Header suffix for the active sort column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Interactive state of the student table.
///
/// Only ever mutated through the setters below; the rows shown are always
/// re-derived from scratch with [`derive_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewState {
    search_text: String,
    sort_field: Field,
    sort_direction: SortDirection,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_field: Field::AssessmentScore,
            sort_direction: SortDirection::Descending,
        }
    }
}

impl TableViewState {
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort_field(&self) -> Field {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Replace the search text. Any string is accepted, including empty.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Sort by `field`; the direction is left as is.
    pub fn set_sort_field(&mut self, field: Field) {
        self.sort_field = field;
    }

    /// Sort by a field given by its record key.
    ///
    /// Unknown keys leave the state untouched and return `false`.
    pub fn set_sort_key(&mut self, key: &str) -> bool {
        match Field::from_key(key) {
            Some(field) => {
                self.set_sort_field(field);
                true
            }
            None => {
                log::warn!("ignoring sort on unknown column '{key}'");
                false
            }
        }
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    /// Header click: a new column becomes the sort field, the active column
    /// flips direction.
    pub fn click_header(&mut self, field: Field) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.set_sort_field(field);
        }
    }
}

// ---------------------------------------------------------------------------
// View derivation: filter → stable sort → project
// ---------------------------------------------------------------------------

/// Whether a student passes the search box.
///
/// * name contains `search`, ignoring case
/// * or the decimal form of `class` contains `search` literally
///
/// An empty search matches everyone.
pub fn matches_search(student: &Student, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    student.name.to_lowercase().contains(&search.to_lowercase())
        || student.class.to_string().contains(search)
}

/// Compare two students on `field` in the given direction.
pub fn compare_by(a: &Student, b: &Student, field: Field, direction: SortDirection) -> Ordering {
    let ord = a.value(field).compare(&b.value(field));
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Indices into `records` of the visible rows, in display order.
///
/// Ties keep their input order (`sort_by` is stable).
pub fn view_indices(records: &[Student], state: &TableViewState) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, s)| matches_search(s, &state.search_text))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        compare_by(&records[a], &records[b], state.sort_field, state.sort_direction)
    });
    indices
}

/// The visible rows themselves. Pure: `records` is never modified.
pub fn derive_view<'a>(records: &'a [Student], state: &TableViewState) -> Vec<&'a Student> {
    view_indices(records, state)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Table columns. Static, so an empty view still has headers.
pub fn columns() -> &'static [Field] {
    &Field::ALL
}
