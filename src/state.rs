use crate::color::PersonaColors;
use crate::data::model::{Field, Metric, Student, StudentDataset};
use crate::data::stats::{score_correlations, OverviewStats};
use crate::data::view::{view_indices, SortDirection, TableViewState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when the startup load failed).
    dataset: Option<StudentDataset>,

    /// Overview cards, computed once per dataset.
    pub overview: OverviewStats,

    /// Skill ↔ score correlations, strongest first.
    pub correlations: Vec<(Metric, f64)>,

    /// Search and sort state of the student table.
    table: TableViewState,

    /// Indices of students shown in the table, in display order (cached).
    visible_indices: Vec<usize>,

    /// Student shown in the radar chart.
    selected_student: usize,

    /// Persona → scatter colour.
    pub persona_colors: PersonaColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            overview: OverviewStats::compute(&[]),
            correlations: Vec::new(),
            table: TableViewState::default(),
            visible_indices: Vec::new(),
            selected_student: 0,
            persona_colors: PersonaColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Build the state around the dataset loaded at startup.
    pub fn with_dataset(dataset: StudentDataset) -> Self {
        let mut state = Self::default();
        state.set_dataset(dataset);
        state
    }

    /// State for a failed startup load: no rows, an error banner.
    pub fn with_load_error(err: &anyhow::Error) -> Self {
        Self {
            status_message: Some(format!("Failed to load data: {err:#}")),
            ..Self::default()
        }
    }

    /// Ingest the dataset and derive everything that depends on it.
    pub fn set_dataset(&mut self, dataset: StudentDataset) {
        self.overview = OverviewStats::compute(dataset.students());
        self.correlations = score_correlations(dataset.students());
        self.persona_colors = PersonaColors::new(dataset.personas());
        self.selected_student = 0;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.rederive();
    }

    pub fn dataset(&self) -> Option<&StudentDataset> {
        self.dataset.as_ref()
    }

    /// All students, or an empty slice without a dataset.
    pub fn students(&self) -> &[Student] {
        self.dataset
            .as_ref()
            .map(StudentDataset::students)
            .unwrap_or(&[])
    }

    /// Rows of the table in display order, with their dataset index.
    pub fn visible_students(&self) -> impl Iterator<Item = (usize, &Student)> + '_ {
        let students = self.students();
        self.visible_indices.iter().map(move |&i| (i, &students[i]))
    }

    /// Dataset indices of the table rows, in display order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    pub fn table(&self) -> &TableViewState {
        &self.table
    }

    /// Recompute `visible_indices` after a search/sort change.
    pub fn rederive(&mut self) {
        self.visible_indices = view_indices(self.students(), &self.table);
        log::debug!(
            "table view: {} of {} rows for search {:?}, sort {} {:?}",
            self.visible_indices.len(),
            self.students().len(),
            self.table.search_text(),
            self.table.sort_field(),
            self.table.sort_direction(),
        );
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.table.set_search_text(text);
        self.rederive();
    }

    /// Sort by a column named by its record key; unknown keys are ignored.
    pub fn set_sort_key(&mut self, key: &str) {
        if self.table.set_sort_key(key) {
            self.rederive();
        }
    }

    /// Apply a `key` or `key:asc` / `key:desc` sort setting.
    pub fn apply_sort_setting(&mut self, setting: &str) {
        let (key, direction) = match setting.split_once(':') {
            Some((key, dir)) => (key.trim(), SortDirection::parse(dir)),
            None => (setting.trim(), None),
        };
        if self.table.set_sort_key(key) {
            if let Some(direction) = direction {
                self.table.set_sort_direction(direction);
            }
            self.rederive();
        }
    }

    pub fn click_header(&mut self, field: Field) {
        self.table.click_header(field);
        self.rederive();
    }

    /// Pick the radar student by dataset index; out-of-range is ignored.
    pub fn select_student(&mut self, index: usize) {
        if index < self.students().len() {
            self.selected_student = index;
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_student
    }

    pub fn selected(&self) -> Option<&Student> {
        self.students().get(self.selected_student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::student;

    fn state() -> AppState {
        AppState::with_dataset(StudentDataset::from_students(vec![
            student(1, "Alice", 5, 80.0),
            student(2, "Bob", 5, 95.0),
            student(3, "Cara", 9, 80.0),
        ]))
    }

    fn visible_names(state: &AppState) -> Vec<String> {
        state.visible_students().map(|(_, s)| s.name.clone()).collect()
    }

    #[test]
    fn dataset_populates_derived_state() {
        let state = state();
        assert_eq!(state.overview.avg_score, 85.0);
        assert_eq!(state.visible_indices(), [1, 0, 2]);
        assert_eq!(state.selected().map(|s| s.name.as_str()), Some("Alice"));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn search_then_sort_rederives_rows() {
        let mut state = state();
        state.set_search_text("5");
        assert_eq!(visible_names(&state), ["Bob", "Alice"]);

        state.click_header(Field::Name);
        assert_eq!(visible_names(&state), ["Bob", "Alice"]);
        state.click_header(Field::Name);
        assert_eq!(visible_names(&state), ["Alice", "Bob"]);

        state.set_search_text("");
        state.set_sort_key("assessment_score");
        assert_eq!(visible_names(&state), ["Alice", "Cara", "Bob"]);
        state.set_sort_key("no_such_column");
        assert_eq!(state.table().sort_field(), Field::AssessmentScore);
        state.click_header(Field::AssessmentScore);
        assert_eq!(visible_names(&state), ["Bob", "Alice", "Cara"]);
    }

    #[test]
    fn sort_setting_accepts_optional_direction() {
        let mut state = state();
        state.apply_sort_setting("name:asc");
        assert_eq!(visible_names(&state), ["Alice", "Bob", "Cara"]);
        state.apply_sort_setting("class");
        assert_eq!(state.table().sort_field(), Field::Class);
        assert_eq!(state.table().sort_direction(), SortDirection::Ascending);
        state.apply_sort_setting("height:desc");
        assert_eq!(state.table().sort_field(), Field::Class);
        assert_eq!(state.table().sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn selection_ignores_out_of_range() {
        let mut state = state();
        state.select_student(2);
        assert_eq!(state.selected().map(|s| s.student_id), Some(3));
        state.select_student(10);
        assert_eq!(state.selected_index(), 2);
    }

    #[test]
    fn replacing_the_dataset_rederives_rows() {
        let mut state = state();
        state.select_student(2);
        state.set_dataset(StudentDataset::from_students(vec![student(7, "Dev", 3, 70.0)]));
        assert_eq!(state.visible_indices(), [0]);
        assert_eq!(visible_names(&state), ["Dev"]);
        assert_eq!(state.selected_index(), 0);
        assert_eq!(state.dataset().map(StudentDataset::len), Some(1));
    }

    #[test]
    fn load_error_leaves_an_empty_dashboard() {
        let err = anyhow::anyhow!("bad row").context("loading embedded student data");
        let mut state = AppState::with_load_error(&err);
        assert!(state.students().is_empty());
        assert!(state.selected().is_none());
        assert_eq!(state.overview.avg_score, 0.0);
        let msg = state.status_message.clone().unwrap_or_default();
        assert!(msg.starts_with("Failed to load data"));
        assert!(msg.contains("bad row"));

        state.set_search_text("x");
        assert!(state.visible_indices().is_empty());
    }
}
