use std::path::PathBuf;

/// Environment variable naming a dataset file to load instead of the
/// embedded one.
pub const DATA_PATH_ENV: &str = "STUDENT_DASHBOARD_DATA";

/// Environment variable with the initial table sort, e.g. `focus:asc`.
pub const SORT_ENV: &str = "STUDENT_DASHBOARD_SORT";

/// Startup settings for the dashboard window and its data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// `None` loads the dataset compiled into the binary.
    pub data_path: Option<PathBuf>,
    /// Initial table sort as `key` or `key:asc|desc`.
    pub sort: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Cognitive Skills & Student Performance Dashboard".to_string(),
            inner_size: [1280.0, 900.0],
            min_inner_size: [720.0, 480.0],
            data_path: None,
            sort: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by [`DATA_PATH_ENV`] and [`SORT_ENV`] when set.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var_os(DATA_PATH_ENV).map(PathBuf::from),
            std::env::var(SORT_ENV).ok(),
        )
    }

    fn from_values(data_path: Option<PathBuf>, sort: Option<String>) -> Self {
        Self {
            data_path: data_path.filter(|p| !p.as_os_str().is_empty()),
            sort: sort.filter(|s| !s.trim().is_empty()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_means_embedded_data() {
        assert_eq!(DashboardConfig::from_values(Some(PathBuf::new()), None).data_path, None);
        assert_eq!(DashboardConfig::from_values(None, None), DashboardConfig::default());
    }

    #[test]
    fn explicit_path_is_kept() {
        let cfg = DashboardConfig::from_values(
            Some(PathBuf::from("cohort.parquet")),
            Some("focus:asc".to_string()),
        );
        assert_eq!(cfg.data_path.as_deref(), Some(std::path::Path::new("cohort.parquet")));
        assert_eq!(cfg.sort.as_deref(), Some("focus:asc"));
        assert_eq!(cfg.title, DashboardConfig::default().title);
    }

    #[test]
    fn blank_sort_is_dropped() {
        assert_eq!(DashboardConfig::from_values(None, Some("  ".to_string())).sort, None);
    }
}
