use anyhow::Result;
use eframe::egui;
use student_dashboard::app::StudentDashboardApp;
use student_dashboard::config::DashboardConfig;
use student_dashboard::data::loader;
use student_dashboard::data::model::StudentDataset;
use student_dashboard::state::AppState;

/// Load the dataset once; this is the only place it is created.
fn load_dataset(config: &DashboardConfig) -> Result<StudentDataset> {
    match &config.data_path {
        Some(path) => {
            log::info!("Loading students from {}", path.display());
            loader::load_file(path)
        }
        None => {
            log::info!("Loading embedded students");
            loader::load_embedded()
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();

    let mut state = match load_dataset(&config) {
        Ok(dataset) => {
            if dataset.is_empty() {
                log::warn!("Dataset contains no students");
            }
            log::info!(
                "Loaded {} students across {} personas",
                dataset.len(),
                dataset.personas().len()
            );
            AppState::with_dataset(dataset)
        }
        Err(e) => {
            log::error!("Failed to load data: {e:#}");
            AppState::with_load_error(&e)
        }
    };

    if let Some(sort) = &config.sort {
        state.apply_sort_setting(sort);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&config.title)
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Ok(Box::new(StudentDashboardApp::new(state, title)))),
    )
}
