//! Cognitive skills & student performance dashboard.
//!
//! `data` holds the rendering-free core (loading, averages, the table
//! view); `chart` adapts students for plotting; `app`, `state` and `ui`
//! are the egui shell.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
