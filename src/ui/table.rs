use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Field, FieldKind, Student};
use crate::data::view::columns;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Searchable / sortable student table
// ---------------------------------------------------------------------------

/// Render the search box and the student table.
///
/// Header clicks and name clicks are collected while drawing and applied
/// afterwards, so the rows are never borrowed across a state change.
pub fn student_table(ui: &mut Ui, state: &mut AppState) {
    let mut search = state.table().search_text().to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search by name or class...")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search_text(search);
    }
    ui.add_space(4.0);

    let sort_field = state.table().sort_field();
    let arrow = state.table().sort_direction().arrow();
    let mut clicked_header: Option<Field> = None;
    let mut clicked_student: Option<usize> = None;

    let rows: Vec<(usize, &Student)> = state.visible_students().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), columns().len())
        .header(24.0, |mut header| {
            for &field in columns() {
                header.col(|ui: &mut Ui| {
                    let mut text = field.header();
                    if field == sort_field {
                        text = format!("{text} {arrow}");
                    }
                    let button = egui::Button::new(RichText::new(text).strong()).frame(false);
                    if ui.add(button).clicked() {
                        clicked_header = Some(field);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let (index, student) = rows[row.index()];
                for &field in columns() {
                    row.col(|ui: &mut Ui| {
                        let cell = student.value(field).to_string();
                        if field == Field::Name {
                            if ui.link(cell).on_hover_text("Show profile").clicked() {
                                clicked_student = Some(index);
                            }
                        } else if field.kind() == FieldKind::Float {
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui: &mut Ui| ui.monospace(cell),
                            );
                        } else {
                            ui.label(cell);
                        }
                    });
                }
            });
        });

    if rows.is_empty() {
        ui.label("No students match the search.");
    }

    if let Some(field) = clicked_header {
        state.click_header(field);
    }
    if let Some(index) = clicked_student {
        state.select_student(index);
    }
}
