use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Column;
use crate::state::AppState;

const HIGHLIGHT: Color32 = Color32::from_rgb(0x90, 0xEE, 0x90);

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Total postings, matching postings and companies, side by side.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    let (Some(ds), Some(result)) = (&state.dataset, &state.result) else {
        return;
    };
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total postings in file", ds.len());
        metric(&mut cols[1], "Matching postings", result.filtered_count);
        metric(&mut cols[2], "Companies", result.distinct_company_count);
    });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(label);
            ui.label(RichText::new(value.to_string()).size(28.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Postings table
// ---------------------------------------------------------------------------

/// Render the filtered postings. Rows carrying the maximum salary are
/// highlighted.
pub fn postings_table(ui: &mut Ui, state: &AppState, max_height: f32) {
    let (Some(ds), Some(result)) = (&state.dataset, &state.result) else {
        return;
    };
    let columns = &ds.column_names;
    if columns.is_empty() {
        return;
    }

    TableBuilder::new(ui)
        .id_salt("postings")
        .striped(true)
        .resizable(true)
        .max_scroll_height(max_height)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(TableColumn::auto().at_least(80.0).clip(true), columns.len())
        .header(22.0, |mut header| {
            for name in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, result.indices.len(), |mut row| {
                let posting = &ds.postings[result.indices[row.index()]];
                let highlighted = state
                    .max_salary
                    .is_some_and(|max| posting.salary() == Some(max));
                for name in columns {
                    row.col(|ui: &mut Ui| {
                        let text = posting.get(name).map(ToString::to_string).unwrap_or_default();
                        if highlighted && name.as_str() == Column::Salary.header() {
                            ui.label(
                                RichText::new(text)
                                    .background_color(HIGHLIGHT)
                                    .color(Color32::BLACK),
                            );
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });
}

