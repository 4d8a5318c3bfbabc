use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::Selection;
use crate::data::model::Column;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    if let Some(city) = selector(
        ui,
        "city",
        "City",
        "All cities",
        &state.city_options,
        &state.criteria.city,
    ) {
        state.set_city(city);
    }

    if let Some(company) = selector(
        ui,
        "company",
        "Company",
        "All companies",
        &state.company_options,
        &state.criteria.company,
    ) {
        state.set_company(company);
    }

    if dataset.has_column(Column::JobTitle) {
        ui.strong("Search job titles");
        let mut query = state.criteria.title_query.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut query).hint_text("e.g. engineer"))
            .changed()
        {
            state.set_title_query(query);
        }
        ui.add_space(6.0);
    }

    ui.separator();
    if ui
        .add_enabled(!state.criteria.is_match_all(), egui::Button::new("Reset filters"))
        .clicked()
    {
        state.reset_filters();
    }
}

/// A combo box over `options`. Hidden when there is nothing to choose from.
/// Returns the new selection when the user picks a different one.
fn selector(
    ui: &mut Ui,
    id: &str,
    title: &str,
    all_label: &str,
    options: &[Selection],
    current: &Selection,
) -> Option<Selection> {
    if options.len() <= 1 {
        return None;
    }
    let label = |s: &Selection| match s {
        Selection::All => all_label.to_string(),
        Selection::Only(v) => v.clone(),
    };

    let mut picked = None;
    ui.strong(title);
    egui::ComboBox::from_id_salt(id)
        .selected_text(label(current))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui.selectable_label(option == current, label(option)).clicked()
                    && option != current
                {
                    picked = Some(option.clone());
                }
            }
        });
    ui.add_space(6.0);
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(state.source_path().display().to_string());

        if let (Some(ds), Some(result)) = (&state.dataset, &state.result) {
            ui.separator();
            ui.label(format!(
                "{} of {} postings",
                result.filtered_count,
                ds.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job postings")
        .add_filter(
            "Supported files",
            &["xlsx", "xls", "xlsm", "xlsb", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheets", &["xlsx", "xls", "xlsm", "xlsb", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}
