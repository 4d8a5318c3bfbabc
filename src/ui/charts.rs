use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::CategoryColors;
use crate::data::aggregate::Aggregation;
use crate::data::filter::Selection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Experience bar chart
// ---------------------------------------------------------------------------

/// Bar chart of postings per experience level.
pub fn experience_chart(ui: &mut Ui, state: &AppState) {
    let Some(counts) = &state.experience_counts else {
        return;
    };
    ui.strong("Postings by experience level");
    if counts.is_empty() {
        ui.label("No experience data for the current selection.");
        return;
    }

    let colors = CategoryColors::new(counts);
    let bars: Vec<Bar> = counts
        .entries
        .iter()
        .enumerate()
        .map(|(i, (level, n))| {
            Bar::new(i as f64, *n as f64)
                .name(level)
                .fill(colors.color_for(level))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = counts.entries.iter().map(|(k, _)| k.clone()).collect();

    Plot::new("experience_chart")
        .height(280.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .y_axis_label("Postings")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// City pie chart
// ---------------------------------------------------------------------------

/// Pie chart of the top cities. Only meaningful when no city is selected.
pub fn city_chart(ui: &mut Ui, state: &AppState) {
    let Some(top) = &state.top_cities else {
        return;
    };
    if let Selection::Only(city) = &state.criteria.city {
        ui.label(format!(
            "ℹ Showing postings in {city} only. Pick 'All cities' to see the city breakdown."
        ));
        return;
    }

    ui.strong(format!("Share of postings in the top {} cities", state.config.top_cities));
    if top.is_empty() {
        ui.label("No city data for the current selection.");
        return;
    }

    let colors = CategoryColors::new(top);
    ui.horizontal(|ui: &mut Ui| {
        pie(ui, top, &colors, 240.0);
        ui.vertical(|ui: &mut Ui| {
            for (city, pct) in top.percentages() {
                ui.label(RichText::new(format!("■ {city}  {pct:.1}%")).color(colors.color_for(&city)));
            }
        });
    });
}

/// Draw `aggregation` as a pie with percentage labels on slices wide
/// enough to hold them.
fn pie(ui: &mut Ui, aggregation: &Aggregation, colors: &CategoryColors, size: f32) {
    let (response, painter) = ui.allocate_painter(egui::vec2(size, size), Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.48;
    let point_at = |angle: f32, r: f32| Pos2::new(center.x + r * angle.cos(), center.y + r * angle.sin());

    let mut start = -TAU / 4.0;
    for (category, pct) in aggregation.percentages() {
        let sweep = pct as f32 / 100.0 * TAU;
        let fill = colors.color_for(&category);

        // Fan of thin triangles so every piece stays convex.
        let steps = ((sweep / TAU) * 90.0).ceil().max(1.0) as usize;
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point_at(a0, radius), point_at(a1, radius)],
                fill,
                Stroke::NONE,
            ));
        }

        if pct >= 4.0 {
            painter.text(
                point_at(start + sweep / 2.0, radius * 0.65),
                Align2::CENTER_CENTER,
                format!("{pct:.1}%"),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
        start += sweep;
    }

    if response.hovered() {
        response.on_hover_text(format!("{} postings", aggregation.total()));
    }
}
