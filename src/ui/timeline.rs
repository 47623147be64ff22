use eframe::egui::{Color32, Ui};
use egui_plot::{PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Side panel – timeline filters
// ---------------------------------------------------------------------------

/// Render the Timeline page filter controls. Same semantics as the Explore
/// filters, but independent state so the two pages don't fight.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Timeline");
    ui.separator();

    let Some(ds) = &state.dataset else {
        ui.label("No dataset loaded.");
        ui.label("File → Open dataset…");
        return;
    };

    let (year_min, year_max) = (ds.year_min, ds.year_max);
    let falls = ds.falls.clone();
    let statuses = ds.statuses.clone();

    super::explore::year_range_sliders(
        ui,
        "timeline_years",
        year_min,
        year_max,
        &mut state.timeline_filter.year_min,
        &mut state.timeline_filter.year_max,
    );
    super::explore::category_checkboxes(ui, "Fall/found", &falls, &mut state.timeline_filter.falls);
    super::explore::category_checkboxes(ui, "Status", &statuses, &mut state.timeline_filter.statuses);

    state.refilter_timeline();

    ui.separator();
    ui.label(format!(
        "Displaying {} meteorites from {} to {}.",
        state.timeline_visible.len(),
        state.timeline_filter.year_min,
        state.timeline_filter.year_max
    ));
}

// ---------------------------------------------------------------------------
// Central panel – point map with hover tooltips
// ---------------------------------------------------------------------------

/// Render one marker per filtered record; hovering shows name, mass, year.
///
/// The map is drawn from the already-filtered view every frame, so there is
/// no transient unfiltered render.
pub fn map_view(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore the timeline  (File → Open dataset…)");
        });
        return;
    };

    // Tooltip lookup table: position + label per visible marker.
    let markers: Vec<(f64, f64, String)> = state
        .timeline_visible
        .iter()
        .map(|&i| {
            let rec = &ds.records[i];
            let mass = if rec.mass_g.is_nan() {
                "unknown".to_string()
            } else {
                format!("{:.1} g", rec.mass_g)
            };
            (
                rec.longitude,
                rec.latitude,
                format!("{}\nMass: {mass}\nYear: {}", rec.name, rec.year),
            )
        })
        .collect();

    let labels = markers.clone();
    super::map::world_plot("timeline_map")
        .label_formatter(move |_name, value| {
            nearest_label(&labels, value.x, value.y)
                .unwrap_or_else(|| format!("{:.2}, {:.2}", value.y, value.x))
        })
        .show(ui, |plot_ui| {
            let points: PlotPoints = markers.iter().map(|&(lon, lat, _)| [lon, lat]).collect();
            plot_ui.points(
                Points::new(points)
                    .name("Meteorites")
                    .color(Color32::from_rgba_unmultiplied(200, 30, 0, 160))
                    .radius(2.5),
            );
        });
}

/// Label of the marker nearest to the cursor, within a small pick radius
/// (degrees in plot space).
fn nearest_label(markers: &[(f64, f64, String)], x: f64, y: f64) -> Option<String> {
    const PICK_RADIUS_DEG: f64 = 2.0;
    markers
        .iter()
        .map(|(lon, lat, label)| {
            let d2 = (lon - x) * (lon - x) + (lat - y) * (lat - y);
            (d2, label)
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .filter(|(d2, _)| *d2 <= PICK_RADIUS_DEG * PICK_RADIUS_DEG)
        .map(|(_, label)| label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_label_picks_closest_marker_within_radius() {
        let markers = vec![
            (10.0, 10.0, "near".to_string()),
            (50.0, 50.0, "far".to_string()),
        ];
        assert_eq!(nearest_label(&markers, 10.5, 10.5), Some("near".to_string()));
        assert_eq!(nearest_label(&markers, -100.0, 0.0), None);
    }

    #[test]
    fn nearest_label_on_empty_set_is_none() {
        assert_eq!(nearest_label(&[], 0.0, 0.0), None);
    }
}
