use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points, Polygon};

use crate::color::{CategoryColors, heat_color};
use crate::data::model::MeteoriteDataset;
use crate::predict::{YEAR_MAX, YEAR_MIN};
use crate::state::{AppState, ChartKind};

/// Grid size (degrees) for the landing-density heatmap.
const HEAT_CELL_DEG: f64 = 5.0;
/// Grid size (degrees) for marker clustering on the type map.
const CLUSTER_CELL_DEG: f64 = 15.0;
/// Bin width (years) for the discoveries histogram.
const YEAR_BIN: i64 = 10;

// ---------------------------------------------------------------------------
// Side panel – chart selector + filters
// ---------------------------------------------------------------------------

/// Render the Explore page controls: chart choice, year range, and the
/// fall/status category filters.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Explore");
    ui.separator();

    ui.strong("Visualization");
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(state.chart.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut state.chart, kind, kind.label());
            }
        });
    ui.separator();

    let Some(ds) = &state.dataset else {
        ui.label("No dataset loaded.");
        ui.label("File → Open dataset…");
        return;
    };

    // Clone what we need so we can mutate state below.
    let (year_min, year_max) = (ds.year_min, ds.year_max);
    let falls = ds.falls.clone();
    let statuses = ds.statuses.clone();
    let types = ds.types.clone();

    year_range_sliders(ui, "explore_years", year_min, year_max, &mut state.explore_filter.year_min, &mut state.explore_filter.year_max);
    category_checkboxes(ui, "Fall/found", &falls, &mut state.explore_filter.falls);
    category_checkboxes(ui, "Status", &statuses, &mut state.explore_filter.statuses);

    if state.chart == ChartKind::TypeAnalysis {
        ui.separator();
        ui.strong("Map type");
        let selected = state.map_type.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("map_type")
            .selected_text(selected.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for value in &types {
                    if ui.selectable_label(selected == *value, value).clicked() {
                        state.map_type = Some(value.clone());
                    }
                }
            });
    }

    // Recompute the filtered view after any widget change.
    state.refilter_explore();
}

/// Two bounded sliders forming an inclusive [lo, hi] year range; hi is
/// pulled up to lo when the two cross.
pub(crate) fn year_range_sliders(
    ui: &mut Ui,
    id: &str,
    bound_min: i64,
    bound_max: i64,
    lo: &mut i64,
    hi: &mut i64,
) {
    ui.strong("Year range");
    ui.push_id(id, |ui: &mut Ui| {
        ui.add(egui::Slider::new(lo, bound_min..=bound_max).text("from"));
        ui.add(egui::Slider::new(hi, bound_min..=bound_max).text("to"));
    });
    if *hi < *lo {
        *hi = *lo;
    }
}

/// Collapsible checkbox group over a category's unique values, with
/// All / None shortcuts.
pub(crate) fn category_checkboxes(
    ui: &mut Ui,
    label: &str,
    all_values: &BTreeSet<String>,
    selected: &mut BTreeSet<String>,
) {
    let header = format!("{label}  ({}/{})", selected.len(), all_values.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(label.to_string())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    *selected = all_values.clone();
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });
            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – chart dispatch
// ---------------------------------------------------------------------------

/// Render the selected chart over the filtered view.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore  (File → Open dataset…)");
        });
        return;
    };

    let visible = &state.explore_visible;
    match state.chart {
        ChartKind::MassVsYear => mass_year_scatter(ui, ds, visible, state.fall_colors.as_ref()),
        ChartKind::MassByType => mass_type_boxplot(ui, ds, visible),
        ChartKind::LandingHeatmap => landing_heatmap(ui, ds, visible),
        ChartKind::PiecesVsMass => pieces_vs_mass(ui, ds, visible, state.type_colors.as_ref()),
        ChartKind::DiscoveriesPerYear => discoveries_histogram(ui, ds, visible),
        ChartKind::TypeAnalysis => {
            type_analysis(ui, ds, visible, state.map_type.as_deref(), state.type_colors.as_ref())
        }
    }
}

// ---------------------------------------------------------------------------
// Chart renderers – each a pure function of the filtered view
// ---------------------------------------------------------------------------

/// Scatter of mass over time, log-scaled mass, coloured by fall type.
fn mass_year_scatter(
    ui: &mut Ui,
    ds: &MeteoriteDataset,
    visible: &[usize],
    colors: Option<&CategoryColors>,
) {
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in visible {
        let rec = &ds.records[i];
        if rec.mass_g > 0.0 {
            groups
                .entry(rec.fall.as_str())
                .or_default()
                .push([rec.year as f64, rec.mass_g.log10()]);
        }
    }

    Plot::new("mass_year")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Mass (g, log10)")
        .show(ui, |plot_ui| {
            for (fall, points) in groups {
                let color = colors
                    .map(|c| c.color_for(fall))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(fall)
                        .color(color)
                        .radius(2.0),
                );
            }
        });
}

/// Box plot of log-scaled mass per meteorite type.
fn mass_type_boxplot(ui: &mut Ui, ds: &MeteoriteDataset, visible: &[usize]) {
    let mut by_type: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &i in visible {
        let rec = &ds.records[i];
        if rec.mass_g > 0.0 && !rec.mtype.is_empty() {
            by_type
                .entry(rec.mtype.as_str())
                .or_default()
                .push(rec.mass_g.log10());
        }
    }

    let mut names: Vec<String> = Vec::new();
    let mut boxes: Vec<BoxElem> = Vec::new();
    for (x, (mtype, mut masses)) in by_type.into_iter().enumerate() {
        let Some((min, q1, median, q3, max)) = quartiles(&mut masses) else {
            continue;
        };
        boxes.push(
            BoxElem::new(x as f64, BoxSpread::new(min, q1, median, q3, max))
                .name(mtype)
                .box_width(0.6),
        );
        names.push(mtype.to_string());
    }

    Plot::new("mass_type")
        .x_axis_label("Meteorite type")
        .y_axis_label("Mass (g, log10)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Mass distribution"));
        });
}

/// Density heatmap of landing coordinates on the world map.
fn landing_heatmap(ui: &mut Ui, ds: &MeteoriteDataset, visible: &[usize]) {
    let points: Vec<(f64, f64)> = visible
        .iter()
        .map(|&i| (ds.records[i].latitude, ds.records[i].longitude))
        .collect();
    let cells = super::map::density_grid(&points, HEAT_CELL_DEG);
    let max_count = cells.iter().map(|c| c.count).max().unwrap_or(1) as f32;

    super::map::world_plot("landing_heatmap").show(ui, |plot_ui| {
        for cell in &cells {
            let t = (cell.count as f32 / max_count).sqrt();
            let color = heat_color(t);
            let corners: PlotPoints = vec![
                [cell.lon, cell.lat],
                [cell.lon + HEAT_CELL_DEG, cell.lat],
                [cell.lon + HEAT_CELL_DEG, cell.lat + HEAT_CELL_DEG],
                [cell.lon, cell.lat + HEAT_CELL_DEG],
            ]
            .into();
            plot_ui.polygon(
                Polygon::new(corners)
                    .fill_color(color)
                    .stroke(Stroke::new(0.0, Color32::TRANSPARENT)),
            );
        }
    });
}

/// Scatter of piece count vs. mass, log-log, coloured by type. Rows with
/// missing or non-positive values are excluded before the log transform.
fn pieces_vs_mass(
    ui: &mut Ui,
    ds: &MeteoriteDataset,
    visible: &[usize],
    colors: Option<&CategoryColors>,
) {
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in visible {
        let rec = &ds.records[i];
        if rec.pieces > 0.0 && rec.mass_g > 0.0 {
            groups
                .entry(rec.mtype.as_str())
                .or_default()
                .push([rec.pieces.log10(), rec.mass_g.log10()]);
        }
    }

    Plot::new("pieces_mass")
        .legend(Legend::default())
        .x_axis_label("Number of pieces (log10)")
        .y_axis_label("Mass (g, log10)")
        .show(ui, |plot_ui| {
            for (mtype, points) in groups {
                let color = colors
                    .map(|c| c.color_for(mtype))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(mtype)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

/// Histogram of discovery counts per year, bounded to the valid year range.
fn discoveries_histogram(ui: &mut Ui, ds: &MeteoriteDataset, visible: &[usize]) {
    let years: Vec<i64> = visible
        .iter()
        .map(|&i| ds.records[i].year)
        .filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y))
        .collect();
    let bins = year_histogram(&years, YEAR_BIN);

    let bars: Vec<Bar> = bins
        .into_iter()
        .map(|(start, count)| {
            Bar::new(start as f64 + YEAR_BIN as f64 / 2.0, count as f64)
                .width(YEAR_BIN as f64)
                .fill(Color32::from_rgb(65, 105, 225))
        })
        .collect();

    Plot::new("discoveries")
        .x_axis_label("Year")
        .y_axis_label("Number of discoveries")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Discoveries"));
        });
}

/// Bar chart of counts per type, plus a clustered marker map of a single
/// selected type.
fn type_analysis(
    ui: &mut Ui,
    ds: &MeteoriteDataset,
    visible: &[usize],
    map_type: Option<&str>,
    colors: Option<&CategoryColors>,
) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in visible {
        let rec = &ds.records[i];
        if !rec.mtype.is_empty() {
            *counts.entry(rec.mtype.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let names: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(x, (mtype, count))| {
            let color = colors
                .map(|c| c.color_for(mtype))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(x as f64, *count as f64).width(0.8).fill(color)
        })
        .collect();

    let half = ui.available_height() / 2.0;
    Plot::new("type_counts")
        .height(half)
        .x_axis_label("Meteorite type")
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count by type"));
        });

    ui.separator();

    let Some(map_type) = map_type else {
        ui.label("Select a meteorite type to map.");
        return;
    };
    let points: Vec<(f64, f64)> = visible
        .iter()
        .map(|&i| &ds.records[i])
        .filter(|rec| rec.mtype == map_type)
        .map(|rec| (rec.latitude, rec.longitude))
        .collect();
    let clusters = super::map::cluster_markers(&points, CLUSTER_CELL_DEG);
    let color = colors
        .map(|c| c.color_for(map_type))
        .unwrap_or(Color32::LIGHT_RED);

    super::map::world_plot("type_map").show(ui, |plot_ui| {
        for cluster in &clusters {
            let marker: PlotPoints = vec![[cluster.lon, cluster.lat]].into();
            plot_ui.points(
                Points::new(marker)
                    .name(format!("{map_type} ×{}", cluster.count))
                    .color(color)
                    .radius(3.0 + (cluster.count as f32).sqrt()),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Chart statistics
// ---------------------------------------------------------------------------

/// Five-number summary (min, q1, median, q3, max) of a sample; sorts in
/// place. `None` for an empty sample.
fn quartiles(values: &mut [f64]) -> Option<(f64, f64, f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let q = |p: f64| -> f64 {
        let pos = p * (values.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        values[lo] + (values[hi] - values[lo]) * frac
    };
    Some((values[0], q(0.25), q(0.5), q(0.75), values[values.len() - 1]))
}

/// Count years into fixed-width bins; returns (bin_start, count) pairs for
/// occupied bins, sorted by bin start.
fn year_histogram(years: &[i64], bin: i64) -> Vec<(i64, usize)> {
    let mut bins: BTreeMap<i64, usize> = BTreeMap::new();
    for &year in years {
        *bins.entry(year.div_euclid(bin) * bin).or_default() += 1;
    }
    bins.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_of_identity_sample() {
        let mut values = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        let (min, q1, median, q3, max) = quartiles(&mut values).unwrap();
        assert_eq!(min, 1.0);
        assert_eq!(q1, 2.0);
        assert_eq!(median, 3.0);
        assert_eq!(q3, 4.0);
        assert_eq!(max, 5.0);
    }

    #[test]
    fn quartiles_interpolate_between_samples() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0];
        let (_, q1, median, q3, _) = quartiles(&mut values).unwrap();
        assert!((q1 - 1.75).abs() < 1e-12);
        assert!((median - 2.5).abs() < 1e-12);
        assert!((q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn quartiles_of_empty_sample_is_none() {
        assert!(quartiles(&mut []).is_none());
    }

    #[test]
    fn year_histogram_bins_by_decade() {
        let years = vec![1901, 1905, 1911, 1999];
        let bins = year_histogram(&years, 10);
        assert_eq!(bins, vec![(1900, 2), (1910, 1), (1990, 1)]);
    }

    #[test]
    fn year_histogram_handles_pre_1000_years() {
        let bins = year_histogram(&[865, 868], 10);
        assert_eq!(bins, vec![(860, 2)]);
    }
}
