use std::collections::BTreeMap;

use egui_plot::Plot;

// ---------------------------------------------------------------------------
// World map plot scaffold
// ---------------------------------------------------------------------------

/// A plot configured as an equirectangular world view: longitude on x,
/// latitude on y, 1:1 degree aspect, world bounds included.
pub fn world_plot(id: &str) -> Plot {
    Plot::new(id.to_string())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Density grid (heatmap) and grid clustering (marker clusters)
// ---------------------------------------------------------------------------

/// One occupied cell of the landing-density grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCell {
    /// South-west corner of the cell in degrees.
    pub lat: f64,
    pub lon: f64,
    pub count: usize,
}

/// Bin (lat, lon) points into a `cell_deg`-sized grid and count occupancy.
pub fn density_grid(points: &[(f64, f64)], cell_deg: f64) -> Vec<DensityCell> {
    let mut cells: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    for &(lat, lon) in points {
        let key = (
            (lat / cell_deg).floor() as i64,
            (lon / cell_deg).floor() as i64,
        );
        *cells.entry(key).or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((la, lo), count)| DensityCell {
            lat: la as f64 * cell_deg,
            lon: lo as f64 * cell_deg,
            count,
        })
        .collect()
}

/// A cluster of nearby markers, drawn as one scaled point.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCluster {
    /// Centroid of the member points.
    pub lat: f64,
    pub lon: f64,
    pub count: usize,
}

/// Group points into grid cells and collapse each cell to its centroid,
/// the same visual idea as a clustered marker map.
pub fn cluster_markers(points: &[(f64, f64)], cell_deg: f64) -> Vec<MarkerCluster> {
    let mut cells: BTreeMap<(i64, i64), (f64, f64, usize)> = BTreeMap::new();
    for &(lat, lon) in points {
        let key = (
            (lat / cell_deg).floor() as i64,
            (lon / cell_deg).floor() as i64,
        );
        let entry = cells.entry(key).or_insert((0.0, 0.0, 0));
        entry.0 += lat;
        entry.1 += lon;
        entry.2 += 1;
    }
    cells
        .into_values()
        .map(|(lat_sum, lon_sum, count)| MarkerCluster {
            lat: lat_sum / count as f64,
            lon: lon_sum / count as f64,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_grid_counts_cell_occupancy() {
        let points = [(0.5, 0.5), (1.5, 1.5), (0.4, 0.9), (-0.5, 0.5)];
        let cells = density_grid(&points, 5.0);
        // Three points share the (0, 0) cell; the negative-latitude point
        // falls into the cell south of the equator.
        assert_eq!(cells.len(), 2);
        let total: usize = cells.iter().map(|c| c.count).sum();
        assert_eq!(total, 4);
        assert!(cells.iter().any(|c| c.count == 3 && c.lat == 0.0));
        assert!(cells.iter().any(|c| c.count == 1 && c.lat == -5.0));
    }

    #[test]
    fn clusters_collapse_to_member_centroid() {
        let points = [(10.0, 20.0), (12.0, 22.0)];
        let clusters = cluster_markers(&points, 45.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 2);
        assert!((clusters[0].lat - 11.0).abs() < 1e-9);
        assert!((clusters[0].lon - 21.0).abs() < 1e-9);
    }

    #[test]
    fn distant_points_stay_in_separate_clusters() {
        let points = [(10.0, 20.0), (-40.0, 150.0)];
        let clusters = cluster_markers(&points, 45.0);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_cells() {
        assert!(density_grid(&[], 5.0).is_empty());
        assert!(cluster_markers(&[], 5.0).is_empty());
    }
}
