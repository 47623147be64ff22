use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{MeteoriteDataset, MeteoriteRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the historical meteorite dataset from a CSV file.
///
/// Expected columns: `Name`, `Mass_g`, `Year_clean`, `Fall_simplified`,
/// `Status_simplified`, `simplified_type`, `pieces_numeric`, and either
/// discrete `Latitude`/`Longitude` columns or a combined `LatLong` column
/// formatted as `"(lat, long)"`.
///
/// Rows missing coordinates or a parseable year are dropped; the drop count
/// is recorded on the dataset and logged.
pub fn load_dataset(path: &Path) -> Result<MeteoriteDataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening dataset CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| headers.iter().position(|h| h == name);

    let name_idx = col("Name");
    let mass_idx = col("Mass_g");
    let year_idx = col("Year_clean").context("CSV missing 'Year_clean' column")?;
    let fall_idx = col("Fall_simplified").context("CSV missing 'Fall_simplified' column")?;
    let status_idx = col("Status_simplified").context("CSV missing 'Status_simplified' column")?;
    let type_idx = col("simplified_type").context("CSV missing 'simplified_type' column")?;
    let pieces_idx = col("pieces_numeric");

    // Coordinate source: discrete columns, or the combined LatLong fallback.
    let lat_idx = col("Latitude");
    let lon_idx = col("Longitude");
    let latlong_idx = col("LatLong");
    if (lat_idx.is_none() || lon_idx.is_none()) && latlong_idx.is_none() {
        bail!("CSV has neither 'Latitude'/'Longitude' columns nor a 'LatLong' column");
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let coords = match (lat_idx, lon_idx) {
            (Some(la), Some(lo)) => {
                let lat = field(Some(la)).parse::<f64>().ok();
                let lon = field(Some(lo)).parse::<f64>().ok();
                lat.zip(lon)
            }
            _ => parse_lat_long(field(latlong_idx)),
        };
        let year = parse_year(field(Some(year_idx)));

        let (Some((latitude, longitude)), Some(year)) = (coords, year) else {
            dropped += 1;
            continue;
        };

        records.push(MeteoriteRecord {
            name: field(name_idx).to_string(),
            mass_g: field(mass_idx).parse::<f64>().unwrap_or(f64::NAN),
            year,
            fall: field(Some(fall_idx)).to_string(),
            status: field(Some(status_idx)).to_string(),
            mtype: field(Some(type_idx)).to_string(),
            pieces: field(pieces_idx).parse::<f64>().unwrap_or(f64::NAN),
            latitude,
            longitude,
        });
    }

    log::info!(
        "Loaded {} meteorite records from {} ({dropped} rows dropped for missing coordinates/year)",
        records.len(),
        path.display()
    );

    Ok(MeteoriteDataset::from_records(records, dropped))
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse the combined `"(lat, long)"` column into a coordinate pair.
fn parse_lat_long(s: &str) -> Option<(f64, f64)> {
    let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
    let (lat, lon) = inner.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    Some((lat, lon))
}

/// Years come through as `"1999"` or `"1999.0"` depending on the exporter.
fn parse_year(s: &str) -> Option<i64> {
    if let Ok(y) = s.parse::<i64>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() { Some(f as i64) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("meteormap-{name}-{}.csv", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_discrete_coordinate_columns_and_drops_bad_rows() {
        let path = write_temp_csv(
            "discrete",
            "Name,Mass_g,Year_clean,Fall_simplified,Status_simplified,simplified_type,pieces_numeric,Latitude,Longitude\n\
             Aachen,21.0,1880,Fell,Official,L5,1,50.775,6.08333\n\
             NoCoords,100.0,1920,Found,Official,H5,2,,\n\
             NoYear,5.5,,Fell,Official,L6,1,10.0,20.0\n\
             Aarhus,720.0,1951.0,Fell,Official,H6,2,56.18333,10.23333\n",
        );
        let ds = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 2);
        assert_eq!(ds.records[0].name, "Aachen");
        assert_eq!(ds.records[1].year, 1951);
        assert!((ds.records[1].latitude - 56.18333).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_combined_latlong_column() {
        let path = write_temp_csv(
            "latlong",
            "Name,Mass_g,Year_clean,Fall_simplified,Status_simplified,simplified_type,pieces_numeric,LatLong\n\
             Abee,107000.0,1952,Fell,Official,EH4,1,\"(54.21667, -113.0)\"\n\
             Broken,1.0,1999,Found,Official,L6,1,not-a-coordinate\n",
        );
        let ds = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 1);
        assert!((ds.records[0].longitude - (-113.0)).abs() < 1e-9);
    }

    #[test]
    fn full_filter_after_load_matches_post_drop_row_count() {
        let path = write_temp_csv(
            "fullfilter",
            "Name,Mass_g,Year_clean,Fall_simplified,Status_simplified,simplified_type,pieces_numeric,Latitude,Longitude\n\
             A,1.0,1900,Fell,Official,L6,1,10.0,20.0\n\
             B,2.0,1950,Found,Provisional,H5,1,30.0,40.0\n\
             C,3.0,,Fell,Official,L6,1,50.0,60.0\n",
        );
        let ds = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let filter = crate::data::filter::init_filter(&ds);
        let visible = crate::data::filter::filtered_indices(&ds, &filter);
        assert_eq!(visible.len(), ds.len());
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn missing_mass_is_kept_as_nan() {
        let path = write_temp_csv(
            "nomass",
            "Name,Mass_g,Year_clean,Fall_simplified,Status_simplified,simplified_type,pieces_numeric,Latitude,Longitude\n\
             Unweighed,,1900,Found,Official,L6,1,1.0,2.0\n",
        );
        let ds = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 1);
        assert!(ds.records[0].mass_g.is_nan());
    }

    #[test]
    fn missing_coordinate_columns_is_an_error() {
        let path = write_temp_csv(
            "nocoords",
            "Name,Mass_g,Year_clean,Fall_simplified,Status_simplified,simplified_type,pieces_numeric\n",
        );
        let err = load_dataset(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("LatLong"));
    }

    #[test]
    fn parse_lat_long_handles_spacing_and_parens() {
        assert_eq!(parse_lat_long("(54.2, -113.0)"), Some((54.2, -113.0)));
        assert_eq!(parse_lat_long("12.5,30"), Some((12.5, 30.0)));
        assert_eq!(parse_lat_long(""), None);
        assert_eq!(parse_lat_long("(oops)"), None);
    }
}
