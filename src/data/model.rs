use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// MeteoriteRecord – one row of the historical dataset
// ---------------------------------------------------------------------------

/// A single meteorite fall/find (one row of the source CSV).
///
/// Coordinates and year are always present: rows missing either are dropped
/// by the loader. Mass and piece count may be absent in the source data and
/// are kept as `NaN` so that rows still participate in non-mass charts.
#[derive(Debug, Clone)]
pub struct MeteoriteRecord {
    pub name: String,
    /// Mass in grams (`NaN` when missing).
    pub mass_g: f64,
    /// Discovery year.
    pub year: i64,
    /// "Fell" / "Found" indicator (`Fall_simplified`).
    pub fall: String,
    /// Official status (`Status_simplified`).
    pub status: String,
    /// Simplified meteorite type (`simplified_type`).
    pub mtype: String,
    /// Number of recovered pieces (`NaN` when missing).
    pub pieces: f64,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// MeteoriteDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone)]
pub struct MeteoriteDataset {
    /// All records (rows), post coordinate/year drop.
    pub records: Vec<MeteoriteRecord>,
    /// Sorted unique `Fall_simplified` values (empty strings excluded).
    pub falls: BTreeSet<String>,
    /// Sorted unique `Status_simplified` values (empty strings excluded).
    pub statuses: BTreeSet<String>,
    /// Sorted unique `simplified_type` values (empty strings excluded).
    pub types: BTreeSet<String>,
    /// Year range over the kept rows.
    pub year_min: i64,
    pub year_max: i64,
    /// Rows discarded at load time for missing coordinates/year.
    pub dropped_rows: usize,
}

impl MeteoriteDataset {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<MeteoriteRecord>, dropped_rows: usize) -> Self {
        let mut falls = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        let mut types = BTreeSet::new();
        let mut year_min = i64::MAX;
        let mut year_max = i64::MIN;

        for rec in &records {
            if !rec.fall.is_empty() {
                falls.insert(rec.fall.clone());
            }
            if !rec.status.is_empty() {
                statuses.insert(rec.status.clone());
            }
            if !rec.mtype.is_empty() {
                types.insert(rec.mtype.clone());
            }
            year_min = year_min.min(rec.year);
            year_max = year_max.max(rec.year);
        }

        if records.is_empty() {
            year_min = 0;
            year_max = 0;
        }

        MeteoriteDataset {
            records,
            falls,
            statuses,
            types,
            year_min,
            year_max,
            dropped_rows,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: i64, fall: &str, status: &str, mtype: &str) -> MeteoriteRecord {
        MeteoriteRecord {
            name: name.to_string(),
            mass_g: 100.0,
            year,
            fall: fall.to_string(),
            status: status.to_string(),
            mtype: mtype.to_string(),
            pieces: 1.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn indices_collect_unique_categories_and_year_bounds() {
        let ds = MeteoriteDataset::from_records(
            vec![
                record("a", 1900, "Fell", "Official", "L6"),
                record("b", 1950, "Found", "Official", "H5"),
                record("c", 2001, "Fell", "Provisional", "L6"),
            ],
            2,
        );
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.falls.len(), 2);
        assert_eq!(ds.statuses.len(), 2);
        assert_eq!(ds.types.len(), 2);
        assert_eq!((ds.year_min, ds.year_max), (1900, 2001));
        assert_eq!(ds.dropped_rows, 2);
    }

    #[test]
    fn empty_categories_are_not_indexed() {
        let ds = MeteoriteDataset::from_records(vec![record("a", 1900, "", "Official", "L6")], 0);
        assert!(ds.falls.is_empty());
        assert_eq!(ds.statuses.len(), 1);
    }
}
