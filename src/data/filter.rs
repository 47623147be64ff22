use std::collections::BTreeSet;

use super::model::MeteoriteDataset;

// ---------------------------------------------------------------------------
// Filter predicate: year range + selected fall/status categories
// ---------------------------------------------------------------------------

/// Exploration filter over the dataset: an inclusive year range plus the
/// selected `Fall_simplified` and `Status_simplified` values.
///
/// All three criteria must hold for a row to pass (AND semantics). An empty
/// selection set means "nothing selected" and therefore matches no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreFilter {
    pub year_min: i64,
    pub year_max: i64,
    pub falls: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

/// Initialise an [`ExploreFilter`] that passes everything: the dataset's
/// full year range with all fall/status values selected.
pub fn init_filter(dataset: &MeteoriteDataset) -> ExploreFilter {
    ExploreFilter {
        year_min: dataset.year_min,
        year_max: dataset.year_max,
        falls: dataset.falls.clone(),
        statuses: dataset.statuses.clone(),
    }
}

/// Return indices of records that pass all active filter criteria.
///
/// A record passes when:
/// * `year_min <= year <= year_max`, and
/// * its fall value is in the selected fall set, and
/// * its status value is in the selected status set.
///
/// When a selection set covers every unique value of its column the
/// membership test is skipped (no effective filter on that column).
pub fn filtered_indices(dataset: &MeteoriteDataset, filter: &ExploreFilter) -> Vec<usize> {
    let all_falls = filter.falls.len() == dataset.falls.len();
    let all_statuses = filter.statuses.len() == dataset.statuses.len();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if rec.year < filter.year_min || rec.year > filter.year_max {
                return false;
            }
            if !all_falls && !filter.falls.contains(&rec.fall) {
                return false;
            }
            if !all_statuses && !filter.statuses.contains(&rec.status) {
                return false;
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MeteoriteRecord;

    fn record(year: i64, fall: &str, status: &str) -> MeteoriteRecord {
        MeteoriteRecord {
            name: String::new(),
            mass_g: 1.0,
            year,
            fall: fall.to_string(),
            status: status.to_string(),
            mtype: "L6".to_string(),
            pieces: 1.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn dataset() -> MeteoriteDataset {
        MeteoriteDataset::from_records(
            vec![
                record(1900, "Fell", "Official"),
                record(1950, "Found", "Official"),
                record(2000, "Fell", "Provisional"),
                record(2010, "Found", "Provisional"),
            ],
            0,
        )
    }

    #[test]
    fn full_filter_is_a_no_op() {
        let ds = dataset();
        let filter = init_filter(&ds);
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 1, 2, 3]);
    }

    #[test]
    fn year_range_is_inclusive() {
        let ds = dataset();
        let mut filter = init_filter(&ds);
        filter.year_min = 1950;
        filter.year_max = 2000;
        assert_eq!(filtered_indices(&ds, &filter), vec![1, 2]);
    }

    #[test]
    fn category_subsets_restrict_rows() {
        let ds = dataset();
        let mut filter = init_filter(&ds);
        filter.falls = ["Fell".to_string()].into_iter().collect();
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 2]);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let ds = dataset();
        let mut filter = init_filter(&ds);
        filter.year_min = 1940;
        filter.falls = ["Fell".to_string()].into_iter().collect();
        filter.statuses = ["Provisional".to_string()].into_iter().collect();
        assert_eq!(filtered_indices(&ds, &filter), vec![2]);
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let ds = dataset();
        let mut filter = init_filter(&ds);
        filter.statuses.clear();
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn out_of_range_years_yield_empty_not_error() {
        let ds = dataset();
        let mut filter = init_filter(&ds);
        filter.year_min = 2100;
        filter.year_max = 2200;
        assert!(filtered_indices(&ds, &filter).is_empty());
    }
}
