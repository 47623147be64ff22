use std::path::PathBuf;

use crate::color::CategoryColors;
use crate::data::filter::{ExploreFilter, filtered_indices, init_filter};
use crate::data::model::MeteoriteDataset;
use crate::model::bundle::ModelBundle;
use crate::predict::{Prediction, PredictionInput};

/// Default artifact locations, overridable via File → Open.
pub const DEFAULT_DATASET_PATH: &str = "final_meteorite_data.csv";
pub const DEFAULT_BUNDLE_PATH: &str = "saved_steps.json";

// ---------------------------------------------------------------------------
// Pages and chart selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Predict,
    Explore,
    Timeline,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Predict, Page::Explore, Page::Timeline];

    pub fn label(self) -> &'static str {
        match self {
            Page::Predict => "Predict",
            Page::Explore => "Explore",
            Page::Timeline => "Timeline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    MassVsYear,
    MassByType,
    LandingHeatmap,
    PiecesVsMass,
    DiscoveriesPerYear,
    TypeAnalysis,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::MassVsYear,
        ChartKind::MassByType,
        ChartKind::LandingHeatmap,
        ChartKind::PiecesVsMass,
        ChartKind::DiscoveriesPerYear,
        ChartKind::TypeAnalysis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::MassVsYear => "Mass vs. Year",
            ChartKind::MassByType => "Mass by Meteorite Type",
            ChartKind::LandingHeatmap => "Meteorite Landing Heatmap",
            ChartKind::PiecesVsMass => "Pieces vs. Mass of Meteorites",
            ChartKind::DiscoveriesPerYear => "Discoveries Per Year",
            ChartKind::TypeAnalysis => "Type Analysis and Map",
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction form state
// ---------------------------------------------------------------------------

/// Current values of the five prediction form widgets.
#[derive(Debug, Clone, Default)]
pub struct PredictForm {
    pub status: String,
    pub fall: String,
    pub year: i64,
    pub mtype: String,
    pub mass_g: f64,
}

impl PredictForm {
    pub fn to_input(&self) -> PredictionInput {
        PredictionInput {
            status: self.status.clone(),
            fall: self.fall.clone(),
            year: self.year,
            mtype: self.mtype.clone(),
            mass_g: self.mass_g,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// This is the session-scoped cache: the dataset and bundle are loaded once
/// and reused across frames; everything else is widget state. Nothing here
/// is global — the app owns one `AppState` for its lifetime.
pub struct AppState {
    pub page: Page,

    /// Loaded model bundle (None until loaded; Predict page requires it).
    pub bundle: Option<ModelBundle>,
    /// Loaded historical dataset (None until loaded).
    pub dataset: Option<MeteoriteDataset>,
    pub dataset_path: PathBuf,
    pub bundle_path: PathBuf,

    /// Explore page: chart choice, filters, and the cached filtered view.
    pub chart: ChartKind,
    pub explore_filter: ExploreFilter,
    pub explore_visible: Vec<usize>,
    /// Type selected for the clustered marker map (Type Analysis chart).
    pub map_type: Option<String>,

    /// Timeline page: independent filter state and cached view.
    pub timeline_filter: ExploreFilter,
    pub timeline_visible: Vec<usize>,

    /// Predict page: form values and the last outcome.
    pub form: PredictForm,
    pub outcome: Option<Result<Prediction, String>>,

    /// Category colour maps for chart legends.
    pub fall_colors: Option<CategoryColors>,
    pub type_colors: Option<CategoryColors>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let empty = ExploreFilter {
            year_min: crate::predict::YEAR_MIN,
            year_max: crate::predict::YEAR_MAX,
            falls: Default::default(),
            statuses: Default::default(),
        };
        Self {
            page: Page::Predict,
            bundle: None,
            dataset: None,
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            bundle_path: PathBuf::from(DEFAULT_BUNDLE_PATH),
            chart: ChartKind::MassVsYear,
            explore_filter: empty.clone(),
            explore_visible: Vec::new(),
            map_type: None,
            timeline_filter: empty,
            timeline_visible: Vec::new(),
            form: PredictForm::default(),
            outcome: None,
            fall_colors: None,
            type_colors: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: initialise both pages' filters to
    /// pass-everything and rebuild colour maps.
    pub fn set_dataset(&mut self, dataset: MeteoriteDataset) {
        self.explore_filter = init_filter(&dataset);
        self.timeline_filter = init_filter(&dataset);
        self.explore_visible = (0..dataset.len()).collect();
        self.timeline_visible = (0..dataset.len()).collect();
        self.map_type = dataset.types.iter().next().cloned();
        self.fall_colors = Some(CategoryColors::new("Fall_simplified", &dataset.falls));
        self.type_colors = Some(CategoryColors::new("simplified_type", &dataset.types));
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Ingest a newly loaded model bundle and seed the form with the first
    /// vocabulary entry of each encoder.
    pub fn set_bundle(&mut self, bundle: ModelBundle) {
        self.form = PredictForm {
            status: bundle.le_status.classes().first().cloned().unwrap_or_default(),
            fall: bundle.le_fall.classes().first().cloned().unwrap_or_default(),
            year: 2000,
            mtype: bundle.le_type.classes().first().cloned().unwrap_or_default(),
            mass_g: 100.0,
        };
        self.outcome = None;
        self.bundle = Some(bundle);
    }

    /// Recompute the Explore page's filtered view.
    pub fn refilter_explore(&mut self) {
        if let Some(ds) = &self.dataset {
            self.explore_visible = filtered_indices(ds, &self.explore_filter);
        }
    }

    /// Recompute the Timeline page's filtered view.
    pub fn refilter_timeline(&mut self) {
        if let Some(ds) = &self.dataset {
            self.timeline_visible = filtered_indices(ds, &self.timeline_filter);
        }
    }

    /// Run the prediction pipeline on the current form values.
    pub fn run_prediction(&mut self) {
        let Some(bundle) = &self.bundle else {
            self.outcome = Some(Err("No model bundle loaded".to_string()));
            return;
        };
        self.outcome = Some(
            crate::predict::predict(bundle, &self.form.to_input()).map_err(|e| {
                log::error!("Prediction failed: {e}");
                e.to_string()
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MeteoriteDataset, MeteoriteRecord};
    use crate::model::bundle::sample_bundle;

    fn dataset() -> MeteoriteDataset {
        let record = |year, fall: &str| MeteoriteRecord {
            name: "x".to_string(),
            mass_g: 10.0,
            year,
            fall: fall.to_string(),
            status: "Official".to_string(),
            mtype: "L6".to_string(),
            pieces: 1.0,
            latitude: 0.0,
            longitude: 0.0,
        };
        MeteoriteDataset::from_records(vec![record(1900, "Fell"), record(2000, "Found")], 0)
    }

    #[test]
    fn set_dataset_initialises_pass_everything_filters() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.explore_visible, vec![0, 1]);
        assert_eq!(state.timeline_visible, vec![0, 1]);
        assert_eq!(state.explore_filter.year_min, 1900);
        assert!(state.fall_colors.is_some());
    }

    #[test]
    fn page_filters_are_independent() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.timeline_filter.year_min = 1950;
        state.refilter_timeline();
        assert_eq!(state.timeline_visible, vec![1]);
        assert_eq!(state.explore_visible, vec![0, 1]);
    }

    #[test]
    fn set_bundle_seeds_form_from_encoders() {
        let mut state = AppState::default();
        state.set_bundle(sample_bundle());
        assert_eq!(state.form.status, "Official");
        assert_eq!(state.form.fall, "Fell");
        assert_eq!(state.form.mtype, "H5");
    }

    #[test]
    fn run_prediction_without_bundle_reports_an_error() {
        let mut state = AppState::default();
        state.run_prediction();
        assert!(matches!(state.outcome, Some(Err(_))));
    }

    #[test]
    fn run_prediction_with_bundle_succeeds() {
        let mut state = AppState::default();
        state.set_bundle(sample_bundle());
        state.run_prediction();
        let outcome = state.outcome.as_ref().unwrap().as_ref().unwrap();
        assert!(!outcome.region.is_empty());
    }
}
