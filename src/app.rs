use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{explore, panels, predict, timeline};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MeteorMapApp {
    pub state: AppState,
}

impl MeteorMapApp {
    /// Start a session, attempting the fixed default artifact paths. Either
    /// load may fail without aborting: the affected page shows a hint and
    /// File → Open can supply the file later.
    pub fn new() -> Self {
        let mut state = AppState::default();

        let dataset_path = state.dataset_path.clone();
        if dataset_path.exists() {
            panels::load_dataset(&mut state, &dataset_path);
        } else {
            log::warn!("Default dataset {} not found", dataset_path.display());
        }

        let bundle_path = state.bundle_path.clone();
        if bundle_path.exists() {
            panels::load_bundle(&mut state, &bundle_path);
        } else {
            log::warn!("Default model bundle {} not found", bundle_path.display());
        }

        Self { state }
    }
}

impl Default for MeteorMapApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for MeteorMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: page selector and file menu ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: per-page controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the active page's view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Predict => predict::result_view(ui, &self.state),
            Page::Explore => explore::chart_view(ui, &self.state),
            Page::Timeline => timeline::map_view(ui, &self.state),
        });
    }
}
