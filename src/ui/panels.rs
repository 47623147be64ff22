use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Top bar – page selector, file menu, status line
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_dataset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open model bundle…").clicked() {
                open_bundle_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            if ui
                .selectable_label(state.page == page, page.label())
                .clicked()
            {
                state.page = page;
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} meteorites loaded ({} rows dropped)",
                ds.len(),
                ds.dropped_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Side panel – per-page controls
// ---------------------------------------------------------------------------

/// Render the left control panel for the active page.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    match state.page {
        Page::Predict => super::predict::form_panel(ui, state),
        Page::Explore => super::explore::filter_panel(ui, state),
        Page::Timeline => super::timeline::filter_panel(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Artifact loading (startup defaults and File → Open)
// ---------------------------------------------------------------------------

/// Load the dataset CSV into the session, reporting failure in the top bar.
pub fn load_dataset(state: &mut AppState, path: &Path) {
    match crate::data::loader::load_dataset(path) {
        Ok(dataset) => {
            state.dataset_path = path.to_path_buf();
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Load the model bundle into the session, reporting failure in the top bar.
pub fn load_bundle(state: &mut AppState, path: &Path) {
    match crate::model::bundle::ModelBundle::load(path) {
        Ok(bundle) => {
            state.bundle_path = path.to_path_buf();
            state.set_bundle(bundle);
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to load model bundle: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn open_dataset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open meteorite dataset")
        .add_filter("CSV", &["csv"])
        .pick_file();
    if let Some(path) = file {
        load_dataset(state, &path);
    }
}

fn open_bundle_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open model bundle")
        .add_filter("JSON", &["json"])
        .pick_file();
    if let Some(path) = file {
        load_bundle(state, &path);
    }
}
