use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{PlotPoints, Points};

use crate::predict::{YEAR_MAX, YEAR_MIN};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Side panel – the five-field prediction form
// ---------------------------------------------------------------------------

/// Render the prediction form. The categorical widgets only offer the
/// encoders' vocabularies, so unknown values cannot be entered here; the
/// pipeline's sentinel fallback stays a defensive path.
pub fn form_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Meteorite Properties");
    ui.separator();

    let Some(bundle) = &state.bundle else {
        ui.label("No model bundle loaded.");
        ui.label("File → Open model bundle…");
        return;
    };

    // Clone the vocabularies so we can mutate the form below.
    let statuses = bundle.le_status.classes().to_vec();
    let falls = bundle.le_fall.classes().to_vec();
    let types = bundle.le_type.classes().to_vec();

    ui.label("Official Status");
    egui::ComboBox::from_id_salt("status")
        .selected_text(state.form.status.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for value in &statuses {
                ui.selectable_value(&mut state.form.status, value.clone(), value);
            }
        });

    ui.label("Fall or Found?");
    egui::ComboBox::from_id_salt("fall")
        .selected_text(state.form.fall.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for value in &falls {
                ui.selectable_value(&mut state.form.fall, value.clone(), value);
            }
        });

    ui.label("Year Discovered");
    ui.add(egui::Slider::new(&mut state.form.year, YEAR_MIN..=YEAR_MAX));

    ui.label("Meteorite Type");
    egui::ComboBox::from_id_salt("mtype")
        .selected_text(state.form.mtype.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for value in &types {
                ui.selectable_value(&mut state.form.mtype, value.clone(), value);
            }
        });

    ui.label("Mass (g)");
    ui.add(
        egui::DragValue::new(&mut state.form.mass_g)
            .range(0.0..=f64::MAX)
            .speed(10.0),
    );

    ui.add_space(8.0);
    if ui.button("Predict Location!").clicked() {
        state.run_prediction();
    }
}

// ---------------------------------------------------------------------------
// Central panel – prediction result and single-marker map
// ---------------------------------------------------------------------------

/// Render the last prediction outcome: summary text plus a map marker.
pub fn result_view(ui: &mut Ui, state: &AppState) {
    if state.bundle.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a model bundle to predict  (File → Open model bundle…)");
        });
        return;
    }

    let Some(outcome) = &state.outcome else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Enter meteorite properties and press Predict Location!");
        });
        return;
    };

    match outcome {
        Err(msg) => {
            ui.label(RichText::new(format!("Prediction failed: {msg}")).color(Color32::RED));
        }
        Ok(prediction) => {
            ui.heading("Predicted Landing Location");
            ui.label(format!("Region: {}", prediction.region));
            ui.label(format!("Latitude: {:.5}", prediction.latitude));
            ui.label(format!("Longitude: {:.5}", prediction.longitude));

            if !prediction.unknown_fields.is_empty() {
                ui.label(
                    RichText::new(format!(
                        "Warning: unrecognized input for {} (encoded as unknown)",
                        prediction.unknown_fields.join(", ")
                    ))
                    .color(Color32::YELLOW),
                );
            }

            ui.separator();

            // Single-marker map centered near the predicted point.
            super::map::world_plot("predict_map")
                .include_x(prediction.longitude - 30.0)
                .include_x(prediction.longitude + 30.0)
                .include_y(prediction.latitude - 30.0)
                .include_y(prediction.latitude + 30.0)
                .show(ui, |plot_ui| {
                    let marker: PlotPoints =
                        vec![[prediction.longitude, prediction.latitude]].into();
                    plot_ui.points(
                        Points::new(marker)
                            .name(&prediction.region)
                            .color(Color32::from_rgba_unmultiplied(200, 30, 0, 200))
                            .radius(6.0),
                    );
                });
        }
    }
}
