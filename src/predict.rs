use thiserror::Error;

use crate::model::bundle::ModelBundle;

/// Earliest recorded discovery year accepted by the form.
pub const YEAR_MIN: i64 = 860;
/// Latest discovery year accepted by the form.
pub const YEAR_MAX: i64 = 2025;

// ---------------------------------------------------------------------------
// Input / output records
// ---------------------------------------------------------------------------

/// The five raw user-entered attributes of a prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub status: String,
    pub fall: String,
    pub year: i64,
    pub mtype: String,
    pub mass_g: f64,
}

/// A completed prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Categorical inputs that fell outside their encoder's vocabulary and
    /// were encoded as the unknown sentinel. Surfaced as a UI warning.
    pub unknown_fields: Vec<&'static str>,
}

/// Failures of the prediction pipeline that must be reported, not masked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// The bundle's feature list names a field this pipeline doesn't know.
    #[error("model bundle feature list names unknown field `{0}`")]
    UnknownFeature(String),
    /// The classifier leaf indexed past its class list (corrupt artifact).
    #[error("classifier returned an out-of-range class index")]
    CorruptClassifier,
    /// The predicted region has no entry in the region → regressor map.
    #[error("model bundle has no coordinate regressor for region `{0}`")]
    NoRegressor(String),
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Clamp the numeric inputs to their valid ranges: year to
/// `[YEAR_MIN, YEAR_MAX]`, mass to non-negative.
pub fn clamp_input(input: &PredictionInput) -> PredictionInput {
    PredictionInput {
        year: input.year.clamp(YEAR_MIN, YEAR_MAX),
        mass_g: if input.mass_g.is_finite() {
            input.mass_g.max(0.0)
        } else {
            0.0
        },
        ..input.clone()
    }
}

/// Assemble the single feature row, strictly in the order of the bundle's
/// stored feature-name list.
///
/// The classifier was fit on that exact ordering; building the row any other
/// way would silently corrupt every prediction, so an unrecognized feature
/// name is an error rather than a skip.
pub fn feature_row(bundle: &ModelBundle, input: &PredictionInput) -> Result<Vec<f64>, PredictError> {
    bundle
        .features
        .iter()
        .map(|name| match name.as_str() {
            "Status_simplified" => Ok(bundle.le_status.encode(&input.status) as f64),
            "Fall_simplified" => Ok(bundle.le_fall.encode(&input.fall) as f64),
            "Year_clean" => Ok(input.year as f64),
            "simplified_type" => Ok(bundle.le_type.encode(&input.mtype) as f64),
            "Mass_g" => Ok(input.mass_g),
            other => Err(PredictError::UnknownFeature(other.to_string())),
        })
        .collect()
}

/// Run the full prediction pipeline: clamp → encode → classify → per-region
/// regress. Synchronous and deterministic; no retries.
pub fn predict(bundle: &ModelBundle, input: &PredictionInput) -> Result<Prediction, PredictError> {
    let input = clamp_input(input);
    let row = feature_row(bundle, &input)?;

    let region = bundle
        .model
        .predict(&row)
        .ok_or(PredictError::CorruptClassifier)?
        .to_string();

    let regressor = bundle
        .reg_model
        .get(&region)
        .ok_or_else(|| PredictError::NoRegressor(region.clone()))?;
    let (latitude, longitude) = regressor.predict(&row);

    let mut unknown_fields = Vec::new();
    if bundle.le_status.encode(&input.status) < 0 {
        unknown_fields.push("status");
    }
    if bundle.le_fall.encode(&input.fall) < 0 {
        unknown_fields.push("fall");
    }
    if bundle.le_type.encode(&input.mtype) < 0 {
        unknown_fields.push("type");
    }

    Ok(Prediction {
        region,
        latitude,
        longitude,
        unknown_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bundle::sample_bundle;

    fn input() -> PredictionInput {
        PredictionInput {
            status: "Official".to_string(),
            fall: "Fell".to_string(),
            year: 2000,
            mtype: "L6".to_string(),
            mass_g: 500.0,
        }
    }

    #[test]
    fn year_is_clamped_to_bounds() {
        let clamped = clamp_input(&PredictionInput { year: 100, ..input() });
        assert_eq!(clamped.year, YEAR_MIN);
        let clamped = clamp_input(&PredictionInput { year: 3000, ..input() });
        assert_eq!(clamped.year, YEAR_MAX);
        let clamped = clamp_input(&input());
        assert_eq!(clamped.year, 2000);
    }

    #[test]
    fn mass_is_clamped_to_non_negative() {
        let clamped = clamp_input(&PredictionInput { mass_g: -5.0, ..input() });
        assert_eq!(clamped.mass_g, 0.0);
        let clamped = clamp_input(&PredictionInput { mass_g: f64::NAN, ..input() });
        assert_eq!(clamped.mass_g, 0.0);
    }

    #[test]
    fn feature_row_follows_stored_feature_order() {
        let bundle = sample_bundle();
        let row = feature_row(&bundle, &input()).unwrap();
        // features = [Status, Fall, Year, type, Mass]
        assert_eq!(row, vec![0.0, 0.0, 2000.0, 1.0, 500.0]);

        // Permuting the stored list must permute the row identically.
        let mut shuffled = bundle.clone();
        shuffled.features.reverse();
        let row = feature_row(&shuffled, &input()).unwrap();
        assert_eq!(row, vec![500.0, 1.0, 2000.0, 0.0, 0.0]);
    }

    #[test]
    fn unknown_feature_name_is_an_error() {
        let mut bundle = sample_bundle();
        bundle.features.push("Albedo".to_string());
        assert_eq!(
            feature_row(&bundle, &input()),
            Err(PredictError::UnknownFeature("Albedo".to_string()))
        );
    }

    #[test]
    fn unknown_category_still_predicts() {
        let bundle = sample_bundle();
        let odd = PredictionInput {
            mtype: "Unobtainium".to_string(),
            ..input()
        };
        let row = feature_row(&bundle, &odd).unwrap();
        assert_eq!(row[3], -1.0);

        let prediction = predict(&bundle, &odd).unwrap();
        assert_eq!(prediction.unknown_fields, vec!["type"]);
    }

    #[test]
    fn prediction_is_deterministic() {
        let bundle = sample_bundle();
        let first = predict(&bundle, &input()).unwrap();
        for _ in 0..10 {
            assert_eq!(predict(&bundle, &input()).unwrap(), first);
        }
    }

    #[test]
    fn end_to_end_prediction_is_in_bounds() {
        let bundle = sample_bundle();
        let prediction = predict(&bundle, &input()).unwrap();

        assert!(bundle.model.classes.contains(&prediction.region));
        assert!((-90.0..=90.0).contains(&prediction.latitude));
        assert!((-180.0..=180.0).contains(&prediction.longitude));
        assert!(prediction.unknown_fields.is_empty());

        // Year 2000 > 1950 threshold: the sample tree routes to "South".
        assert_eq!(prediction.region, "South");
        assert_eq!(prediction.latitude, -30.0);
        assert_eq!(prediction.longitude, 140.0);
    }

    #[test]
    fn missing_regressor_is_a_reported_error() {
        let mut bundle = sample_bundle();
        bundle.reg_model.remove("South");
        assert_eq!(
            predict(&bundle, &input()),
            Err(PredictError::NoRegressor("South".to_string()))
        );
    }
}
