use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::encoder::LabelEncoder;
use super::predictor::{CoordRegressor, KMeans, RegionClassifier};

// ---------------------------------------------------------------------------
// ModelBundle – the deserialized training artifact
// ---------------------------------------------------------------------------

/// One row of the precomputed cluster-membership table. Loaded with the
/// bundle but not consumed by the prediction path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cluster: usize,
}

/// The full pre-trained artifact bundle, mirroring the keys written by the
/// offline training run. Loaded once per session and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Region classifier over the encoded feature row.
    pub model: RegionClassifier,
    /// Per-region coordinate regressors, keyed by region label.
    pub reg_model: BTreeMap<String, CoordRegressor>,
    #[serde(rename = "le_Status")]
    pub le_status: LabelEncoder,
    #[serde(rename = "le_Fall")]
    pub le_fall: LabelEncoder,
    #[serde(rename = "le_type")]
    pub le_type: LabelEncoder,
    /// Feature names in the exact order the classifier was fit on.
    pub features: Vec<String>,
    /// Fitted k-means centroids (unused by the prediction path).
    pub kmeans: KMeans,
    /// Precomputed cluster memberships (unused by the prediction path).
    pub cluster_df: Vec<ClusterRow>,
}

impl ModelBundle {
    /// Deserialize the bundle from its JSON file.
    ///
    /// Failure is fatal for the caller: there is no partial-load recovery,
    /// the Predict page cannot render without the artifact.
    pub fn load(path: &Path) -> Result<ModelBundle> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading model bundle {}", path.display()))?;
        let bundle: ModelBundle =
            serde_json::from_str(&text).context("parsing model bundle JSON")?;
        log::info!(
            "Loaded model bundle from {}: {} regions, {} features, {} cluster rows",
            path.display(),
            bundle.model.classes.len(),
            bundle.features.len(),
            bundle.cluster_df.len()
        );
        Ok(bundle)
    }
}

/// Hand-built two-region bundle shared by unit tests across the crate.
#[cfg(test)]
pub(crate) fn sample_bundle() -> ModelBundle {
    use super::predictor::{LinearModel, TreeNode};

    fn regressor(lat: f64, lon: f64) -> CoordRegressor {
        CoordRegressor {
            lat: LinearModel {
                coef: vec![0.0; 5],
                intercept: lat,
            },
            lon: LinearModel {
                coef: vec![0.0; 5],
                intercept: lon,
            },
        }
    }

    ModelBundle {
        model: RegionClassifier {
            classes: vec!["North".to_string(), "South".to_string()],
            tree: TreeNode::Split {
                feature: 2,
                threshold: 1950.0,
                left: Box::new(TreeNode::Leaf { class: 0 }),
                right: Box::new(TreeNode::Leaf { class: 1 }),
            },
        },
        reg_model: [
            ("North".to_string(), regressor(45.0, 10.0)),
            ("South".to_string(), regressor(-30.0, 140.0)),
        ]
        .into_iter()
        .collect(),
        le_status: LabelEncoder {
            classes: vec!["Official".to_string(), "Provisional".to_string()],
        },
        le_fall: LabelEncoder {
            classes: vec!["Fell".to_string(), "Found".to_string()],
        },
        le_type: LabelEncoder {
            classes: vec!["H5".to_string(), "L6".to_string()],
        },
        features: vec![
            "Status_simplified".to_string(),
            "Fall_simplified".to_string(),
            "Year_clean".to_string(),
            "simplified_type".to_string(),
            "Mass_g".to_string(),
        ],
        kmeans: KMeans {
            centroids: vec![vec![45.0, 10.0], vec![-30.0, 140.0]],
        },
        cluster_df: vec![ClusterRow {
            name: "Aachen".to_string(),
            latitude: 50.775,
            longitude: 6.08333,
            cluster: 0,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundle_round_trips_through_json() {
        let bundle = sample_bundle();
        let path = std::env::temp_dir().join(format!("meteormap-bundle-{}.json", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(serde_json::to_string(&bundle).unwrap().as_bytes())
            .unwrap();

        let loaded = ModelBundle::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.features, bundle.features);
        assert_eq!(loaded.model.classes, bundle.model.classes);
        assert_eq!(loaded.le_fall.classes, bundle.le_fall.classes);
        assert_eq!(loaded.reg_model.len(), 2);
        assert_eq!(loaded.cluster_df.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ModelBundle::load(Path::new("/nonexistent/saved_steps.json")).unwrap_err();
        assert!(err.to_string().contains("reading model bundle"));
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let path = std::env::temp_dir().join(format!("meteormap-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = ModelBundle::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("parsing model bundle"));
    }
}
