use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Decision tree – region classifier
// ---------------------------------------------------------------------------

/// A node in the serialized decision tree: either a split on one feature
/// or a leaf carrying a class index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        /// Index into the feature row.
        feature: usize,
        threshold: f64,
        /// Samples where feature <= threshold.
        left: Box<TreeNode>,
        /// Samples where feature > threshold.
        right: Box<TreeNode>,
    },
    Leaf {
        class: usize,
    },
}

impl TreeNode {
    /// Walk the tree for one feature row and return the leaf's class index.
    ///
    /// A missing feature value (row shorter than the split index, or NaN)
    /// fails the `<=` comparison and falls through to the right subtree.
    pub fn class_index(&self, row: &[f64]) -> usize {
        match self {
            TreeNode::Leaf { class } => *class,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                if value <= *threshold {
                    left.class_index(row)
                } else {
                    right.class_index(row)
                }
            }
        }
    }
}

/// Pre-trained region classifier: a decision tree over the encoded feature
/// row plus the ordered list of region labels its leaves index into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionClassifier {
    pub classes: Vec<String>,
    pub tree: TreeNode,
}

impl RegionClassifier {
    /// Predict the region label for one feature row. `None` only if the
    /// tree's leaf indexes past the class list (corrupt artifact).
    pub fn predict(&self, row: &[f64]) -> Option<&str> {
        let idx = self.tree.class_index(row);
        self.classes.get(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Linear models – per-region coordinate regressors
// ---------------------------------------------------------------------------

/// One fitted linear model: `y = coef · row + intercept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(row)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }
}

/// A region's coordinate regressor: independent linear models for latitude
/// and longitude, applied to the same feature row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordRegressor {
    pub lat: LinearModel,
    pub lon: LinearModel,
}

impl CoordRegressor {
    /// Predict a (latitude, longitude) pair for one feature row.
    pub fn predict(&self, row: &[f64]) -> (f64, f64) {
        (self.lat.predict(row), self.lon.predict(row))
    }
}

// ---------------------------------------------------------------------------
// K-means – fitted centroids (loaded for completeness, not on the
// prediction path)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    pub centroids: Vec<Vec<f64>>,
}

impl KMeans {
    /// Index of the nearest centroid by squared Euclidean distance.
    pub fn assign(&self, point: &[f64]) -> Option<usize> {
        self.centroids
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let d: f64 = c
                    .iter()
                    .zip(point)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (i, d)
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> RegionClassifier {
        RegionClassifier {
            classes: vec!["North".to_string(), "South".to_string()],
            tree: TreeNode::Split {
                feature: 1,
                threshold: 10.0,
                left: Box::new(TreeNode::Leaf { class: 0 }),
                right: Box::new(TreeNode::Leaf { class: 1 }),
            },
        }
    }

    #[test]
    fn tree_splits_on_threshold() {
        let clf = stump();
        assert_eq!(clf.predict(&[0.0, 5.0]), Some("North"));
        assert_eq!(clf.predict(&[0.0, 10.0]), Some("North")); // boundary goes left
        assert_eq!(clf.predict(&[0.0, 11.0]), Some("South"));
    }

    #[test]
    fn missing_feature_falls_through_to_right_subtree() {
        let clf = stump();
        assert_eq!(clf.predict(&[0.0]), Some("South"));
        assert_eq!(clf.predict(&[0.0, f64::NAN]), Some("South"));
    }

    #[test]
    fn out_of_range_leaf_class_is_none() {
        let clf = RegionClassifier {
            classes: vec!["Only".to_string()],
            tree: TreeNode::Leaf { class: 7 },
        };
        assert_eq!(clf.predict(&[]), None);
    }

    #[test]
    fn linear_model_is_dot_plus_intercept() {
        let m = LinearModel {
            coef: vec![2.0, -1.0],
            intercept: 0.5,
        };
        assert!((m.predict(&[3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn kmeans_assigns_nearest_centroid() {
        let km = KMeans {
            centroids: vec![vec![0.0, 0.0], vec![10.0, 10.0]],
        };
        assert_eq!(km.assign(&[1.0, 1.0]), Some(0));
        assert_eq!(km.assign(&[9.0, 9.0]), Some(1));
    }
}
