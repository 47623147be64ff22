/// Pre-trained model layer: everything here is inference-only.
///
/// The artifacts were produced by an offline training run and are loaded
/// from a single JSON bundle; no fit path exists in this crate.
///
/// ```text
///  saved_steps.json
///        │
///        ▼
///   ┌──────────┐
///   │  bundle   │  deserialize → ModelBundle
///   └──────────┘
///        │
///        ├── region classifier (decision tree)
///        ├── region → coordinate regressor map (linear models)
///        ├── three label encoders (status / fall / type)
///        ├── ordered feature-name list
///        └── k-means centroids + cluster membership table
/// ```

pub mod bundle;
pub mod encoder;
pub mod predictor;
