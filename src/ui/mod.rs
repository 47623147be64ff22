/// UI layer: page panels and chart rendering.
///
/// Rendering is idempotent: every function here draws from the current
/// [`crate::state::AppState`] and mutates nothing but widget-backed fields.

pub mod explore;
pub mod map;
pub mod panels;
pub mod predict;
pub mod timeline;
