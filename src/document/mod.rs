//! Raw input and normalized document models.

/// Normalized layout/style model shared by classification and emission.
pub mod model;
/// Serde boundary model of the raw design tree.
pub mod raw;
