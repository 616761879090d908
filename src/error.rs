//! Error types for polytile operations.

use crate::geode::PrimType;
use thiserror::Error;

/// Errors that can occur while processing feature geometry.
///
/// Geometry defects (degenerate rings, near-zero cross products) are not
/// errors: they are repaired or silently dropped by the processing stages.
/// The only observable error is feeding a stage a primitive type it does
/// not operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The primitive type is not supported by this stage.
    #[error("unsupported primitive type {0:?}")]
    UnsupportedPrimType(PrimType),
}
