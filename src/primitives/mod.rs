//! Floating-point geometric primitives.

mod bbox;
mod vec2;
mod vertex;

pub use bbox::{BoundingBox, SegmentClip};
pub use vec2::Vec2;
pub use vertex::Vertex;
