//! polytile - polygon repair and rectangle clipping for vector tiles
//!
//! Vector features arrive from ingestion with digitizing noise: duplicated
//! vertices, zero-area spikes, locally self-intersecting rings, holes with
//! arbitrary winding. Before such a feature can be tiled and rendered it is
//! pushed through three stages:
//!
//! 1. [`GeometryChecker`] repairs each ring into a simple loop without
//!    touching winding or hole structure.
//! 2. [`PolygonCleaner`] canonicalizes winding and removes redundant seam
//!    edges, stitching holes into the outer boundary with cut edges.
//! 3. [`PolygonClipper`] clips the polygon against an axis-aligned tile
//!    rectangle, producing simple hole-free rings tagged by edge origin.
//!
//! All stages are pure, synchronous transformations over one feature at a
//! time; callers may process independent features in parallel.

pub mod checker;
pub mod cleaner;
pub mod clipper;
pub mod error;
pub mod geode;
pub mod primitives;
pub mod tolerance;

pub use checker::GeometryChecker;
pub use cleaner::PolygonCleaner;
pub use clipper::PolygonClipper;
pub use error::GeometryError;
pub use geode::{EdgeFlag, Geode, GeodeCollection, GeodeCreator, GeodeHandle, PrimType};
pub use primitives::{BoundingBox, Vec2, Vertex};
