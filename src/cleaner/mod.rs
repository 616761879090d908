//! Winding canonicalization and seam removal.
//!
//! The cleaner rebuilds a polygon's boundary with the same half-edge
//! tracing machine the clipper uses, configured without a clip rectangle:
//! coincident oppositely-directed edge pairs (seams left by hole cutting or
//! a previous clip) annihilate, holes are re-stitched into the outer
//! boundary through cut-edge pairs, and ring winding comes out canonical
//! (outer counter-clockwise, holes clockwise) regardless of input winding,
//! because reconstruction decides interior by sweep parity and traverses
//! cycles in a fixed orientation.

use log::debug;
use num_traits::Float;

use crate::clipper::builder::{BuilderOptions, RingBuilder};
use crate::clipper::halfedge::EdgeArena;
use crate::error::GeometryError;
use crate::geode::{Geode, GeodeCreator, GeodeHandle, PrimType};
use crate::tolerance;

/// Canonicalizes ring winding and removes redundant hole-cutting seam
/// edges.
///
/// Input rings must already be simple (run the
/// [`GeometryChecker`](crate::checker::GeometryChecker) first); 3D polygons
/// are not supported. Output is repackaged through [`GeodeCreator`]: one
/// resulting ring stays a single geode, several become a collection.
#[derive(Debug)]
pub struct PolygonCleaner<F> {
    arena: EdgeArena<F>,
    builder: RingBuilder<F>,
}

impl<F: Float> Default for PolygonCleaner<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> PolygonCleaner<F> {
    pub fn new() -> Self {
        Self {
            arena: EdgeArena::new(tolerance::coord_epsilon()),
            builder: RingBuilder::new(BuilderOptions {
                cut_holes: true,
                clean_overlapped_edges: true,
            }),
        }
    }

    /// Cleans the feature in place.
    ///
    /// Point and line features pass through unchanged; degenerate polygons
    /// are cleared; 3D polygons are rejected. Multi-polygons are cleaned
    /// member-wise and repackaged as one collection.
    pub fn run(&mut self, handle: &mut GeodeHandle<F>) -> Result<(), GeometryError> {
        match handle.prim_type() {
            PrimType::Point | PrimType::Point25D | PrimType::PolyLine | PrimType::PolyLine25D => {
                Ok(())
            }

            PrimType::Polygon | PrimType::Polygon25D => {
                let prim_type = handle.prim_type();
                let pieces = match handle {
                    GeodeHandle::Single(geode) => {
                        if geode.is_degenerate() {
                            debug!("degenerate polygon cleared");
                            geode.clear();
                            return Ok(());
                        }
                        self.process_polygon(geode)
                    }
                    GeodeHandle::Multi(_) => unreachable!("polygon prim type on collection"),
                };
                self.repackage(handle, prim_type, pieces);
                Ok(())
            }

            PrimType::MultiPolygon | PrimType::MultiPolygon25D => {
                let prim_type = handle.prim_type();
                let pieces = match handle {
                    GeodeHandle::Multi(collection) => {
                        let mut pieces = Vec::new();
                        for geode in collection.geodes() {
                            if geode.is_degenerate() {
                                debug!("degenerate multi-polygon member dropped");
                                continue;
                            }
                            pieces.extend(self.process_polygon(geode));
                        }
                        pieces
                    }
                    GeodeHandle::Single(_) => unreachable!("multi prim type on single geode"),
                };
                self.repackage(handle, prim_type, pieces);
                Ok(())
            }

            other @ (PrimType::Polygon3D | PrimType::MultiPolygon3D) => {
                Err(GeometryError::UnsupportedPrimType(other))
            }
        }
    }

    /// Runs one polygon's rings through the tracing machine.
    fn process_polygon(&mut self, geode: &Geode<F>) -> Vec<Geode<F>> {
        self.arena.clear();
        self.builder.reset();
        self.builder.set_prim_type(geode.prim_type().single_variant());
        self.builder.accept_geode(&mut self.arena, geode);

        let mut pieces = Vec::new();
        self.builder.run(&mut self.arena, &mut pieces);
        pieces
    }

    fn repackage(&mut self, handle: &mut GeodeHandle<F>, prim_type: PrimType, pieces: Vec<Geode<F>>) {
        let mut creator = GeodeCreator::new(prim_type);
        for piece in pieces {
            creator.accept(piece);
        }
        match creator.report() {
            Some(cleaned) => *handle = cleaned,
            None => handle.clear(),
        }
    }
}
