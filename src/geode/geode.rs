//! Single-feature geometry: ordered rings with cached derived data.

use std::cell::Cell;

use log::warn;
use num_traits::Float;

use crate::geode::interior;
use crate::geode::{EdgeFlag, PrimType, MIN_CYCLE_VERTICES, MIN_POLYLINE_VERTICES};
use crate::primitives::{BoundingBox, Vertex};
use crate::tolerance;

/// A single feature: ordered rings, a primitive-type tag, an optional
/// per-edge provenance array, and lazily cached bounding box and center.
///
/// For polygon types ring 0 is the outer boundary and rings 1..N are holes.
/// The caches are interior-mutable so read accessors stay `&self`; every
/// mutating operation goes through [`Geode::invalidate_cached_data`].
#[derive(Debug)]
pub struct Geode<F: Float> {
    prim_type: PrimType,
    parts: Vec<Vec<Vertex<F>>>,
    /// Per-edge provenance, parallel to the vertices of all rings in order.
    /// `edge_flags[i]` tags the edge leaving vertex `i`; empty when the
    /// geode never went through cleaning or clipping. When present, length
    /// equals the total vertex count.
    edge_flags: Vec<EdgeFlag>,
    bounds: Cell<Option<BoundingBox<F>>>,
    center: Cell<Option<Vertex<F>>>,
}

impl<F: Float> Clone for Geode<F> {
    fn clone(&self) -> Self {
        Self {
            prim_type: self.prim_type,
            parts: self.parts.clone(),
            edge_flags: self.edge_flags.clone(),
            bounds: Cell::new(self.bounds.get()),
            center: Cell::new(self.center.get()),
        }
    }
}

impl<F: Float> Geode<F> {
    /// Creates an empty geode of the given primitive type.
    pub fn new(prim_type: PrimType) -> Self {
        Self {
            prim_type,
            parts: Vec::new(),
            edge_flags: Vec::new(),
            bounds: Cell::new(None),
            center: Cell::new(None),
        }
    }

    /// Creates a polygon covering `bbox`: one counter-clockwise rectangle
    /// ring at the given altitude, every edge tagged `flag`.
    pub fn from_bbox(bbox: &BoundingBox<F>, flag: EdgeFlag, prim_type: PrimType, altitude: F) -> Self {
        let mut geode = Self::new(prim_type);
        geode.add_part(5);
        let corners = [
            Vertex::new(bbox.west, bbox.south, altitude),
            Vertex::new(bbox.east, bbox.south, altitude),
            Vertex::new(bbox.east, bbox.north, altitude),
            Vertex::new(bbox.west, bbox.north, altitude),
            Vertex::new(bbox.west, bbox.south, altitude),
        ];
        for v in corners {
            geode.add_vertex_and_edge_flag(v, flag);
        }
        geode
    }

    #[inline]
    pub fn prim_type(&self) -> PrimType {
        self.prim_type
    }

    /// Retags the geode. Vertices are untouched; the center cache is
    /// dropped because its meaning depends on the primitive type.
    pub fn change_prim_type(&mut self, prim_type: PrimType) {
        self.prim_type = prim_type;
        self.invalidate_cached_data(false);
    }

    #[inline]
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn vertex_count(&self, part: usize) -> usize {
        self.parts.get(part).map_or(0, Vec::len)
    }

    pub fn total_vertex_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn part(&self, part: usize) -> &[Vertex<F>] {
        &self.parts[part]
    }

    #[inline]
    pub fn vertex(&self, part: usize, v: usize) -> Vertex<F> {
        self.parts[part][v]
    }

    #[inline]
    pub fn first_vertex(&self, part: usize) -> Vertex<F> {
        *self.parts[part].first().expect("empty part")
    }

    #[inline]
    pub fn last_vertex(&self, part: usize) -> Vertex<F> {
        *self.parts[part].last().expect("empty part")
    }

    /// Whether the geode carries no usable geometry.
    pub fn is_empty(&self) -> bool {
        if self.prim_type.is_polygon() {
            // A polygon without an outer ring is empty no matter how many
            // hole rings survive.
            self.parts.is_empty() || self.parts[0].is_empty()
        } else {
            self.parts.iter().all(Vec::is_empty)
        }
    }

    /// Whether the geode is empty or below the minimum vertex count for its
    /// primitive type.
    pub fn is_degenerate(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        match self.prim_type {
            PrimType::Point | PrimType::Point25D => false,
            PrimType::PolyLine | PrimType::PolyLine25D => {
                for part in &self.parts {
                    if part.len() < MIN_POLYLINE_VERTICES {
                        warn!("degenerate polyline part");
                    }
                }
                false
            }
            PrimType::Polygon | PrimType::Polygon25D | PrimType::Polygon3D => {
                self.vertex_count(0) < MIN_CYCLE_VERTICES
            }
            PrimType::MultiPolygon | PrimType::MultiPolygon25D | PrimType::MultiPolygon3D => {
                unreachable!("multi-part type on a single geode")
            }
        }
    }

    /// Drops all rings and edge flags.
    pub fn clear(&mut self) {
        self.parts.clear();
        self.edge_flags.clear();
        self.invalidate_cached_data(true);
    }

    /// Starts a new ring with the given capacity.
    pub fn add_part(&mut self, capacity: usize) {
        self.parts.push(Vec::with_capacity(capacity));
    }

    /// Appends a vertex to the last ring.
    pub fn add_vertex(&mut self, v: Vertex<F>) {
        self.parts
            .last_mut()
            .expect("add_vertex before add_part")
            .push(v);
        self.invalidate_cached_data(false);
        // A computed bounding box stays usable by growing it; an absent one
        // is left absent for the next lazy computation.
        if let Some(mut bounds) = self.bounds.get() {
            bounds.grow_vertex(v);
            self.bounds.set(Some(bounds));
        }
    }

    /// Appends an edge flag for the most recently added vertex.
    pub fn add_edge_flag(&mut self, flag: EdgeFlag) {
        self.edge_flags.push(flag);
    }

    /// Appends a vertex together with the flag of its outgoing edge.
    pub fn add_vertex_and_edge_flag(&mut self, v: Vertex<F>, flag: EdgeFlag) {
        self.add_vertex(v);
        self.add_edge_flag(flag);
    }

    /// Replaces one vertex, invalidating cached data.
    pub fn modify_vertex(&mut self, part: usize, v: usize, vertex: Vertex<F>) {
        self.parts[part][v] = vertex;
        self.invalidate_cached_data(true);
    }

    /// Removes the ring at `part`.
    pub fn erase_part(&mut self, part: usize) {
        self.parts.remove(part);
        self.invalidate_cached_data(true);
    }

    /// Removes the most recently added ring.
    ///
    /// For polygon types the caches survive unless the outer ring was the
    /// one removed; hole extents never contribute to them.
    pub fn erase_last_part(&mut self) {
        self.parts.pop();
        if self.prim_type.is_polygon() {
            if self.is_empty() {
                self.invalidate_cached_data(true);
            }
        } else {
            self.invalidate_cached_data(true);
        }
    }

    /// Reverses the winding of one ring.
    ///
    /// Only meaningful for source geometry: provenance flags are per
    /// directed edge and do not survive reversal.
    pub fn reverse_part(&mut self, part: usize) {
        debug_assert!(self.edge_flags.is_empty());
        self.parts[part].reverse();
    }

    /// Per-edge provenance flags, empty unless cleaned/clipped.
    #[inline]
    pub fn edge_flags(&self) -> &[EdgeFlag] {
        &self.edge_flags
    }

    /// Whether either edge incident to vertex `i` is synthetic (Clip/Cut).
    ///
    /// Consumers use this to suppress drawing seams. Only valid when edge
    /// flags are present.
    pub fn is_internal_vertex(&self, i: usize) -> bool {
        debug_assert!(i < self.edge_flags.len());
        let prev = if i == 0 {
            self.edge_flags.len() - 1
        } else {
            i - 1
        };
        self.edge_flags[prev] != EdgeFlag::Normal || self.edge_flags[i] != EdgeFlag::Normal
    }

    /// Whether any edge came from rectangle clipping.
    pub fn is_clipped(&self) -> bool {
        self.edge_flags.iter().any(|f| *f == EdgeFlag::Clip)
    }

    /// Invalidates the cached center, and the bounding box as well when
    /// `invalidate_bbox` is set.
    pub fn invalidate_cached_data(&self, invalidate_bbox: bool) {
        self.center.set(None);
        if invalidate_bbox {
            self.bounds.set(None);
        }
    }

    /// Bounding box over all rings, computed on first use.
    pub fn bounding_box(&self) -> BoundingBox<F> {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let mut bounds = BoundingBox::empty();
        for part in &self.parts {
            for v in part {
                bounds.grow_vertex(*v);
            }
        }
        self.bounds.set(Some(bounds));
        bounds
    }

    /// Bounding box of a single ring.
    pub fn bounding_box_of_part(&self, part: usize) -> BoundingBox<F> {
        let mut bounds = BoundingBox::empty();
        if let Some(ring) = self.parts.get(part) {
            for v in ring {
                bounds.grow_vertex(*v);
            }
        }
        bounds
    }

    /// Center of mass and signed area of one ring (Bashein & Detmer,
    /// Graphics Gems IV).
    ///
    /// The ring is offset by its bounding-box center before accumulation to
    /// keep the products well conditioned in the normalized plane. Returns
    /// `None` for rings below the minimum vertex count or with zero area.
    pub fn centroid(&self, part: usize) -> Option<(Vertex<F>, F)> {
        if self.vertex_count(part) < MIN_CYCLE_VERTICES {
            return None;
        }
        let offset = self.bounding_box().center();
        let ring = &self.parts[part];

        let mut atmp = F::zero();
        let mut xtmp = F::zero();
        let mut ytmp = F::zero();
        let mut x_prev = ring[0].x - offset.x;
        let mut y_prev = ring[0].y - offset.y;
        // Vertex 0 equals the last vertex, so start the walk at 1.
        for v in &ring[1..] {
            let x_i = v.x - offset.x;
            let y_i = v.y - offset.y;
            let ai = x_prev * y_i - x_i * y_prev;
            atmp = atmp + ai;
            xtmp = xtmp + (x_prev + x_i) * ai;
            ytmp = ytmp + (y_prev + y_i) * ai;
            x_prev = x_i;
            y_prev = y_i;
        }

        let area = atmp / F::from(2.0).unwrap();
        if atmp == F::zero() {
            return None;
        }
        let three = F::from(3.0).unwrap();
        let cx = xtmp / (three * atmp) + offset.x;
        let cy = ytmp / (three * atmp) + offset.y;
        Some((Vertex::xy(cx, cy), area))
    }

    /// Signed area of one ring; positive for counter-clockwise winding.
    pub fn signed_area(&self, part: usize) -> F {
        self.centroid(part).map_or(F::zero(), |(_, area)| area)
    }

    /// A representative point of the feature, cached after first use.
    ///
    /// For polygons this is the outer-ring centroid, moved to the interior
    /// when the ring is concave; for polylines the middle vertex; for
    /// points the point itself.
    pub fn center(&self) -> Vertex<F> {
        if let Some(center) = self.center.get() {
            return center;
        }
        if self.is_degenerate() {
            return Vertex::xy(F::zero(), F::zero());
        }

        let center = match self.prim_type {
            PrimType::Point | PrimType::Point25D => self.first_vertex(0),
            PrimType::PolyLine | PrimType::PolyLine25D => self.vertex(0, self.vertex_count(0) >> 1),
            PrimType::Polygon | PrimType::Polygon25D | PrimType::Polygon3D => {
                match self.centroid(0) {
                    Some((centroid, _)) => self.point_in_polygon(0, centroid),
                    None => return Vertex::xy(F::zero(), F::zero()),
                }
            }
            PrimType::MultiPolygon | PrimType::MultiPolygon25D | PrimType::MultiPolygon3D => {
                unreachable!("multi-part type on a single geode")
            }
        };
        self.center.set(Some(center));
        center
    }

    /// Moves `origin` into ring `part` if the ring is concave; a convex
    /// ring keeps the centroid as-is.
    pub fn point_in_polygon(&self, part: usize, origin: Vertex<F>) -> Vertex<F> {
        match self.parts.get(part) {
            Some(ring) if !ring.is_empty() => {
                if interior::is_convex(ring) {
                    origin
                } else {
                    interior::find_point_in_polygon(ring, origin)
                }
            }
            _ => origin,
        }
    }

    /// Structural equality: same primitive type, same rings vertex for
    /// vertex (exact), optionally accepting reversed rings.
    pub fn equals(&self, other: &Self, reverse_ok: bool) -> bool {
        if self.prim_type != other.prim_type || self.num_parts() != other.num_parts() {
            return false;
        }
        for part in 0..self.num_parts() {
            if self.vertex_count(part) != other.vertex_count(part) {
                return false;
            }
        }
        for (a, b) in self.parts.iter().zip(&other.parts) {
            if a != b && (!reverse_ok || !equals_reversed(a, b)) {
                return false;
            }
        }
        true
    }

    /// Plane through the outer ring of a 3D polygon: unit normal and origin
    /// distance from the first three non-collinear vertices.
    ///
    /// Returns `None` when no such triple exists (degenerate or collapsed
    /// outer ring).
    pub fn compute_plane_equation(&self) -> Option<(Vertex<F>, F)> {
        debug_assert_eq!(self.prim_type, PrimType::Polygon3D);
        if self.is_degenerate() {
            return None;
        }

        let ring = &self.parts[0];
        let a = ring[0];

        let mut iter = ring.iter().enumerate().skip(1);
        let b = loop {
            let (_, v) = iter.next()?;
            let diff = a - *v;
            if !tolerance::approx_eq(diff.length_squared(), F::zero(), tolerance::coord_epsilon()) {
                break *v;
            }
        };
        for (_, v) in iter {
            if !tolerance::collinear_3d(a, b, *v, tolerance::collinear_epsilon()) {
                return tolerance::compute_plane_equation(a, b, *v);
            }
        }
        None
    }
}

/// Ring equality against the reversed other ring.
fn equals_reversed<F: Float>(a: &[Vertex<F>], b: &[Vertex<F>]) -> bool {
    a.iter().eq(b.iter().rev())
}
