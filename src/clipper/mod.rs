//! Clipping of polygons with holes against axis-aligned rectangles.
//!
//! Two steps, after Azevedo & Guting's clipping/reconstruction split: every
//! polygon edge is clipped against the rectangle (Liang-Barsky), surviving
//! pieces become half-edges, and the points where the boundary meets the
//! rectangle ("turning points") generate synthetic clip edges along the
//! rectangle boundary. The half-edge set is then handed to [`RingBuilder`]
//! which traces the closed output rings, stitching hole material into the
//! outer boundary so the result needs no ring nesting.
//!
//! The same builder, configured without a rectangle, backs the
//! [`PolygonCleaner`](crate::cleaner::PolygonCleaner).

pub(crate) mod builder;
pub(crate) mod halfedge;

use log::{debug, warn};
use num_traits::Float;

use crate::clipper::builder::{BuilderOptions, RingBuilder};
use crate::clipper::halfedge::{AreaSide, Dominating, EdgeArena, EdgeId, SweepStatus};
use crate::error::GeometryError;
use crate::geode::{EdgeFlag, Geode, GeodeHandle, PrimType};
use crate::primitives::{BoundingBox, SegmentClip, Vertex};
use crate::tolerance;

/// Rectangle edges, indexed.
const RECT_LEFT: usize = 0;
const RECT_RIGHT: usize = 1;
const RECT_BOTTOM: usize = 2;
const RECT_TOP: usize = 3;

/// Rectangle corners, indexed.
const CORNER_BOTTOM_LEFT: usize = 0;
const CORNER_BOTTOM_RIGHT: usize = 1;
const CORNER_TOP_RIGHT: usize = 2;
const CORNER_TOP_LEFT: usize = 3;

/// Which side of each rectangle edge faces the rectangle interior.
const RECT_EDGE_AREA: [AreaSide; 4] = [
    AreaSide::Below, // left
    AreaSide::Above, // right
    AreaSide::Above, // bottom
    AreaSide::Below, // top
];

/// Where the polygon interior continues from a turning point, along its
/// rectangle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    None,
    Left,
    Right,
    Up,
    Down,
}

/// A point where the polygon boundary meets a rectangle edge.
#[derive(Debug, Clone, Copy)]
struct TurningPoint<F> {
    v: Vertex<F>,
    direction: Direction,
}

/// Turning points of one rectangle edge, ordered lexicographically with
/// tolerance, unique per position.
#[derive(Debug)]
struct TurningPointSet<F> {
    points: Vec<TurningPoint<F>>,
}

impl<F: Float> TurningPointSet<F> {
    fn new() -> Self {
        Self { points: Vec::new() }
    }

    fn clear(&mut self) {
        self.points.clear();
    }

    /// Inserts keeping order; returns the slot index and whether the point
    /// was actually inserted (an equivalent position was not present).
    fn insert(&mut self, tpt: TurningPoint<F>, eps: F) -> (usize, bool) {
        let pos = self.points.partition_point(|p| {
            tolerance::lex_less_xy_tolerant(p.v.x, p.v.y, tpt.v.x, tpt.v.y, eps)
        });
        if pos < self.points.len() {
            let other = self.points[pos].v;
            if !tolerance::lex_less_xy_tolerant(tpt.v.x, tpt.v.y, other.x, other.y, eps) {
                return (pos, false); // equivalent position already present
            }
        }
        self.points.insert(pos, tpt);
        (pos, true)
    }

    fn remove(&mut self, pos: usize) {
        self.points.remove(pos);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RectEdgeState {
    begin_corner: usize,
    end_corner: usize,
    /// Clip half-edges were generated on this rectangle edge.
    has_halfedge: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct RectCornerState {
    /// The corner is known to lie inside the polygon.
    is_inside: bool,
}

/// Clips a polygon (with holes) against an axis-aligned rectangle,
/// producing simple hole-free output rings tagged by edge origin.
///
/// Input rings must already be simple (run them through
/// [`GeometryChecker`](crate::checker::GeometryChecker) first);
/// self-intersecting input has undefined results. The clipper is reusable:
/// `run` may be called repeatedly, with or without changing the rectangle.
#[derive(Debug)]
pub struct PolygonClipper<F> {
    bbox: BoundingBox<F>,
    eps: F,
    /// Altitude applied to synthetic vertices of 2.5D polygons.
    height25d: F,
    arena: EdgeArena<F>,
    /// Half-edges that still need rectangle intersection.
    in_edges: Vec<EdgeId>,
    builder: RingBuilder<F>,
    turning_points: [TurningPointSet<F>; 4],
    rect_edges: [RectEdgeState; 4],
    rect_corners: [RectCornerState; 4],
    special_sweep: SweepStatus,
}

impl<F: Float> PolygonClipper<F> {
    /// Creates a clipper; `cut_holes` selects whether surviving hole
    /// material is stitched into the outer boundary.
    pub fn new(cut_holes: bool) -> Self {
        let eps = tolerance::coord_epsilon();
        Self {
            bbox: BoundingBox::empty(),
            eps,
            height25d: F::zero(),
            arena: EdgeArena::new(eps),
            in_edges: Vec::new(),
            builder: RingBuilder::new(BuilderOptions {
                cut_holes,
                clean_overlapped_edges: false,
            }),
            turning_points: [
                TurningPointSet::new(),
                TurningPointSet::new(),
                TurningPointSet::new(),
                TurningPointSet::new(),
            ],
            rect_edges: [
                RectEdgeState {
                    begin_corner: CORNER_BOTTOM_LEFT,
                    end_corner: CORNER_TOP_LEFT,
                    has_halfedge: false,
                },
                RectEdgeState {
                    begin_corner: CORNER_BOTTOM_RIGHT,
                    end_corner: CORNER_TOP_RIGHT,
                    has_halfedge: false,
                },
                RectEdgeState {
                    begin_corner: CORNER_BOTTOM_LEFT,
                    end_corner: CORNER_BOTTOM_RIGHT,
                    has_halfedge: false,
                },
                RectEdgeState {
                    begin_corner: CORNER_TOP_LEFT,
                    end_corner: CORNER_TOP_RIGHT,
                    has_halfedge: false,
                },
            ],
            rect_corners: [RectCornerState::default(); 4],
            special_sweep: SweepStatus::new(),
        }
    }

    /// Creates a clipper with the clip rectangle already set.
    pub fn with_rect(bbox: BoundingBox<F>, cut_holes: bool) -> Self {
        let mut clipper = Self::new(cut_holes);
        clipper.set_clip_rect(bbox);
        clipper
    }

    /// Sets the clip rectangle for subsequent runs.
    pub fn set_clip_rect(&mut self, bbox: BoundingBox<F>) {
        self.bbox = bbox;
    }

    /// Clips `handle` against the rectangle, appending the output rings to
    /// `pieces`.
    ///
    /// Returns whether the rectangle was completely covered by the polygon
    /// (the tiling caller's signal to stop descending). Multi-polygons are
    /// clipped member-wise; 3D polygons and non-polygon features are not
    /// clippable.
    pub fn run(
        &mut self,
        handle: &GeodeHandle<F>,
        pieces: &mut Vec<Geode<F>>,
    ) -> Result<bool, GeometryError> {
        match handle.prim_type() {
            PrimType::Polygon | PrimType::Polygon25D => {
                let geode = handle.as_single().expect("polygon prim type on collection");
                Ok(self.run_polygon(geode, pieces))
            }
            PrimType::MultiPolygon | PrimType::MultiPolygon25D => {
                if !self.bbox.intersects(&handle.bounding_box()) {
                    return Ok(false);
                }
                let collection = handle.as_multi().expect("multi prim type on single geode");
                let mut covered = false;
                for geode in collection.geodes() {
                    covered |= self.run_polygon(geode, pieces);
                }
                Ok(covered)
            }
            other => Err(GeometryError::UnsupportedPrimType(other)),
        }
    }

    fn run_polygon(&mut self, geode: &Geode<F>, pieces: &mut Vec<Geode<F>>) -> bool {
        if geode.is_degenerate() {
            warn!("degenerate polygon not clipped");
            return false;
        }
        if !self.bbox.intersects(&geode.bounding_box()) {
            return false;
        }

        self.reset();

        if self.accept_polygon(geode, pieces) {
            // Entirely inside the rectangle without holes; emitted as-is.
            return false;
        }

        self.clip_polygon();

        let is_clipped = self.rect_edges.iter().any(|e| e.has_halfedge);
        debug!("clip edges generated: {is_clipped}");

        if is_clipped {
            self.create_halfedges_from_inner_corners();
        } else if !self.in_edges.is_empty() {
            // No boundary crossing at all: the rectangle is entirely inside
            // or outside the outer ring.
            match self.process_special_cases() {
                SpecialCase::Outside => {
                    self.reset();
                    return false;
                }
                SpecialCase::Inside => {
                    pieces.push(Geode::from_bbox(
                        &self.bbox,
                        EdgeFlag::Clip,
                        geode.prim_type(),
                        self.height25d,
                    ));
                    self.reset();
                    return true;
                }
                SpecialCase::InsideWithHoles => {}
            }
        }

        self.builder.set_prim_type(geode.prim_type());
        self.builder.run(&mut self.arena, pieces);

        self.reset();
        false
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.in_edges.clear();
        for edge in &mut self.rect_edges {
            edge.has_halfedge = false;
        }
        for corner in &mut self.rect_corners {
            corner.is_inside = false;
        }
        for set in &mut self.turning_points {
            set.clear();
        }
        self.special_sweep.clear();
        self.builder.reset();
    }

    /// Converts the polygon into half-edges, sorting each ring into the
    /// builder (no clipping needed) or the intersection queue.
    ///
    /// Returns true when processing is already complete: a hole-free
    /// polygon entirely inside the rectangle is copied to `pieces`
    /// directly, Normal-tagged, preserving vertex order and count.
    fn accept_polygon(&mut self, geode: &Geode<F>, pieces: &mut Vec<Geode<F>>) -> bool {
        debug_assert!(!geode.is_degenerate());
        self.height25d = geode.vertex(0, 0).z;

        if self.bbox.contains(&geode.bounding_box()) {
            debug!("polygon entirely inside the clip rectangle");
            if geode.num_parts() == 1 {
                let mut copy = Geode::new(geode.prim_type());
                copy.add_part(geode.vertex_count(0));
                for v in geode.part(0) {
                    copy.add_vertex_and_edge_flag(*v, EdgeFlag::Normal);
                }
                pieces.push(copy);
                return true;
            }
            // Holes present: reconstruction still has to stitch them.
            for part in 0..geode.num_parts() {
                self.builder.accept_ring(&mut self.arena, geode, part);
            }
        } else {
            for part in 0..geode.num_parts() {
                if self.bbox.contains(&geode.bounding_box_of_part(part)) {
                    // Ring entirely inside: no intersection work.
                    self.builder.accept_ring(&mut self.arena, geode, part);
                } else {
                    let n = geode.vertex_count(part);
                    if n < crate::geode::MIN_CYCLE_VERTICES {
                        warn!("invalid polygon ring skipped");
                        continue;
                    }
                    for i in 0..n - 1 {
                        let he = self
                            .arena
                            .create_pair(geode.vertex(part, i), geode.vertex(part, i + 1));
                        self.in_edges.push(he);
                        self.in_edges.push(self.arena.e(he).pair);
                    }
                }
            }
        }
        false
    }

    /// Step 1: clip every queued edge against the rectangle; accepted
    /// pieces go to the builder, boundary contacts become turning points,
    /// and turning points are expanded into synthetic clip edges.
    fn clip_polygon(&mut self) {
        for i in 0..self.in_edges.len() {
            let source_he = self.in_edges[i];
            // One clip per underlying edge.
            if self.arena.e(source_he).dominating != Dominating::Left {
                continue;
            }

            let v = self.arena.e(source_he).v;
            let pv = self.arena.e(self.arena.e(source_he).pair).v;
            let (ymin, ymax) = if v.y < pv.y { (v.y, pv.y) } else { (pv.y, v.y) };

            // Skip edges with no rectangle contact; a single-vertex touch
            // from outside counts as no contact, an edge lying on the
            // boundary does not (its clip edges keep boundary continuity).
            if (pv.x <= self.bbox.west && v.x < self.bbox.west)
                || (v.x >= self.bbox.east && pv.x > self.bbox.east)
                || (ymax <= self.bbox.south && ymin < self.bbox.south)
                || (ymin >= self.bbox.north && ymax > self.bbox.north)
            {
                continue;
            }

            match self.clip_halfedge(source_he) {
                ClippedEdge::Outside => {}
                ClippedEdge::Point(intersection) => {
                    self.evaluate_turning_point(intersection, source_he);
                }
                ClippedEdge::Edge(clipped_he) => {
                    let pair = self.arena.e(clipped_he).pair;
                    self.builder.accept_edge(clipped_he);
                    self.builder.accept_edge(pair);
                    let left = self.arena.left_point(clipped_he);
                    let right = self.arena.right_point(clipped_he);
                    self.evaluate_turning_point(left, clipped_he);
                    self.evaluate_turning_point(right, clipped_he);
                }
            }
        }

        for rect_edge in 0..4 {
            self.create_halfedges_from_turning_points(rect_edge);
        }
    }

    /// Clips one edge, interpolating 2.5D altitude onto the cut points.
    fn clip_halfedge(&mut self, in_he: EdgeId) -> ClippedEdge<F> {
        let v1 = self.arena.e(in_he).v;
        let v2 = self.arena.e(self.arena.e(in_he).pair).v;
        let mut pt1 = v1;
        let mut pt2 = v2;

        match self.bbox.clip_line(&mut pt1, &mut pt2) {
            SegmentClip::Outside => ClippedEdge::Outside,
            contained_or_cut => {
                if contained_or_cut == SegmentClip::Cut {
                    tolerance::line_z_from_xy(v1, v2, &mut pt1);
                    tolerance::line_z_from_xy(v1, v2, &mut pt2);
                }
                if tolerance::approx_eq(pt1.x, pt2.x, self.eps)
                    && tolerance::approx_eq(pt1.y, pt2.y, self.eps)
                {
                    ClippedEdge::Point(pt1)
                } else {
                    ClippedEdge::Edge(self.arena.create_pair_from(pt1, pt2, in_he))
                }
            }
        }
    }

    /// Step 2 bookkeeping: register a boundary contact on every rectangle
    /// edge it lies on, dropping point pairs whose directions cancel (an
    /// edge touching the boundary from both sides contributes nothing).
    fn evaluate_turning_point(&mut self, pt: Vertex<F>, he: EdgeId) {
        let eps = self.eps;

        if tolerance::approx_eq(pt.x, self.bbox.west, eps) {
            let direction = self.direction_left_right(pt, he, RECT_EDGE_AREA[RECT_LEFT]);
            self.insert_turning_point(RECT_LEFT, pt, direction);
        } else if tolerance::approx_eq(pt.x, self.bbox.east, eps) {
            let direction = self.direction_left_right(pt, he, RECT_EDGE_AREA[RECT_RIGHT]);
            self.insert_turning_point(RECT_RIGHT, pt, direction);
        }

        if tolerance::approx_eq(pt.y, self.bbox.south, eps) {
            let direction = self.direction_bottom_top(pt, he, RECT_EDGE_AREA[RECT_BOTTOM]);
            self.insert_turning_point(RECT_BOTTOM, pt, direction);
        } else if tolerance::approx_eq(pt.y, self.bbox.north, eps) {
            let direction = self.direction_bottom_top(pt, he, RECT_EDGE_AREA[RECT_TOP]);
            self.insert_turning_point(RECT_TOP, pt, direction);
        }
    }

    fn insert_turning_point(&mut self, rect_edge: usize, v: Vertex<F>, direction: Direction) {
        if direction == Direction::None {
            return;
        }
        let tpt = TurningPoint { v, direction };
        let (pos, inserted) = self.turning_points[rect_edge].insert(tpt, self.eps);
        if !inserted && self.turning_points[rect_edge].points[pos].direction != direction {
            // Same position, opposite continuation: both annihilate, which
            // is what keeps a vertex exactly on the boundary from creating
            // duplicate collinear clip edges.
            self.turning_points[rect_edge].remove(pos);
        }
    }

    /// Direction of the interior along a vertical (left/right) rectangle
    /// edge at a turning point of `he`.
    fn direction_left_right(&self, pt: Vertex<F>, he: EdgeId, edge_area: AreaSide) -> Direction {
        let left = self.arena.left_point(he);
        let right = self.arena.right_point(he);
        let dx = right.x - left.x;
        if dx != F::zero() {
            if self.arena.e(he).area_side == AreaSide::Above {
                Direction::Up
            } else {
                Direction::Down
            }
        } else {
            // The polygon edge lies on the rectangle edge.
            let hv = self.arena.e(he).v;
            let opp = if tolerance::approx_eq(pt.y, hv.y, self.eps) {
                self.arena.e(self.arena.e(he).pair).v
            } else {
                hv
            };
            let dy_pt = opp.y - pt.y;
            if edge_area == self.arena.e(he).area_side {
                if dy_pt < F::zero() {
                    Direction::Up
                } else {
                    Direction::Down
                }
            } else {
                Direction::None
            }
        }
    }

    /// Direction of the interior along a horizontal (bottom/top) rectangle
    /// edge at a turning point of `he`.
    fn direction_bottom_top(&self, pt: Vertex<F>, he: EdgeId, edge_area: AreaSide) -> Direction {
        let left = self.arena.left_point(he);
        let right = self.arena.right_point(he);
        let dy = right.y - left.y;
        if dy != F::zero() {
            let opp = if tolerance::approx_eq(pt.y, left.y, self.eps) {
                right
            } else {
                left
            };
            let dx = right.x - left.x;
            if dx == F::zero() {
                return if self.arena.e(he).area_side == AreaSide::Above {
                    Direction::Left
                } else {
                    Direction::Right
                };
            }
            let dy_pt = opp.y - pt.y;
            let dx_pt = opp.x - pt.x;
            let toward_left = dx_pt < F::zero();
            let downward = dy_pt < F::zero();
            if self.arena.e(he).area_side == AreaSide::Above {
                match (toward_left, downward) {
                    (true, true) | (false, false) => Direction::Left,
                    _ => Direction::Right,
                }
            } else {
                match (toward_left, downward) {
                    (true, true) | (false, false) => Direction::Right,
                    _ => Direction::Left,
                }
            }
        } else {
            // The polygon edge lies on the rectangle edge.
            let hv = self.arena.e(he).v;
            let opp = if tolerance::approx_eq(pt.x, hv.x, self.eps) {
                self.arena.e(self.arena.e(he).pair).v
            } else {
                hv
            };
            let dx_pt = opp.x - pt.x;
            if edge_area == self.arena.e(he).area_side {
                if dx_pt < F::zero() {
                    Direction::Right
                } else {
                    Direction::Left
                }
            } else {
                Direction::None
            }
        }
    }

    /// Expands the turning points of one rectangle edge into synthetic
    /// clip half-edges: corner stubs where the interior runs off the end
    /// of the edge, and interior spans between facing point pairs.
    fn create_halfedges_from_turning_points(&mut self, rect_edge: usize) {
        if self.turning_points[rect_edge].points.is_empty() {
            return;
        }

        let (pt_begin, pt_end, area) = self.rect_edge_geometry(rect_edge);

        let points: Vec<TurningPoint<F>> = self.turning_points[rect_edge].points.clone();
        let mut it_cur = 0;

        // Interior continues from the first turning point toward the begin
        // corner of the rectangle edge.
        let first = points[0];
        if first.direction == Direction::Left || first.direction == Direction::Down {
            let he = self
                .arena
                .create_internal_pair(first.v, pt_begin, area, EdgeFlag::Clip);
            let degenerate = self.arena.is_degenerate_pair(he);
            if !degenerate {
                let pair = self.arena.e(he).pair;
                self.builder.accept_edge(he);
                self.builder.accept_edge(pair);
            }
            it_cur += 1;

            self.rect_edges[rect_edge].has_halfedge = true;
            if !degenerate {
                // A vertex-touch at the corner is no intersection; only a
                // real span marks the corner interior.
                let corner = self.rect_edges[rect_edge].begin_corner;
                self.rect_corners[corner].is_inside = true;
            }
        }

        if it_cur >= points.len() {
            return;
        }

        // Interior continues from the last turning point toward the end
        // corner.
        let mut it_end = points.len() - 1;
        let last = points[it_end];
        if last.direction == Direction::Right || last.direction == Direction::Up {
            let he = self
                .arena
                .create_internal_pair(last.v, pt_end, area, EdgeFlag::Clip);
            let degenerate = self.arena.is_degenerate_pair(he);
            if !degenerate {
                let pair = self.arena.e(he).pair;
                self.builder.accept_edge(he);
                self.builder.accept_edge(pair);
            }

            self.rect_edges[rect_edge].has_halfedge = true;
            if !degenerate {
                let corner = self.rect_edges[rect_edge].end_corner;
                self.rect_corners[corner].is_inside = true;
            }

            if it_cur == it_end {
                return;
            }
            it_end -= 1;
        }

        if it_cur == it_end {
            return;
        }

        // Interior spans between facing pairs; odd leftovers from edges
        // lying on the rectangle boundary are skipped.
        let mut it_next = it_cur + 1;
        while it_cur != it_end {
            let matched = matches!(
                (points[it_cur].direction, points[it_next].direction),
                (Direction::Right, Direction::Left) | (Direction::Up, Direction::Down)
            );
            if matched {
                let he = self.arena.create_internal_pair(
                    points[it_cur].v,
                    points[it_next].v,
                    area,
                    EdgeFlag::Clip,
                );
                let pair = self.arena.e(he).pair;
                self.builder.accept_edge(he);
                self.builder.accept_edge(pair);
                self.rect_edges[rect_edge].has_halfedge = true;

                if it_next == it_end {
                    break;
                }
                it_cur = it_next;
                it_next += 1;
            }
            it_cur += 1;
            it_next += 1;
        }
    }

    /// When clip edges were generated, rectangle edges that produced none
    /// but end at a corner inside the polygon become whole clip edges.
    /// Repeats until stable (a corner learned inside propagates around).
    fn create_halfedges_from_inner_corners(&mut self) {
        loop {
            let mut created = false;
            for rect_edge in 0..4 {
                let state = self.rect_edges[rect_edge];
                if !state.has_halfedge
                    && (self.rect_corners[state.begin_corner].is_inside
                        || self.rect_corners[state.end_corner].is_inside)
                {
                    self.create_halfedge_from_rect_edge(rect_edge);
                    self.rect_edges[rect_edge].has_halfedge = true;
                    self.rect_corners[state.begin_corner].is_inside = true;
                    self.rect_corners[state.end_corner].is_inside = true;
                    created = true;
                }
            }
            if !created {
                break;
            }
        }
    }

    /// Decides the no-crossing case by what lies below the rectangle's
    /// bottom edge on a sweep through the polygon's left half-edges.
    fn process_special_cases(&mut self) -> SpecialCase {
        debug_assert!(!self.in_edges.is_empty());
        debug_assert!(self.special_sweep.is_empty());

        for i in 0..self.in_edges.len() {
            let he = self.in_edges[i];
            // Only edges whose x-span strictly covers the rectangle's west
            // edge; verticals never enter the sweep.
            let hv = self.arena.e(he).v;
            let pv = self.arena.e(self.arena.e(he).pair).v;
            // Exact comparisons here: a vertical edge on the west boundary
            // must stay out of the sweep.
            if self.arena.is_left(he)
                && tolerance::less_or_equal(hv.x, self.bbox.west, F::zero())
                && tolerance::definitely_less(self.bbox.west, pv.x, F::zero())
            {
                self.special_sweep.update(&self.arena, he);
            }
        }

        let probe = self.arena.create_internal_pair(
            Vertex::xy(self.bbox.west, self.bbox.south),
            Vertex::xy(self.bbox.east, self.bbox.south),
            AreaSide::Above,
            EdgeFlag::Clip,
        );
        let prev = self.special_sweep.prev_of(&self.arena, probe);
        let probe_pair = self.arena.e(probe).pair;
        self.arena.release_links(probe);
        self.arena.release_links(probe_pair);
        self.special_sweep.clear();

        let inside = prev.is_some_and(|p| self.arena.e(p).area_side == AreaSide::Above);
        if !inside {
            return SpecialCase::Outside;
        }

        if !self.builder.is_empty() {
            // Inside the outer ring, but hole rings reached the rectangle:
            // the rectangle boundary becomes the output's outer ring.
            for rect_edge in 0..4 {
                self.create_halfedge_from_rect_edge(rect_edge);
            }
            return SpecialCase::InsideWithHoles;
        }
        SpecialCase::Inside
    }

    fn create_halfedge_from_rect_edge(&mut self, rect_edge: usize) {
        let (pt_begin, pt_end, area) = self.rect_edge_geometry(rect_edge);
        let he = self
            .arena
            .create_internal_pair(pt_begin, pt_end, area, EdgeFlag::Clip);
        let pair = self.arena.e(he).pair;
        self.builder.accept_edge(he);
        self.builder.accept_edge(pair);
    }

    /// End points (at the 2.5D height) and interior side of one rectangle
    /// edge.
    fn rect_edge_geometry(&self, rect_edge: usize) -> (Vertex<F>, Vertex<F>, AreaSide) {
        let z = self.height25d;
        let b = &self.bbox;
        match rect_edge {
            RECT_LEFT => (
                Vertex::new(b.west, b.south, z),
                Vertex::new(b.west, b.north, z),
                AreaSide::Below,
            ),
            RECT_RIGHT => (
                Vertex::new(b.east, b.south, z),
                Vertex::new(b.east, b.north, z),
                AreaSide::Above,
            ),
            RECT_BOTTOM => (
                Vertex::new(b.west, b.south, z),
                Vertex::new(b.east, b.south, z),
                AreaSide::Above,
            ),
            _ => (
                Vertex::new(b.west, b.north, z),
                Vertex::new(b.east, b.north, z),
                AreaSide::Below,
            ),
        }
    }
}

/// Outcome of clipping one edge against the rectangle.
enum ClippedEdge<F> {
    Outside,
    /// Contact degenerated to a single point.
    Point(Vertex<F>),
    /// A surviving sub-segment, as a new half-edge pair.
    Edge(EdgeId),
}

/// Outcome of the no-boundary-crossing analysis.
enum SpecialCase {
    Outside,
    Inside,
    InsideWithHoles,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(parts: &[&[(f64, f64)]]) -> GeodeHandle<f64> {
        let mut geode = Geode::new(PrimType::Polygon);
        for coords in parts {
            geode.add_part(coords.len());
            for &(x, y) in *coords {
                geode.add_vertex(Vertex::xy(x, y));
            }
        }
        geode.into()
    }

    fn coords(geode: &Geode<f64>, part: usize) -> Vec<(f64, f64)> {
        geode.part(part).iter().map(|v| (v.x, v.y)).collect()
    }

    fn outer() -> Vec<(f64, f64)> {
        vec![
            (0.100, 0.100),
            (0.220, 0.100),
            (0.220, 0.200),
            (0.100, 0.200),
            (0.100, 0.100),
        ]
    }

    fn hole() -> Vec<(f64, f64)> {
        vec![
            (0.120, 0.120),
            (0.120, 0.180),
            (0.200, 0.180),
            (0.200, 0.120),
            (0.120, 0.120),
        ]
    }

    #[test]
    fn test_disjoint_returns_nothing() {
        let rect = BoundingBox::new(0.5, 0.9, 0.5, 0.9);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper.run(&polygon(&[&outer()]), &mut pieces).unwrap();
        assert!(pieces.is_empty());
        assert!(!covered);
    }

    #[test]
    fn test_fully_contained_passthrough() {
        let rect = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper.run(&polygon(&[&outer()]), &mut pieces).unwrap();
        assert!(!covered);
        assert_eq!(pieces.len(), 1);
        // Vertex order and count unchanged, every edge Normal-tagged.
        assert_eq!(coords(&pieces[0], 0), outer());
        assert_eq!(pieces[0].edge_flags().len(), 5);
        assert!(pieces[0].edge_flags().iter().all(|f| *f == EdgeFlag::Normal));
    }

    #[test]
    fn test_fully_contained_with_hole_matches_cleaner_stitching() {
        // The rectangle dwarfs the polygon: the output is the stitched
        // single ring, with no clip-tagged edges at all.
        let rect = BoundingBox::new(-20.0, 500.0, -20.0, 1000.0);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper
            .run(&polygon(&[&outer(), &hole()]), &mut pieces)
            .unwrap();
        assert!(!covered);
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.num_parts(), 1);
        assert_eq!(
            coords(piece, 0),
            vec![
                (0.1, 0.1),
                (0.12, 0.1),
                (0.12, 0.12),
                (0.12, 0.18),
                (0.2, 0.18),
                (0.2, 0.12),
                (0.12, 0.12),
                (0.12, 0.1),
                (0.22, 0.1),
                (0.22, 0.2),
                (0.1, 0.2),
                (0.1, 0.1),
            ]
        );
        let flags = piece.edge_flags();
        assert!(!flags.iter().any(|f| *f == EdgeFlag::Clip));
        assert_eq!(flags.iter().filter(|f| **f == EdgeFlag::Cut).count(), 2);
    }

    #[test]
    fn test_rectangle_inside_polygon_returns_clip_ring() {
        let rect = BoundingBox::new(0.13, 0.19, 0.13, 0.17);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let big = polygon(&[&[
            (0.0, 0.0),
            (0.5, 0.0),
            (0.5, 0.5),
            (0.0, 0.5),
            (0.0, 0.0),
        ]]);
        let covered = clipper.run(&big, &mut pieces).unwrap();
        assert!(covered);
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(
            coords(piece, 0),
            vec![
                (0.13, 0.13),
                (0.19, 0.13),
                (0.19, 0.17),
                (0.13, 0.17),
                (0.13, 0.13),
            ]
        );
        assert!(piece.edge_flags().iter().all(|f| *f == EdgeFlag::Clip));
    }

    #[test]
    fn test_rectangle_outside_polygon_within_bbox() {
        // The rectangle sits inside the polygon's bounding box but outside
        // the polygon itself (in the notch of an L).
        let l_shape = polygon(&[&[
            (0.0, 0.0),
            (0.4, 0.0),
            (0.4, 0.1),
            (0.1, 0.1),
            (0.1, 0.4),
            (0.0, 0.4),
            (0.0, 0.0),
        ]]);
        let rect = BoundingBox::new(0.2, 0.3, 0.2, 0.3);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper.run(&l_shape, &mut pieces).unwrap();
        assert!(!covered);
        assert!(pieces.is_empty());
    }

    #[test]
    fn test_half_overlap_cut() {
        // Unit-ish square clipped on its right half.
        let square = polygon(&[&[
            (0.0, 0.0),
            (0.4, 0.0),
            (0.4, 0.4),
            (0.0, 0.4),
            (0.0, 0.0),
        ]]);
        let rect = BoundingBox::new(0.2, 0.6, -0.1, 0.5);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        clipper.run(&square, &mut pieces).unwrap();
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.num_parts(), 1);

        // The result is the right half of the square.
        let (centroid, area) = piece.centroid(0).unwrap();
        assert!((area.abs() - 0.08).abs() < 1e-9);
        assert!((centroid.x - 0.3).abs() < 1e-9);
        assert!((centroid.y - 0.2).abs() < 1e-9);

        // The west side of the output lies on x = 0.2 and is Clip-tagged.
        let ring = piece.part(0);
        let flags = piece.edge_flags();
        let mut clip_edges = 0;
        for i in 0..ring.len() - 1 {
            if flags[i] == EdgeFlag::Clip {
                clip_edges += 1;
                assert!((ring[i].x - 0.2).abs() < 1e-9);
                assert!((ring[i + 1].x - 0.2).abs() < 1e-9);
            }
        }
        assert!(clip_edges >= 1);
    }

    #[test]
    fn test_right_edge_truncation_with_hole_inside() {
        // Outer boundary crosses the rectangle's right edge at x = 500;
        // the hole is entirely inside the rectangle and stays stitched.
        let shape = polygon(&[
            &[
                (100.0, 100.0),
                (600.0, 100.0),
                (600.0, 300.0),
                (100.0, 300.0),
                (100.0, 100.0),
            ],
            &[
                (200.0, 150.0),
                (200.0, 250.0),
                (300.0, 250.0),
                (300.0, 150.0),
                (200.0, 150.0),
            ],
        ]);
        let rect = BoundingBox::new(-20.0, 500.0, -20.0, 1000.0);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper.run(&shape, &mut pieces).unwrap();
        assert!(!covered);
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.num_parts(), 1);

        let ring = piece.part(0);
        let flags = piece.edge_flags();

        // Exactly one clip edge, vertical at x = 500.
        let clip_indices: Vec<usize> = (0..flags.len())
            .filter(|&i| flags[i] == EdgeFlag::Clip)
            .collect();
        assert_eq!(clip_indices.len(), 1);
        let i = clip_indices[0];
        assert!((ring[i].x - 500.0).abs() < 1e-9);
        assert!((ring[i + 1].x - 500.0).abs() < 1e-9);

        // The hole is still joined through a pair of cut edges.
        assert_eq!(flags.iter().filter(|f| **f == EdgeFlag::Cut).count(), 2);

        // No output vertex exceeds the rectangle.
        for v in ring {
            assert!(v.x <= 500.0 + 1e-9);
        }

        // Area check: outer truncated to 400 x 200 minus the 100 x 100 hole.
        let (_, area) = piece.centroid(0).unwrap();
        assert!((area.abs() - (400.0 * 200.0 - 100.0 * 100.0)).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_on_boundary_no_duplicate_clip_edges() {
        // A pentagon vertex lies exactly on the rectangle's west edge while
        // the east side pokes out. The boundary contact registers two
        // oppositely-directed turning points at the same position; they
        // must annihilate rather than spawn collinear clip edges.
        let pentagon = polygon(&[&[
            (0.2, 0.3),
            (0.3, 0.1),
            (0.5, 0.1),
            (0.5, 0.5),
            (0.3, 0.5),
            (0.2, 0.3),
        ]]);
        let rect = BoundingBox::new(0.2, 0.45, 0.0, 0.6);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        clipper.run(&pentagon, &mut pieces).unwrap();
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        let ring = piece.part(0);
        let flags = piece.edge_flags();

        // Exactly one clip edge, on the east side at x = 0.45; nothing
        // synthetic on the west edge.
        let clip_indices: Vec<usize> = (0..flags.len())
            .filter(|&i| flags[i] == EdgeFlag::Clip)
            .collect();
        assert_eq!(clip_indices.len(), 1);
        let i = clip_indices[0];
        assert!((ring[i].x - 0.45).abs() < 1e-9);
        assert!((ring[i + 1].x - 0.45).abs() < 1e-9);

        // The boundary vertex appears exactly once (plus the closing
        // duplicate if the ring happens to start there).
        let on_boundary = ring[..ring.len() - 1]
            .iter()
            .filter(|v| v.equals_xy(Vertex::xy(0.2, 0.3), 1e-9))
            .count();
        assert_eq!(on_boundary, 1);

        let (_, area) = piece.centroid(0).unwrap();
        assert!((area.abs() - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_touch_yields_nothing() {
        // The polygon touches the rectangle at exactly one corner point.
        let triangle = polygon(&[&[
            (0.0, 0.0),
            (0.2, 0.0),
            (0.0, 0.2),
            (0.0, 0.0),
        ]]);
        let rect = BoundingBox::new(0.1, 0.3, 0.1, 0.3);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        let covered = clipper.run(&triangle, &mut pieces).unwrap();
        assert!(!covered);
        assert!(pieces.is_empty());
    }

    #[test]
    fn test_unsupported_prim_types_rejected() {
        let mut clipper: PolygonClipper<f64> =
            PolygonClipper::with_rect(BoundingBox::new(0.0, 1.0, 0.0, 1.0), true);
        let mut pieces = Vec::new();

        let mut line: Geode<f64> = Geode::new(PrimType::PolyLine);
        line.add_part(2);
        line.add_vertex(Vertex::xy(0.0, 0.0));
        line.add_vertex(Vertex::xy(1.0, 1.0));
        assert_eq!(
            clipper.run(&line.into(), &mut pieces),
            Err(GeometryError::UnsupportedPrimType(PrimType::PolyLine))
        );

        let mut wall: Geode<f64> = Geode::new(PrimType::Polygon3D);
        wall.add_part(4);
        wall.add_vertex(Vertex::new(0.0, 0.0, 0.0));
        wall.add_vertex(Vertex::new(1.0, 0.0, 1.0));
        wall.add_vertex(Vertex::new(0.0, 1.0, 1.0));
        wall.add_vertex(Vertex::new(0.0, 0.0, 0.0));
        assert_eq!(
            clipper.run(&wall.into(), &mut pieces),
            Err(GeometryError::UnsupportedPrimType(PrimType::Polygon3D))
        );
    }

    #[test]
    fn test_multi_polygon_clipped_member_wise() {
        let mut collection = crate::geode::GeodeCollection::new(PrimType::MultiPolygon);
        for (x0, x1) in [(0.0, 0.3), (0.6, 0.9)] {
            let mut geode = Geode::new(PrimType::Polygon);
            geode.add_part(5);
            geode.add_vertex(Vertex::xy(x0, 0.0));
            geode.add_vertex(Vertex::xy(x1, 0.0));
            geode.add_vertex(Vertex::xy(x1, 0.3));
            geode.add_vertex(Vertex::xy(x0, 0.3));
            geode.add_vertex(Vertex::xy(x0, 0.0));
            collection.add_geode(geode);
        }
        let handle: GeodeHandle<f64> = collection.into();

        // Rectangle covering the first member and cutting the second.
        let rect = BoundingBox::new(-0.1, 0.7, -0.1, 0.4);
        let mut clipper = PolygonClipper::with_rect(rect, true);
        let mut pieces = Vec::new();
        clipper.run(&handle, &mut pieces).unwrap();
        assert_eq!(pieces.len(), 2);
        let (_, first_area) = pieces[0].centroid(0).unwrap();
        let (_, second_area) = pieces[1].centroid(0).unwrap();
        assert!((first_area.abs() - 0.09).abs() < 1e-9);
        assert!((second_area.abs() - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_reuse_across_runs() {
        let mut clipper: PolygonClipper<f64> =
            PolygonClipper::with_rect(BoundingBox::new(0.0, 1.0, 0.0, 1.0), true);
        let mut pieces = Vec::new();
        clipper.run(&polygon(&[&outer()]), &mut pieces).unwrap();
        clipper.run(&polygon(&[&outer()]), &mut pieces).unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(coords(&pieces[0], 0), coords(&pieces[1], 0));
    }
}
