//! Ring reconstruction from half-edge soup.
//!
//! The builder receives the half-edges of a polygon's rings (plus any
//! synthetic clip edges), sorts them by dominating point, links the edges
//! incident to each shared vertex into a counter-clockwise ring, and then
//! extracts closed cycles with a left-to-right sweep. Holes are detected by
//! what lies below their topmost-left edge on the sweep line and either
//! reported as inner cycles or stitched into their outer boundary with a
//! zero-width pair of cut edges.

use log::{debug, warn};
use num_traits::Float;

use crate::clipper::halfedge::{AreaSide, Dominating, EdgeArena, EdgeId, SweepStatus, NONE, NO_FACE};
use crate::geode::{EdgeFlag, Geode, PrimType, MIN_CYCLE_VERTICES};
use crate::primitives::Vertex;
use crate::tolerance;

/// Behavior switches of the reconstruction pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BuilderOptions {
    /// Stitch holes into their outer boundary with cut-edge pairs instead
    /// of reporting them as separate inner cycles.
    pub cut_holes: bool,
    /// Remove coincident, oppositely-directed edge pairs (seams) while
    /// linking, and decide outer-vs-hole by sweep parity instead of
    /// trusting source winding.
    pub clean_overlapped_edges: bool,
}

/// Outer or inner cycle of a reconstructed face, by its first and last
/// half-edge. Both `None` marks a cycle found invalid during traversal.
#[derive(Debug, Default, Clone, Copy)]
struct Cycle {
    first: Option<EdgeId>,
    last: Option<EdgeId>,
}

/// One output polygon: an outer cycle and any inner cycles.
#[derive(Debug, Default)]
struct Face {
    cycles: Vec<Cycle>,
}

impl Face {
    fn is_valid(&self) -> bool {
        !self.cycles.is_empty() && self.cycles[0].first.is_some()
    }
}

/// Reconstructs simple rings from accepted half-edges.
#[derive(Debug)]
pub(crate) struct RingBuilder<F> {
    options: BuilderOptions,
    prim_type: PrimType,
    out_edges: Vec<EdgeId>,
    sweep: SweepStatus,
    faces: Vec<Face>,
    _coord: std::marker::PhantomData<F>,
}

impl<F: Float> RingBuilder<F> {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            prim_type: PrimType::Polygon,
            out_edges: Vec::new(),
            sweep: SweepStatus::new(),
            faces: Vec::new(),
            _coord: std::marker::PhantomData,
        }
    }

    pub fn set_prim_type(&mut self, prim_type: PrimType) {
        self.prim_type = prim_type;
    }

    /// Accepts every ring of a polygon.
    pub fn accept_geode(&mut self, arena: &mut EdgeArena<F>, geode: &Geode<F>) {
        if geode.is_degenerate() {
            return;
        }
        for part in 0..geode.num_parts() {
            self.accept_ring(arena, geode, part);
        }
    }

    /// Accepts one ring, decomposing each edge into its half-edge pair.
    pub fn accept_ring(&mut self, arena: &mut EdgeArena<F>, geode: &Geode<F>, part: usize) {
        let n = geode.vertex_count(part);
        if n < MIN_CYCLE_VERTICES {
            warn!("invalid polygon ring skipped");
            return;
        }
        for i in 0..n - 1 {
            let he = arena.create_pair(geode.vertex(part, i), geode.vertex(part, i + 1));
            self.out_edges.push(he);
            self.out_edges.push(arena.e(he).pair);
        }
    }

    /// Accepts a single half-edge created by the clipper. The caller
    /// accepts the pair separately.
    pub fn accept_edge(&mut self, he: EdgeId) {
        self.out_edges.push(he);
    }

    pub fn is_empty(&self) -> bool {
        self.out_edges.is_empty()
    }

    /// Runs reconstruction and appends the resulting simple polygons to
    /// `pieces`. Internal state is reset afterwards; the arena is the
    /// caller's to clear.
    pub fn run(&mut self, arena: &mut EdgeArena<F>, pieces: &mut Vec<Geode<F>>) {
        if self.out_edges.is_empty() {
            return;
        }

        self.out_edges.sort_by(|&a, &b| {
            if arena.dp_less(a, b) {
                std::cmp::Ordering::Less
            } else if arena.dp_less(b, a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });

        if self.options.clean_overlapped_edges {
            self.link_and_clean_overlapped(arena);
            self.reconstruct(arena);
        } else {
            self.link_halfedges(arena);
            self.reconstruct_skip_invalid_cycles(arena);
        }

        self.report(arena, pieces);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.out_edges.clear();
        self.sweep.clear();
        self.faces.clear();
    }

    /// Links the half-edges sharing each dominating point into a circular
    /// pred/succ list; sorted order makes the list counter-clockwise.
    fn link_halfedges(&mut self, arena: &mut EdgeArena<F>) {
        let mut prev_dp: Option<Vertex<F>> = None;
        let mut prev_he = NONE;
        let eps = arena.eps();

        for i in 0..self.out_edges.len() {
            let cur = self.out_edges[i];
            debug_assert_ne!(arena.e(cur).pair, NONE);
            let cur_dp = arena.e(cur).v;

            let same_point = prev_dp.is_some_and(|dp| cur_dp.equals_xy(dp, eps));
            if !same_point {
                arena.e_mut(cur).pred = cur;
                arena.e_mut(cur).succ = cur;
            } else {
                let after = arena.e(prev_he).succ;
                arena.e_mut(cur).pred = prev_he;
                arena.e_mut(cur).succ = after;
                arena.e_mut(prev_he).succ = cur;
                arena.e_mut(after).pred = cur;
            }

            prev_dp = Some(cur_dp);
            prev_he = cur;
        }
    }

    /// As [`Self::link_halfedges`], additionally removing coincident
    /// opposite edge pairs from each completed vertex ring. Removed edges
    /// keep no links and are skipped by later passes.
    fn link_and_clean_overlapped(&mut self, arena: &mut EdgeArena<F>) {
        let mut prev_dp: Option<Vertex<F>> = None;
        let mut prev_he = NONE;
        let mut first_he = NONE;
        let eps = arena.eps();

        for i in 0..self.out_edges.len() {
            let cur = self.out_edges[i];
            if arena.e(cur).pair == NONE {
                continue;
            }
            let cur_dp = arena.e(cur).v;

            let same_point = prev_dp.is_some_and(|dp| cur_dp.equals_xy(dp, eps));
            if !same_point {
                if prev_dp.is_some() && first_he != NONE {
                    Self::clean_overlapped_at_vertex(arena, first_he);
                }

                if arena.e(cur).pair == NONE {
                    continue;
                }
                first_he = cur;
                arena.e_mut(cur).pred = cur;
                arena.e_mut(cur).succ = cur;
            } else {
                let after = arena.e(prev_he).succ;
                arena.e_mut(cur).pred = prev_he;
                arena.e_mut(cur).succ = after;
                arena.e_mut(prev_he).succ = cur;
                arena.e_mut(after).pred = cur;
            }

            prev_dp = Some(cur_dp);
            prev_he = cur;
        }
        // The lexicographically last vertex group is never cleaned: the left
        // half-edges of any seam pair live in an earlier group, so the pair
        // was already removed there and its right halves released with it.
    }

    /// Walks the circular edge list around one vertex removing equal
    /// half-edge pairs (a seam contributes two equal-looking half-edges at
    /// each of its endpoints).
    fn clean_overlapped_at_vertex(arena: &mut EdgeArena<F>, first: EdgeId) {
        let mut first_link = first;
        let mut prev_link = first_link;
        let mut cur_link = arena.e(prev_link).succ;

        loop {
            if cur_link == NONE {
                break;
            }
            if cur_link != prev_link
                && arena.e(cur_link).pair != NONE
                && arena.e(prev_link).pair != NONE
                && arena.edges_equal(cur_link, prev_link)
            {
                // Splice both out of the vertex ring, then drop their links
                // and their pairs' links.
                let before = arena.e(prev_link).pred;
                let after = arena.e(cur_link).succ;
                arena.e_mut(before).succ = after;
                arena.e_mut(after).pred = before;

                let cur_pair = arena.e(cur_link).pair;
                let prev_pair = arena.e(prev_link).pair;
                arena.release_links(cur_pair);
                arena.release_links(cur_link);
                arena.release_links(prev_pair);
                arena.release_links(prev_link);

                if prev_link == first_link {
                    first_link = before;
                }
                prev_link = before;
                cur_link = arena.e(prev_link).succ;
            } else {
                prev_link = cur_link;
                cur_link = arena.e(cur_link).succ;
            }
            if cur_link == NONE || cur_link == first_link {
                break;
            }
        }
    }

    /// Next half-edge when walking a cycle. Outer cycles turn clockwise
    /// around each vertex ring (counter-clockwise boundary), inner cycles
    /// the other way.
    fn next_in_cycle(arena: &EdgeArena<F>, he: EdgeId, inner: bool) -> EdgeId {
        let pair = arena.e(he).pair;
        if pair == NONE {
            return NONE;
        }
        if inner {
            arena.e(pair).succ
        } else {
            arena.e(pair).pred
        }
    }

    fn prev_in_cycle(arena: &EdgeArena<F>, he: EdgeId, inner: bool) -> EdgeId {
        if inner {
            let pred = arena.e(he).pred;
            arena.e(pred).pair
        } else {
            let succ = arena.e(he).succ;
            arena.e(succ).pair
        }
    }

    /// The face directly below `he` on the sweep line, with the qualifying
    /// boundary half-edge. [`NO_FACE`] when `he` is not above any interior.
    fn face_below(&self, arena: &EdgeArena<F>, he: EdgeId) -> (u32, EdgeId) {
        let Some(prev) = self.sweep.prev_of(arena, he) else {
            return (NO_FACE, NONE);
        };
        debug_assert!(arena.e(prev).visited);

        let inside = if self.options.clean_overlapped_edges {
            // Winding of the source is untrusted while cleaning: parity of
            // the boundary edges below decides interior.
            self.sweep.count_edges(prev) & 1 == 1
        } else {
            arena.e(prev).area_side == AreaSide::Above
        };
        if inside {
            (arena.e(prev).face, prev)
        } else {
            (NO_FACE, NONE)
        }
    }

    /// Walks one cycle from `he`, marking every half-edge visited and
    /// stamping face attributes. When `face_slot` names a face, its last
    /// cycle receives the first/last half-edge references; cycles below the
    /// minimum vertex count are invalidated instead.
    fn compute_cycle(
        &mut self,
        arena: &mut EdgeArena<F>,
        he: EdgeId,
        face_slot: Option<usize>,
        inner: bool,
    ) {
        let invalidate = |faces: &mut Vec<Face>| {
            if let Some(f) = face_slot {
                if let Some(cycle) = faces[f].cycles.last_mut() {
                    cycle.first = None;
                    cycle.last = None;
                }
            }
        };

        if arena.e(he).pred == he && arena.e(he).succ == he {
            // Isolated half-edge: a spike that survived to reconstruction.
            warn!("isolated half-edge in cycle computation");
            arena.set_visited(he, true);
            invalidate(&mut self.faces);
            return;
        }

        if let Some(f) = face_slot {
            if let Some(cycle) = self.faces[f].cycles.last_mut() {
                cycle.first = Some(he);
            }
        }

        let face = arena.e(he).face;
        let cycle_num = arena.e(he).cycle;
        let limit = 2 * self.out_edges.len() + 4;

        let mut count: usize = 0;
        let mut cur = he;
        loop {
            count += 1;
            arena.set_visited(cur, true);
            arena.set_face(cur, face, cycle_num);

            cur = Self::next_in_cycle(arena, cur, inner);
            if cur == he {
                break;
            }
            if cur == NONE || count > limit {
                warn!("broken half-edge links, cycle dropped");
                invalidate(&mut self.faces);
                return;
            }
        }

        count += 1; // closing duplicate of the first vertex
        if count >= MIN_CYCLE_VERTICES {
            if let Some(f) = face_slot {
                let last = Self::prev_in_cycle(arena, cur, inner);
                if let Some(cycle) = self.faces[f].cycles.last_mut() {
                    cycle.last = Some(last);
                }
            }
        } else {
            invalidate(&mut self.faces);
        }
    }

    /// Reconstruction used by the clipper: source winding is trusted,
    /// cycles that land outside any face or inside a foreign one are
    /// dropped.
    fn reconstruct_skip_invalid_cycles(&mut self, arena: &mut EdgeArena<F>) {
        for i in 0..self.out_edges.len() {
            let cur = self.out_edges[i];

            if arena.e(cur).dominating == Dominating::Left && !arena.e(cur).visited {
                let (existing_face, outer_he) = self.face_below(arena, cur);

                if arena.e(cur).area_side == AreaSide::Above {
                    if existing_face != NO_FACE {
                        // An outer cycle starting inside another face is
                        // invalid geometry; consume it without reporting.
                        warn!("outer cycle inside another face skipped");
                        arena.set_face(cur, NO_FACE, NO_FACE);
                        self.compute_cycle(arena, cur, None, false);
                    } else {
                        debug!("new outer cycle");
                        self.faces.push(Face::default());
                        let face_num = self.faces.len() - 1;
                        self.faces[face_num].cycles.push(Cycle::default());
                        arena.set_face(cur, face_num as u32, 0);
                        self.compute_cycle(arena, cur, Some(face_num), false);
                    }
                } else {
                    let first_he = arena.e(cur).succ;
                    if first_he == NONE {
                        warn!("half-edge set not linked");
                        continue;
                    }
                    let pair = arena.e(cur).pair;
                    let self_linked = (arena.e(cur).pred == cur && arena.e(cur).succ == cur)
                        || (arena.e(pair).pred == pair && arena.e(pair).succ == pair);

                    if existing_face != NO_FACE {
                        let face_num = existing_face as usize;
                        if face_num >= self.faces.len() || self.faces[face_num].cycles.is_empty() {
                            warn!("invalid face number for inner cycle");
                            continue;
                        }
                        debug!("new inner cycle");
                        if self.options.cut_holes {
                            self.add_hole_to_outer_cycle(arena, first_he, outer_he);
                        } else {
                            self.faces[face_num].cycles.push(Cycle::default());
                            let cycle_num = self.faces[face_num].cycles.len() - 1;
                            arena.set_face(first_he, existing_face, cycle_num as u32);
                            self.compute_cycle(arena, first_he, Some(face_num), true);
                        }
                    } else if self_linked {
                        // A source edge lying on the window boundary whose
                        // polygon side is entirely outside.
                        warn!("spike half-edge outside any face");
                        arena.set_visited(cur, true);
                    } else {
                        // Inner cycle outside every outer cycle.
                        warn!("inner cycle outside outer cycle skipped");
                        arena.set_face(first_he, NO_FACE, NO_FACE);
                        self.compute_cycle(arena, first_he, None, true);
                    }
                }
            }

            self.sweep.update(arena, cur);
        }
    }

    /// Reconstruction used by the cleaner: every not-yet-claimed cycle
    /// above no interior starts a new face, interior decided by parity.
    fn reconstruct(&mut self, arena: &mut EdgeArena<F>) {
        for i in 0..self.out_edges.len() {
            let cur = self.out_edges[i];
            if arena.e(cur).pair == NONE {
                continue; // removed as an overlapped seam
            }

            if arena.e(cur).dominating == Dominating::Left && !arena.e(cur).visited {
                let (existing_face, outer_he) = self.face_below(arena, cur);

                if existing_face == NO_FACE {
                    debug!("new outer cycle");
                    self.faces.push(Face::default());
                    let face_num = self.faces.len() - 1;
                    self.faces[face_num].cycles.push(Cycle::default());
                    arena.set_face(cur, face_num as u32, 0);
                    self.compute_cycle(arena, cur, Some(face_num), false);
                } else {
                    let first_he = arena.e(cur).succ;
                    if first_he == NONE {
                        warn!("half-edge set not linked");
                        continue;
                    }
                    let face_num = existing_face as usize;
                    if face_num >= self.faces.len() || self.faces[face_num].cycles.is_empty() {
                        warn!("invalid face number for inner cycle");
                        continue;
                    }
                    debug!("new inner cycle");
                    if self.options.cut_holes {
                        self.add_hole_to_outer_cycle(arena, first_he, outer_he);
                    } else {
                        self.faces[face_num].cycles.push(Cycle::default());
                        let cycle_num = self.faces[face_num].cycles.len() - 1;
                        arena.set_face(first_he, existing_face, cycle_num as u32);
                        self.compute_cycle(arena, first_he, Some(face_num), true);
                    }
                }
            }

            self.sweep.update(arena, cur);
        }
    }

    /// Stitches an inner cycle into its outer cycle.
    ///
    /// A connection point is dropped straight down from the hole's first
    /// vertex onto the outer boundary edge below it; the outer edge is
    /// split there (unless the connection lands on its endpoint) and a
    /// zero-width pair of cut edges joins the two cycles, after which the
    /// hole is traversed as part of the outer boundary.
    fn add_hole_to_outer_cycle(&mut self, arena: &mut EdgeArena<F>, he: EdgeId, outer_he: EdgeId) {
        let eps = arena.eps();

        // Connection point on the outer edge, below the hole vertex.
        let pt1_line = arena.left_point(outer_he);
        let pt2_line = arena.right_point(outer_he);
        let mut connection = arena.e(he).v;
        connection.y = tolerance::line_y_from_x(pt1_line, pt2_line, connection.x);
        tolerance::line_z_from_xy(pt1_line, pt2_line, &mut connection);

        let (new_opp1, new_opp2);
        if connection.equals_xy(arena.left_point(outer_he), eps) {
            // Connection coincides with the outer edge's own vertex.
            new_opp1 = arena.e(outer_he).succ;
            new_opp2 = outer_he;
        } else {
            // Split the outer edge into two, re-pairing its halves around
            // the connection point.
            let opp_outer = arena.e(outer_he).pair;

            // The split edge leaves the sweep status before re-pairing.
            self.sweep.update(arena, opp_outer);

            let first = arena.create(connection);
            arena.e_mut(first).dominating = Dominating::Right;
            arena.link_pair(outer_he, first);
            arena.copy_attr(first, outer_he);
            arena.e_mut(first).visited = true;

            let second = arena.create(connection);
            arena.e_mut(second).dominating = Dominating::Left;
            arena.link_pair(second, opp_outer);
            arena.copy_attr(second, outer_he);
            arena.e_mut(second).visited = true;

            // The second half replaces the removed edge on the sweep line.
            self.sweep.update(arena, second);

            new_opp1 = first;
            new_opp2 = second;
        }

        // Cut-edge pair from the connection point up to the hole vertex.
        let hole_v = arena.e(he).v;
        let side = arena.e(outer_he).area_side;
        let cut = arena.create_internal_pair(connection, hole_v, side, EdgeFlag::Cut);

        // Link the three half-edges around the connection vertex.
        arena.e_mut(new_opp1).pred = cut;
        arena.e_mut(new_opp1).succ = new_opp2;
        arena.e_mut(new_opp2).pred = new_opp1;
        arena.e_mut(new_opp2).succ = cut;
        arena.e_mut(cut).pred = new_opp2;
        arena.e_mut(cut).succ = new_opp1;

        // Link the opposite cut half-edge into the hole vertex ring.
        let opp_cut = arena.e(cut).pair;
        let tmp = arena.e(he).succ;
        arena.e_mut(he).succ = opp_cut;
        arena.e_mut(opp_cut).pred = he;
        arena.e_mut(opp_cut).succ = tmp;
        arena.e_mut(tmp).pred = opp_cut;

        // The stitched hole now belongs to the outer cycle; traverse it as
        // such to mark and stamp it.
        let face = arena.e(outer_he).face;
        let cycle_num = arena.e(outer_he).cycle;
        arena.set_face(he, face, cycle_num);
        self.compute_cycle(arena, he, None, false);
    }

    /// Converts every valid face to a geode.
    fn report(&mut self, arena: &EdgeArena<F>, pieces: &mut Vec<Geode<F>>) {
        let faces = std::mem::take(&mut self.faces);
        for face in &faces {
            if !face.is_valid() {
                continue;
            }
            let mut geode = Geode::new(self.prim_type);
            self.convert_cycle(arena, &face.cycles[0], &mut geode, false);
            for cycle in &face.cycles[1..] {
                self.convert_cycle(arena, cycle, &mut geode, true);
            }
            if !geode.is_empty() {
                pieces.push(geode);
            }
        }
    }

    /// Emits one cycle as a closed ring with per-edge provenance flags.
    fn convert_cycle(&self, arena: &EdgeArena<F>, cycle: &Cycle, geode: &mut Geode<F>, inner: bool) {
        let Some(first) = cycle.first else {
            // Invalidated during traversal; nothing to emit.
            return;
        };
        let Some(last) = cycle.last else {
            warn!("face has invalid cycle");
            return;
        };

        geode.add_part(8);
        let limit = 2 * arena_len_bound(arena) + 4;
        let mut count = 0usize;
        let mut cur = first;
        while cur != last {
            geode.add_vertex_and_edge_flag(arena.e(cur).v, arena.e(cur).kind);
            cur = Self::next_in_cycle(arena, cur, inner);
            count += 1;
            if cur == NONE || count > limit {
                warn!("broken cycle links during conversion");
                geode.erase_last_part();
                return;
            }
        }
        geode.add_vertex_and_edge_flag(arena.e(last).v, arena.e(last).kind);
        // Closing duplicate; its flag comes from the arriving edge so
        // seam-suppression checks on the first vertex keep working.
        geode.add_vertex_and_edge_flag(arena.e(first).v, arena.e(last).kind);
    }
}

fn arena_len_bound<F: Float>(arena: &EdgeArena<F>) -> usize {
    // The conversion walk can touch cut edges created after acceptance, so
    // the bound comes from the arena rather than the accepted list.
    arena.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_geode(coords: &[(f64, f64)]) -> Geode<f64> {
        let mut geode = Geode::new(PrimType::Polygon);
        geode.add_part(coords.len());
        for &(x, y) in coords {
            geode.add_vertex(Vertex::xy(x, y));
        }
        geode
    }

    fn run_builder(options: BuilderOptions, geode: &Geode<f64>) -> Vec<Geode<f64>> {
        let mut arena = EdgeArena::new(1e-10);
        let mut builder = RingBuilder::new(options);
        builder.set_prim_type(geode.prim_type());
        builder.accept_geode(&mut arena, geode);
        let mut pieces = Vec::new();
        builder.run(&mut arena, &mut pieces);
        pieces
    }

    fn coords(geode: &Geode<f64>, part: usize) -> Vec<(f64, f64)> {
        geode.part(part).iter().map(|v| (v.x, v.y)).collect()
    }

    #[test]
    fn test_single_ring_passthrough() {
        let geode = ring_geode(&[
            (0.1, 0.1),
            (0.22, 0.1),
            (0.22, 0.2),
            (0.1, 0.2),
            (0.1, 0.1),
        ]);
        let pieces = run_builder(BuilderOptions::default(), &geode);
        assert_eq!(pieces.len(), 1);
        assert_eq!(
            coords(&pieces[0], 0),
            vec![(0.1, 0.1), (0.22, 0.1), (0.22, 0.2), (0.1, 0.2), (0.1, 0.1)]
        );
        assert!(pieces[0].edge_flags().iter().all(|f| *f == EdgeFlag::Normal));
    }

    #[test]
    fn test_reversed_ring_comes_back_counter_clockwise() {
        let geode = ring_geode(&[
            (0.12, 0.12),
            (0.12, 0.18),
            (0.2, 0.18),
            (0.2, 0.12),
            (0.12, 0.12),
        ]);
        let options = BuilderOptions {
            cut_holes: false,
            clean_overlapped_edges: true,
        };
        let pieces = run_builder(options, &geode);
        assert_eq!(pieces.len(), 1);
        assert_eq!(
            coords(&pieces[0], 0),
            vec![(0.12, 0.12), (0.2, 0.12), (0.2, 0.18), (0.12, 0.18), (0.12, 0.12)]
        );
    }

    #[test]
    fn test_hole_reported_as_inner_cycle_without_cutting() {
        let mut geode = ring_geode(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]);
        geode.add_part(5);
        for &(x, y) in &[(0.2, 0.2), (0.2, 0.8), (0.8, 0.8), (0.8, 0.2), (0.2, 0.2)] {
            geode.add_vertex(Vertex::xy(x, y));
        }
        let pieces = run_builder(BuilderOptions::default(), &geode);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].num_parts(), 2);
    }

    #[test]
    fn test_hole_stitched_with_cut_edges() {
        let mut geode = ring_geode(&[
            (0.1, 0.1),
            (0.22, 0.1),
            (0.22, 0.2),
            (0.1, 0.2),
            (0.1, 0.1),
        ]);
        geode.add_part(5);
        for &(x, y) in &[
            (0.12, 0.12),
            (0.12, 0.18),
            (0.2, 0.18),
            (0.2, 0.12),
            (0.12, 0.12),
        ] {
            geode.add_vertex(Vertex::xy(x, y));
        }

        let options = BuilderOptions {
            cut_holes: true,
            clean_overlapped_edges: false,
        };
        let pieces = run_builder(options, &geode);
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
        assert_eq!(flags.len(), 12);
        assert_eq!(flags[1], EdgeFlag::Cut); // up into the hole
        assert_eq!(flags[6], EdgeFlag::Cut); // back down to the boundary
        assert_eq!(
            flags.iter().filter(|f| **f == EdgeFlag::Cut).count(),
            2
        );
    }

    #[test]
    fn test_seam_pair_removed_and_hole_restitched() {
        // One ring carrying a hole already stitched by a previous pass:
        // cleaning removes the seam pair and re-stitches the hole.
        let geode = ring_geode(&[
            (0.020, 0.050),
            (0.120, 0.120),
            (0.200, 0.120),
            (0.200, 0.180),
            (0.120, 0.180),
            (0.120, 0.120),
            (0.020, 0.050),
            (0.020, 0.400),
            (0.400, 0.400),
            (0.400, 0.050),
            (0.020, 0.050),
        ]);
        let options = BuilderOptions {
            cut_holes: true,
            clean_overlapped_edges: true,
        };
        let pieces = run_builder(options, &geode);
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.num_parts(), 1);
        // Outer rectangle (4 distinct) + hole (4 distinct) + connection
        // point visited twice + hole vertex revisited + closing duplicate.
        assert_eq!(piece.vertex_count(0), 12);
        assert_eq!(
            piece
                .edge_flags()
                .iter()
                .filter(|f| **f == EdgeFlag::Cut)
                .count(),
            2
        );
        // The old seam between (0.020, 0.050) and (0.120, 0.120) is gone.
        let ring = piece.part(0);
        for w in ring.windows(2) {
            let is_old_seam = (w[0].equals_xy(Vertex::xy(0.020, 0.050), 1e-9)
                && w[1].equals_xy(Vertex::xy(0.120, 0.120), 1e-9))
                || (w[1].equals_xy(Vertex::xy(0.020, 0.050), 1e-9)
                    && w[0].equals_xy(Vertex::xy(0.120, 0.120), 1e-9));
            assert!(!is_old_seam);
        }
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let geode = ring_geode(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        let pieces = run_builder(BuilderOptions::default(), &geode);
        assert!(pieces.is_empty());
    }
}
