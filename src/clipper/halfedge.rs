//! Arena of paired directed half-edges.
//!
//! Every ring edge is decomposed into two opposed half-edges. A half-edge
//! records its origin vertex, which endpoint of the underlying edge is the
//! "dominating" point (the lexicographically smaller one), which side of
//! the edge the polygon interior lies on, its provenance, and the
//! neighboring half-edges around its origin vertex. All references are
//! integer handles into one arena, so the web of pair/pred/succ links stays
//! valid without reference counting and ownership transfer is a move of the
//! arena.

use num_traits::Float;

use crate::geode::EdgeFlag;
use crate::primitives::{Vec2, Vertex};
use crate::tolerance;

/// Handle of a half-edge within an [`EdgeArena`].
pub(crate) type EdgeId = usize;

/// Sentinel for a released link (the arena never grows this large).
pub(crate) const NONE: EdgeId = usize::MAX;

/// Sentinel face/cycle number before assignment.
pub(crate) const NO_FACE: u32 = u32::MAX;

/// Which endpoint of the underlying edge is this half-edge's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dominating {
    /// Origin is the lexicographically smaller endpoint.
    Left,
    /// Origin is the lexicographically larger endpoint.
    Right,
}

/// Which side of the edge the polygon interior lies on.
///
/// A vertical edge with interior to its left counts as `Above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AreaSide {
    Below,
    Above,
}

#[derive(Debug)]
pub(crate) struct HalfEdge<F> {
    /// Origin vertex.
    pub v: Vertex<F>,
    pub dominating: Dominating,
    /// Opposite half-edge of the same underlying edge; [`NONE`] once the
    /// edge was removed as an overlapped seam.
    pub pair: EdgeId,
    /// Previous half-edge counter-clockwise around the origin vertex.
    pub pred: EdgeId,
    /// Next half-edge counter-clockwise around the origin vertex.
    pub succ: EdgeId,
    pub area_side: AreaSide,
    pub kind: EdgeFlag,
    pub visited: bool,
    pub face: u32,
    pub cycle: u32,
}

#[derive(Debug)]
pub(crate) struct EdgeArena<F> {
    edges: Vec<HalfEdge<F>>,
    eps: F,
}

impl<F: Float> EdgeArena<F> {
    pub fn new(eps: F) -> Self {
        Self {
            edges: Vec::new(),
            eps,
        }
    }

    #[inline]
    pub fn eps(&self) -> F {
        self.eps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    #[inline]
    pub fn e(&self, id: EdgeId) -> &HalfEdge<F> {
        &self.edges[id]
    }

    #[inline]
    pub fn e_mut(&mut self, id: EdgeId) -> &mut HalfEdge<F> {
        &mut self.edges[id]
    }

    /// Creates an unlinked half-edge at `v`.
    pub fn create(&mut self, v: Vertex<F>) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(HalfEdge {
            v,
            dominating: Dominating::Left,
            pair: NONE,
            pred: NONE,
            succ: NONE,
            area_side: AreaSide::Above,
            kind: EdgeFlag::Normal,
            visited: false,
            face: NO_FACE,
            cycle: NO_FACE,
        });
        id
    }

    /// Creates the half-edge pair for the edge `v0`-`v1` and derives its
    /// dominating point and interior side from the traversal direction.
    ///
    /// The interior-side rule assumes source ring conventions (outer rings
    /// counter-clockwise): walking a left half-edge the interior is above.
    /// Returns the half-edge whose origin is `v0`.
    pub fn create_pair(&mut self, v0: Vertex<F>, v1: Vertex<F>) -> EdgeId {
        let he = self.create(v0);
        let opp = self.create(v1);
        self.link_pair(he, opp);
        self.calculate_dominating(he);
        let side = if self.e(he).dominating == Dominating::Left {
            AreaSide::Above
        } else {
            AreaSide::Below
        };
        self.set_area_side(he, side);
        he
    }

    /// Creates a pair for a clipped piece of `src`, inheriting its interior
    /// side (the provenance stays `Normal`: the piece is source geometry).
    pub fn create_pair_from(&mut self, v0: Vertex<F>, v1: Vertex<F>, src: EdgeId) -> EdgeId {
        let he = self.create(v0);
        let opp = self.create(v1);
        self.link_pair(he, opp);
        self.calculate_dominating(he);
        let side = self.e(src).area_side;
        self.set_area_side(he, side);
        he
    }

    /// Creates a synthetic pair (clip or cut edge) with an explicit
    /// interior side.
    pub fn create_internal_pair(
        &mut self,
        v0: Vertex<F>,
        v1: Vertex<F>,
        area_side: AreaSide,
        kind: EdgeFlag,
    ) -> EdgeId {
        let he = self.create(v0);
        let opp = self.create(v1);
        self.link_pair(he, opp);
        self.calculate_dominating(he);
        self.set_area_side(he, area_side);
        self.set_kind(he, kind);
        he
    }

    /// Links two half-edges as opposite halves of one edge.
    pub fn link_pair(&mut self, a: EdgeId, b: EdgeId) {
        self.e_mut(a).pair = b;
        self.e_mut(b).pair = a;
    }

    /// Releases all links of a half-edge, marking it inappropriate for
    /// further processing.
    pub fn release_links(&mut self, id: EdgeId) {
        let e = self.e_mut(id);
        e.pair = NONE;
        e.pred = NONE;
        e.succ = NONE;
    }

    /// Assigns the dominating classification of a pair from the
    /// lexicographic order of its endpoints.
    pub fn calculate_dominating(&mut self, he: EdgeId) {
        let pair = self.e(he).pair;
        debug_assert_ne!(pair, NONE);
        if self.e(he).v.less_xy(self.e(pair).v) {
            self.e_mut(he).dominating = Dominating::Left;
            self.e_mut(pair).dominating = Dominating::Right;
        } else {
            self.e_mut(he).dominating = Dominating::Right;
            self.e_mut(pair).dominating = Dominating::Left;
        }
    }

    #[inline]
    pub fn is_left(&self, id: EdgeId) -> bool {
        self.e(id).dominating == Dominating::Left
    }

    /// The lexicographically smaller endpoint of the underlying edge.
    pub fn left_point(&self, id: EdgeId) -> Vertex<F> {
        let e = self.e(id);
        if e.dominating == Dominating::Left {
            e.v
        } else {
            self.e(e.pair).v
        }
    }

    /// The lexicographically larger endpoint of the underlying edge.
    pub fn right_point(&self, id: EdgeId) -> Vertex<F> {
        let e = self.e(id);
        if e.dominating == Dominating::Right {
            e.v
        } else {
            self.e(e.pair).v
        }
    }

    /// Whether both endpoints coincide within tolerance.
    pub fn is_degenerate_pair(&self, id: EdgeId) -> bool {
        let pair = self.e(id).pair;
        self.e(id).v.equals_xy(self.e(pair).v, self.eps)
    }

    pub fn set_area_side(&mut self, id: EdgeId, side: AreaSide) {
        let pair = self.e(id).pair;
        self.e_mut(id).area_side = side;
        self.e_mut(pair).area_side = side;
    }

    pub fn set_kind(&mut self, id: EdgeId, kind: EdgeFlag) {
        let pair = self.e(id).pair;
        self.e_mut(id).kind = kind;
        self.e_mut(pair).kind = kind;
    }

    pub fn set_visited(&mut self, id: EdgeId, visited: bool) {
        let pair = self.e(id).pair;
        self.e_mut(id).visited = visited;
        self.e_mut(pair).visited = visited;
    }

    pub fn set_face(&mut self, id: EdgeId, face: u32, cycle: u32) {
        let pair = self.e(id).pair;
        self.e_mut(id).face = face;
        self.e_mut(pair).face = face;
        self.e_mut(id).cycle = cycle;
        self.e_mut(pair).cycle = cycle;
    }

    /// Copies interior side, provenance and face attributes from `src`.
    pub fn copy_attr(&mut self, dst: EdgeId, src: EdgeId) {
        let side = self.e(src).area_side;
        let kind = self.e(src).kind;
        let face = self.e(src).face;
        let cycle = self.e(src).cycle;
        self.set_area_side(dst, side);
        self.set_kind(dst, kind);
        self.set_face(dst, face, cycle);
    }

    /// Planar direction of a half-edge, origin to far endpoint.
    pub fn direction(&self, id: EdgeId) -> Vec2<F> {
        let e = self.e(id);
        Vec2::between(e.v, self.e(e.pair).v)
    }

    /// Structural equality of two half-edges: same dominating class, same
    /// endpoints within tolerance.
    pub fn edges_equal(&self, a: EdgeId, b: EdgeId) -> bool {
        let ea = self.e(a);
        let eb = self.e(b);
        debug_assert_ne!(ea.pair, NONE);
        debug_assert_ne!(eb.pair, NONE);
        ea.dominating == eb.dominating
            && ea.v.equals_xy(eb.v, self.eps)
            && self.e(ea.pair).v.equals_xy(self.e(eb.pair).v, self.eps)
    }

    /// The half-edge ordering used everywhere a traversal must pick among
    /// edges sharing a vertex.
    ///
    /// Primary key: dominating point, lexicographic by x then y. At a
    /// shared dominating point, right half-edges (far endpoint in quadrant
    /// Q2/Q3 relative to the pivot) come before left half-edges (Q1/Q4);
    /// within the same class the edge whose direction has positive cross
    /// product against the other's comes first. The result is a
    /// counter-clockwise scan order around the shared vertex.
    pub fn dp_less(&self, a: EdgeId, b: EdgeId) -> bool {
        let dp_a = self.e(a).v;
        let dp_b = self.e(b).v;

        if dp_a.less_xy(dp_b) {
            return true;
        }
        if dp_a.equals_xy(dp_b, self.eps) {
            let dom_a = self.e(a).dominating;
            let dom_b = self.e(b).dominating;
            if dom_a == Dominating::Right && dom_b == Dominating::Left {
                return true;
            }
            if dom_a == dom_b {
                return self.direction(a).cross(self.direction(b)) > F::zero();
            }
        }
        false
    }

    /// Vertical ordering of two non-vertical left half-edges crossed by the
    /// same sweep line: `a` strictly below `b`.
    ///
    /// The half-edge with the lexicographically smaller origin supplies the
    /// pivot; the other edge's endpoints are tested against it with cross
    /// products, falling back to the far endpoints when the first test is
    /// degenerate (edges sharing their origin).
    pub fn sweep_less(&self, a: EdgeId, b: EdgeId) -> bool {
        let a_pair = self.e(a).pair;
        let b_pair = self.e(b).pair;
        debug_assert_ne!(a_pair, NONE);
        debug_assert_ne!(b_pair, NONE);

        let av = self.e(a).v;
        let bv = self.e(b).v;

        let (mut v1, mut v2, a_origin_less) = if av.less_xy(bv) {
            (
                Vec2::between(av, self.e(a_pair).v),
                Vec2::between(av, bv),
                true,
            )
        } else {
            (
                Vec2::between(bv, av),
                Vec2::between(bv, self.e(b_pair).v),
                false,
            )
        };

        let cross1 = v1.cross(v2);
        if cross1 > F::zero() {
            return true;
        }
        if tolerance::approx_eq(cross1, F::zero(), self.eps) {
            if a_origin_less {
                v2 = Vec2::between(av, self.e(b_pair).v);
            } else {
                v1 = Vec2::between(bv, self.e(a_pair).v);
            }
            if v1.cross(v2) > F::zero() {
                return true;
            }
        }
        false
    }
}

/// State of the sweep line: the left half-edges currently crossed,
/// bottom-to-top.
///
/// Kept as a sorted vector of handles; the polygon sizes this engine sees
/// make the linear insert cheaper than tree bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct SweepStatus {
    status: Vec<EdgeId>,
}

impl SweepStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.status.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    /// Inserts a left half-edge, removes on its right half-edge.
    ///
    /// Set semantics: an edge equivalent to one already present is not
    /// inserted twice, and removal accepts the stored equivalent.
    pub fn update<F: Float>(&mut self, arena: &EdgeArena<F>, he: EdgeId) {
        if arena.e(he).dominating == Dominating::Left {
            let pos = self.status.partition_point(|&x| arena.sweep_less(x, he));
            let equivalent_present =
                pos < self.status.len() && !arena.sweep_less(he, self.status[pos]);
            if !equivalent_present {
                self.status.insert(pos, he);
            }
        } else {
            let pair = arena.e(he).pair;
            if let Some(i) = self.status.iter().position(|&x| x == pair) {
                self.status.remove(i);
            } else if let Some(i) = self
                .status
                .iter()
                .position(|&x| !arena.sweep_less(x, pair) && !arena.sweep_less(pair, x))
            {
                self.status.remove(i);
            }
        }
    }

    /// The half-edge directly below `he` on the sweep line.
    pub fn prev_of<F: Float>(&self, arena: &EdgeArena<F>, he: EdgeId) -> Option<EdgeId> {
        let lower = self.status.partition_point(|&x| arena.sweep_less(x, he));
        if lower == 0 {
            None
        } else {
            Some(self.status[lower - 1])
        }
    }

    /// Number of status edges from the bottom up to and including `he`.
    ///
    /// Odd means the region just above `he` is polygon interior.
    pub fn count_edges(&self, he: EdgeId) -> usize {
        let mut count = 0;
        for &e in &self.status {
            count += 1;
            if e == he {
                break;
            }
        }
        count
    }
}
