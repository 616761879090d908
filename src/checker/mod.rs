//! Polygon repair: coincident vertices, spikes, local self-intersections.
//!
//! The checker normalizes each ring of a polygon into a simple loop without
//! changing which ring is outer or hole and without touching winding (the
//! cleaner owns orientation). Repairs run on a fresh geode which replaces
//! the input only when it survives: a ring falling below the minimum vertex
//! count is dropped, and losing the outer ring clears the whole geode.
//! There is no error signal; callers check `is_empty()` after each run.

use log::{debug, warn};
use num_traits::Float;

use crate::geode::{Geode, GeodeHandle, PrimType, MIN_CYCLE_VERTICES};
use crate::primitives::{Vec2, Vertex};
use crate::tolerance;

/// Repairs a single polygon's rings into simple loops.
#[derive(Debug, Clone)]
pub struct GeometryChecker<F> {
    /// Coordinate tolerance for coincidence tests.
    tolerance: F,
    /// Squared-sine threshold for the collinearity half of the spike test.
    collinear_eps: F,
}

impl<F: Float> Default for GeometryChecker<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> GeometryChecker<F> {
    pub fn new() -> Self {
        Self {
            tolerance: tolerance::coord_epsilon(),
            collinear_eps: tolerance::collinear_epsilon(),
        }
    }

    pub fn with_tolerance(tolerance: F) -> Self {
        Self {
            tolerance,
            collinear_eps: tolerance::collinear_epsilon(),
        }
    }

    /// Repairs the feature in place, dispatching on its primitive type.
    ///
    /// Point and line features pass through unchanged. 2D and 2.5D
    /// polygons are repaired directly; 3D polygons are projected onto
    /// their best-fit plane, repaired as 2D, and lifted back. Multi
    /// polygons are repaired member-wise, dropping emptied members.
    pub fn run(&self, handle: &mut GeodeHandle<F>) {
        match handle.prim_type() {
            PrimType::Point | PrimType::Point25D | PrimType::PolyLine | PrimType::PolyLine25D => {}

            PrimType::Polygon | PrimType::Polygon25D => {
                if let GeodeHandle::Single(geode) = handle {
                    self.process_polygon(geode);
                }
            }

            PrimType::Polygon3D => {
                if let GeodeHandle::Single(geode) = handle {
                    self.process_polygon_3d(geode);
                }
            }

            PrimType::MultiPolygon | PrimType::MultiPolygon25D => {
                if let GeodeHandle::Multi(collection) = handle {
                    let mut part = 0;
                    while part < collection.num_parts() {
                        self.process_polygon(collection.geode_mut(part));
                        if collection.geode(part).is_empty() {
                            debug!("empty multi-polygon member dropped");
                            collection.erase_part(part);
                        } else {
                            part += 1;
                        }
                    }
                }
            }

            PrimType::MultiPolygon3D => {
                if let GeodeHandle::Multi(collection) = handle {
                    let mut part = 0;
                    while part < collection.num_parts() {
                        self.process_polygon_3d(collection.geode_mut(part));
                        if collection.geode(part).is_empty() {
                            debug!("empty multi-polygon member dropped");
                            collection.erase_part(part);
                        } else {
                            part += 1;
                        }
                    }
                }
            }
        }
    }

    /// The repair pipeline for one 2D/2.5D polygon.
    pub fn process_polygon(&self, geode: &mut Geode<F>) {
        if geode.is_degenerate() {
            geode.clear();
            debug!("degenerate polygon cleared");
            return;
        }

        self.remove_coincident_vertices(geode);
        self.remove_spikes(geode);
        self.check_for_self_intersection(geode);
    }

    /// Repairs a 3D polygon by projecting it onto its plane.
    ///
    /// The dropped coordinate is chosen from the plane normal: a vertical
    /// plane swaps x or y with z, anything else drops z. After 2D repair
    /// the dropped coordinate is recovered by solving the plane equation.
    pub fn process_polygon_3d(&self, geode: &mut Geode<F>) {
        if geode.is_degenerate() {
            geode.clear();
            return;
        }

        let Some((normal, distance)) = geode.compute_plane_equation() else {
            debug!("degenerate 3D polygon cleared");
            geode.clear();
            return;
        };

        let eps = self.tolerance;
        let nz_zero = tolerance::approx_eq(normal.z, F::zero(), eps);
        let nx_zero = tolerance::approx_eq(normal.x, F::zero(), eps);
        // Vertical plane: swap x with z, unless the normal has no x
        // component either, then swap y with z.
        let swap_x = !(nz_zero && nx_zero);

        let mut flat = Geode::new(PrimType::Polygon);
        for part in 0..geode.num_parts() {
            flat.add_part(geode.vertex_count(part));
            for v in geode.part(part) {
                let projected = if nz_zero && swap_x {
                    Vertex::xy(v.z, v.y)
                } else if nz_zero {
                    Vertex::xy(v.x, v.z)
                } else {
                    Vertex::xy(v.x, v.y)
                };
                flat.add_vertex(projected);
            }
        }

        self.process_polygon(&mut flat);

        flat.change_prim_type(PrimType::Polygon3D);
        for part in 0..flat.num_parts() {
            for i in 0..flat.vertex_count(part) {
                let v = flat.vertex(part, i);
                let lifted = if nz_zero && swap_x {
                    let x = (distance - normal.y * v.y) / normal.x;
                    Vertex::new(x, v.y, v.x)
                } else if nz_zero {
                    let y = (distance - normal.x * v.x) / normal.y;
                    Vertex::new(v.x, y, v.y)
                } else {
                    let z = (distance - normal.x * v.x - normal.y * v.y) / normal.z;
                    Vertex::new(v.x, v.y, z)
                };
                flat.modify_vertex(part, i, lifted);
            }
        }

        *geode = flat;
    }

    /// Drops every vertex within tolerance of its predecessor.
    pub fn remove_coincident_vertices(&self, geode: &mut Geode<F>) {
        if geode.is_degenerate() {
            geode.clear();
            return;
        }

        let mut repaired = Geode::new(geode.prim_type());
        for part in 0..geode.num_parts() {
            let num_verts = geode.vertex_count(part);
            if num_verts < MIN_CYCLE_VERTICES {
                warn!("degenerate inner ring skipped");
                continue;
            }

            repaired.add_part(num_verts);
            let mut prev = geode.first_vertex(part);
            repaired.add_vertex(prev);
            for i in 1..num_verts {
                let cur = geode.vertex(part, i);
                if !prev.equals_xy(cur, self.tolerance) {
                    repaired.add_vertex(cur);
                    prev = cur;
                }
            }

            let kept = repaired.vertex_count(repaired.num_parts() - 1);
            if kept < MIN_CYCLE_VERTICES {
                if part == 0 {
                    debug!("outer ring degenerate after deduplication");
                    geode.clear();
                    return;
                }
                warn!("inner ring degenerate after deduplication, skipped");
                repaired.erase_last_part();
            }
        }

        *geode = repaired;
    }

    /// Removes spike vertices: collinear triples whose incident edges fold
    /// back on themselves. Removal cascades into the already-accepted
    /// output, so chains of spikes collapse completely.
    pub fn remove_spikes(&self, geode: &mut Geode<F>) {
        if geode.is_degenerate() {
            geode.clear();
            return;
        }

        let mut repaired = Geode::new(geode.prim_type());
        for part in 0..geode.num_parts() {
            if geode.vertex_count(part) < MIN_CYCLE_VERTICES {
                warn!("degenerate inner ring skipped");
                continue;
            }

            let ring = self.remove_spikes_in_ring(geode.part(part));

            if ring.len() < MIN_CYCLE_VERTICES {
                if part == 0 {
                    debug!("outer ring degenerate after spike removal");
                    geode.clear();
                    return;
                }
                warn!("inner ring degenerate after spike removal, skipped");
                continue;
            }
            repaired.add_part(ring.len());
            for v in ring {
                repaired.add_vertex(v);
            }
        }

        *geode = repaired;
    }

    fn remove_spikes_in_ring(&self, ring: &[Vertex<F>]) -> Vec<Vertex<F>> {
        let num_verts = ring.len();
        let mut out: Vec<Vertex<F>> = Vec::with_capacity(num_verts);

        // The closing duplicate makes ring[n-2] the true predecessor of
        // ring[0].
        let mut pt1 = ring[num_verts - 2];
        let mut pt2 = ring[0];
        let mut v = 0;
        while v < num_verts - 1 {
            let pt3 = if v < num_verts - 2 {
                ring[v + 1]
            } else if let Some(first) = out.first() {
                *first
            } else {
                break;
            };

            if !self.is_spike(pt1, pt2, pt3) {
                out.push(pt2);
                pt1 = pt2;
                v += 1;
                pt2 = ring[v];
            } else {
                // Removing pt2 may leave pt1 == pt3; then pt3 goes too.
                if pt1.equals_xy(pt3, self.tolerance) {
                    v += 1;
                }

                // Re-test the last accepted vertex against the new
                // neighbor; spikes can cascade backwards.
                if out.is_empty() {
                    pt1 = ring[num_verts - 2];
                    v += 1;
                    if v >= num_verts - 1 {
                        break;
                    }
                    pt2 = ring[v];
                } else {
                    pt2 = pt1;
                    out.pop();
                    pt1 = out.last().copied().unwrap_or(ring[num_verts - 2]);
                }
            }
        }

        if let Some(first) = out.first().copied() {
            out.push(first);
        }
        out
    }

    /// A spike: the triple is collinear and the edges into and out of `b`
    /// point the same way (the boundary folds back on itself).
    fn is_spike(&self, a: Vertex<F>, b: Vertex<F>, c: Vertex<F>) -> bool {
        if !tolerance::collinear(b, a, c, self.collinear_eps) {
            return false;
        }
        let u = Vec2::between(b, a);
        let w = Vec2::between(b, c);
        u.dot(w) > F::zero()
    }

    /// Fixes local self-intersections: crossings between edge pairs that
    /// share one connecting edge, the classic artifact of quad-partitioned
    /// source data. The crossing vertex is replaced by the intersection
    /// point. Crossings between distant edges are left alone.
    pub fn check_for_self_intersection(&self, geode: &mut Geode<F>) {
        if geode.is_degenerate() {
            geode.clear();
            return;
        }

        let mut repaired = Geode::new(geode.prim_type());
        for part in 0..geode.num_parts() {
            let num_verts = geode.vertex_count(part);
            if num_verts < MIN_CYCLE_VERTICES {
                warn!("degenerate inner ring skipped");
                continue;
            }

            repaired.add_part(num_verts);
            let new_part = repaired.num_parts() - 1;

            let mut pt1 = geode.vertex(part, num_verts - 2);
            let mut pt2 = geode.vertex(part, 0);

            let mut v = 0;
            while v < num_verts - 1 {
                // The scan window wraps into the rewritten ring at the end.
                let wrapped = |idx: usize| -> Option<Vertex<F>> {
                    if idx < num_verts - 1 {
                        Some(geode.vertex(part, idx))
                    } else {
                        let w = idx - (num_verts - 1);
                        (w < repaired.vertex_count(new_part)).then(|| repaired.vertex(new_part, w))
                    }
                };
                let (Some(pt3), Some(pt4)) = (wrapped(v + 1), wrapped(v + 2)) else {
                    break;
                };

                if tolerance::segments_intersect(pt1, pt2, pt3, pt4, self.tolerance) {
                    let intersection = tolerance::lines_intersection(pt1, pt2, pt3, pt4);
                    if pt1.equals_xy(intersection, self.tolerance)
                        || pt4.equals_xy(intersection, self.tolerance)
                    {
                        // The crossing collapses onto a window endpoint;
                        // skip the two middle vertices instead.
                        pt2 = pt4;
                        v += 2;
                    } else {
                        pt2 = intersection;
                        v += 1;
                    }
                } else {
                    repaired.add_vertex(pt2);
                    pt1 = pt2;
                    pt2 = pt3;
                    v += 1;
                }
            }

            if repaired.vertex_count(new_part) > 0 {
                let first = repaired.vertex(new_part, 0);
                repaired.add_vertex(first);
            }

            if repaired.vertex_count(new_part) < MIN_CYCLE_VERTICES {
                if part == 0 {
                    debug!("outer ring degenerate after intersection fix");
                    geode.clear();
                    return;
                }
                warn!("inner ring degenerate after intersection fix, skipped");
                repaired.erase_last_part();
            }
        }

        *geode = repaired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geode::GeodeCollection;

    fn polygon(parts: &[&[(f64, f64)]]) -> Geode<f64> {
        let mut geode = Geode::new(PrimType::Polygon);
        for coords in parts {
            geode.add_part(coords.len());
            for &(x, y) in *coords {
                geode.add_vertex(Vertex::xy(x, y));
            }
        }
        geode
    }

    fn expect_parts(geode: &Geode<f64>, expected: &[&[(f64, f64)]]) {
        assert_eq!(geode.num_parts(), expected.len());
        for (part, coords) in expected.iter().enumerate() {
            let got: Vec<(f64, f64)> = geode.part(part).iter().map(|v| (v.x, v.y)).collect();
            assert_eq!(&got, coords, "part {part}");
        }
    }

    fn outer_expected() -> Vec<(f64, f64)> {
        vec![
            (0.100, 0.100),
            (0.220, 0.100),
            (0.220, 0.200),
            (0.100, 0.200),
            (0.100, 0.100),
        ]
    }

    fn hole_expected() -> Vec<(f64, f64)> {
        vec![
            (0.120, 0.120),
            (0.120, 0.180),
            (0.200, 0.180),
            (0.200, 0.120),
            (0.120, 0.120),
        ]
    }

    #[test]
    fn test_remove_coincident_at_beginning() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.100, 0.100),
                (0.220, 0.100),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.120),
                (0.120, 0.180),
                (0.200, 0.180),
                (0.200, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_coincident_vertices(&mut geode);
        expect_parts(&geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_remove_coincident_at_end() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.220, 0.100),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.100),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.180),
                (0.200, 0.180),
                (0.200, 0.120),
                (0.120, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_coincident_vertices(&mut geode);
        expect_parts(&geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_remove_coincident_everywhere() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.100, 0.100),
                (0.220, 0.100),
                (0.220, 0.200),
                (0.220, 0.200),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.200),
                (0.100, 0.100),
                (0.100, 0.100),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.120),
                (0.120, 0.120),
                (0.120, 0.180),
                (0.120, 0.180),
                (0.120, 0.180),
                (0.200, 0.180),
                (0.200, 0.120),
                (0.200, 0.120),
                (0.120, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_coincident_vertices(&mut geode);
        expect_parts(&geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_remove_coincident_collapses_outer_ring() {
        let checker: GeometryChecker<f64> = GeometryChecker::new();
        let mut geode = polygon(&[&[
            (0.1, 0.1),
            (0.1, 0.1),
            (0.2, 0.2),
            (0.2, 0.2),
            (0.1, 0.1),
        ]]);
        checker.remove_coincident_vertices(&mut geode);
        assert!(geode.is_empty());
    }

    #[test]
    fn test_remove_coincident_drops_only_inner_ring() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.220, 0.100),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.100),
            ],
            &[(0.12, 0.12), (0.12, 0.12), (0.15, 0.15), (0.12, 0.12)],
        ]);
        checker.remove_coincident_vertices(&mut geode);
        expect_parts(&geode, &[&outer_expected()]);
    }

    #[test]
    fn test_remove_spikes_generic() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.320, 0.100), // spike beyond the corner
                (0.220, 0.100),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.050), // spike below the start
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.220), // spike above
                (0.120, 0.180),
                (0.200, 0.180),
                (0.200, 0.120),
                (0.050, 0.120), // spike to the left
                (0.120, 0.120),
            ],
        ]);
        checker.remove_spikes(&mut geode);
        expect_parts(&geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_remove_spikes_double_spikes() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.320, 0.100),
                (0.220, 0.100),
                (0.220, 0.400),
                (0.220, 0.200),
                (0.040, 0.200),
                (0.100, 0.200),
                (0.100, 0.050),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.220),
                (0.120, 0.180),
                (0.350, 0.180),
                (0.200, 0.180),
                (0.200, 0.110),
                (0.200, 0.120),
                (0.050, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_spikes(&mut geode);
        expect_parts(&geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_remove_spikes_diagonal() {
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.280, 0.280), // diagonal overshoot
                (0.220, 0.220),
                (0.040, 0.220), // horizontal overshoot
                (0.100, 0.220),
                (0.100, 0.050),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.180, 0.180),
                (0.160, 0.160),
                (0.160, 0.120),
                (0.180, 0.120),
                (0.050, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_spikes(&mut geode);
        expect_parts(
            &geode,
            &[
                &[
                    (0.100, 0.100),
                    (0.220, 0.220),
                    (0.100, 0.220),
                    (0.100, 0.100),
                ],
                &[
                    (0.120, 0.120),
                    (0.160, 0.160),
                    (0.160, 0.120),
                    (0.120, 0.120),
                ],
            ],
        );
    }

    #[test]
    fn test_remove_spikes_keeps_plain_collinear_vertices() {
        // Collinear vertices that continue forward are not spikes.
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[
            &[
                (0.100, 0.100),
                (0.170, 0.100),
                (0.320, 0.100),
                (0.220, 0.100),
                (0.220, 0.150),
                (0.220, 0.200),
                (0.180, 0.200),
                (0.100, 0.200),
                (0.100, 0.130),
                (0.100, 0.050),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.140),
                (0.120, 0.220),
                (0.120, 0.180),
                (0.170, 0.180),
                (0.200, 0.180),
                (0.200, 0.145),
                (0.200, 0.120),
                (0.135, 0.120),
                (0.050, 0.120),
                (0.120, 0.120),
            ],
        ]);
        checker.remove_spikes(&mut geode);
        expect_parts(
            &geode,
            &[
                &[
                    (0.100, 0.100),
                    (0.170, 0.100),
                    (0.220, 0.100),
                    (0.220, 0.150),
                    (0.220, 0.200),
                    (0.180, 0.200),
                    (0.100, 0.200),
                    (0.100, 0.130),
                    (0.100, 0.100),
                ],
                &[
                    (0.120, 0.120),
                    (0.120, 0.140),
                    (0.120, 0.180),
                    (0.170, 0.180),
                    (0.200, 0.180),
                    (0.200, 0.145),
                    (0.200, 0.120),
                    (0.135, 0.120),
                    (0.120, 0.120),
                ],
            ],
        );
    }

    #[test]
    fn test_self_intersection_fix() {
        // Adjacent quad rows: the shared boundary zigzags across itself in
        // a two-edge window.
        let checker = GeometryChecker::new();
        let mut geode = polygon(&[&[
            (0.100, 0.100),
            (0.200, 0.100),
            (0.200, 0.150),
            (0.150, 0.140),
            (0.150, 0.160),
            (0.100, 0.150),
            (0.100, 0.100),
        ]]);
        let before = geode.clone();
        checker.check_for_self_intersection(&mut geode);
        // The ring had no two-edge-window crossings; it must be unchanged.
        assert!(geode.equals(&before, false));

        // Edge (0.10,0.10)-(0.12,0.20) crosses edge (0.14,0.20)-(0.08,0.12),
        // one connecting edge apart: the classic quad-partition artifact.
        let mut crossing = polygon(&[&[
            (0.10, 0.10),
            (0.12, 0.20),
            (0.14, 0.20),
            (0.08, 0.12),
            (0.10, 0.10),
        ]]);
        checker.check_for_self_intersection(&mut crossing);
        // Both vertices of the pinched-off sliver are gone; the crossing
        // point was spliced in.
        assert_eq!(crossing.vertex_count(0), 4);
        let ring = crossing.part(0);
        assert_eq!(ring[0], Vertex::xy(0.10, 0.10));
        assert!(ring[1].equals_xy(
            Vertex::xy(0.10 + 0.14 / 11.0, 0.10 + 0.7 / 11.0),
            1e-9
        ));
        assert_eq!(ring[2], Vertex::xy(0.08, 0.12));
        assert_eq!(*ring.last().unwrap(), ring[0]);
    }

    #[test]
    fn test_run_full_pipeline_scenario() {
        // The canonical fixture: outer and hole each carry one duplicated
        // first vertex; both deduplicate to 4 distinct + closing vertex.
        let checker = GeometryChecker::new();
        let mut handle: GeodeHandle<f64> = polygon(&[
            &[
                (0.100, 0.100),
                (0.100, 0.100),
                (0.220, 0.100),
                (0.220, 0.200),
                (0.100, 0.200),
                (0.100, 0.100),
            ],
            &[
                (0.120, 0.120),
                (0.120, 0.120),
                (0.120, 0.180),
                (0.200, 0.180),
                (0.200, 0.120),
                (0.120, 0.120),
            ],
        ])
        .into();
        checker.run(&mut handle);
        let geode = handle.as_single().unwrap();
        expect_parts(geode, &[&outer_expected(), &hole_expected()]);
    }

    #[test]
    fn test_run_is_idempotent() {
        let checker = GeometryChecker::new();
        let mut handle: GeodeHandle<f64> =
            polygon(&[&outer_expected(), &hole_expected()]).into();
        checker.run(&mut handle);
        let first = handle.as_single().unwrap().clone();
        checker.run(&mut handle);
        assert!(handle.as_single().unwrap().equals(&first, false));
    }

    #[test]
    fn test_run_passes_points_and_lines_through() {
        let checker = GeometryChecker::new();
        let mut line: Geode<f64> = Geode::new(PrimType::PolyLine);
        line.add_part(3);
        line.add_vertex(Vertex::xy(0.0, 0.0));
        line.add_vertex(Vertex::xy(0.0, 0.0)); // left alone: lines are not repaired
        line.add_vertex(Vertex::xy(1.0, 0.0));
        let mut handle: GeodeHandle<f64> = line.into();
        checker.run(&mut handle);
        assert_eq!(handle.total_vertex_count(), 3);
    }

    #[test]
    fn test_run_multi_polygon_drops_empty_members() {
        let checker = GeometryChecker::new();
        let mut collection = GeodeCollection::new(PrimType::MultiPolygon);
        collection.add_geode(polygon(&[&outer_expected()]));
        // Degenerate member: collapses to nothing.
        collection.add_geode(polygon(&[&[
            (0.5, 0.5),
            (0.5, 0.5),
            (0.6, 0.6),
            (0.5, 0.5),
        ]]));
        let mut handle: GeodeHandle<f64> = collection.into();
        checker.run(&mut handle);
        assert_eq!(handle.as_multi().unwrap().num_parts(), 1);
    }

    #[test]
    fn test_process_polygon_3d_round_trip() {
        let checker = GeometryChecker::new();
        // A tilted plane z = 1 + x; duplicate vertex to repair.
        let mut geode: Geode<f64> = Geode::new(PrimType::Polygon3D);
        geode.add_part(6);
        geode.add_vertex(Vertex::new(0.0, 0.0, 1.0));
        geode.add_vertex(Vertex::new(0.0, 0.0, 1.0));
        geode.add_vertex(Vertex::new(1.0, 0.0, 2.0));
        geode.add_vertex(Vertex::new(1.0, 1.0, 2.0));
        geode.add_vertex(Vertex::new(0.0, 1.0, 1.0));
        geode.add_vertex(Vertex::new(0.0, 0.0, 1.0));
        checker.process_polygon_3d(&mut geode);

        assert_eq!(geode.prim_type(), PrimType::Polygon3D);
        assert_eq!(geode.vertex_count(0), 5);
        for v in geode.part(0) {
            // Every vertex lies back on the plane.
            assert!((v.z - (1.0 + v.x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_process_polygon_3d_vertical_plane() {
        let checker = GeometryChecker::new();
        // A wall in the x = const plane: normal along x, z swapped in.
        let mut geode: Geode<f64> = Geode::new(PrimType::Polygon3D);
        geode.add_part(5);
        geode.add_vertex(Vertex::new(2.0, 0.0, 0.0));
        geode.add_vertex(Vertex::new(2.0, 1.0, 0.0));
        geode.add_vertex(Vertex::new(2.0, 1.0, 1.0));
        geode.add_vertex(Vertex::new(2.0, 0.0, 1.0));
        geode.add_vertex(Vertex::new(2.0, 0.0, 0.0));
        checker.process_polygon_3d(&mut geode);
        assert_eq!(geode.vertex_count(0), 5);
        for v in geode.part(0) {
            assert!((v.x - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_input_cleared() {
        let checker = GeometryChecker::new();
        let mut handle: GeodeHandle<f64> =
            polygon(&[&[(0.1, 0.1), (0.2, 0.2), (0.1, 0.1)]]).into();
        checker.run(&mut handle);
        assert!(handle.is_empty());
    }
}
