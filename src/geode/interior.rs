//! Interior-point search for concave polygon rings.
//!
//! A label or icon anchored at a concave polygon's centroid can land outside
//! the polygon. These helpers slice the ring with the horizontal and
//! vertical lines through a candidate point, find the largest run of
//! interior overlap on each, and pick the run midpoint farthest from the
//! boundary. Designed to give a usable answer quickly, not the visually
//! optimal one.

use num_traits::Float;

use crate::primitives::{BoundingBox, Vec2, Vertex};

/// How the ring boundary meets a slicing line at one sorted coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrossingKind {
    /// The boundary passes through the line.
    Crossing,
    /// A vertex touches the line but both incident edges stay on one side.
    TouchingButNotCrossing,
    /// A boundary edge lies on the line; the other incident edge comes from
    /// below. Collinear runs always produce a pair of these.
    CollinearFromBelow,
    /// As above, with the other edge coming from above.
    CollinearFromAbove,
}

#[derive(Debug, Clone, Copy)]
struct Crossing<F> {
    coordinate: F,
    kind: CrossingKind,
}

/// Tests whether the closed ring is convex.
///
/// Winding-agnostic: looks for a sign change among the corner cross
/// products, skipping duplicated vertices.
pub fn is_convex<F: Float>(ring: &[Vertex<F>]) -> bool {
    let n = ring.len();
    if n <= 4 {
        // A triangle plus its closing duplicate, or less.
        return true;
    }

    // The last vertex repeats the first; walk back to the last distinct one.
    let mut last = n - 2;
    let mut a = ring[last];
    let b = ring[0];
    let mut d_ba = Vec2::between(a, b);
    while d_ba.is_zero() {
        if last <= 1 {
            return true; // Collapsed to a point or line.
        }
        last -= 1;
        a = ring[last];
        d_ba = Vec2::between(a, b);
    }
    let last_edge_direction = d_ba;

    let mut b = ring[0];
    let mut negative = false;
    let mut positive = false;
    for i in 1..=last + 1 {
        let c = ring[i];
        let mut d_cb = Vec2::between(b, c);
        if i > last {
            // Closing corner: reuse the known-nondegenerate last edge.
            d_cb = last_edge_direction;
        }
        if d_cb.is_zero() {
            continue;
        }
        let cross = d_cb.cross(d_ba);
        negative |= cross < F::zero();
        positive |= cross > F::zero();
        if negative && positive {
            return false;
        }
        b = c;
        d_ba = d_cb;
    }
    true
}

/// Finds a point inside the ring along the horizontal or vertical line
/// through `origin`.
///
/// Falls back to `origin` itself when neither line overlaps the interior
/// (wrong origin or degenerate ring).
pub fn find_point_in_polygon<F: Float>(ring: &[Vertex<F>], origin: Vertex<F>) -> Vertex<F> {
    if ring.is_empty() {
        return origin;
    }

    let (h_center, h_length) = horizontal_overlap(ring, origin.y);
    let (v_center, v_length) = vertical_overlap(ring, origin.x);

    let center_h = Vertex::xy(h_center, origin.y);
    let center_v = Vertex::xy(origin.x, v_center);
    if h_length == F::zero() && v_length == F::zero() {
        return origin;
    }
    if h_length == F::zero() {
        return center_v;
    }
    if v_length == F::zero() {
        return center_h;
    }

    // Two candidates: keep the one farther from the boundary, breaking ties
    // toward the longer overlap run.
    let dist_h = distance_to_boundary(ring, center_h);
    let dist_v = distance_to_boundary(ring, center_v);
    if dist_h == dist_v {
        if h_length >= v_length {
            center_h
        } else {
            center_v
        }
    } else if dist_h > dist_v {
        center_h
    } else {
        center_v
    }
}

/// Distance from `point` to the nearest ring vertex or edge.
pub fn distance_to_boundary<F: Float>(ring: &[Vertex<F>], point: Vertex<F>) -> F {
    let mut min_sq = F::infinity();

    // Closest vertex first; this bounds the edge search.
    for v in &ring[..ring.len() - 1] {
        let d = point.distance_squared_xy(*v);
        if d < min_sq {
            min_sq = d;
        }
    }

    let mut search_box = BoundingBox::empty();
    search_box.grow_vertex(point);
    search_box.expand_by(min_sq.sqrt());

    let mut a = ring[0];
    for &b in &ring[1..] {
        if b == a {
            continue;
        }
        let edge_box = BoundingBox::new(a.x, b.x, a.y, b.y);
        if search_box.intersects(&edge_box) {
            // Perpendicular projection of the point onto the edge, when the
            // foot falls between the endpoints.
            let d_pa = Vec2::between(a, point);
            let d_ba = Vec2::between(a, b);
            let projection = d_pa.dot(d_ba);
            let len_sq = d_ba.magnitude_squared();
            if projection > F::zero() && projection < len_sq {
                let cross = d_pa.cross(d_ba);
                let d = cross * cross / len_sq;
                if d < min_sq {
                    min_sq = d;
                }
            }
        }
        a = b;
    }
    min_sq.sqrt()
}

/// Center and length of the largest interior overlap of the ring with the
/// horizontal line `y = y_intercept`.
pub fn horizontal_overlap<F: Float>(ring: &[Vertex<F>], y_intercept: F) -> (F, F) {
    if ring.len() <= 3 {
        return (F::zero(), F::zero());
    }
    let crossings = horizontal_crossings(ring, y_intercept);
    largest_overlap(&crossings)
}

/// As [`horizontal_overlap`], for the vertical line `x = x_intercept`.
pub fn vertical_overlap<F: Float>(ring: &[Vertex<F>], x_intercept: F) -> (F, F) {
    if ring.len() <= 3 {
        return (F::zero(), F::zero());
    }
    let transposed: Vec<Vertex<F>> = ring.iter().map(|v| Vertex::xy(v.y, v.x)).collect();
    let crossings = horizontal_crossings(&transposed, x_intercept);
    largest_overlap(&crossings)
}

/// Classifies every intersection of the ring with a horizontal line and
/// returns them sorted by x.
fn horizontal_crossings<F: Float>(ring: &[Vertex<F>], y_intercept: F) -> Vec<Crossing<F>> {
    let mut crossings = Vec::new();
    let n = ring.len();

    let mut a = ring[0];
    for i in 1..n {
        let b = ring[i];
        if b == a {
            continue;
        }

        let (y_a, y_b) = (a.y, b.y);
        if (y_a > y_intercept && y_b > y_intercept) || (y_a < y_intercept && y_b < y_intercept) {
            a = b;
            continue;
        }

        if (y_a < y_intercept && y_b > y_intercept) || (y_a > y_intercept && y_b < y_intercept) {
            // Plain edge crossing.
            let x = a.x + (b.x - a.x) * (y_intercept - y_a) / (y_b - y_a);
            crossings.push(Crossing {
                coordinate: x,
                kind: CrossingKind::Crossing,
            });
        } else if y_b == y_intercept {
            // Vertex on the line: classify by the next distinct vertex.
            let mut next = if i < n - 1 { i + 1 } else { 1 };
            let mut c = ring[next];
            while c == b {
                next += 1;
                if next >= n - 1 {
                    next = 1;
                }
                c = ring[next];
            }
            let y_c = c.y;

            let kind = if (y_a < y_intercept && y_c > y_intercept)
                || (y_a > y_intercept && y_c < y_intercept)
            {
                Some(CrossingKind::Crossing)
            } else if (y_a < y_intercept && y_c < y_intercept)
                || (y_a > y_intercept && y_c > y_intercept)
            {
                Some(CrossingKind::TouchingButNotCrossing)
            } else if y_a == y_intercept && y_c == y_intercept {
                None // Interior vertex of a collinear run.
            } else {
                let y_other = if y_a == y_intercept { y_c } else { y_a };
                Some(if y_other < y_intercept {
                    CrossingKind::CollinearFromBelow
                } else {
                    CrossingKind::CollinearFromAbove
                })
            };
            if let Some(kind) = kind {
                crossings.push(Crossing {
                    coordinate: b.x,
                    kind,
                });
            }
        }
        // y_a == y_intercept alone: categorized when it was the b vertex.

        a = b;
    }

    crossings.sort_by(|l, r| l.coordinate.partial_cmp(&r.coordinate).unwrap());
    crossings
}

/// Walks sorted crossings tracking interior runs; returns the midpoint and
/// length of the longest one.
fn largest_overlap<F: Float>(crossings: &[Crossing<F>]) -> (F, F) {
    if crossings.is_empty() {
        return (F::zero(), F::zero());
    }
    if crossings.len() == 1 {
        return (crossings[0].coordinate, F::zero());
    }

    let half = F::from(0.5).unwrap();
    let mut best_center = F::zero();
    let mut best_length = F::zero();
    let mut run_start = F::zero();
    let mut inside = false;

    let mut i = 0;
    while i < crossings.len() {
        let x = crossings[i].coordinate;
        let kind = crossings[i].kind;
        if inside {
            let length = x - run_start;
            if length > best_length {
                best_length = length;
                best_center = (run_start + x) * half;
            }
            match kind {
                CrossingKind::TouchingButNotCrossing => {
                    // Still interior, but restart the run so the midpoint
                    // cannot land on a boundary vertex.
                    run_start = x;
                }
                CrossingKind::Crossing => {
                    inside = false;
                }
                _ => {
                    // Collinear edges come in pairs; the pair partner tells
                    // whether the run continues on the far side.
                    inside = false;
                    i += 1;
                    if i < crossings.len() && crossings[i].kind == kind {
                        run_start = crossings[i].coordinate;
                        inside = true;
                    }
                }
            }
        } else {
            match kind {
                CrossingKind::Crossing => {
                    inside = true;
                    run_start = x;
                }
                CrossingKind::TouchingButNotCrossing => {}
                _ => {
                    i += 1;
                    if i < crossings.len() && crossings[i].kind != kind {
                        run_start = crossings[i].coordinate;
                        inside = true;
                    }
                }
            }
        }
        i += 1;
    }

    (best_center, best_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(coords: &[(f64, f64)]) -> Vec<Vertex<f64>> {
        coords.iter().map(|&(x, y)| Vertex::xy(x, y)).collect()
    }

    #[test]
    fn test_is_convex_square() {
        let r = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        assert!(is_convex(&r));
    }

    #[test]
    fn test_is_convex_either_winding() {
        let r = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(is_convex(&r));
    }

    #[test]
    fn test_is_convex_l_shape() {
        let r = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        assert!(!is_convex(&r));
    }

    #[test]
    fn test_is_convex_with_duplicates() {
        let r = ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]);
        assert!(is_convex(&r));
    }

    #[test]
    fn test_horizontal_overlap_square() {
        let r = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        let (center, length) = horizontal_overlap(&r, 1.0);
        assert_relative_eq!(center, 2.0, epsilon = 1e-12);
        assert_relative_eq!(length, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_horizontal_overlap_u_shape_two_runs() {
        let r = ring(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
            (0.0, 0.0),
        ]);
        // Above the notch floor the slice splits into two legs of width 1.
        let (center, length) = horizontal_overlap(&r, 2.0);
        assert_relative_eq!(length, 1.0, epsilon = 1e-12);
        assert!(center < 1.0 || center > 2.0);
    }

    #[test]
    fn test_vertical_overlap() {
        let r = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        let (center, length) = vertical_overlap(&r, 1.0);
        assert_relative_eq!(center, 1.0, epsilon = 1e-12);
        assert_relative_eq!(length, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_find_point_in_polygon_inside() {
        let r = ring(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
            (0.0, 0.0),
        ]);
        // Centroid of the U lands in the notch; result must leave it.
        let p = find_point_in_polygon(&r, Vertex::xy(1.5, 1.8));
        assert!(!(p.x > 1.0 && p.x < 2.0 && p.y > 1.0));
    }

    #[test]
    fn test_distance_to_boundary() {
        let r = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let d = distance_to_boundary(&r, Vertex::xy(2.0, 1.0));
        assert_relative_eq!(d, 1.0, epsilon = 1e-12);
    }
}
