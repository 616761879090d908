//! Geometric predicates with explicit tolerance.

use num_traits::Float;

use crate::primitives::{Vec2, Vertex};
use crate::tolerance;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `c` is to the left of the line from `a` to `b`.
    CounterClockwise,
    /// `c` is to the right of the line from `a` to `b`.
    Clockwise,
    /// `c` is on the line within tolerance.
    Collinear,
}

/// Computes the orientation of `c` relative to the directed line `a` -> `b`.
///
/// The sign of the cross product of `(b - a)` and `(c - a)` decides; a
/// magnitude below `eps` is reported as collinear.
#[inline]
pub fn orientation<F: Float>(a: Vertex<F>, b: Vertex<F>, c: Vertex<F>, eps: F) -> Orientation {
    let u = Vec2::between(a, b);
    let v = Vec2::between(a, c);
    let cross = u.cross(v);
    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Tests whether `b` lies on the line through `a` and `c`, within `eps`.
///
/// The test is scale-free: the squared cross product is compared against
/// `eps` times the squared lengths of both spanning vectors, so `eps`
/// bounds the squared sine of the deviation angle rather than an absolute
/// area.
pub fn collinear<F: Float>(a: Vertex<F>, b: Vertex<F>, c: Vertex<F>, eps: F) -> bool {
    let d = Vec2::between(a, c);
    let u = Vec2::between(a, b);
    let d2 = d.magnitude_squared();
    let u2 = u.magnitude_squared();
    let nda = d.cross(u);
    nda * nda <= eps * d2 * u2
}

/// 3D collinearity via the cross-product vector, same scale-free form.
pub fn collinear_3d<F: Float>(a: Vertex<F>, b: Vertex<F>, c: Vertex<F>, eps: F) -> bool {
    let u = b - a;
    let v = c - a;
    let vcross = u.cross_vector(v);
    vcross.length_squared() <= eps * u.length_squared() * v.length_squared()
}

/// Tests whether segments `a`-`b` and `c`-`d` intersect.
///
/// Orientation-based: a proper crossing needs the endpoints of each segment
/// on opposite sides of the other; endpoint-on-segment contact counts when
/// the other pair straddles.
pub fn segments_intersect<F: Float>(
    a: Vertex<F>,
    b: Vertex<F>,
    c: Vertex<F>,
    d: Vertex<F>,
    eps: F,
) -> bool {
    let sign = |o: Orientation| match o {
        Orientation::CounterClockwise => 1i32,
        Orientation::Clockwise => -1i32,
        Orientation::Collinear => 0i32,
    };

    let orient_c = sign(orientation(a, b, c, eps));
    let orient_d = sign(orientation(a, b, d, eps));
    if orient_c * orient_d == 1 {
        return false;
    }

    let orient_a = sign(orientation(c, d, a, eps));
    let orient_b = sign(orientation(c, d, b, eps));
    orient_a * orient_b == -1 || (orient_a * orient_b == 0 && orient_c * orient_d == -1)
}

/// Solves the line through `a`-`b` for y at the given x.
#[inline]
pub fn line_y_from_x<F: Float>(a: Vertex<F>, b: Vertex<F>, x: F) -> F {
    a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x)
}

/// Solves the line through `a`-`b` for x at the given y.
#[inline]
pub fn line_x_from_y<F: Float>(a: Vertex<F>, b: Vertex<F>, y: F) -> F {
    a.x + (b.x - a.x) * (y - a.y) / (b.y - a.y)
}

/// Interpolates the altitude of `pt` along the segment `a`-`b` from its
/// planar position. Leaves `z` untouched for a zero-length segment.
pub fn line_z_from_xy<F: Float>(a: Vertex<F>, b: Vertex<F>, pt: &mut Vertex<F>) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let t = if dx.abs() >= dy.abs() {
        if dx == F::zero() {
            return;
        }
        (pt.x - a.x) / dx
    } else {
        (pt.y - a.y) / dy
    };
    pt.z = a.z + (b.z - a.z) * t;
}

/// Intersection point of the infinite lines through `a`-`b` and `c`-`d`.
///
/// The caller guarantees the lines are not parallel (the segments were
/// already shown to cross). Axis-aligned lines are solved directly so that
/// boundary-exact coordinates stay exact; altitude is interpolated along
/// `a`-`b`.
pub fn lines_intersection<F: Float>(
    a: Vertex<F>,
    b: Vertex<F>,
    c: Vertex<F>,
    d: Vertex<F>,
) -> Vertex<F> {
    let u = Vec2::between(a, b);
    let v = Vec2::between(c, d);

    let mut pt = Vertex::xy(F::zero(), F::zero());
    if u.x == F::zero() {
        // First line vertical.
        pt.x = a.x;
        pt.y = line_y_from_x(c, d, pt.x);
    } else if u.y == F::zero() {
        // First line horizontal.
        if v.x == F::zero() {
            pt = Vertex::xy(c.x, a.y);
        } else {
            pt.y = a.y;
            pt.x = line_x_from_y(c, d, pt.y);
        }
    } else if v.x == F::zero() {
        pt.x = c.x;
        pt.y = line_y_from_x(a, b, pt.x);
    } else if v.y == F::zero() {
        pt.y = c.y;
        pt.x = line_x_from_y(a, b, pt.y);
    } else {
        let denom = u.cross(v);
        let w = Vec2::between(a, c);
        let t = w.cross(v) / denom;
        pt.x = a.x + t * u.x;
        pt.y = a.y + t * u.y;
    }
    line_z_from_xy(a, b, &mut pt);
    pt
}

/// Computes the unit normal and origin distance of the plane through three
/// points.
///
/// Returns `None` when the points are collinear and no plane exists.
pub fn compute_plane_equation<F: Float>(
    a: Vertex<F>,
    b: Vertex<F>,
    c: Vertex<F>,
) -> Option<(Vertex<F>, F)> {
    let u = b - a;
    let v = c - a;
    let normal = u.cross_vector(v);
    let len = normal.length_squared().sqrt();
    if tolerance::approx_eq(len, F::zero(), tolerance::coord_epsilon()) {
        return None;
    }
    let normal = Vertex::new(normal.x / len, normal.y / len, normal.z / len);
    let distance = normal.x * a.x + normal.y * a.y + normal.z * a.z;
    Some((normal, distance))
}
