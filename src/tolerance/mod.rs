//! Epsilon-tolerant scalar comparisons and geometric predicates.
//!
//! Every decision point in the engine that could hit numerical degeneracy
//! (near-zero cross products, collinearity, boundary coincidence) goes
//! through these helpers with an explicit tolerance; degeneracy is absorbed
//! here, never raised.

mod predicates;

pub use predicates::{
    collinear, collinear_3d, compute_plane_equation, line_x_from_y, line_y_from_x, line_z_from_xy,
    lines_intersection, orientation, segments_intersect, Orientation,
};

use num_traits::Float;

/// Default tolerance for coordinate equality in the normalized plane.
///
/// The plane is `[0, 1]²`, so this is roughly a hundredth of a millimeter at
/// equator scale - far below digitizing precision, far above f64 noise.
pub fn coord_epsilon<F: Float>() -> F {
    F::from(1e-10).unwrap()
}

/// Default squared-sine threshold for the collinearity test.
pub fn collinear_epsilon<F: Float>() -> F {
    F::from(1e-12).unwrap()
}

/// Tests scalar equality within `eps`.
#[inline]
pub fn approx_eq<F: Float>(a: F, b: F, eps: F) -> bool {
    (a - b).abs() <= eps
}

/// Tests that `a` is less than `b` by more than `eps`.
#[inline]
pub fn definitely_less<F: Float>(a: F, b: F, eps: F) -> bool {
    a < b - eps
}

/// Tests that `a` is less than or indistinguishable from `b`.
#[inline]
pub fn less_or_equal<F: Float>(a: F, b: F, eps: F) -> bool {
    !definitely_less(b, a, eps)
}

/// Tolerant lexicographic "less than" by x then y.
///
/// Strict weak order used by the turning-point sets: x-coordinates equal
/// within `eps` fall through to the y comparison.
#[inline]
pub fn lex_less_xy_tolerant<F: Float>(ax: F, ay: F, bx: F, by: F, eps: F) -> bool {
    definitely_less(ax, bx, eps) || (approx_eq(ax, bx, eps) && definitely_less(ay, by, eps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!approx_eq(1.0, 1.0 + 1e-8, 1e-10));
    }

    #[test]
    fn test_definitely_less() {
        assert!(definitely_less(1.0, 2.0, 1e-10));
        assert!(!definitely_less(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!definitely_less(2.0, 1.0, 1e-10));
    }

    #[test]
    fn test_lex_less_tolerant() {
        let eps = 1e-10;
        assert!(lex_less_xy_tolerant(0.0, 0.0, 1.0, 0.0, eps));
        // Equal x within tolerance: falls through to y.
        assert!(lex_less_xy_tolerant(1.0, 0.0, 1.0 + 1e-12, 1.0, eps));
        assert!(!lex_less_xy_tolerant(1.0, 1.0, 1.0 + 1e-12, 0.0, eps));
    }
}
