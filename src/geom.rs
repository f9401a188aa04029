//! Stateless geometric predicates and helpers.
//!
//! All functions in this module are pure: they take points, return numbers,
//! and hold no state. Coordinates follow screen convention (y grows downward),
//! so a triangle whose [`orient`] determinant is positive is counter-clockwise
//! in that convention.
//!
//! # Robustness
//!
//! [`orient`] gates its fast floating-point path with a relative error bound.
//! When the determinant is too small to trust, it returns
//! [`MeshError::AmbiguousOrientation`] instead of an unreliable sign; there is
//! no adaptive-precision fallback. The in-circle test is not gated.

use nalgebra::{Point2, Vector2};

use crate::error::{MeshError, Result};

/// Absolute per-coordinate tolerance below which two points are considered
/// the same point (2⁻⁵²).
pub const DUPLICATE_TOLERANCE: f64 = f64::EPSILON;

/// Relative error bound for the orientation determinant fast path,
/// `(3 + 16ε)ε` with ε the machine epsilon.
const ORIENT_ERRBOUND: f64 = (3.0 + 16.0 * f64::EPSILON) * f64::EPSILON;

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive means counter-clockwise, negative clockwise. The result is only
/// returned when its magnitude provably exceeds the floating-point error
/// bound; otherwise the sign is ambiguous and an error is raised.
///
/// # Errors
///
/// [`MeshError::AmbiguousOrientation`] when the three points are collinear or
/// so close to collinear that the fast determinant cannot decide.
#[inline]
pub fn orient(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Result<f64> {
    let detleft = (a.y - c.y) * (b.x - c.x);
    let detright = (a.x - c.x) * (b.y - c.y);
    let det = detleft - detright;

    let detsum = detleft.abs() + detright.abs();
    if detsum == 0.0 {
        // All partial products vanish; the determinant is exactly zero.
        return Ok(0.0);
    }

    let bound = ORIENT_ERRBOUND * detsum;
    if det.abs() >= bound {
        Ok(det)
    } else {
        Err(MeshError::AmbiguousOrientation { det, bound })
    }
}

/// True if `p` lies strictly inside the circumcircle of the counter-clockwise
/// triangle `(a, b, c)`.
///
/// Uses the standard 4×4-determinant-as-3×3 expansion. Not error-bounded:
/// a wrong answer for a nearly-cocircular quadruple produces an unnecessary
/// (but valid) edge flip, never a broken mesh.
#[inline]
pub fn in_circle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, p: Point2<f64>) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;

    let ap = d.norm_squared();
    let bp = e.norm_squared();
    let cp = f.norm_squared();

    d.x * (e.y * cp - bp * f.y) - d.y * (e.x * cp - bp * f.x) + ap * (e.x * f.y - e.y * f.x) < 0.0
}

/// Offset of the circumcenter of `(a, b, c)` relative to `a`, or `None` for a
/// degenerate (collinear) triple.
#[inline]
fn circumdelta(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Vector2<f64>> {
    let d = b - a;
    let e = c - a;

    let bl = d.norm_squared();
    let cl = e.norm_squared();
    let det = d.x * e.y - d.y * e.x;
    if bl == 0.0 || cl == 0.0 || det == 0.0 {
        return None;
    }

    let dl = 0.5 / det;
    Some(Vector2::new(
        (e.y * bl - d.y * cl) * dl,
        (d.x * cl - e.x * bl) * dl,
    ))
}

/// Squared circumradius of the triangle `(a, b, c)`, or `f64::INFINITY` when
/// the triple has no finite circumcircle.
#[inline]
pub fn circumradius2(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    match circumdelta(a, b, c) {
        Some(v) => v.norm_squared(),
        None => f64::INFINITY,
    }
}

/// Circumcenter of the triangle `(a, b, c)`, or `None` for a degenerate triple.
#[inline]
pub fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Point2<f64>> {
    circumdelta(a, b, c).map(|v| a + v)
}

/// A monotonic, trigonometry-free proxy for the polar angle of `d`.
///
/// Maps direction to `[0, 1)`, increasing with the real angle but far cheaper
/// than `atan2`. Used to bucket hull points by angular neighborhood.
#[inline]
pub fn pseudo_angle(d: Vector2<f64>) -> f64 {
    let p = d.x / (d.x.abs() + d.y.abs());
    (if d.y > 0.0 { 3.0 - p } else { 1.0 + p }) / 4.0
}

/// True if both coordinates of `a` and `b` differ by at most
/// [`DUPLICATE_TOLERANCE`].
#[inline]
pub fn nearly_equal(a: Point2<f64>, b: Point2<f64>) -> bool {
    (a.x - b.x).abs() <= DUPLICATE_TOLERANCE && (a.y - b.y).abs() <= DUPLICATE_TOLERANCE
}
