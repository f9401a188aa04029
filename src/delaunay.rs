//! Incremental Delaunay triangulation.
//!
//! This module turns a flat set of 2D points into a triangle index array and
//! a half-edge adjacency array via incremental insertion:
//!
//! 1. pick a seed triangle near the bounding-box center,
//! 2. sort the remaining points by distance to its circumcenter,
//! 3. insert each point against an advancing convex hull, fanning out new
//!    triangles for every hull edge the point can see,
//! 4. restore the Delaunay empty-circumcircle property with an iterative
//!    edge-flip pass after every insertion.
//!
//! The hull is a circular doubly-linked list over point indices with an
//! angular hash for expected O(1) lookup of a visible edge. All adjacency is
//! index arithmetic on flat arrays; see [`Triangulation`] for the layout.
//!
//! Degenerate inputs (fewer than 3 usable points, or all points collinear)
//! produce a hull-only result with empty triangle and half-edge arrays
//! rather than an error; callers must check [`Triangulation::is_empty`]
//! before building a dual mesh from it.

use log::debug;
use nalgebra::Point2;

use crate::error::Result;
use crate::geom::{
    circumcenter, circumradius2, in_circle, nearly_equal, orient, pseudo_angle,
    DUPLICATE_TOLERANCE,
};
use crate::seq::Deque;

/// Sentinel for "no edge / no point": the value stored in `halfedges` for
/// hull-boundary edges that have no adjacent triangle.
pub const EMPTY: usize = usize::MAX;

/// Next half-edge within the owning triangle (rotates among its 3 sides).
#[inline]
pub fn next_edge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Previous half-edge within the owning triangle.
#[inline]
pub fn prev_edge(e: usize) -> usize {
    if e % 3 == 0 {
        e + 2
    } else {
        e - 1
    }
}

/// Collect a point source into the flat point list the triangulator consumes.
///
/// This is the entire contract between the triangulation core and any
/// point-generation stage (a blue-noise sampler, a grid jitterer, a file):
/// the source yields `(x, y)` pairs one at a time, the core triangulates the
/// finished list.
pub fn collect_points<I>(source: I) -> Vec<Point2<f64>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    source.into_iter().map(|(x, y)| Point2::new(x, y)).collect()
}

/// One discrete mutation performed during an observed build.
///
/// Emitted by [`triangulate_traced`] through a [`BuildTrace`] after the
/// corresponding arrays have been updated, so an observer sees the
/// triangulation grow one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// A new triangle was appended to the triangle array.
    TriangleAdded {
        /// Index of the new triangle.
        triangle: usize,
    },
    /// An edge shared by two triangles was flipped during legalization.
    EdgeFlipped {
        /// The half-edge that now carries the flipped diagonal.
        edge: usize,
    },
}

/// A build observer that receives one callback per discrete mutation.
///
/// This exists so callers can watch or animate incremental progress; it is a
/// cooperative, single-threaded mechanism, not a concurrency or cancellation
/// facility. Stopping mid-build is not supported: the triangulator either
/// runs to completion or its output is discarded.
pub struct BuildTrace {
    callback: Box<dyn Fn(BuildStep) + Send + Sync>,
}

impl BuildTrace {
    /// Create a trace with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(BuildStep) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Create a no-op trace that discards all steps.
    pub fn none() -> Self {
        Self::new(|_| {})
    }

    #[inline]
    fn emit(&self, step: BuildStep) {
        (self.callback)(step);
    }
}

impl Default for BuildTrace {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for BuildTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildTrace").finish_non_exhaustive()
    }
}

/// Result of a Delaunay triangulation.
///
/// # Layout
///
/// - `triangles`: point indices, one per half-edge; each consecutive triple
///   is one triangle, counter-clockwise. `triangles[e]` is the cell the
///   half-edge `e` starts from.
/// - `halfedges`: `halfedges[e]` is the opposite half-edge in the adjacent
///   triangle, or [`EMPTY`] for edges on the convex hull.
/// - `hull`: point indices on the convex hull, counter-clockwise. For a
///   degenerate (collinear) input this is the only populated field, holding
///   the points ordered along their common line.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Triangle vertex indices (`3 * num_triangles` entries).
    pub triangles: Vec<usize>,
    /// Opposite half-edge indices, [`EMPTY`] on the hull boundary.
    pub halfedges: Vec<usize>,
    /// Convex hull point indices, counter-clockwise.
    pub hull: Vec<usize>,
}

impl Triangulation {
    fn with_capacity(n: usize) -> Self {
        let max_triangles = if n >= 3 { 2 * n - 5 } else { 0 };
        Self {
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            hull: Vec::new(),
        }
    }

    /// Number of triangles (`triangles.len() / 3`).
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len() / 3
    }

    /// True if the triangulation has no triangles (degenerate input).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn add_triangle(
        &mut self,
        i0: usize,
        i1: usize,
        i2: usize,
        a: usize,
        b: usize,
        c: usize,
        trace: &BuildTrace,
    ) -> usize {
        let t = self.triangles.len();

        self.triangles.push(i0);
        self.triangles.push(i1);
        self.triangles.push(i2);

        self.halfedges.push(a);
        self.halfedges.push(b);
        self.halfedges.push(c);

        if a != EMPTY {
            self.halfedges[a] = t;
        }
        if b != EMPTY {
            self.halfedges[b] = t + 1;
        }
        if c != EMPTY {
            self.halfedges[c] = t + 2;
        }

        trace.emit(BuildStep::TriangleAdded { triangle: t / 3 });
        t
    }

    #[inline]
    fn link(&mut self, a: usize, b: usize) {
        self.halfedges[a] = b;
        if b != EMPTY {
            self.halfedges[b] = a;
        }
    }

    /// Restore the Delaunay condition around `edge` by iterative flipping.
    ///
    /// Candidate edges are kept on an explicit stack instead of the call
    /// stack, bounding memory deterministically. Returns the half-edge used
    /// to update the hull's triangle pointer for the inserted point.
    fn legalize(
        &mut self,
        edge: usize,
        points: &[Point2<f64>],
        hull: &mut Hull,
        stack: &mut Deque<usize>,
        trace: &BuildTrace,
    ) -> usize {
        // If the pair of triangles sharing edge a/b violates the Delaunay
        // condition (p1 is inside the circumcircle of [p0, pr, pl]), flip
        // the shared edge and re-check the two new candidate edges:
        //
        //           pl                    pl
        //          /||\                  /  \
        //       al/ || \bl            al/    \a
        //        /  ||  \              /      \
        //       /  a||b  \    flip    /___ar___\
        //     p0\   ||   /p1   =>   p0\---bl---/p1
        //        \  ||  /              \      /
        //       ar\ || /br             b\    /br
        //          \||/                  \  /
        //           pr                    pr
        let mut a = edge;
        let mut ar;
        stack.clear();

        loop {
            let b = self.halfedges[a];
            ar = prev_edge(a);

            if b == EMPTY {
                match stack.pop_back() {
                    Some(e) => {
                        a = e;
                        continue;
                    }
                    None => break,
                }
            }

            let al = next_edge(a);
            let bl = prev_edge(b);

            let p0 = self.triangles[ar];
            let pr = self.triangles[a];
            let pl = self.triangles[al];
            let p1 = self.triangles[bl];

            let illegal = in_circle(points[p0], points[pr], points[pl], points[p1]);
            if illegal {
                self.triangles[a] = p1;
                self.triangles[b] = p0;

                let hbl = self.halfedges[bl];
                let har = self.halfedges[ar];

                // The flipped edge lay on the hull boundary (rare): the
                // hull's triangle pointer must be moved to the new edge.
                if hbl == EMPTY {
                    let mut e = hull.start;
                    loop {
                        if hull.tri[e] == bl {
                            hull.tri[e] = a;
                            break;
                        }
                        e = hull.prev[e];
                        if e == hull.start {
                            break;
                        }
                    }
                }

                self.link(a, hbl);
                self.link(b, har);
                self.link(ar, bl);

                trace.emit(BuildStep::EdgeFlipped { edge: a });

                // Re-check `a` on the next pass; `br` waits on the stack.
                stack.push_back(next_edge(b));
            } else {
                match stack.pop_back() {
                    Some(e) => a = e,
                    None => break,
                }
            }
        }

        ar
    }
}

/// The advancing convex hull: a circular doubly-linked list over point
/// indices plus an angular hash for visible-edge lookup.
struct Hull {
    prev: Vec<usize>,
    next: Vec<usize>,
    /// `tri[p]` is a triangle half-edge incident to hull point `p`.
    tri: Vec<usize>,
    /// Buckets of hull points keyed by pseudo-angle around `center`.
    hash: Vec<usize>,
    start: usize,
    center: Point2<f64>,
}

impl Hull {
    fn new(
        n: usize,
        center: Point2<f64>,
        i0: usize,
        i1: usize,
        i2: usize,
        points: &[Point2<f64>],
    ) -> Self {
        let hash_len = (n as f64).sqrt().ceil() as usize;

        let mut hull = Self {
            prev: vec![0; n],
            next: vec![0; n],
            tri: vec![0; n],
            hash: vec![EMPTY; hash_len],
            start: i0,
            center,
        };

        hull.next[i0] = i1;
        hull.prev[i2] = i1;
        hull.next[i1] = i2;
        hull.prev[i0] = i2;
        hull.next[i2] = i0;
        hull.prev[i1] = i0;

        hull.tri[i0] = 0;
        hull.tri[i1] = 1;
        hull.tri[i2] = 2;

        hull.hash_edge(points[i0], i0);
        hull.hash_edge(points[i1], i1);
        hull.hash_edge(points[i2], i2);

        hull
    }

    #[inline]
    fn hash_key(&self, p: Point2<f64>) -> usize {
        let angle = pseudo_angle(p - self.center);
        let len = self.hash.len();
        ((angle * len as f64).floor() as usize) % len
    }

    #[inline]
    fn hash_edge(&mut self, p: Point2<f64>, i: usize) {
        let key = self.hash_key(p);
        self.hash[key] = i;
    }

    /// Find a hull edge visible from `p`, probing hash buckets outward from
    /// the point's angular neighborhood.
    ///
    /// Returns `(EMPTY, _)` when `p` coincides with a hull point (a
    /// near-duplicate that slipped past the insertion-order check) or no
    /// visible edge exists.
    fn find_visible_edge(
        &self,
        p: Point2<f64>,
        points: &[Point2<f64>],
    ) -> Result<(usize, bool)> {
        let mut start = 0;
        let key = self.hash_key(p);
        let len = self.hash.len();
        for j in 0..len {
            start = self.hash[(key + j) % len];
            if start != EMPTY && start != self.next[start] {
                break;
            }
        }
        if start == EMPTY {
            return Ok((EMPTY, false));
        }

        start = self.prev[start];
        let mut e = start;
        loop {
            let q = self.next[e];
            if nearly_equal(p, points[e]) || nearly_equal(p, points[q]) {
                return Ok((EMPTY, false));
            }
            if orient(p, points[e], points[q])? < 0.0 {
                // Edge e -> q sees the point.
                break;
            }
            e = q;
            if e == start {
                return Ok((EMPTY, false));
            }
        }
        Ok((e, e == start))
    }
}

fn bbox_center(points: &[Point2<f64>]) -> Point2<f64> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Point2::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
}

fn find_closest(points: &[Point2<f64>], p0: Point2<f64>) -> Option<usize> {
    let mut min_dist = f64::INFINITY;
    let mut k = 0;
    for (i, p) in points.iter().enumerate() {
        let d = (p - p0).norm_squared();
        if d > 0.0 && d < min_dist {
            k = i;
            min_dist = d;
        }
    }
    if min_dist == f64::INFINITY {
        None
    } else {
        Some(k)
    }
}

/// Pick the seed triangle: the point nearest the bounding-box center, its
/// nearest neighbor, and the third point minimizing the circumradius, forced
/// counter-clockwise. `None` when no triple has a finite circumcircle.
fn find_seed_triangle(points: &[Point2<f64>]) -> Result<Option<(usize, usize, usize)>> {
    if points.len() < 3 {
        return Ok(None);
    }

    let center = bbox_center(points);
    let Some(i0) = find_closest(points, center) else {
        return Ok(None);
    };
    let p0 = points[i0];

    let Some(i1) = find_closest(points, p0) else {
        return Ok(None);
    };
    let p1 = points[i1];

    // Third point forming the smallest circumcircle with the first two.
    let mut min_radius = f64::INFINITY;
    let mut i2 = 0;
    for (i, &p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let r = circumradius2(p0, p1, p);
        if r < min_radius {
            i2 = i;
            min_radius = r;
        }
    }

    if min_radius == f64::INFINITY {
        return Ok(None);
    }

    // Force counter-clockwise order.
    if orient(p0, p1, points[i2])? < 0.0 {
        Ok(Some((i0, i2, i1)))
    } else {
        Ok(Some((i0, i1, i2)))
    }
}

/// Hull-only fallback for collinear input: order the points by offset along
/// their common line and emit the distinct ones as the hull.
fn handle_collinear(points: &[Point2<f64>]) -> Triangulation {
    let mut triangulation = Triangulation::default();
    let Some(first) = points.first() else {
        return triangulation;
    };
    let (x, y) = (first.x, first.y);

    let offsets: Vec<f64> = points
        .iter()
        .map(|p| {
            let d = p.x - x;
            if d == 0.0 {
                p.y - y
            } else {
                d
            }
        })
        .collect();
    let mut ids: Vec<usize> = (0..points.len()).collect();
    sort_by_distance(&mut ids, &offsets);

    let mut d0 = f64::NEG_INFINITY;
    for i in ids {
        if offsets[i] > d0 {
            triangulation.hull.push(i);
            d0 = offsets[i];
        }
    }

    triangulation
}

/// Sort `ids` in place by ascending `dists[id]`.
///
/// In-place quicksort with median-of-three pivoting and an insertion-sort
/// fallback for partitions of 20 or fewer elements, which beats a generic
/// comparison sort on the cache-friendly index arrays used here.
fn sort_by_distance(ids: &mut [usize], dists: &[f64]) {
    if ids.len() < 2 {
        return;
    }
    let right = ids.len() - 1;
    quicksort(ids, dists, 0, right);
}

fn quicksort(ids: &mut [usize], dists: &[f64], left: usize, right: usize) {
    if right - left <= 20 {
        for i in (left + 1)..=right {
            let temp = ids[i];
            let temp_dist = dists[temp];
            let mut j = i;
            while j > left && dists[ids[j - 1]] > temp_dist {
                ids[j] = ids[j - 1];
                j -= 1;
            }
            ids[j] = temp;
        }
        return;
    }

    let median = (left + right) >> 1;
    let mut i = left + 1;
    let mut j = right;

    ids.swap(median, i);
    if dists[ids[left]] > dists[ids[right]] {
        ids.swap(left, right);
    }
    if dists[ids[i]] > dists[ids[right]] {
        ids.swap(i, right);
    }
    if dists[ids[left]] > dists[ids[i]] {
        ids.swap(left, i);
    }

    let temp = ids[i];
    let temp_dist = dists[temp];
    loop {
        loop {
            i += 1;
            if dists[ids[i]] >= temp_dist {
                break;
            }
        }
        loop {
            j -= 1;
            if dists[ids[j]] <= temp_dist {
                break;
            }
        }
        if j < i {
            break;
        }
        ids.swap(i, j);
    }
    ids[left + 1] = ids[j];
    ids[j] = temp;

    // Recurse into the larger partition last to keep stack depth logarithmic.
    if right - i + 1 >= j.saturating_sub(left) {
        quicksort(ids, dists, i, right);
        if j > left + 1 {
            quicksort(ids, dists, left, j - 1);
        }
    } else {
        if j > left + 1 {
            quicksort(ids, dists, left, j - 1);
        }
        quicksort(ids, dists, i, right);
    }
}

/// Triangulate a set of 2D points.
///
/// Returns a hull-only [`Triangulation`] (with [`Triangulation::is_empty`]
/// true) when the input is degenerate: fewer than 3 usable points, or all
/// points collinear.
///
/// # Errors
///
/// [`MeshError::AmbiguousOrientation`](crate::error::MeshError::AmbiguousOrientation)
/// when an orientation test on a
/// near-degenerate point triple cannot be decided in fast floating-point
/// arithmetic.
pub fn triangulate(points: &[Point2<f64>]) -> Result<Triangulation> {
    triangulate_traced(points, &BuildTrace::none())
}

/// Triangulate a set of 2D points, reporting each triangle insertion and
/// edge flip through `trace`.
///
/// See [`triangulate`] for the result contract.
pub fn triangulate_traced(points: &[Point2<f64>], trace: &BuildTrace) -> Result<Triangulation> {
    let n = points.len();
    debug!("triangulating {} points", n);

    let Some((i0, i1, i2)) = find_seed_triangle(points)? else {
        debug!("degenerate input: returning hull-only triangulation");
        return Ok(handle_collinear(points));
    };

    let p0 = points[i0];
    let p1 = points[i1];
    let p2 = points[i2];

    let Some(center) = circumcenter(p0, p1, p2) else {
        return Ok(handle_collinear(points));
    };

    let mut triangulation = Triangulation::with_capacity(n);
    triangulation.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY, trace);

    // Sort point indices by squared distance from the seed circumcenter so
    // insertion grows the hull outward.
    let dists: Vec<f64> = points.iter().map(|p| (p - center).norm_squared()).collect();
    let mut ids: Vec<usize> = (0..n).collect();
    sort_by_distance(&mut ids, &dists);

    let mut hull = Hull::new(n, center, i0, i1, i2, points);
    let mut stack = Deque::new();

    let mut xp = f64::NAN;
    let mut yp = f64::NAN;
    for (k, &i) in ids.iter().enumerate() {
        let p = points[i];

        // Skip near-duplicates of the previously processed point.
        if k > 0 && (p.x - xp).abs() <= DUPLICATE_TOLERANCE && (p.y - yp).abs() <= DUPLICATE_TOLERANCE
        {
            continue;
        }
        xp = p.x;
        yp = p.y;

        // Skip seed triangle points.
        if i == i0 || i == i1 || i == i2 {
            continue;
        }

        let (mut e, walk_back) = hull.find_visible_edge(p, points)?;
        if e == EMPTY {
            // Coincides with an existing hull point; drop it.
            continue;
        }

        // First triangle from the new point.
        let t = triangulation.add_triangle(e, i, hull.next[e], EMPTY, EMPTY, hull.tri[e], trace);
        let legal = triangulation.legalize(t + 2, points, &mut hull, &mut stack, trace);
        hull.tri[i] = legal;
        hull.tri[e] = t;

        // Walk forward through the hull, fanning out triangles over every
        // edge the point still sees.
        let mut next = hull.next[e];
        loop {
            let q = hull.next[next];
            if orient(p, points[next], points[q])? >= 0.0 {
                break;
            }
            let t = triangulation.add_triangle(next, i, q, hull.tri[i], EMPTY, hull.tri[next], trace);
            let legal = triangulation.legalize(t + 2, points, &mut hull, &mut stack, trace);
            hull.tri[i] = legal;
            hull.next[next] = next; // consumed: mark removed from the hull
            next = q;
        }

        // Walk backward from the other side when the visible edge was the
        // angular start, fanning in the same way.
        if walk_back {
            loop {
                let q = hull.prev[e];
                if orient(p, points[q], points[e])? >= 0.0 {
                    break;
                }
                let t = triangulation.add_triangle(q, i, e, EMPTY, hull.tri[e], hull.tri[q], trace);
                triangulation.legalize(t + 2, points, &mut hull, &mut stack, trace);
                hull.tri[q] = t;
                hull.next[e] = e; // consumed
                e = q;
            }
        }

        // Splice the new point into the hull between e and next.
        hull.prev[i] = e;
        hull.next[i] = next;
        hull.prev[next] = i;
        hull.next[e] = i;
        hull.start = e;

        hull.hash_edge(p, i);
        hull.hash_edge(points[e], e);
    }

    let mut e = hull.start;
    loop {
        triangulation.hull.push(e);
        e = hull.next[e];
        if e == hull.start {
            break;
        }
    }

    triangulation.triangles.shrink_to_fit();
    triangulation.halfedges.shrink_to_fit();

    debug!(
        "triangulation complete: {} triangles, {} hull points",
        triangulation.len(),
        triangulation.hull.len()
    );
    Ok(triangulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn random_points(n: usize, seed: u64) -> Vec<Point2<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Point2::new(rng.gen::<f64>() * 1000.0, rng.gen::<f64>() * 1000.0))
            .collect()
    }

    fn check_invariants(t: &Triangulation, points: &[Point2<f64>]) {
        assert_eq!(t.triangles.len(), t.halfedges.len());
        assert_eq!(t.triangles.len() % 3, 0);
        assert_eq!(t.triangles.len(), 3 * t.len());

        // Half-edge symmetry.
        for (e, &opposite) in t.halfedges.iter().enumerate() {
            if opposite != EMPTY {
                assert_eq!(t.halfedges[opposite], e, "asymmetric half-edge {}", e);
            }
        }

        // Every triangle is counter-clockwise.
        for tri in 0..t.len() {
            let a = points[t.triangles[3 * tri]];
            let b = points[t.triangles[3 * tri + 1]];
            let c = points[t.triangles[3 * tri + 2]];
            assert!(
                orient(a, b, c).unwrap() > 0.0,
                "triangle {} is not counter-clockwise",
                tri
            );
        }

        // Delaunay condition: across every interior edge the far vertex of
        // the opposite triangle is outside (or on) this triangle's
        // circumcircle.
        for a in 0..t.halfedges.len() {
            let b = t.halfedges[a];
            if b == EMPTY {
                continue;
            }
            let p0 = points[t.triangles[prev_edge(a)]];
            let pr = points[t.triangles[a]];
            let pl = points[t.triangles[next_edge(a)]];
            let p1 = points[t.triangles[prev_edge(b)]];
            assert!(
                !in_circle(p0, pr, pl, p1),
                "Delaunay condition violated across edge {}",
                a
            );
        }
    }

    #[test]
    fn test_single_triangle() {
        let points = collect_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let t = triangulate(&points).unwrap();

        assert_eq!(t.len(), 1);
        assert_eq!(t.triangles.len(), 3);
        assert!(t.halfedges.iter().all(|&h| h == EMPTY));
        assert_eq!(t.hull.len(), 3);
        check_invariants(&t, &points);
    }

    #[test]
    fn test_convex_quad() {
        let points = collect_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let t = triangulate(&points).unwrap();

        assert_eq!(t.len(), 2);
        assert_eq!(t.triangles.len(), 6);
        let boundary = t.halfedges.iter().filter(|&&h| h == EMPTY).count();
        assert_eq!(boundary, 4);
        // The remaining two half-edges form the one interior pair.
        assert_eq!(t.halfedges.len() - boundary, 2);
        assert_eq!(t.hull.len(), 4);
        check_invariants(&t, &points);
    }

    #[test]
    fn test_exact_duplicate() {
        let points = collect_points([(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let t = triangulate(&points).unwrap();

        // Behaves as if only 3 distinct points were given.
        assert_eq!(t.len(), 1);
        check_invariants(&t, &points);

        // Exactly one of the two coincident indices appears in the triangle.
        let uses_0 = t.triangles.contains(&0);
        let uses_1 = t.triangles.contains(&1);
        assert!(uses_0 ^ uses_1);
    }

    #[test]
    fn test_skewed_grid_is_ambiguous() {
        // Every row of this grid is exactly collinear because the skew is
        // affine in the grid index. A hull visibility test meets a zero
        // determinant with nonzero partial products and must refuse to
        // guess a sign.
        let mut points = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                let skew = 0.01 * (i * 3 + j) as f64;
                points.push(Point2::new(i as f64 + skew, j as f64 - skew));
            }
        }
        assert!(matches!(
            triangulate(&points),
            Err(MeshError::AmbiguousOrientation { .. })
        ));
    }

    #[test]
    fn test_collinear_points() {
        let points = collect_points([(4.0, 4.0), (0.0, 0.0), (3.0, 3.0), (1.0, 1.0), (2.0, 2.0)]);
        let t = triangulate(&points).unwrap();

        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        // Hull holds the points ordered along the line.
        assert_eq!(t.hull, vec![1, 3, 4, 2, 0]);
    }

    #[test]
    fn test_too_few_points() {
        for n in 0..3 {
            let points = random_points(n, 7);
            let t = triangulate(&points).unwrap();
            assert!(t.is_empty());
            assert_eq!(t.hull.len(), n);
        }
    }

    #[test]
    fn test_random_invariants() {
        let points = random_points(500, 42);
        let t = triangulate(&points).unwrap();
        assert!(!t.is_empty());
        // Euler: for n points with h on the hull, 2n - h - 2 triangles.
        assert_eq!(t.len(), 2 * points.len() - t.hull.len() - 2);
        check_invariants(&t, &points);
    }

    #[test]
    fn test_boundary_edges_match_hull() {
        let points = random_points(200, 9);
        let t = triangulate(&points).unwrap();

        // halfedges[e] == EMPTY iff both endpoints of e are consecutive
        // points on the convex hull.
        let hull_len = t.hull.len();
        let mut hull_pairs: Vec<(usize, usize)> = (0..hull_len)
            .map(|k| (t.hull[k], t.hull[(k + 1) % hull_len]))
            .collect();
        hull_pairs.sort_unstable();

        let mut boundary_pairs: Vec<(usize, usize)> = t
            .halfedges
            .iter()
            .enumerate()
            .filter(|&(_, &h)| h == EMPTY)
            .map(|(e, _)| (t.triangles[e], t.triangles[next_edge(e)]))
            .collect();
        boundary_pairs.sort_unstable();

        assert_eq!(hull_pairs, boundary_pairs);
    }

    #[test]
    fn test_sort_by_distance() {
        let mut rng = StdRng::seed_from_u64(11);
        let dists: Vec<f64> = (0..300).map(|_| rng.gen::<f64>() * 100.0).collect();
        let mut ids: Vec<usize> = (0..dists.len()).collect();
        sort_by_distance(&mut ids, &dists);

        for w in ids.windows(2) {
            assert!(dists[w[0]] <= dists[w[1]]);
        }
        // Still a permutation of the original ids.
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..dists.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_short_and_empty() {
        let dists = vec![3.0, 1.0, 2.0];
        let mut ids = vec![0, 1, 2];
        sort_by_distance(&mut ids, &dists);
        assert_eq!(ids, vec![1, 2, 0]);

        let mut empty: Vec<usize> = vec![];
        sort_by_distance(&mut empty, &[]);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_traced_build() {
        let added = Arc::new(AtomicUsize::new(0));
        let flipped = Arc::new(AtomicUsize::new(0));
        let (a, f) = (Arc::clone(&added), Arc::clone(&flipped));
        let trace = BuildTrace::new(move |step| match step {
            BuildStep::TriangleAdded { .. } => {
                a.fetch_add(1, Ordering::Relaxed);
            }
            BuildStep::EdgeFlipped { .. } => {
                f.fetch_add(1, Ordering::Relaxed);
            }
        });

        let points = random_points(100, 3);
        let t = triangulate_traced(&points, &trace).unwrap();

        // Triangles are only ever appended, so one event per final triangle.
        assert_eq!(added.load(Ordering::Relaxed), t.len());
        // A random cloud of this size cannot be flip-free.
        assert!(flipped.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_collect_points() {
        let points = collect_points((0..4).map(|i| (i as f64, 2.0 * i as f64)));
        assert_eq!(points.len(), 4);
        assert_eq!(points[3], Point2::new(3.0, 6.0));
    }
}
