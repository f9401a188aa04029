//! The Voronoi dual mesh over a Delaunay triangulation.
//!
//! A [`DualMesh`] relates three index spaces:
//!
//! - **cells**: one per input point, the Voronoi region around that point,
//! - **triangles**: one per Delaunay triangle, positioned at its centroid,
//! - **sides**: the directed half-edges, shared identity between the cell
//!   boundary and triangle boundary views of the same segment.
//!
//! All navigation is pure index arithmetic over the flat arrays produced by
//! the triangulator; no adjacency query allocates except those that return a
//! `Vec` by contract. The mesh is immutable after [`DualMesh::load`].

use nalgebra::Point2;

use crate::delaunay::{next_edge, prev_edge, Triangulation, EMPTY};
use crate::error::{MeshError, Result};
use crate::mesh::index::{CellId, EdgeId, TriangleId};

/// An immutable Voronoi dual mesh over a completed triangulation.
///
/// Cells with no incident side (duplicates dropped during triangulation, or
/// any cell of a degenerate build) answer every adjacency query with an
/// empty result rather than an error.
#[derive(Debug, Clone)]
pub struct DualMesh {
    points: Vec<Point2<f64>>,
    centroids: Vec<Point2<f64>>,
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    /// One incoming half-edge per cell, preferring a boundary edge so hull
    /// cells enumerate their full fan. [`EMPTY`] for cells in no triangle.
    inedges: Vec<usize>,
}

impl DualMesh {
    /// Build the dual mesh from a completed triangulation and its points.
    ///
    /// A degenerate (triangle-free) triangulation loads successfully into a
    /// mesh with zero triangles where every adjacency query is empty;
    /// callers that need triangles must check [`DualMesh::num_triangles`].
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidTopology`] if the arrays are structurally broken:
    /// lengths not matching or not divisible by 3, a vertex index out of
    /// range, or an asymmetric half-edge pair.
    pub fn load(triangulation: Triangulation, points: Vec<Point2<f64>>) -> Result<Self> {
        let Triangulation {
            triangles,
            halfedges,
            ..
        } = triangulation;

        if triangles.len() % 3 != 0 {
            return Err(MeshError::invalid_topology(format!(
                "triangle array length {} is not divisible by 3",
                triangles.len()
            )));
        }
        if halfedges.len() != triangles.len() {
            return Err(MeshError::invalid_topology(format!(
                "half-edge array length {} does not match triangle array length {}",
                halfedges.len(),
                triangles.len()
            )));
        }
        for (e, &p) in triangles.iter().enumerate() {
            if p >= points.len() {
                return Err(MeshError::invalid_topology(format!(
                    "half-edge {} references point {} out of {}",
                    e,
                    p,
                    points.len()
                )));
            }
        }
        for (e, &opposite) in halfedges.iter().enumerate() {
            if opposite == EMPTY {
                continue;
            }
            if opposite >= halfedges.len() || halfedges[opposite] != e {
                return Err(MeshError::invalid_topology(format!(
                    "half-edge {} has asymmetric opposite {}",
                    e, opposite
                )));
            }
        }

        let centroids = (0..triangles.len() / 3)
            .map(|t| {
                let a = points[triangles[3 * t]];
                let b = points[triangles[3 * t + 1]];
                let c = points[triangles[3 * t + 2]];
                Point2::from((a.coords + b.coords + c.coords) / 3.0)
            })
            .collect();

        // Pick a representative incoming edge per cell, preferring one whose
        // outgoing twin is on the hull so boundary fans start at an end.
        let mut inedges = vec![EMPTY; points.len()];
        for e in 0..triangles.len() {
            let endpoint = triangles[next_edge(e)];
            if inedges[endpoint] == EMPTY || halfedges[e] == EMPTY {
                inedges[endpoint] = e;
            }
        }

        Ok(Self {
            points,
            centroids,
            triangles,
            halfedges,
            inedges,
        })
    }

    /// Number of cells (input points, including any dropped duplicates).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of directed sides (half-edges), `3 * num_triangles`.
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    /// Iterate over all cell ids.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.num_cells()).map(CellId::new)
    }

    /// Iterate over all triangle ids.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> {
        (0..self.num_triangles()).map(TriangleId::new)
    }

    /// Iterate over all side ids.
    pub fn side_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.num_sides()).map(EdgeId::new)
    }

    // Half-edge navigation. All O(1) index arithmetic.

    /// Next side within the owning triangle.
    #[inline]
    pub fn next_side(&self, e: EdgeId) -> EdgeId {
        EdgeId::new(next_edge(e.index()))
    }

    /// Previous side within the owning triangle.
    #[inline]
    pub fn prev_side(&self, e: EdgeId) -> EdgeId {
        EdgeId::new(prev_edge(e.index()))
    }

    /// The triangle owning side `e`.
    #[inline]
    pub fn triangle_of(&self, e: EdgeId) -> TriangleId {
        TriangleId::new(e.index() / 3)
    }

    /// The opposite side in the adjacent triangle, or `None` on the hull
    /// boundary.
    #[inline]
    pub fn opposite(&self, e: EdgeId) -> Option<EdgeId> {
        match self.halfedges[e.index()] {
            EMPTY => None,
            o => Some(EdgeId::new(o)),
        }
    }

    /// True if side `e` lies on the hull boundary (has no opposite).
    #[inline]
    pub fn is_boundary_side(&self, e: EdgeId) -> bool {
        self.halfedges[e.index()] == EMPTY
    }

    /// The cell the directed side `e` starts from.
    #[inline]
    pub fn cell_at_start(&self, e: EdgeId) -> CellId {
        CellId::new(self.triangles[e.index()])
    }

    /// The cell the directed side `e` points to.
    #[inline]
    pub fn cell_at_end(&self, e: EdgeId) -> CellId {
        CellId::new(self.triangles[next_edge(e.index())])
    }

    // Positions.

    /// Position of a cell: its original input point.
    #[inline]
    pub fn cell_position(&self, c: CellId) -> Point2<f64> {
        self.points[c.index()]
    }

    /// Position of a triangle: the centroid of its three cells.
    ///
    /// Boundary triangles get the same centroid placement as interior ones,
    /// so hull-adjacent Voronoi regions are clipped to the hull rather than
    /// extended outward.
    #[inline]
    pub fn triangle_position(&self, t: TriangleId) -> Point2<f64> {
        self.centroids[t.index()]
    }

    /// One outgoing side incident to `cell`, or `None` if the cell appears
    /// in no triangle.
    ///
    /// For hull cells the returned side is chosen so that the fan walk in
    /// [`DualMesh::sides_around_cell`] covers every incident side before
    /// hitting the boundary.
    #[inline]
    pub fn side_of_cell(&self, cell: CellId) -> Option<EdgeId> {
        match self.inedges[cell.index()] {
            EMPTY => None,
            e => Some(EdgeId::new(next_edge(e))),
        }
    }

    // Adjacency queries.

    /// The three cells at the corners of triangle `t`.
    #[inline]
    pub fn cells_of_triangle(&self, t: TriangleId) -> [CellId; 3] {
        let base = 3 * t.index();
        [
            CellId::new(self.triangles[base]),
            CellId::new(self.triangles[base + 1]),
            CellId::new(self.triangles[base + 2]),
        ]
    }

    /// Triangles sharing a side with `t` (up to 3; fewer on the hull).
    pub fn triangles_adjacent_to_triangle(&self, t: TriangleId) -> Vec<TriangleId> {
        let base = 3 * t.index();
        (base..base + 3)
            .filter_map(|e| match self.halfedges[e] {
                EMPTY => None,
                o => Some(TriangleId::new(o / 3)),
            })
            .collect()
    }

    /// The outgoing sides around `cell`, in order.
    ///
    /// Interior cells yield a full cycle; hull cells yield the fan from one
    /// boundary side to the other. A cell in no triangle yields nothing.
    pub fn sides_around_cell(&self, cell: CellId) -> CellSideIter<'_> {
        let start = self.inedges[cell.index()];
        CellSideIter {
            mesh: self,
            start,
            incoming: start,
            done: start == EMPTY,
        }
    }

    /// The neighboring cells around `cell`, in the same order as
    /// [`DualMesh::sides_around_cell`].
    pub fn cells_around_cell(&self, cell: CellId) -> Vec<CellId> {
        self.sides_around_cell(cell)
            .map(|s| self.cell_at_end(s))
            .collect()
    }

    /// The triangles around `cell`: the corners of its Voronoi polygon, in
    /// the same order as [`DualMesh::sides_around_cell`].
    pub fn triangles_around_cell(&self, cell: CellId) -> Vec<TriangleId> {
        self.sides_around_cell(cell)
            .map(|s| self.triangle_of(s))
            .collect()
    }

    /// The two triangle-centroid endpoints of the Voronoi segment crossing
    /// side `e`, or `None` when `e` is on the hull boundary (the segment
    /// would be unbounded).
    pub fn points_of_cell_side(&self, e: EdgeId) -> Option<[Point2<f64>; 2]> {
        let opposite = self.opposite(e)?;
        Some([
            self.centroids[self.triangle_of(e).index()],
            self.centroids[self.triangle_of(opposite).index()],
        ])
    }

    /// Unique undirected Delaunay edges as `(start, end)` cell pairs.
    ///
    /// Each interior symmetric pair is emitted once, from the half-edge with
    /// the smaller index. Hull-boundary edges are not emitted; callers that
    /// draw the full mesh boundary must walk boundary sides separately.
    pub fn cell_edges(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.unique_interior_sides()
            .map(|e| (self.cell_at_start(e), self.cell_at_end(e)))
    }

    /// Unique undirected Voronoi edges as `(triangle, triangle)` centroid
    /// pairs, with the same boundary exclusion as [`DualMesh::cell_edges`].
    pub fn triangle_edges(&self) -> impl Iterator<Item = (TriangleId, TriangleId)> + '_ {
        self.unique_interior_sides().map(|e| {
            let o = self.halfedges[e.index()];
            (TriangleId::new(e.index() / 3), TriangleId::new(o / 3))
        })
    }

    fn unique_interior_sides(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|&(e, &o)| o != EMPTY && e < o)
            .map(|(e, _)| EdgeId::new(e))
    }
}

/// Iterator over the outgoing sides around one cell.
///
/// Produced by [`DualMesh::sides_around_cell`]. Walks the fan by alternating
/// "next side in triangle" with "opposite side", stopping at the starting
/// side or the hull boundary.
#[derive(Debug)]
pub struct CellSideIter<'a> {
    mesh: &'a DualMesh,
    start: usize,
    incoming: usize,
    done: bool,
}

impl Iterator for CellSideIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        if self.done {
            return None;
        }
        let outgoing = next_edge(self.incoming);
        match self.mesh.halfedges[outgoing] {
            EMPTY => self.done = true,
            next_incoming if next_incoming == self.start => self.done = true,
            next_incoming => self.incoming = next_incoming,
        }
        Some(EdgeId::new(outgoing))
    }
}
