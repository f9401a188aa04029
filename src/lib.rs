//! # Dualmesh
//!
//! A 2D Delaunay triangulation and Voronoi dual-mesh kernel for procedural
//! map generation.
//!
//! Dualmesh triangulates a point set with an incremental sweep-style
//! algorithm, then wraps the result in a queryable dual structure relating
//! three index spaces: **cells** (the input points and their Voronoi
//! regions), **triangles** (positioned at centroids), and **sides** (the
//! directed half-edges shared between both views).
//!
//! ## Features
//!
//! - **Flat-array half-edge layout**: all adjacency is O(1) index arithmetic
//! - **Type-safe indices**: cells, triangles, and sides cannot be confused
//! - **Observable builds**: a trace callback per triangle insertion and flip
//! - **Honest degeneracy handling**: collinear input yields a hull-only
//!   result, near-degenerate orientation tests fail loudly instead of
//!   guessing a sign
//! - **Text interchange**: a stable save/load format for the defining triple
//!   of points, triangles, and half-edges
//!
//! ## Quick Start
//!
//! ```
//! use dualmesh::prelude::*;
//!
//! let points = collect_points([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
//! let triangulation = triangulate(&points).unwrap();
//! assert_eq!(triangulation.len(), 2);
//!
//! let mesh = DualMesh::load(triangulation, points).unwrap();
//! assert_eq!(mesh.num_cells(), 4);
//! assert_eq!(mesh.num_triangles(), 2);
//!
//! // Walk the Voronoi fan around a cell.
//! let cell = CellId::new(0);
//! for side in mesh.sides_around_cell(cell) {
//!     let neighbor = mesh.cell_at_end(side);
//!     let corner = mesh.triangle_position(mesh.triangle_of(side));
//!     println!("{:?} -> {:?} via corner {}", cell, neighbor, corner);
//! }
//! ```
//!
//! ## Degenerate Input
//!
//! Fewer than 3 distinct points, or an entirely collinear set, is not an
//! error: the triangulator returns a hull-only result. Check before relying
//! on triangles:
//!
//! ```
//! use dualmesh::prelude::*;
//!
//! let points = collect_points([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
//! let triangulation = triangulate(&points).unwrap();
//! assert!(triangulation.is_empty());
//! // The hull still orders the points along their common line.
//! assert_eq!(triangulation.hull, vec![0, 1, 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod delaunay;
pub mod error;
pub mod geom;
pub mod io;
pub mod mesh;
pub mod seq;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use dualmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::delaunay::{
        collect_points, triangulate, triangulate_traced, BuildStep, BuildTrace, Triangulation,
        EMPTY,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{CellId, DualMesh, EdgeId, TriangleId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
