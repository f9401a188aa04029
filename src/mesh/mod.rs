//! Dual-mesh data structures.
//!
//! [`index`] provides the type-safe id wrappers for the three index spaces
//! (cells, triangles, sides); [`dual`] provides the [`DualMesh`] itself.

pub mod dual;
pub mod index;

pub use dual::{CellSideIter, DualMesh};
pub use index::{CellId, EdgeId, TriangleId};
