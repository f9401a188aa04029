//! Index types for dual-mesh elements.
//!
//! Type-safe wrappers around the raw `usize` indices of the flat mesh arrays,
//! so a cell index cannot be handed to an operation expecting a side index.
//! All three share the same sentinel convention as the triangulation arrays:
//! `usize::MAX` means "no element".

use std::fmt::{self, Debug};

/// A type-safe cell index (one cell per input point).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CellId(usize);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(usize);

/// A type-safe half-edge (side) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(usize);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(usize::MAX)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != usize::MAX
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(CellId, "C");
impl_index_type!(TriangleId, "T");
impl_index_type!(EdgeId, "E");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id() {
        let c = CellId::new(42);
        assert_eq!(c.index(), 42);
        assert!(c.is_valid());

        let invalid = CellId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(CellId::default(), invalid);
    }

    #[test]
    fn test_type_safety() {
        // Different types with the same raw value.
        let c = CellId::new(0);
        let t = TriangleId::new(0);
        let e = EdgeId::new(0);
        assert_eq!(c.index(), t.index());
        assert_eq!(t.index(), e.index());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", TriangleId::new(7)), "T(7)");
        assert_eq!(format!("{:?}", EdgeId::invalid()), "E(INVALID)");
    }
}
