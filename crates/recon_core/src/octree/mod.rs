//! Adaptive octree over the unit cube.
//!
//! The tree is stored as an arena: nodes live in one `Vec`, children are
//! allocated as contiguous blocks of 8, and every node records its parent
//! index and its slot within the parent's block. Refinement tracks local
//! sample density during splatting; subtrees that accumulate no orientation
//! signal are clipped before extraction.
//!
//! # Module Structure
//!
//! - [`node`]: arena storage, node queries, corner keys, traversal
//! - [`build`]: adaptive sample splatting and tree construction
//! - [`neighbors`]: same-depth neighbor resolution across the tree
//! - [`grid`]: the deduplicated corner grid (dual lattice)

pub mod build;
pub mod grid;
pub mod neighbors;
pub mod node;

pub use build::build_octree;
pub use grid::{build_corner_grid, CornerGrid, GridId, GridPoint};
pub use node::{NodeId, Octree};
