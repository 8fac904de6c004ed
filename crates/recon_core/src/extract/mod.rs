//! Hierarchical Marching Cubes isosurface extraction.
//!
//! Extraction reads the corner grid's field values over the adaptive octree
//! and produces a watertight polygon mesh. The difficulty is entirely at
//! depth boundaries:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    THE T-JUNCTION PROBLEM                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   COARSE LEAF (depth d)       FINE LEAVES (depth d+1)           │
//! │                                                                 │
//! │   +----------------+          +-------+-------+                 │
//! │   |                |          |       |       |                 │
//! │   |                |          +-------X-------+                 │
//! │   |                |          |       |       |                 │
//! │   +----------------+          +-------+-------+                 │
//! │                                                                 │
//! │   The shared face hosts corners (X) the coarse side never       │
//! │   classified. A crossing on a fine half-edge has no coarse      │
//! │   counterpart: emitted naively from both sides, segments        │
//! │   duplicate, and emitted from one side they stop dead at X.     │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Three mechanisms keep the output consistent:
//!
//! - **Finest-side resolution**: every edge root resolves through the most
//!   refined node bordering the edge, so all cells agree on one canonical
//!   key per physical crossing.
//! - **Finer-side emission**: a face with a strictly finer neighbor
//!   delegates its segments to that neighbor's face leaves; each physical
//!   segment is emitted exactly once.
//! - **Multiplicity repair**: signed per-root counts detect segments cut
//!   short by depth mismatch; the sibling root on the same physical edge is
//!   spliced in until every count balances, and any residual imbalance
//!   aborts extraction.
//!
//! Pipeline per extraction: classify corners (with upward propagation of
//! shared-corner bits), resolve and position all roots, then per leaf:
//! collect segments, repair, assemble loops, polygonize.

pub mod loops;
pub mod roots;
pub mod triangulate;

use std::collections::HashMap;

use tracing::debug;

use crate::config::ReconConfig;
use crate::cube;
use crate::error::{ReconError, Result};
use crate::mc_tables;
use crate::mesh::{CoredMesh, PointRef};
use crate::octree::grid::CornerGrid;
use crate::octree::node::{NodeId, Octree};

use roots::{get_root_index, root_position};

/// Extract the isosurface of the field held by `grid` over `tree`.
///
/// The field evaluator must have written every grid point before this is
/// called.
pub fn extract_iso_surface(
  tree: &mut Octree,
  grid: &CornerGrid,
  isovalue: f32,
  config: &ReconConfig,
) -> Result<CoredMesh> {
  let mut mesh = CoredMesh::new();

  set_iso_corners(tree, grid, isovalue, config.subdivision_depth)?;

  let leaves = tree.leaf_ids();
  let mut root_index: HashMap<u64, u32> = HashMap::new();
  for &leaf in &leaves {
    set_root_positions(tree, grid, leaf, isovalue, &mut root_index, &mut mesh)?;
  }
  debug!(roots = root_index.len(), "edge roots positioned");

  for &leaf in &leaves {
    let segments = loops::collect_iso_edges(tree, leaf, config.subdivision_depth)?;
    for chain in loops::assemble_loops(segments)? {
      let refs = chain
        .iter()
        .map(|&(key, _)| {
          root_index
            .get(&key)
            .map(|&index| PointRef::in_core(index))
            .ok_or(ReconError::UnknownRootKey { key })
        })
        .collect::<Result<Vec<_>>>()?;
      triangulate::add_loop_polygons(&mut mesh, refs, config);
    }
  }

  debug!(
    polygons = mesh.polygon_count(),
    vertices = mesh.vertex_count(),
    "isosurface extracted"
  );
  Ok(mesh)
}

/// Classify every leaf's corners against the isovalue and propagate
/// shared-corner bits upward.
///
/// Nodes above the subdivision depth classify their own corners the same
/// way. A set bit whose corner index equals the node's child slot lies on a
/// corner shared with the parent; it propagates up the chain of ancestors
/// reached through that same slot, keeping coarse configurations consistent
/// with their refined descendants for later edge-root lookup.
fn set_iso_corners(
  tree: &mut Octree,
  grid: &CornerGrid,
  isovalue: f32,
  subdivision_depth: i32,
) -> Result<()> {
  let ids = tree.node_ids();
  for &id in &ids {
    tree.node_mut(id).mc_index = 0;
  }

  for &id in &ids {
    let node = tree.node(id);
    if !(node.children.is_none() || (node.depth as i32) < subdivision_depth) {
      continue;
    }

    let mut mask = 0u8;
    for corner in 0..cube::CORNERS {
      let point = match tree.node(id).corners[corner] {
        Some(grid_id) => grid.point(grid_id),
        None => {
          let key = tree.corner_key(id, corner);
          let grid_id = grid.get(key).ok_or(ReconError::MissingGridPoint { key })?;
          grid.point(grid_id)
        }
      };
      if point.value < isovalue {
        mask |= 1 << corner;
      }
    }
    tree.node_mut(id).mc_index = mask;

    propagate_shared_corner(tree, id, mask);
  }
  Ok(())
}

fn propagate_shared_corner(tree: &mut Octree, id: NodeId, mask: u8) {
  let Some(mut parent) = tree.parent(id) else {
    return;
  };
  let slot = tree.node(id).child_slot;
  let bit = mask & (1 << slot);
  if bit == 0 {
    return;
  }
  tree.node_mut(parent).mc_index |= bit;
  while let Some(grandparent) = tree.parent(parent) {
    if tree.node(parent).child_slot != slot {
      break;
    }
    tree.node_mut(grandparent).mc_index |= bit;
    parent = grandparent;
  }
}

/// Resolve and position every edge root of one leaf, deduplicating by
/// canonical key into the in-core pool.
fn set_root_positions(
  tree: &Octree,
  grid: &CornerGrid,
  leaf: NodeId,
  isovalue: f32,
  root_index: &mut HashMap<u64, u32>,
  mesh: &mut CoredMesh,
) -> Result<()> {
  if !mc_tables::has_roots(tree.node(leaf).mc_index) {
    return Ok(());
  }
  for axis in 0..3 {
    for i1 in 0..2 {
      for i2 in 0..2 {
        let edge = cube::edge_index(axis, i1, i2);
        let Some(info) = get_root_index(tree, leaf, edge) else {
          continue;
        };
        if root_index.contains_key(&info.key) {
          continue;
        }
        let position = root_position(tree, grid, &info, isovalue)?;
        let index = mesh.add_in_core_point(position);
        root_index.insert(info.key, index);
      }
    }
  }
  Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
