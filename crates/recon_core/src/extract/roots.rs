//! Edge-root resolution across octree depths.
//!
//! An edge root is the point where the field crosses the isovalue along a
//! cell edge. The same physical edge is visible from cells of different
//! depth; resolution always recurses to the finest bordering node, so every
//! reference to a physical edge agrees on one canonical 64-bit key.

use glam::Vec3;

use crate::cube;
use crate::error::{ReconError, Result};
use crate::mc_tables;
use crate::octree::grid::CornerGrid;
use crate::octree::neighbors;
use crate::octree::node::{NodeId, Octree};

/// A resolved edge crossing: the finest node bordering the edge, the edge's
/// index within that node, and the canonical key.
#[derive(Clone, Debug)]
pub(crate) struct RootInfo {
  pub node: NodeId,
  pub edge: usize,
  pub key: u64,
}

/// Canonical key of a leaf edge: axis, the two transverse coordinates on the
/// finest lattice, and a depth-offset code along the axis, packed into one
/// `u64`.
fn root_key(tree: &Octree, leaf: NodeId, edge: usize) -> u64 {
  let (axis, i1, i2) = cube::factor_edge(edge);
  let node = tree.node(leaf);
  let shift = (tree.max_depth() - node.depth + 1) as u32;
  let (u, v) = cube::transverse_axes(axis);
  let t1 = ((node.offset[u] + i1 as u32) as u64) << shift;
  let t2 = ((node.offset[v] + i2 as u32) as u64) << shift;
  // Level-offset code: disjoint ranges per depth identify the edge's axis
  // position and depth together.
  let along = (1u64 << node.depth) + node.offset[axis] as u64 - 1;
  (axis as u64) | (t1 << 5) | (t2 << 25) | (along << 45)
}

/// Resolve the root of `edge` on `node` at the finest available resolution.
///
/// Checks the two face neighbors and then the edge neighbor for a more
/// refined view of the edge, translating the edge index by reflection, and
/// recurses through the edge's endpoint children until a leaf owns the
/// crossing. `None` when the configuration has no crossing on this edge.
pub(crate) fn get_root_index(tree: &Octree, id: NodeId, edge: usize) -> Option<RootInfo> {
  if !mc_tables::has_edge_roots(tree.node(id).mc_index, edge) {
    return None;
  }

  let (f1, f2) = cube::faces_adjacent_to_edge(edge);
  let mut finest = id;
  let mut finest_edge = edge;

  if tree.node(id).depth < tree.max_depth() {
    if let Some(n) = neighbors::face_neighbor(tree, id, f1).filter(|&n| !tree.is_leaf(n)) {
      finest = n;
      finest_edge = cube::face_reflect_edge(edge, f1);
    } else if let Some(n) = neighbors::face_neighbor(tree, id, f2).filter(|&n| !tree.is_leaf(n)) {
      finest = n;
      finest_edge = cube::face_reflect_edge(edge, f2);
    } else if let Some(n) = neighbors::edge_neighbor(tree, id, edge).filter(|&n| !tree.is_leaf(n))
    {
      finest = n;
      finest_edge = cube::edge_reflect_edge(edge);
    }
  }

  if tree.is_leaf(finest) {
    Some(RootInfo {
      node: finest,
      edge: finest_edge,
      key: root_key(tree, finest, finest_edge),
    })
  } else {
    let (c1, c2) = cube::edge_corners(finest_edge);
    get_root_index(tree, tree.child(finest, c1).unwrap(), finest_edge)
      .or_else(|| get_root_index(tree, tree.child(finest, c2).unwrap(), finest_edge))
  }
}

/// Find the sibling root sharing the same physical edge one level up.
///
/// Walks the parent chain while the node stays on the edge (its child slot is
/// one of the edge's endpoint corners); at the first ancestor whose
/// configuration no longer subdivides the edge, the crossing continues in the
/// other endpoint child.
pub(crate) fn get_root_pair(tree: &Octree, info: &RootInfo) -> Option<RootInfo> {
  let (c1, c2) = cube::edge_corners(info.edge);
  let mut id = info.node;
  while let Some(parent) = tree.parent(id) {
    let slot = tree.node(id).child_slot as usize;
    if slot != c1 && slot != c2 {
      return None;
    }
    if !mc_tables::has_edge_roots(tree.node(parent).mc_index, info.edge) {
      let sibling = if slot == c1 { c2 } else { c1 };
      return get_root_index(tree, tree.child(parent, sibling).unwrap(), info.edge);
    }
    id = parent;
  }
  None
}

/// Interpolated position of a resolved edge root.
///
/// The crossing ratio is weighted by each corner's smoothing width, biasing
/// the root toward the corner with the tighter width; the ratio is clamped to
/// the edge.
pub(crate) fn root_position(
  tree: &Octree,
  grid: &CornerGrid,
  info: &RootInfo,
  isovalue: f32,
) -> Result<Vec3> {
  let (c1, c2) = cube::edge_corners(info.edge);
  let node = tree.node(info.node);

  let lookup = |corner: usize| -> Result<_> {
    match node.corners[corner] {
      Some(id) => Ok(grid.point(id)),
      None => {
        let key = tree.corner_key(info.node, corner);
        let id = grid.get(key).ok_or(ReconError::MissingGridPoint { key })?;
        Ok(grid.point(id))
      }
    }
  };
  let g1 = lookup(c1)?;
  let g2 = lookup(c2)?;

  let numerator = (g1.value - isovalue) * g1.smooth_width;
  let denominator = numerator - (g2.value - isovalue) * g2.smooth_width;
  let ratio = if denominator.abs() < f32::MIN_POSITIVE {
    0.5
  } else {
    (numerator / denominator).clamp(0.0, 1.0)
  };

  Ok(g1.coords + (g2.coords - g1.coords) * ratio)
}

/// Whether an edge must be resolved independently of coarser neighbors,
/// under the streaming subdivision depth.
///
/// Interior streaming pools are not materialized (every root stays in-core
/// at subdivision depth 0), so only the face variant currently gates
/// emission.
#[allow(dead_code)]
pub(crate) fn is_boundary_edge(
  tree: &Octree,
  id: NodeId,
  edge: usize,
  subdivision_depth: i32,
) -> bool {
  if subdivision_depth < 0 {
    return false;
  }
  let node = tree.node(id);
  if (node.depth as i32) <= subdivision_depth {
    return true;
  }
  let (axis, i1, i2) = cube::factor_edge(edge);
  let (u, v) = cube::transverse_axes(axis);
  let idx1 = ((node.offset[u] as i64) << 1) + ((i1 as i64) << 1);
  let idx2 = ((node.offset[v] as i64) << 1) + ((i2 as i64) << 1);
  let mask = 2i64 << (node.depth as i32 - subdivision_depth);
  idx1 % mask == 0 || idx2 % mask == 0
}

/// Face analogue of [`is_boundary_edge`].
pub(crate) fn is_boundary_face(
  tree: &Octree,
  id: NodeId,
  face: usize,
  subdivision_depth: i32,
) -> bool {
  if subdivision_depth < 0 {
    return false;
  }
  let node = tree.node(id);
  if (node.depth as i32) <= subdivision_depth {
    return true;
  }
  let (axis, side) = cube::factor_face(face);
  let idx = ((node.offset[axis] as i64) << 1) + ((side as i64) << 1);
  idx % (2i64 << (node.depth as i32 - subdivision_depth)) == 0
}

#[cfg(test)]
#[path = "roots_test.rs"]
mod roots_test;
