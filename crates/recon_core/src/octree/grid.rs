//! The deduplicated corner grid (dual lattice).
//!
//! Every octree leaf exposes 8 corners; physically coincident corners of
//! different leaves collapse onto a single grid point through their packed
//! corner key. The resulting point set is the query lattice handed to the
//! field evaluator, which writes one scalar value and one smoothing width
//! per point before extraction begins.
//!
//! Points are stored in a dense arena addressed by stable [`GridId`] handles;
//! the key map only resolves keys to handles, so inserts never invalidate
//! existing references.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use crate::cube;
use crate::error::{ReconError, Result};
use crate::field::FieldSample;

use super::node::Octree;

/// Handle to a grid point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GridId(pub(crate) u32);

/// One unique octree-corner point.
#[derive(Clone, Debug)]
pub struct GridPoint {
  /// Packed fixed-precision position; the deduplication key.
  pub key: u64,
  /// Position in the unit cube, decoded from the key.
  pub coords: Vec3,
  /// Field value, written by the evaluator.
  pub value: f32,
  /// Field smoothing width, written by the evaluator.
  pub smooth_width: f32,
  /// Shallowest leaf depth incident on this corner.
  pub min_depth: u8,
  /// Deepest leaf depth incident on this corner.
  pub max_depth: u8,
  /// Resolved neighbors along -X,+X,-Y,+Y,-Z,+Z.
  pub(crate) adjacent: [Option<GridId>; cube::FACES],
  /// Candidate neighbor keys seeded from incident leaves.
  pub(crate) adjacent_key: [Option<u64>; cube::FACES],
  /// Already placed in the evaluation order.
  ordered: bool,
}

/// The corner grid: dense point arena plus the key map.
pub struct CornerGrid {
  map: HashMap<u64, GridId>,
  points: Vec<GridPoint>,
  /// Stable evaluation order (first touch in depth-first leaf order).
  order: Vec<GridId>,
}

impl CornerGrid {
  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Resolve a corner key.
  pub fn get(&self, key: u64) -> Option<GridId> {
    self.map.get(&key).copied()
  }

  pub fn point(&self, id: GridId) -> &GridPoint {
    &self.points[id.0 as usize]
  }

  /// Grid positions in evaluation order, for the field evaluator.
  pub fn positions(&self) -> Vec<Vec3> {
    self.order.iter().map(|&id| self.point(id).coords).collect()
  }

  /// Write evaluator output back into the grid. Requires exactly one sample
  /// per point, in evaluation order.
  pub fn apply_field(&mut self, samples: &[FieldSample]) -> Result<()> {
    if samples.len() != self.order.len() {
      return Err(ReconError::FieldSizeMismatch {
        expected: self.order.len(),
        actual: samples.len(),
      });
    }
    for (&id, sample) in self.order.iter().zip(samples) {
      let point = &mut self.points[id.0 as usize];
      point.value = sample.value;
      point.smooth_width = sample.smooth_width;
    }
    Ok(())
  }
}

/// Build the corner grid over a constructed octree, back-filling every
/// leaf's corner references.
pub fn build_corner_grid(tree: &mut Octree) -> Result<CornerGrid> {
  let mut grid = CornerGrid {
    map: HashMap::new(),
    points: Vec::new(),
    order: Vec::new(),
  };
  let step = 1.0 / (1u64 << (tree.max_depth + 1)) as f32;
  let leaves = tree.leaf_ids();

  // Deduplicate corners into the arena and back-reference them from leaves.
  for &leaf in &leaves {
    let depth = tree.node(leaf).depth;
    for corner in 0..cube::CORNERS {
      let key = tree.corner_key(leaf, corner);
      let id = match grid.map.get(&key) {
        Some(&id) => id,
        None => {
          let id = GridId(grid.points.len() as u32);
          let lattice = cube::unpack_corner_key(key);
          grid.points.push(GridPoint {
            key,
            coords: Vec3::new(
              lattice[0] as f32 * step,
              lattice[1] as f32 * step,
              lattice[2] as f32 * step,
            ),
            value: 0.0,
            smooth_width: 0.0,
            min_depth: depth,
            max_depth: depth,
            adjacent: [None; cube::FACES],
            adjacent_key: [None; cube::FACES],
            ordered: false,
          });
          grid.map.insert(key, id);
          id
        }
      };
      tree.node_mut(leaf).corners[corner] = Some(id);
    }
  }

  // Depth spans, adjacency candidates and the evaluation order.
  for &leaf in &leaves {
    let depth = tree.node(leaf).depth;
    for corner in 0..cube::CORNERS {
      let id = tree.node(leaf).corners[corner].unwrap();
      let point = &mut grid.points[id.0 as usize];
      point.min_depth = point.min_depth.min(depth);
      point.max_depth = point.max_depth.max(depth);
      if !point.ordered {
        point.ordered = true;
        grid.order.push(id);
      }

      for face in 0..cube::FACES {
        let Some(adjacent_corner) = cube::corner_adjacent(corner, face) else {
          continue;
        };
        let candidate = tree.corner_key(leaf, adjacent_corner);
        let point = &mut grid.points[id.0 as usize];
        match point.adjacent_key[face] {
          None => point.adjacent_key[face] = Some(candidate),
          // Prefer the closer candidate; finer incident leaves contribute
          // nearer corners.
          Some(existing) => {
            if point.key.abs_diff(existing) > point.key.abs_diff(candidate) {
              point.adjacent_key[face] = Some(candidate);
            }
          }
        }
      }
    }
  }

  // Resolve candidate keys to handles, linking both directions at once so
  // adjacency stays symmetric.
  for index in 0..grid.points.len() {
    for face in 0..cube::FACES {
      if grid.points[index].adjacent[face].is_some() {
        continue;
      }
      let Some(key) = grid.points[index].adjacent_key[face] else {
        continue;
      };
      let other = grid.get(key).ok_or(ReconError::MissingGridPoint { key })?;
      let opposite = cube::opposite_face(face);
      if grid.points[other.0 as usize].adjacent[opposite].is_some() {
        continue;
      }
      grid.points[index].adjacent[face] = Some(other);
      grid.points[other.0 as usize].adjacent[opposite] = Some(GridId(index as u32));
    }
  }

  debug!(points = grid.len(), leaves = leaves.len(), "corner grid built");
  Ok(grid)
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
