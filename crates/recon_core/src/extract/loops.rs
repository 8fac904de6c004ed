//! Iso-edge collection, multiplicity repair and loop assembly.
//!
//! Each leaf's isosurface boundary is gathered as directed segments between
//! edge-root keys. Segments lying on a face with a strictly finer neighbor
//! are delegated to that neighbor's face leaves (so every physical segment is
//! emitted exactly once, from the finer side); the remaining faces emit this
//! leaf's own table segments. A signed multiplicity per root tracks loop
//! balance: depth mismatches cut segments short, and the repair pass splices
//! in the sibling root on the same physical edge until every multiplicity
//! returns to zero.

use std::collections::HashMap;

use crate::cube;
use crate::error::{ReconError, Result};
use crate::mc_tables;
use crate::octree::neighbors;
use crate::octree::node::{NodeId, Octree};

use super::roots::{get_root_index, get_root_pair, is_boundary_face, RootInfo};

/// Directed segment between two root keys.
pub(crate) type SegmentList = Vec<(u64, u64)>;

struct Multiplicities {
  counts: HashMap<u64, (RootInfo, i32)>,
}

impl Multiplicities {
  fn new() -> Self {
    Self {
      counts: HashMap::new(),
    }
  }

  /// Record a directed segment: +1 at the head key, -1 at the tail key.
  fn record(&mut self, head: &RootInfo, tail: &RootInfo) {
    self
      .counts
      .entry(head.key)
      .or_insert_with(|| (head.clone(), 0))
      .1 += 1;
    self
      .counts
      .entry(tail.key)
      .or_insert_with(|| (tail.clone(), 0))
      .1 -= 1;
  }

  fn get(&self, key: u64) -> Option<&(RootInfo, i32)> {
    self.counts.get(&key)
  }

  fn adjust(&mut self, key: u64, delta: i32) {
    self.counts.get_mut(&key).expect("recorded root").1 += delta;
  }
}

/// Collect the closed iso-segment set of one leaf.
pub(crate) fn collect_iso_edges(
  tree: &Octree,
  leaf: NodeId,
  subdivision_depth: i32,
) -> Result<SegmentList> {
  let mut segments = SegmentList::new();
  let mut counts = Multiplicities::new();

  for face in 0..cube::FACES {
    let finer = neighbors::face_neighbor(tree, leaf, face)
      .filter(|&n| !tree.is_leaf(n) && !is_boundary_face(tree, leaf, face, subdivision_depth));

    match finer {
      Some(neighbor) => {
        // The finer side owns every segment on this face; it emits with
        // reversed orientation relative to this cell.
        let shared = cube::opposite_face(face);
        let mut face_cells = Vec::new();
        neighbors::face_leaves(tree, neighbor, shared, &mut face_cells);
        for cell in face_cells {
          if mc_tables::has_roots(tree.node(cell).mc_index) {
            emit_face_segments(tree, cell, shared, true, &mut segments, &mut counts)?;
          }
        }
      }
      None => {
        emit_face_segments(tree, leaf, face, false, &mut segments, &mut counts)?;
      }
    }
  }

  repair_multiplicities(tree, &mut segments, &mut counts)?;

  for (key, (_, multiplicity)) in &counts.counts {
    if *multiplicity != 0 {
      return Err(ReconError::UnbalancedLoop {
        key: *key,
        multiplicity: *multiplicity,
      });
    }
  }
  Ok(segments)
}

/// Emit the triangle-table segments of `cell` that lie on `face`.
fn emit_face_segments(
  tree: &Octree,
  cell: NodeId,
  face: usize,
  reversed: bool,
  segments: &mut SegmentList,
  counts: &mut Multiplicities,
) -> Result<()> {
  let depth = tree.node(cell).depth;
  for triangle in mc_tables::triangle_edges(tree.node(cell).mc_index) {
    for k in 0..3 {
      let e1 = triangle[k] as usize;
      let e2 = triangle[(k + 1) % 3] as usize;
      if cube::face_adjacent_to_edges(e1, e2) != Some(face) {
        continue;
      }
      let r1 =
        get_root_index(tree, cell, e1).ok_or(ReconError::UnresolvedSegment { depth })?;
      let r2 =
        get_root_index(tree, cell, e2).ok_or(ReconError::UnresolvedSegment { depth })?;
      if reversed {
        segments.push((r2.key, r1.key));
        counts.record(&r2, &r1);
      } else {
        segments.push((r1.key, r2.key));
        counts.record(&r1, &r2);
      }
    }
  }
  Ok(())
}

/// Splice sibling roots into the segment set until every multiplicity is
/// balanced. Appended repair segments are themselves re-examined, so repair
/// is transitive.
fn repair_multiplicities(
  tree: &Octree,
  segments: &mut SegmentList,
  counts: &mut Multiplicities,
) -> Result<()> {
  let mut index = 0;
  while index < segments.len() {
    let (head, tail) = segments[index];

    let head_state = counts
      .get(head)
      .map(|(info, m)| (info.clone(), *m))
      .ok_or(ReconError::UnknownRootKey { key: head })?;
    if head_state.1 != 0 {
      if let Some(pair) = get_root_pair(tree, &head_state.0) {
        if counts.get(pair.key).is_none() {
          return Err(ReconError::RootPairMissing { key: pair.key });
        }
        segments.push((pair.key, head));
        counts.adjust(pair.key, 1);
        counts.adjust(head, -1);
      }
    }

    let tail_state = counts
      .get(tail)
      .map(|(info, m)| (info.clone(), *m))
      .ok_or(ReconError::UnknownRootKey { key: tail })?;
    if tail_state.1 != 0 {
      if let Some(pair) = get_root_pair(tree, &tail_state.0) {
        if counts.get(pair.key).is_none() {
          return Err(ReconError::RootPairMissing { key: pair.key });
        }
        segments.push((tail, pair.key));
        counts.adjust(tail, 1);
        counts.adjust(pair.key, -1);
      }
    }

    index += 1;
  }
  Ok(())
}

/// Assemble a balanced segment set into closed loops.
///
/// Pops a seed segment and greedily chases matching endpoints forward and
/// backward through the remaining set. Every segment must be consumed and
/// every chain must close.
pub(crate) fn assemble_loops(mut segments: SegmentList) -> Result<Vec<Vec<(u64, u64)>>> {
  let mut loops = Vec::new();

  while !segments.is_empty() {
    let seed = segments.swap_remove(0);
    let mut front = Vec::new();
    let mut back = Vec::new();
    let mut front_key = seed.1;
    let mut back_key = seed.0;

    let mut j = segments.len() as i64 - 1;
    while j >= 0 {
      let (a, b) = segments[j as usize];
      if a == front_key || b == front_key {
        let oriented = if a == front_key { (a, b) } else { (b, a) };
        front_key = oriented.1;
        front.push(oriented);
        segments.swap_remove(j as usize);
        j = segments.len() as i64;
      } else if a == back_key || b == back_key {
        let oriented = if b == back_key { (a, b) } else { (b, a) };
        back_key = oriented.0;
        back.push(oriented);
        segments.swap_remove(j as usize);
        j = segments.len() as i64;
      }
      j -= 1;
    }

    if front_key != back_key {
      return Err(ReconError::OpenLoop);
    }

    let mut chain = Vec::with_capacity(back.len() + front.len() + 1);
    chain.extend(back.into_iter().rev());
    chain.push(seed);
    chain.extend(front);
    loops.push(chain);
  }

  Ok(loops)
}

#[cfg(test)]
#[path = "loops_test.rs"]
mod loops_test;
