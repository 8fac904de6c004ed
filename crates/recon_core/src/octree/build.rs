//! Adaptive octree construction by sample splatting.
//!
//! Construction runs in two kernel passes over the samples plus three
//! cleanup passes over the tree:
//!
//! 1. **Density pass**: every sample walks from the root to
//!    `max_depth - 2`, depositing unit weight into the 3x3x3 same-depth
//!    neighborhood of each visited node through a separable quadratic
//!    B-spline kernel. Children and neighbors are created on demand, so the
//!    tree refines wherever samples concentrate.
//! 2. **Orientation pass**: every sample estimates its own splat depth by
//!    reading the accumulated kernel weight at its leaf and walking
//!    ancestors until the weight crosses the samples-per-node target. The
//!    fractional depth interpolates between `ceil(depth)` and its parent:
//!    the normal-magnitude signal is deposited into both levels, weighted by
//!    the fractional mixing coefficient, which keeps the extracted surface
//!    continuous across depth transitions instead of snapping at a cutoff.
//! 3. **Clip**: subtrees whose normal-magnitude signal stays below epsilon
//!    everywhere carry no orientation information and are removed.
//! 4. **Sample push-down**: sample indices recorded at splat nodes fall to
//!    the leaf containing them, by octant test.
//! 5. **Ancestry marking**: `has_sample` propagates from populated leaves
//!    to every ancestor.

use glam::Vec3;
use tracing::{debug, info};

use crate::bounds::Bounds;
use crate::config::ReconConfig;
use crate::cube;
use crate::error::{ReconError, Result};
use crate::points::OrientedSample;

use super::neighbors;
use super::node::{NodeId, Octree};

/// Signal threshold below which a subtree counts as orientation-free.
pub(crate) const EPSILON: f32 = 1e-6;

/// Normalization for the B-spline bins of the density kernel: a uniform
/// surface sampling should accumulate about one unit of weight per node.
const SAMPLE_SCALE: f64 = 1.0 / (0.125 * 0.125 + 0.75 * 0.75 + 0.125 * 0.125);

/// Build the adaptive octree from an oriented sample cloud.
///
/// Samples are normalized into the unit cube in place; the returned
/// [`Bounds`] invert that map for output. Fails on an empty cloud.
pub fn build_octree(
  samples: &mut [OrientedSample],
  config: &ReconConfig,
) -> Result<(Octree, Bounds)> {
  let config = config.clone().clamped();
  let bounds =
    Bounds::from_samples(samples, config.scale_factor).ok_or(ReconError::NoSamples)?;
  for sample in samples.iter_mut() {
    sample.position = bounds.normalize(sample.position);
  }

  let mut tree = Octree::new(config.max_depth);

  let splat_depth = config.max_depth.saturating_sub(2);
  if splat_depth > 0 {
    for sample in samples.iter() {
      splat_density(&mut tree, sample.position, splat_depth);
    }
  }
  debug!(nodes = tree.node_count(), "density pass done");

  let normal_scale = (2u32 << config.max_depth) as f32;
  for (index, sample) in samples.iter().enumerate() {
    splat_oriented_point(
      &mut tree,
      sample.position,
      normal_scale,
      splat_depth,
      &config,
      index as u32,
    );
  }

  clip_tree(&mut tree);
  tree.max_depth = tree.realized_depth() + 1;
  info!(
    max_depth = tree.max_depth - 1,
    nodes = tree.node_count(),
    "octree built"
  );

  push_samples_to_leaves(&mut tree, samples);
  mark_sample_ancestry(&mut tree);

  Ok((tree, bounds))
}

/// Walk a sample from the root to the density splat depth, depositing unit
/// weight at every visited level.
fn splat_density(tree: &mut Octree, position: Vec3, splat_depth: u8) {
  let mut id = tree.root();
  loop {
    add_weight_contribution(tree, id, position, 1.0);
    if tree.node(id).depth >= splat_depth {
      break;
    }
    if tree.node(id).children.is_none() {
      tree.init_children(id);
    }
    let (center, _) = tree.center_and_width(id);
    let slot = cube::corner_index(center, position);
    id = tree.child(id, slot).unwrap();
  }
}

/// Separable quadratic B-spline bins of a position against a node's 3-cell
/// neighborhood along each axis.
fn bspline_bins(center: Vec3, position: Vec3, width: f32, scale_first: bool) -> [[f64; 3]; 3] {
  let mut bins = [[0f64; 3]; 3];
  let width = width as f64;
  for axis in 0..3 {
    let center_c = center[axis] as f64;
    let position_c = position[axis] as f64;
    let x = (center_c - position_c - width) / width;
    bins[axis][0] = 1.125 + 1.5 * x + 0.5 * x * x;
    let x = (center_c - position_c) / width;
    bins[axis][1] = 0.75 - x * x;
    bins[axis][2] = 1.0 - bins[axis][1] - bins[axis][0];
    if scale_first {
      bins[axis][0] *= SAMPLE_SCALE;
    }
  }
  bins
}

/// Distribute `weight` into the node's 3x3x3 neighborhood weight
/// accumulators.
fn add_weight_contribution(tree: &mut Octree, id: NodeId, position: Vec3, weight: f32) {
  let (center, width) = tree.center_and_width(id);
  let bins = bspline_bins(center, position, width, true);
  let hood = neighbors::neighborhood_or_create(tree, id);
  for i in 0..3 {
    for j in 0..3 {
      let dxdy = bins[0][i] * bins[1][j] * weight as f64;
      for k in 0..3 {
        if let Some(n) = hood[i][j][k] {
          tree.node_mut(n).weight += (dxdy * bins[2][k]) as f32;
        }
      }
    }
  }
}

/// Accumulated kernel weight seen by a position at a node's depth.
fn kernel_weight_sum(tree: &mut Octree, id: NodeId, position: Vec3) -> f32 {
  let (center, width) = tree.center_and_width(id);
  let bins = bspline_bins(center, position, width, false);
  let hood = neighbors::neighborhood_or_create(tree, id);
  let mut sum = 0f64;
  for i in 0..3 {
    for j in 0..3 {
      let dxdy = bins[0][i] * bins[1][j];
      for k in 0..3 {
        if let Some(n) = hood[i][j][k] {
          sum += dxdy * bins[2][k] * tree.node(n).weight as f64;
        }
      }
    }
  }
  sum as f32
}

/// Estimate the fractional splat depth of a sample and the matching depth
/// weight, by walking ancestors until the accumulated kernel weight crosses
/// the samples-per-node target.
fn sample_depth_and_weight(
  tree: &mut Octree,
  leaf: NodeId,
  position: Vec3,
  samples_per_node: f32,
) -> (f32, f32) {
  let mut node = leaf;
  let weight = kernel_weight_sum(tree, node, position);

  let depth = if weight >= samples_per_node {
    tree.node(node).depth as f32 + (weight / samples_per_node).ln() / 4f32.ln()
  } else {
    let mut old_weight = weight;
    let mut new_weight = weight;
    while new_weight < samples_per_node {
      let Some(parent) = tree.node(node).parent else {
        break;
      };
      node = parent;
      old_weight = new_weight;
      new_weight = kernel_weight_sum(tree, node, position);
    }
    tree.node(node).depth as f32
      + (new_weight / samples_per_node).ln() / (new_weight / old_weight).ln()
  };

  if !depth.is_finite() {
    // Degenerate weights (no density pass ran, or identical ancestor
    // weights); fall back to the node's own depth.
    let fallback = tree.node(node).depth as f32;
    return (fallback, 4f32.powf(-fallback));
  }
  (depth, 4f32.powf(-depth))
}

/// Splat one sample's normal-magnitude signal at its estimated depth,
/// fractionally mixed with the parent level.
fn splat_oriented_point(
  tree: &mut Octree,
  position: Vec3,
  normal_scale: f32,
  splat_depth: u8,
  config: &ReconConfig,
  sample_index: u32,
) {
  // Descend to the density-pass leaf containing the sample.
  let mut node = tree.root();
  while tree.node(node).depth < splat_depth {
    if tree.node(node).children.is_none() {
      // The density pass created this path; a missing child means the
      // sample escaped the unit cube.
      debug!("sample outside splatted region, skipping");
      return;
    }
    let (center, _) = tree.center_and_width(node);
    let slot = cube::corner_index(center, position);
    node = tree.child(node, slot).unwrap();
  }

  let (raw_depth, alpha) =
    sample_depth_and_weight(tree, node, position, config.samples_per_node);
  let depth = raw_depth.clamp(config.min_depth as f32, config.max_depth as f32);

  let mut top_depth = depth.ceil() as i32;
  let mut mix = 1.0 - (top_depth as f32 - depth);
  if top_depth <= config.min_depth as i32 {
    top_depth = config.min_depth as i32;
    mix = 1.0;
  } else if top_depth > config.max_depth as i32 {
    top_depth = config.max_depth as i32;
    mix = 1.0;
  }

  while tree.node(node).depth as i32 > top_depth {
    node = tree.node(node).parent.unwrap();
  }
  while (tree.node(node).depth as i32) < top_depth {
    if tree.node(node).children.is_none() {
      tree.init_children(node);
    }
    let (center, _) = tree.center_and_width(node);
    let slot = cube::corner_index(center, position);
    node = tree.child(node, slot).unwrap();
  }

  let width = 1.0 / (1u32 << tree.node(node).depth) as f32;
  let magnitude = normal_scale * alpha / width.powi(3) * mix;
  tree.node_mut(node).samples.push(sample_index);
  splat_normal_magnitude(tree, node, position, magnitude);

  if (1.0 - mix).abs() > EPSILON {
    if let Some(parent) = tree.node(node).parent {
      let parent_width = 1.0 / (1u32 << tree.node(parent).depth) as f32;
      let parent_magnitude = normal_scale * alpha / parent_width.powi(3) * (1.0 - mix);
      splat_normal_magnitude(tree, parent, position, parent_magnitude);
    }
  }
}

/// Deposit a normal-magnitude contribution into a node's 3x3x3 neighborhood.
fn splat_normal_magnitude(tree: &mut Octree, id: NodeId, position: Vec3, magnitude: f32) {
  let (center, width) = tree.center_and_width(id);
  let bins = bspline_bins(center, position, width, false);
  let hood = neighbors::neighborhood_or_create(tree, id);
  for i in 0..3 {
    for j in 0..3 {
      let dxdy = bins[0][i] * bins[1][j];
      for k in 0..3 {
        if let Some(n) = hood[i][j][k] {
          tree.node_mut(n).normal_len += (dxdy * bins[2][k]) as f32 * magnitude;
        }
      }
    }
  }
}

/// Remove every subtree carrying no normal-magnitude signal above epsilon.
pub(crate) fn clip_tree(tree: &mut Octree) {
  let mut stack = vec![tree.root()];
  while let Some(id) = stack.pop() {
    if tree.node(id).children.is_none() {
      continue;
    }
    let keep =
      (0..cube::CORNERS).any(|slot| has_normals(tree, tree.child(id, slot).unwrap()));
    if keep {
      for slot in 0..cube::CORNERS {
        stack.push(tree.child(id, slot).unwrap());
      }
    } else {
      tree.node_mut(id).children = None;
    }
  }
}

fn has_normals(tree: &Octree, id: NodeId) -> bool {
  if tree.node(id).normal_len.abs() > EPSILON {
    return true;
  }
  match tree.node(id).children {
    Some(_) => (0..cube::CORNERS).any(|slot| has_normals(tree, tree.child(id, slot).unwrap())),
    None => false,
  }
}

/// Push splat-time sample indices down to the leaves containing them.
fn push_samples_to_leaves(tree: &mut Octree, samples: &[OrientedSample]) {
  for id in tree.node_ids() {
    if tree.node(id).samples.is_empty() || tree.node(id).children.is_none() {
      continue;
    }
    let (center, _) = tree.center_and_width(id);
    let pending = std::mem::take(&mut tree.node_mut(id).samples);
    for sample_index in pending {
      let slot = cube::corner_index(center, samples[sample_index as usize].position);
      let child = tree.child(id, slot).unwrap();
      tree.node_mut(child).samples.push(sample_index);
    }
  }
}

/// Mark every ancestor of a populated leaf.
fn mark_sample_ancestry(tree: &mut Octree) {
  for leaf in tree.leaf_ids() {
    if tree.node(leaf).samples.is_empty() {
      continue;
    }
    tree.node_mut(leaf).has_sample = true;
    let mut id = leaf;
    while let Some(parent) = tree.node(id).parent {
      if tree.node(parent).has_sample {
        break;
      }
      tree.node_mut(parent).has_sample = true;
      id = parent;
    }
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
