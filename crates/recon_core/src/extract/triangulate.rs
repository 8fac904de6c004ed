//! Polygonization of closed root loops.
//!
//! Three-vertex loops emit directly. Longer loops either pass through as
//! n-gons (polygon mode), fan around a synthesized barycenter when an exact
//! coordinate coincidence marks them coplanar, or run a fan triangulation
//! minimized by diagonal flips.

use glam::Vec3;

use crate::config::ReconConfig;
use crate::mesh::{CoredMesh, PointRef};

/// Emit one closed loop into the mesh. Returns the number of polygons added.
pub(crate) fn add_loop_polygons(
  mesh: &mut CoredMesh,
  loop_refs: Vec<PointRef>,
  config: &ReconConfig,
) -> usize {
  if config.polygon_mesh {
    mesh.add_polygon(loop_refs);
    return 1;
  }
  match loop_refs.len() {
    0..=2 => 0,
    3 => {
      mesh.add_polygon(loop_refs);
      1
    }
    _ => add_complex_loop(mesh, loop_refs, config),
  }
}

fn add_complex_loop(mesh: &mut CoredMesh, loop_refs: Vec<PointRef>, config: &ReconConfig) -> usize {
  let count = loop_refs.len();
  let positions: Vec<Vec3> = loop_refs.iter().map(|&r| mesh.position(r)).collect();

  // Exact coordinate coincidence between non-adjacent vertices marks an
  // axis-aligned (coplanar) loop.
  let mut coplanar = false;
  for i in 0..count {
    for j in 0..i {
      if (i + 1) % count == j || (j + 1) % count == i {
        continue;
      }
      let a = positions[i];
      let b = positions[j];
      if a.x == b.x || a.y == b.y || a.z == b.z {
        coplanar = true;
      }
    }
  }

  if config.add_barycenter && coplanar {
    let barycenter = positions.iter().sum::<Vec3>() / count as f32;
    let center = PointRef::out_of_core(mesh.add_out_of_core_point(barycenter));
    for i in 0..count {
      mesh.add_polygon(vec![loop_refs[i], loop_refs[(i + 1) % count], center]);
    }
    return count;
  }

  let triangles = triangulate_loop(&positions);
  let added = triangles.len();
  for [a, b, c] in triangles {
    mesh.add_polygon(vec![loop_refs[a], loop_refs[b], loop_refs[c]]);
  }
  added
}

/// Triangulate a closed vertex loop: fan from the first vertex, then flip
/// any internal diagonal whose flip strictly reduces total triangle area,
/// until no flip improves.
pub(crate) fn triangulate_loop(positions: &[Vec3]) -> Vec<[usize; 3]> {
  let count = positions.len();
  let mut triangles: Vec<[usize; 3]> = (1..count - 1).map(|i| [0, i, i + 1]).collect();

  // Flip count is bounded: total area strictly decreases with each flip.
  let max_passes = count * count * 4;
  for _ in 0..max_passes {
    if !flip_one(positions, &mut triangles) {
      break;
    }
  }
  triangles
}

/// Apply the first area-improving diagonal flip found, if any.
fn flip_one(positions: &[Vec3], triangles: &mut [[usize; 3]]) -> bool {
  for i in 0..triangles.len() {
    for j in 0..i {
      let Some((a, b, c, d)) = shared_diagonal(triangles[i], triangles[j]) else {
        continue;
      };
      let old_area = triangle_area(positions, a, b, c) + triangle_area(positions, a, b, d);
      let new_area = triangle_area(positions, a, d, c) + triangle_area(positions, d, b, c);
      if new_area < old_area * (1.0 - 1e-5) {
        triangles[i] = [a, d, c];
        triangles[j] = [d, b, c];
        return true;
      }
    }
  }
  false
}

/// If two triangles share a directed diagonal, return `(a, b, c, d)` where
/// the first contains `a -> b` with apex `c` and the second contains
/// `b -> a` with apex `d`.
fn shared_diagonal(t1: [usize; 3], t2: [usize; 3]) -> Option<(usize, usize, usize, usize)> {
  for k in 0..3 {
    let a = t1[k];
    let b = t1[(k + 1) % 3];
    let c = t1[(k + 2) % 3];
    if let Some(d) = apex_of(t2, b, a) {
      return Some((a, b, c, d));
    }
  }
  None
}

/// Apex of `t` when it contains the directed edge `a -> b`.
fn apex_of(t: [usize; 3], a: usize, b: usize) -> Option<usize> {
  for k in 0..3 {
    if t[k] == a && t[(k + 1) % 3] == b {
      return Some(t[(k + 2) % 3]);
    }
  }
  None
}

fn triangle_area(positions: &[Vec3], a: usize, b: usize, c: usize) -> f32 {
  (positions[b] - positions[a])
    .cross(positions[c] - positions[a])
    .length()
    * 0.5
}

#[cfg(test)]
#[path = "triangulate_test.rs"]
mod triangulate_test;
