use std::collections::HashMap;

use glam::Vec3;

use super::*;
use crate::bounds::Bounds;
use crate::field::{FieldEvaluator, FieldSample, IsoValue};
use crate::octree::grid::build_corner_grid;
use crate::octree::node::Octree;
use crate::points::OrientedSample;
use crate::reconstruct;

/// Exact signed-distance sphere, evaluated in normalized coordinates.
struct SphereField {
  center: Vec3,
  radius: f32,
}

impl FieldEvaluator for SphereField {
  fn evaluate(&self, queries: &[Vec3]) -> Vec<FieldSample> {
    queries
      .iter()
      .map(|&q| FieldSample {
        value: (q - self.center).length() - self.radius,
        smooth_width: 0.05,
      })
      .collect()
  }
}

/// Roughly uniform sphere sampling with outward normals.
fn sphere_cloud(count: usize, radius: f32) -> Vec<OrientedSample> {
  let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
  (0..count)
    .map(|i| {
      let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
      let ring = (1.0 - y * y).sqrt();
      let angle = golden * i as f32;
      let normal = Vec3::new(angle.cos() * ring, y, angle.sin() * ring);
      OrientedSample::new(normal * radius, normal)
    })
    .collect()
}

/// Count how often each undirected edge appears across all polygons.
fn undirected_edge_counts(mesh: &CoredMesh) -> HashMap<(u64, u64), usize> {
  let key = |r: PointRef| ((r.in_core as u64) << 32) | r.index as u64;
  let mut counts = HashMap::new();
  for polygon in &mesh.polygons {
    for i in 0..polygon.len() {
      let a = key(polygon[i]);
      let b = key(polygon[(i + 1) % polygon.len()]);
      *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
    }
  }
  counts
}

/// A field below the isovalue at exactly one shell corner produces the
/// single-corner Marching Cubes case: one triangle.
#[test]
fn test_single_corner_emits_one_triangle() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let mut grid = build_corner_grid(&mut tree).unwrap();

  let samples: Vec<FieldSample> = grid
    .positions()
    .iter()
    .map(|&p| FieldSample {
      value: if p == Vec3::ZERO { -1.0 } else { 1.0 },
      smooth_width: 1.0,
    })
    .collect();
  grid.apply_field(&samples).unwrap();

  let config = crate::config::ReconConfig::new();
  let mesh = extract_iso_surface(&mut tree, &grid, 0.0, &config).unwrap();

  assert_eq!(mesh.polygon_count(), 1, "exactly one triangle");
  assert_eq!(mesh.polygons[0].len(), 3);
  assert_eq!(mesh.in_core_points.len(), 3);
  for &p in &mesh.in_core_points {
    assert!(p.cmpge(Vec3::ZERO).all() && p.cmple(Vec3::splat(0.5)).all());
  }
}

/// A plane crossing a mixed-depth tree: the coarse side of every T-junction
/// face must inherit the fine side's segments, never duplicate them.
#[test]
fn test_mixed_depth_plane() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  tree.init_children(c0);
  let mut grid = build_corner_grid(&mut tree).unwrap();

  let samples: Vec<FieldSample> = grid
    .positions()
    .iter()
    .map(|&p| FieldSample {
      value: p.z - 0.3,
      smooth_width: 1.0,
    })
    .collect();
  grid.apply_field(&samples).unwrap();

  let config = crate::config::ReconConfig::new();
  let mesh = extract_iso_surface(&mut tree, &grid, 0.0, &config).unwrap();

  assert!(mesh.polygon_count() > 0);
  // Interior edges pair exactly; edges on the open domain boundary appear
  // once. Any count above 2 is a double emission across the T-junction.
  for ((a, b), count) in undirected_edge_counts(&mesh) {
    assert!(
      count <= 2,
      "edge ({}, {}) emitted {} times",
      a,
      b,
      count
    );
  }
  // All vertices sit on the crossing plane.
  for &p in &mesh.in_core_points {
    assert!((p.z - 0.3).abs() < 1e-5, "vertex off the plane: {:?}", p);
  }
}

/// Axis-aligned box signed distance, for the cube-cloud scenario.
struct BoxField {
  min: Vec3,
  max: Vec3,
}

impl FieldEvaluator for BoxField {
  fn evaluate(&self, queries: &[Vec3]) -> Vec<FieldSample> {
    let center = (self.min + self.max) * 0.5;
    let half = (self.max - self.min) * 0.5;
    queries
      .iter()
      .map(|&q| {
        let d = (q - center).abs() - half;
        let outside = d.max(Vec3::ZERO).length();
        let inside = d.max_element().min(0.0);
        FieldSample {
          value: outside + inside,
          smooth_width: 0.05,
        }
      })
      .collect()
  }
}

/// Eight corner samples with outward normals at max depth 3 reconstruct a
/// single closed box surface across the adaptively refined tree.
#[test]
fn test_cube_cloud_reconstruction_closed() {
  let mut samples: Vec<OrientedSample> = (0..8)
    .map(|corner| {
      let position = Vec3::new(
        (corner & 1) as f32,
        ((corner >> 1) & 1) as f32,
        ((corner >> 2) & 1) as f32,
      );
      let normal = (position - Vec3::splat(0.5)).normalize();
      OrientedSample::new(position, normal)
    })
    .collect();
  let config = crate::config::ReconConfig::new().with_max_depth(3);

  let result = reconstruct(
    &mut samples,
    &config,
    IsoValue::Fixed(0.0),
    |_samples: &[OrientedSample], bounds: &Bounds| BoxField {
      min: bounds.normalize(Vec3::ZERO),
      max: bounds.normalize(Vec3::ONE),
    },
  )
  .unwrap();

  let mesh = &result.mesh;
  assert!(mesh.polygon_count() > 0, "box must produce a surface");
  for (_, count) in undirected_edge_counts(mesh) {
    assert_eq!(count, 2, "closed surface: every edge borders two polygons");
  }
}

/// End-to-end reconstruction of a sphere cloud yields a closed surface:
/// every undirected edge is shared by exactly two polygons.
#[test]
fn test_sphere_reconstruction_is_closed() {
  let mut samples = sphere_cloud(400, 0.8);
  let config = crate::config::ReconConfig::new()
    .with_max_depth(4)
    .with_min_depth(2);

  let result = reconstruct(
    &mut samples,
    &config,
    IsoValue::Fixed(0.0),
    |_samples: &[OrientedSample], bounds: &Bounds| SphereField {
      center: bounds.normalize(Vec3::ZERO),
      radius: 0.8 / bounds.scale,
    },
  )
  .unwrap();

  let mesh = &result.mesh;
  assert!(mesh.polygon_count() > 10, "sphere must produce a real mesh");

  for (_, count) in undirected_edge_counts(mesh) {
    assert_eq!(count, 2, "closed surface: every edge borders two polygons");
  }

  // Vertices stay inside the unit cube and near the sphere.
  let center = result.bounds.normalize(Vec3::ZERO);
  let radius = 0.8 / result.bounds.scale;
  for &p in &mesh.in_core_points {
    assert!(p.cmpge(Vec3::ZERO).all() && p.cmple(Vec3::ONE).all());
    let distance = (p - center).length();
    assert!(
      (distance - radius).abs() < radius * 0.5,
      "vertex far off the sphere: {:?}",
      p
    );
  }
}

/// The same reconstruction in polygon mode emits n-gons but stays closed.
#[test]
fn test_sphere_polygon_mode() {
  let mut samples = sphere_cloud(400, 0.8);
  let config = crate::config::ReconConfig::new()
    .with_max_depth(4)
    .with_min_depth(2)
    .with_polygon_mesh(true);

  let result = reconstruct(
    &mut samples,
    &config,
    IsoValue::Fixed(0.0),
    |_samples: &[OrientedSample], bounds: &Bounds| SphereField {
      center: bounds.normalize(Vec3::ZERO),
      radius: 0.8 / bounds.scale,
    },
  )
  .unwrap();

  assert!(result.mesh.polygon_count() > 10);
  for (_, count) in undirected_edge_counts(&result.mesh) {
    assert_eq!(count, 2);
  }
}
