use glam::Vec3;

use super::*;
use crate::mesh::CoredMesh;

fn total_area(positions: &[Vec3], triangles: &[[usize; 3]]) -> f32 {
  triangles
    .iter()
    .map(|&[a, b, c]| {
      (positions[b] - positions[a])
        .cross(positions[c] - positions[a])
        .length()
        * 0.5
    })
    .sum()
}

/// A planar square triangulates into two triangles covering its area.
#[test]
fn test_square() {
  let square = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  ];
  let triangles = triangulate_loop(&square);
  assert_eq!(triangles.len(), 2);
  assert!((total_area(&square, &triangles) - 1.0).abs() < 1e-6);
}

/// A convex planar loop always yields n - 2 triangles using every vertex.
#[test]
fn test_hexagon() {
  let hexagon: Vec<Vec3> = (0..6)
    .map(|i| {
      let angle = i as f32 / 6.0 * std::f32::consts::TAU;
      Vec3::new(angle.cos(), angle.sin(), 0.0)
    })
    .collect();
  let triangles = triangulate_loop(&hexagon);
  assert_eq!(triangles.len(), 4);

  let mut used: Vec<usize> = triangles.iter().flatten().copied().collect();
  used.sort_unstable();
  used.dedup();
  assert_eq!(used, vec![0, 1, 2, 3, 4, 5], "every vertex must be used");

  // Planar polygon: triangulated area equals the polygon area.
  let expected = 6.0 * (std::f32::consts::TAU / 6.0).sin() * 0.5;
  assert!((total_area(&hexagon, &triangles) - expected).abs() < 1e-4);
}

/// A non-planar quad flips its diagonal when that reduces total area.
#[test]
fn test_flip_improves_bent_quad() {
  // Fan from vertex 0 starts on the 0-2 diagonal; the 1-3 diagonal is
  // strictly better for this bend.
  let quad = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
  ];
  let triangles = triangulate_loop(&quad);
  assert_eq!(triangles.len(), 2);
  for triangle in &triangles {
    assert!(
      !(triangle.contains(&0) && triangle.contains(&2)),
      "0-2 diagonal must have been flipped away, got {:?}",
      triangles
    );
  }
}

/// Internal diagonals keep consistent winding: each appears once per
/// direction.
#[test]
fn test_consistent_winding() {
  let hexagon: Vec<Vec3> = (0..6)
    .map(|i| {
      let angle = i as f32 / 6.0 * std::f32::consts::TAU;
      Vec3::new(angle.cos(), angle.sin(), (i % 2) as f32 * 0.3)
    })
    .collect();
  let triangles = triangulate_loop(&hexagon);

  let mut directed = std::collections::HashSet::new();
  for &[a, b, c] in &triangles {
    for (x, y) in [(a, b), (b, c), (c, a)] {
      assert!(
        directed.insert((x, y)),
        "directed edge ({}, {}) duplicated",
        x,
        y
      );
    }
  }
}

/// Loop emission modes: triangle, n-gon and barycenter fan.
#[test]
fn test_add_loop_modes() {
  use crate::config::ReconConfig;
  use crate::mesh::PointRef;

  let mut mesh = CoredMesh::new();
  let refs: Vec<PointRef> = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  ]
  .iter()
  .map(|&p| PointRef::in_core(mesh.add_in_core_point(p)))
  .collect();

  // Polygon mode passes the n-gon through.
  let config = ReconConfig::new().with_polygon_mesh(true);
  assert_eq!(add_loop_polygons(&mut mesh, refs.clone(), &config), 1);
  assert_eq!(mesh.polygons.last().unwrap().len(), 4);

  // Barycenter mode fans a coplanar quad around a synthesized center.
  let config = ReconConfig::new().with_barycenter(true);
  assert_eq!(add_loop_polygons(&mut mesh, refs.clone(), &config), 4);
  assert_eq!(mesh.out_of_core_points.len(), 1);
  assert_eq!(
    mesh.out_of_core_points[0],
    Vec3::new(0.5, 0.5, 0.0),
    "barycenter of the quad"
  );

  // Default mode triangulates.
  let config = ReconConfig::new();
  assert_eq!(add_loop_polygons(&mut mesh, refs, &config), 2);
}
