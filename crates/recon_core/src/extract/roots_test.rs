use glam::Vec3;

use super::*;
use crate::field::FieldSample;
use crate::octree::grid::build_corner_grid;

/// Two siblings referencing the same physical edge agree on the canonical
/// key.
#[test]
fn test_canonical_key_agreement() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  let c1 = tree.child(root, 1).unwrap();

  // Corner 1 of child 0 coincides with corner 0 of child 1; both sides see
  // a crossing on the shared Y edge at the x = 0.5 plane.
  tree.node_mut(c0).mc_index = 1 << 1;
  tree.node_mut(c1).mc_index = 1 << 0;

  let from_c0 = get_root_index(&tree, c0, cube::edge_index(1, 1, 0)).unwrap();
  let from_c1 = get_root_index(&tree, c1, cube::edge_index(1, 0, 0)).unwrap();
  assert_eq!(
    from_c0.key, from_c1.key,
    "same physical edge must resolve to one key"
  );
}

/// Root resolution recurses into a finer neighbor sharing the edge.
#[test]
fn test_resolution_prefers_finer_side() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  let c1 = tree.child(root, 1).unwrap();
  tree.init_children(c0);

  // The fine half-cells along the shared face both cross the edge.
  let fine_low = tree.child(c0, 1).unwrap();
  let fine_high = tree.child(c0, 5).unwrap();
  tree.node_mut(c0).mc_index = 1 << 1;
  tree.node_mut(fine_low).mc_index = 1 << 1;
  tree.node_mut(fine_high).mc_index = 0;
  tree.node_mut(c1).mc_index = 1 << 0;

  // Child 1's -X face edge resolves through refined child 0 into the fine
  // leaf that actually crosses.
  let info = get_root_index(&tree, c1, cube::edge_index(1, 0, 0)).unwrap();
  assert_eq!(info.node, fine_low, "must resolve at the finest crossing leaf");
  assert_eq!(tree.depth(info.node), 2);
}

/// No crossing on the edge resolves to nothing.
#[test]
fn test_uncrossed_edge() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  tree.node_mut(c0).mc_index = 1 << 1;
  assert!(get_root_index(&tree, c0, cube::edge_index(0, 1, 1)).is_none());
}

/// Width-weighted interpolation biases the crossing toward the corner with
/// the tighter smoothing width, clamped to the edge.
#[test]
fn test_root_position_width_weighting() {
  let mut tree = Octree::new(2);
  let root = tree.root();
  let mut grid = build_corner_grid(&mut tree).unwrap();

  // Field crosses edge 0 (corner 0 -> corner 1) at equal magnitude.
  let positions = grid.positions();
  let samples: Vec<FieldSample> = positions
    .iter()
    .map(|p| FieldSample {
      value: if *p == Vec3::ZERO { -1.0 } else { 1.0 },
      smooth_width: if *p == Vec3::new(1.0, 0.0, 0.0) {
        1.0
      } else {
        3.0
      },
    })
    .collect();
  grid.apply_field(&samples).unwrap();

  tree.node_mut(root).mc_index = 1;
  let info = get_root_index(&tree, root, 0).unwrap();
  let position = root_position(&tree, &grid, &info, 0.0).unwrap();

  // ratio = (-1)(3) / ((-1)(3) - (1)(1)) = 0.75
  assert!((position.x - 0.75).abs() < 1e-6, "got {}", position.x);
  assert_eq!(position.y, 0.0);
  assert_eq!(position.z, 0.0);
}

/// Equal-width interpolation is plain linear interpolation.
#[test]
fn test_root_position_linear() {
  let mut tree = Octree::new(2);
  let root = tree.root();
  let mut grid = build_corner_grid(&mut tree).unwrap();

  let positions = grid.positions();
  let samples: Vec<FieldSample> = positions
    .iter()
    .map(|p| FieldSample {
      value: if *p == Vec3::ZERO { -1.0 } else { 3.0 },
      smooth_width: 1.0,
    })
    .collect();
  grid.apply_field(&samples).unwrap();

  tree.node_mut(root).mc_index = 1;
  let info = get_root_index(&tree, root, 0).unwrap();
  let position = root_position(&tree, &grid, &info, 0.0).unwrap();
  assert!((position.x - 0.25).abs() < 1e-6);
}

/// Boundary classification at subdivision depth 0: only faces on the unit
/// cube's shell are boundary.
#[test]
fn test_boundary_face() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();

  assert!(is_boundary_face(&tree, root, 0, 0), "shallow nodes are boundary");
  assert!(is_boundary_face(&tree, c0, cube::face_index(0, 0), 0));
  assert!(!is_boundary_face(&tree, c0, cube::face_index(0, 1), 0));
  assert!(
    !is_boundary_face(&tree, c0, cube::face_index(0, 1), -1),
    "negative subdivision depth disables boundaries"
  );
}

/// Edge analogue of the boundary test.
#[test]
fn test_boundary_edge() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c7 = tree.child(root, 7).unwrap();

  // Edge 3 (X at Y=1, Z=1) of child 7 runs along the cube shell.
  assert!(is_boundary_edge(&tree, c7, 3, 0));
  // Edge 0 (X at Y=0, Z=0) of child 7 is interior.
  assert!(!is_boundary_edge(&tree, c7, 0, 0));
}
