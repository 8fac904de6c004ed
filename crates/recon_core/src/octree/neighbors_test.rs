use super::*;
use crate::cube;
use crate::octree::node::Octree;

/// Face steps between siblings resolve at the same depth; steps off the
/// root cube resolve to nothing.
#[test]
fn test_sibling_face_neighbors() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  let c1 = tree.child(root, 1).unwrap();
  let c2 = tree.child(root, 2).unwrap();

  assert_eq!(face_neighbor(&tree, c0, cube::face_index(0, 1)), Some(c1));
  assert_eq!(face_neighbor(&tree, c0, cube::face_index(1, 1)), Some(c2));
  assert_eq!(face_neighbor(&tree, c1, cube::face_index(0, 0)), Some(c0));
  assert_eq!(
    face_neighbor(&tree, c1, cube::face_index(0, 1)),
    None,
    "stepping off the root cube"
  );
  assert_eq!(face_neighbor(&tree, root, 0), None);
}

/// An unrefined neighbor region resolves to the coarser covering leaf.
#[test]
fn test_coarser_neighbor() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  let c1 = tree.child(root, 1).unwrap();
  tree.init_children(c0);

  // Child 7 of c0 touches c1 across +X; c1 is not refined.
  let inner = tree.child(c0, 7).unwrap();
  assert_eq!(
    face_neighbor(&tree, inner, cube::face_index(0, 1)),
    Some(c1),
    "must stop at the realized (coarser) depth"
  );
}

/// Diagonal edge neighbors resolve through two axes at once.
#[test]
fn test_edge_neighbor() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();

  // Edge 7 (Y axis at X=1, Z=1) points toward the (+X, +Z) sibling.
  assert_eq!(
    edge_neighbor(&tree, c0, 7),
    Some(tree.child(root, 5).unwrap())
  );
  // Edge 4 (Y axis at X=0, Z=0) leaves the cube.
  assert_eq!(edge_neighbor(&tree, c0, 4), None);
}

/// The creating variant materializes the neighbor at the query depth, and
/// read-only resolution then finds it.
#[test]
fn test_neighbor_or_create() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  tree.init_children(c0);
  let inner = tree.child(c0, 7).unwrap();

  let created = neighbor_or_create(&mut tree, inner, [1, 0, 0]).unwrap();
  assert_eq!(tree.depth(created), tree.depth(inner));
  assert_eq!(
    neighbor(&tree, inner, [1, 0, 0]),
    Some(created),
    "read-only lookup must now find the created node"
  );

  // Creation never escapes the root cube.
  assert_eq!(neighbor_or_create(&mut tree, inner, [-1, -1, -1]), None);
}

/// The 3x3x3 neighborhood centers on the node itself.
#[test]
fn test_neighborhood_center() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c7 = tree.child(root, 7).unwrap();

  let hood = neighborhood_or_create(&mut tree, c7);
  assert_eq!(hood[1][1][1], Some(c7));
  assert_eq!(hood[0][1][1], face_neighbor(&tree, c7, cube::face_index(0, 0)));
  // Past the +X boundary.
  assert_eq!(hood[2][1][1], None);
}

/// Face leaves enumerate exactly the subtree leaves touching the face.
#[test]
fn test_face_leaves() {
  let mut tree = Octree::new(4);
  let root = tree.root();
  tree.init_children(root);
  let c1 = tree.child(root, 1).unwrap();
  tree.init_children(c1);

  let mut out = Vec::new();
  face_leaves(&tree, c1, cube::face_index(0, 0), &mut out);
  assert_eq!(out.len(), 4);
  for id in out {
    assert_eq!(tree.node(id).offset[0] % 2, 0, "leaf must touch the -X face");
  }

  // An unrefined subtree is its own single face leaf.
  let c2 = tree.child(root, 2).unwrap();
  let mut out = Vec::new();
  face_leaves(&tree, c2, 0, &mut out);
  assert_eq!(out, vec![c2]);
}
