use super::*;
use crate::octree::node::Octree;

/// A consistent 3-cycle assembles into one closed loop.
#[test]
fn test_assemble_single_loop() {
  let segments = vec![(1, 2), (2, 3), (3, 1)];
  let loops = assemble_loops(segments).unwrap();
  assert_eq!(loops.len(), 1);
  assert_eq!(loops[0].len(), 3);
  let chain = &loops[0];
  for window in chain.windows(2) {
    assert_eq!(window[0].1, window[1].0, "chain must be connected");
  }
  assert_eq!(chain.last().unwrap().1, chain[0].0, "loop must close");
}

/// Segment orientation is repaired while chasing endpoints.
#[test]
fn test_assemble_mixed_orientation() {
  let segments = vec![(1, 2), (3, 2), (3, 1)];
  let loops = assemble_loops(segments).unwrap();
  assert_eq!(loops.len(), 1);
  let chain = &loops[0];
  assert_eq!(chain.len(), 3);
  assert_eq!(chain.last().unwrap().1, chain[0].0);
}

/// Disjoint cycles assemble into separate loops, consuming every segment.
#[test]
fn test_assemble_two_loops() {
  let segments = vec![(1, 2), (2, 3), (3, 1), (10, 11), (11, 12), (12, 10)];
  let loops = assemble_loops(segments).unwrap();
  assert_eq!(loops.len(), 2);
  assert_eq!(loops.iter().map(Vec::len).sum::<usize>(), 6);
}

/// An open chain is an extraction bug, not a valid outcome.
#[test]
fn test_open_chain_fails() {
  let segments = vec![(1, 2), (2, 3)];
  assert!(matches!(
    assemble_loops(segments),
    Err(crate::error::ReconError::OpenLoop)
  ));
}

/// A single-corner leaf on the cube shell emits one balanced 3-segment
/// loop from its own faces.
#[test]
fn test_collect_single_corner_leaf() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c0 = tree.child(root, 0).unwrap();
  tree.node_mut(c0).mc_index = 1;

  let segments = collect_iso_edges(&tree, c0, 0).unwrap();
  assert_eq!(segments.len(), 3, "three face-lying sides of one triangle");

  let loops = assemble_loops(segments).unwrap();
  assert_eq!(loops.len(), 1);
  assert_eq!(loops[0].len(), 3);
}

/// A leaf with no surface contributes nothing.
#[test]
fn test_collect_empty_leaf() {
  let mut tree = Octree::new(3);
  let root = tree.root();
  tree.init_children(root);
  let c7 = tree.child(root, 7).unwrap();

  let segments = collect_iso_edges(&tree, c7, 0).unwrap();
  assert!(segments.is_empty());
}
