//! Unit-cube topology and fixed-precision corner keys.
//!
//! Every octree cell is a scaled copy of the unit cube; all index math over
//! corners, edges and faces lives here as pure functions.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! # Edge Layout
//!
//! Edges are numbered axis-major: `edge = axis * 4 + i1 + 2 * i2`, where
//! `(i1, i2)` are the edge's two transverse coordinates taken in axis order.
//!
//! ```text
//! X-axis edges:              Y-axis edges:              Z-axis edges:
//!   0: [0,1] at Y=0, Z=0       4: [0,2] at X=0, Z=0       8: [0,4] at X=0, Y=0
//!   1: [2,3] at Y=1, Z=0       5: [1,3] at X=1, Z=0       9: [1,5] at X=1, Y=0
//!   2: [4,5] at Y=0, Z=1       6: [4,6] at X=0, Z=1      10: [2,6] at X=0, Y=1
//!   3: [6,7] at Y=1, Z=1       7: [5,7] at X=1, Z=1      11: [3,7] at X=1, Y=1
//! ```
//!
//! # Face Layout
//!
//! `face = axis * 2 + side`, so 0/1 are -X/+X, 2/3 are -Y/+Y, 4/5 are -Z/+Z.
//!
//! # Corner Keys
//!
//! Octree corners are deduplicated through a packed integer key: the corner's
//! integer coordinates on the `2^(max_depth + 1)` lattice, one 18-bit lane per
//! axis in a single `u64`. Two leaves of different depth sharing a physical
//! corner always produce the same key.

use glam::Vec3;

/// Number of cube corners.
pub const CORNERS: usize = 8;

/// Number of cube edges.
pub const EDGES: usize = 12;

/// Number of cube faces.
pub const FACES: usize = 6;

/// Hard upper bound on octree depth. Deeper requests are clamped, never
/// rejected.
pub const DEPTH_LIMIT: u8 = 16;

/// Bits per axis lane in a packed corner key.
/// Corner coordinates reach `2^(DEPTH_LIMIT + 2)` inclusive, so lanes must
/// hold that value without overlap.
const KEY_FIELD_BITS: u32 = 20;

/// Integer offset of a corner within its cell.
#[inline]
pub const fn corner_offset(corner: usize) -> [u32; 3] {
  [
    (corner & 1) as u32,
    ((corner >> 1) & 1) as u32,
    ((corner >> 2) & 1) as u32,
  ]
}

/// The corner octant of `point` relative to `center`.
#[inline]
pub fn corner_index(center: Vec3, point: Vec3) -> usize {
  ((point.x > center.x) as usize)
    | (((point.y > center.y) as usize) << 1)
    | (((point.z > center.z) as usize) << 2)
}

/// Compose an edge index from its axis and two transverse coordinates
/// (in axis order).
#[inline]
pub const fn edge_index(axis: usize, i1: usize, i2: usize) -> usize {
  axis * 4 + i1 + 2 * i2
}

/// Split an edge index into `(axis, i1, i2)`.
#[inline]
pub const fn factor_edge(edge: usize) -> (usize, usize, usize) {
  (edge / 4, (edge % 4) & 1, (edge % 4) >> 1)
}

/// The two transverse axes of `axis`, in axis order.
#[inline]
pub const fn transverse_axes(axis: usize) -> (usize, usize) {
  match axis {
    0 => (1, 2),
    1 => (0, 2),
    _ => (0, 1),
  }
}

/// The two corners an edge connects, ordered along the edge's axis.
#[inline]
pub const fn edge_corners(edge: usize) -> (usize, usize) {
  let (axis, i1, i2) = factor_edge(edge);
  let (u, v) = transverse_axes(axis);
  let base = (i1 << u) | (i2 << v);
  (base, base | (1 << axis))
}

/// Compose a face index from its axis and side (0 = negative, 1 = positive).
#[inline]
pub const fn face_index(axis: usize, side: usize) -> usize {
  axis * 2 + side
}

/// Split a face index into `(axis, side)`.
#[inline]
pub const fn factor_face(face: usize) -> (usize, usize) {
  (face / 2, face % 2)
}

/// The face on the opposite side of the cube.
#[inline]
pub const fn opposite_face(face: usize) -> usize {
  face ^ 1
}

/// The two faces flanking an edge.
#[inline]
pub const fn faces_adjacent_to_edge(edge: usize) -> (usize, usize) {
  let (axis, i1, i2) = factor_edge(edge);
  let (u, v) = transverse_axes(axis);
  (face_index(u, i1), face_index(v, i2))
}

/// The face flanking both edges, if any. Triangle segments connecting two
/// crossed edges lie on such a face; segments with no shared face are interior
/// diagonals.
pub fn face_adjacent_to_edges(e1: usize, e2: usize) -> Option<usize> {
  let (f1, f2) = faces_adjacent_to_edge(e1);
  let (g1, g2) = faces_adjacent_to_edge(e2);
  if f1 == g1 || f1 == g2 {
    Some(f1)
  } else if f2 == g1 || f2 == g2 {
    Some(f2)
  } else {
    None
  }
}

/// The index of `edge` as seen from the neighbor cell across `face`.
///
/// Flips the transverse coordinate matching the face's axis; the edge's own
/// axis never matches a flanking face.
pub fn face_reflect_edge(edge: usize, face: usize) -> usize {
  let (axis, i1, i2) = factor_edge(edge);
  let (face_axis, _) = factor_face(face);
  let (u, v) = transverse_axes(axis);
  if face_axis == u {
    edge_index(axis, i1 ^ 1, i2)
  } else if face_axis == v {
    edge_index(axis, i1, i2 ^ 1)
  } else {
    edge
  }
}

/// The index of `edge` as seen from the diagonal neighbor sharing that edge.
pub const fn edge_reflect_edge(edge: usize) -> usize {
  let (axis, i1, i2) = factor_edge(edge);
  edge_index(axis, i1 ^ 1, i2 ^ 1)
}

/// The corner one grid step from `corner` in the direction of `face`,
/// within the same cell. `None` when the step leaves the cell.
#[inline]
pub const fn corner_adjacent(corner: usize, face: usize) -> Option<usize> {
  let (axis, side) = factor_face(face);
  if ((corner >> axis) & 1) == side {
    None
  } else {
    Some(corner ^ (1 << axis))
  }
}

/// Pack fixed-precision corner coordinates into one key.
#[inline]
pub const fn pack_corner_key(x: u32, y: u32, z: u32) -> u64 {
  (x as u64) | ((y as u64) << KEY_FIELD_BITS) | ((z as u64) << (2 * KEY_FIELD_BITS))
}

/// Unpack a corner key into fixed-precision coordinates.
#[inline]
pub const fn unpack_corner_key(key: u64) -> [u32; 3] {
  let mask = (1u64 << KEY_FIELD_BITS) - 1;
  [
    (key & mask) as u32,
    ((key >> KEY_FIELD_BITS) & mask) as u32,
    ((key >> (2 * KEY_FIELD_BITS)) & mask) as u32,
  ]
}

#[cfg(test)]
#[path = "cube_test.rs"]
mod cube_test;
