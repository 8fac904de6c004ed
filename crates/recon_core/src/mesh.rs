//! Mesh sink for extracted polygons.

use glam::Vec3;

/// Reference into one of the mesh's two point pools.
///
/// Edge-root vertices land in the in-core pool; synthesized barycenters land
/// in the out-of-core pool. Both are held in memory here, but polygon
/// references keep the discriminator so the pools can be streamed separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointRef {
  pub in_core: bool,
  pub index: u32,
}

impl PointRef {
  pub fn in_core(index: u32) -> Self {
    Self {
      in_core: true,
      index,
    }
  }

  pub fn out_of_core(index: u32) -> Self {
    Self {
      in_core: false,
      index,
    }
  }
}

/// Accumulated reconstruction output: two point pools and a flat polygon
/// list referencing them.
#[derive(Default)]
pub struct CoredMesh {
  pub in_core_points: Vec<Vec3>,
  pub out_of_core_points: Vec<Vec3>,
  pub polygons: Vec<Vec<PointRef>>,
}

impl CoredMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an in-core point, returning its pool index.
  pub fn add_in_core_point(&mut self, point: Vec3) -> u32 {
    self.in_core_points.push(point);
    (self.in_core_points.len() - 1) as u32
  }

  /// Append an out-of-core point, returning its pool index.
  pub fn add_out_of_core_point(&mut self, point: Vec3) -> u32 {
    self.out_of_core_points.push(point);
    (self.out_of_core_points.len() - 1) as u32
  }

  pub fn add_polygon(&mut self, polygon: Vec<PointRef>) {
    self.polygons.push(polygon);
  }

  /// Resolve a point reference to its position.
  pub fn position(&self, point: PointRef) -> Vec3 {
    if point.in_core {
      self.in_core_points[point.index as usize]
    } else {
      self.out_of_core_points[point.index as usize]
    }
  }

  pub fn polygon_count(&self) -> usize {
    self.polygons.len()
  }

  pub fn vertex_count(&self) -> usize {
    self.in_core_points.len() + self.out_of_core_points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.polygons.is_empty()
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
