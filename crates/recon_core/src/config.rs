//! Configuration for octree construction and isosurface extraction.

use tracing::warn;

use crate::cube::DEPTH_LIMIT;

/// Configuration threaded through construction and extraction.
#[derive(Clone, Debug)]
pub struct ReconConfig {
  /// Maximum octree depth. Requests beyond [`DEPTH_LIMIT`] are clamped with
  /// a warning.
  pub max_depth: u8,

  /// Minimum splat depth per sample.
  pub min_depth: u8,

  /// Target accumulated kernel weight per node; drives the adaptive splat
  /// depth.
  pub samples_per_node: f32,

  /// Bounding-cube margin factor (> 1 keeps geometry strictly interior).
  pub scale_factor: f32,

  /// Subdivision depth for boundary/interior streaming classification.
  /// 0 keeps every root in the in-core pool.
  pub subdivision_depth: i32,

  /// Emit full n-gons instead of triangulating loops.
  pub polygon_mesh: bool,

  /// Fan-triangulate coplanar loops around a synthesized barycenter.
  pub add_barycenter: bool,
}

impl Default for ReconConfig {
  fn default() -> Self {
    Self {
      max_depth: 8,
      min_depth: 1,
      samples_per_node: 1.0,
      scale_factor: crate::bounds::SCALE_MARGIN,
      subdivision_depth: 0,
      polygon_mesh: false,
      add_barycenter: false,
    }
  }
}

impl ReconConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, depth: u8) -> Self {
    self.max_depth = depth;
    self
  }

  pub fn with_min_depth(mut self, depth: u8) -> Self {
    self.min_depth = depth;
    self
  }

  pub fn with_samples_per_node(mut self, samples: f32) -> Self {
    self.samples_per_node = samples;
    self
  }

  pub fn with_polygon_mesh(mut self, polygon: bool) -> Self {
    self.polygon_mesh = polygon;
    self
  }

  pub fn with_barycenter(mut self, barycenter: bool) -> Self {
    self.add_barycenter = barycenter;
    self
  }

  /// Clamp depths into the supported range. Out-of-range values warn, they
  /// never fail.
  pub fn clamped(mut self) -> Self {
    if self.max_depth > DEPTH_LIMIT {
      warn!(
        requested = self.max_depth,
        limit = DEPTH_LIMIT,
        "max depth beyond hard limit, clamping"
      );
      self.max_depth = DEPTH_LIMIT;
    }
    if self.min_depth > self.max_depth {
      warn!(
        min_depth = self.min_depth,
        max_depth = self.max_depth,
        "min depth exceeds max depth, clamping"
      );
      self.min_depth = self.max_depth;
    }
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
