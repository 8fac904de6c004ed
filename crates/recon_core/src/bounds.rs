//! Sample-cloud bounds and unit-cube normalization.
//!
//! The octree lives on the unit cube. The cloud's bounding box, scaled by a
//! margin factor so all geometry stays strictly interior, defines an affine
//! map applied to every sample before construction and inverted on every
//! vertex at output time.

use glam::Vec3;

use crate::points::OrientedSample;

/// Margin applied to the largest bounding-box extent.
pub const SCALE_MARGIN: f32 = 1.1;

/// The normalization frame of one reconstruction: offset and uniform scale
/// mapping world coordinates into the unit cube.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
  pub min: Vec3,
  pub max: Vec3,
  /// Side length of the normalization cube.
  pub scale: f32,
  /// World coordinate mapped to the unit-cube origin.
  pub offset: Vec3,
}

impl Bounds {
  /// Compute the normalization frame of a sample cloud. `None` for an empty
  /// cloud.
  pub fn from_samples(samples: &[OrientedSample], margin: f32) -> Option<Self> {
    let first = samples.first()?;
    let mut min = first.position;
    let mut max = first.position;
    for sample in &samples[1..] {
      min = min.min(sample.position);
      max = max.max(sample.position);
    }

    let extent = max - min;
    let scale = extent.max_element() * margin;
    // Center the cloud inside the cube on every axis.
    let offset = (min + max - Vec3::splat(scale)) * 0.5;
    Some(Self {
      min,
      max,
      scale,
      offset,
    })
  }

  /// Map a world point into the unit cube.
  #[inline]
  pub fn normalize(&self, point: Vec3) -> Vec3 {
    (point - self.offset) / self.scale
  }

  /// Map a unit-cube point back to world coordinates.
  #[inline]
  pub fn denormalize(&self, point: Vec3) -> Vec3 {
    point * self.scale + self.offset
  }
}

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;
