//! Smoothed winding-number field over the sample cloud.
//!
//! Direct evaluation of the Gauss integral: for a query point `q`,
//!
//! ```text
//! wn(q) = sum_j area_j * n_j . (p_j - q) / (4 pi * max(|p_j - q|, w)^3)
//! ```
//!
//! which is ~1 inside a closed, outward-oriented cloud and ~0 outside; the
//! smoothing width `w` regularizes the kernel near the surface. Grid values
//! are the negated winding number so the interior lies below the isovalue.
//!
//! Evaluation is the plain O(N*M) sum; a treecode or fast multipole
//! acceleration would slot in behind the same trait.

use glam::Vec3;
use recon_core::{FieldEvaluator, FieldSample, OrientedSample};

/// The field evaluator backing the CLI: area-weighted normals over the
/// normalized cloud, mapped to `[-1, 1]^3`.
pub struct GaussField {
  points: Vec<Vec3>,
  weighted_normals: Vec<Vec3>,
  width: f32,
}

impl GaussField {
  /// Build from samples already normalized into the unit cube.
  pub fn new(samples: &[OrientedSample], width: f32) -> Self {
    let points = samples
      .iter()
      .map(|s| s.position * 2.0 - Vec3::ONE)
      .collect();
    let weighted_normals = samples
      .iter()
      .map(|s| s.normal.normalize_or_zero() * s.area)
      .collect();
    Self {
      points,
      weighted_normals,
      width,
    }
  }

  /// Raw winding number at a unit-cube query point.
  pub fn winding_number(&self, query: Vec3) -> f32 {
    let q = query * 2.0 - Vec3::ONE;
    let mut sum = 0f64;
    for (&p, &n) in self.points.iter().zip(&self.weighted_normals) {
      let r = p - q;
      let dist = r.length().max(self.width);
      sum += (n.dot(r) as f64) / (dist as f64).powi(3);
    }
    (sum / (4.0 * std::f64::consts::PI)) as f32
  }
}

impl FieldEvaluator for GaussField {
  fn evaluate(&self, queries: &[Vec3]) -> Vec<FieldSample> {
    queries
      .iter()
      .map(|&q| FieldSample {
        value: -self.winding_number(q),
        smooth_width: self.width / 2.0,
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "gauss_test.rs"]
mod gauss_test;
