//! Implicit-field evaluator contract.
//!
//! The library materializes the query lattice (the corner grid) and consumes
//! scalar values; it never computes the field itself. An evaluator receives
//! the grid positions in their stable order and must return exactly one
//! sample per position, in the same order.

use glam::Vec3;

/// One evaluated field sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
  /// Scalar field value at the query point.
  pub value: f32,
  /// Local smoothing width of the field, used to weight edge-root
  /// interpolation.
  pub smooth_width: f32,
}

/// Supplier of scalar values and smoothing widths for query points.
pub trait FieldEvaluator {
  /// Evaluate the field at every query point, preserving order.
  fn evaluate(&self, queries: &[Vec3]) -> Vec<FieldSample>;
}

/// How the extraction isovalue is chosen.
#[derive(Clone, Copy, Debug)]
pub enum IsoValue {
  /// Use the given value directly.
  Fixed(f32),
  /// Evaluate the field at the (normalized) sample positions and use the
  /// median value.
  MedianAtSamples,
}
