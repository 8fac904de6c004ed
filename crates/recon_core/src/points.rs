//! Oriented point samples and line-oriented ingestion.

use std::io::BufRead;

use glam::Vec3;

use crate::error::{ReconError, Result};

/// Fallback per-sample area when no local-area estimate is available.
pub const DEFAULT_SAMPLE_AREA: f32 = 1e-5;

/// One input sample: a surface position with an orientation normal and an
/// estimated local surface area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedSample {
  pub position: Vec3,
  pub normal: Vec3,
  /// Local surface area attributed to this sample. Weights the field
  /// evaluator, not the octree splat.
  pub area: f32,
}

impl OrientedSample {
  pub fn new(position: Vec3, normal: Vec3) -> Self {
    Self {
      position,
      normal,
      area: DEFAULT_SAMPLE_AREA,
    }
  }
}

/// Parse oriented samples from a line-oriented reader.
///
/// Each line carries six whitespace-separated floats `x y z nx ny nz`. The
/// first line that does not parse terminates ingestion; zero parsed samples
/// is an error.
pub fn read_oriented_points<R: BufRead>(reader: R) -> Result<Vec<OrientedSample>> {
  let mut samples = Vec::new();

  for line in reader.lines() {
    let line = line?;
    let Some(sample) = parse_line(&line) else {
      break;
    };
    samples.push(sample);
  }

  if samples.is_empty() {
    return Err(ReconError::NoSamples);
  }
  Ok(samples)
}

fn parse_line(line: &str) -> Option<OrientedSample> {
  let mut fields = line.split_whitespace();
  let mut values = [0f32; 6];
  for value in values.iter_mut() {
    *value = fields.next()?.parse().ok()?;
  }
  Some(OrientedSample::new(
    Vec3::new(values[0], values[1], values[2]),
    Vec3::new(values[3], values[4], values[5]),
  ))
}

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;
