//! Local sample-area estimation via k nearest neighbors.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use recon_core::OrientedSample;

/// KdTree with a bucket large enough to hold many samples that share a
/// coordinate on one axis (e.g. a planar grid). kiddo's default bucket
/// size (32) panics when more items than the bucket size coincide on an
/// axis; the bucket size does not affect query results.
type AreaKdTree = KdTree<f64, u64, 3, 512, u32>;

/// Attribute a local surface area to every sample from the distance to its
/// k-th nearest neighbor: `area = pi * d_k^2 / (k - 0.5)`.
///
/// The query point itself counts among the k results, matching the
/// half-sample correction in the denominator.
pub fn estimate_sample_areas(samples: &mut [OrientedSample], neighbors: usize) {
  if samples.len() <= neighbors || neighbors < 2 {
    return;
  }

  let mut tree: AreaKdTree = KdTree::new();
  for (i, sample) in samples.iter().enumerate() {
    tree.add(
      &[
        sample.position.x as f64,
        sample.position.y as f64,
        sample.position.z as f64,
      ],
      i as u64,
    );
  }

  for sample in samples.iter_mut() {
    let found = tree.nearest_n::<SquaredEuclidean>(
      &[
        sample.position.x as f64,
        sample.position.y as f64,
        sample.position.z as f64,
      ],
      neighbors,
    );
    // Squared distance to the farthest of the k neighbors.
    let max_dist_sq = found
      .last()
      .map(|n| n.distance)
      .unwrap_or(0.0);
    sample.area = (std::f64::consts::PI * max_dist_sq / (neighbors as f64 - 0.5)) as f32;
  }
}

#[cfg(test)]
#[path = "area_test.rs"]
mod area_test;
