//! recon_core - adaptive octree surface reconstruction
//!
//! This crate rebuilds a watertight triangle mesh from an unorganized,
//! oriented point cloud. It owns the geometric machinery: an octree refined
//! adaptively by sample density, the deduplicated corner grid the implicit
//! field is evaluated on, and a hierarchical Marching Cubes extractor that
//! stitches correctly across octree cells of differing depth.
//!
//! The implicit field itself is external: anything implementing
//! [`FieldEvaluator`] (typically a smoothed winding-number solver) supplies
//! one scalar value and one smoothing width per corner-grid point.
//!
//! # Example
//!
//! ```ignore
//! use recon_core::{reconstruct, IsoValue, ReconConfig};
//!
//! let mut samples = recon_core::read_oriented_points(reader)?;
//! let config = ReconConfig::new().with_max_depth(8);
//! let result = reconstruct(&mut samples, &config, IsoValue::MedianAtSamples,
//!   |samples, bounds| MyField::new(samples))?;
//! println!("{} polygons", result.mesh.polygon_count());
//! ```

pub mod bounds;
pub mod config;
pub mod cube;
pub mod error;
pub mod extract;
pub mod field;
pub mod mc_tables;
pub mod mesh;
pub mod octree;
pub mod points;

// Re-export the pipeline surface.
pub use bounds::Bounds;
pub use config::ReconConfig;
pub use error::{ReconError, Result};
pub use extract::extract_iso_surface;
pub use field::{FieldEvaluator, FieldSample, IsoValue};
pub use mesh::{CoredMesh, PointRef};
pub use octree::{build_corner_grid, build_octree, CornerGrid, Octree};
pub use points::{read_oriented_points, OrientedSample};

use tracing::info;

/// Output of one [`reconstruct`] run.
pub struct Reconstruction {
  /// Extracted mesh, in normalized (unit-cube) coordinates. Apply
  /// [`Bounds::denormalize`] per vertex for world coordinates.
  pub mesh: CoredMesh,
  /// Normalization frame of the input cloud.
  pub bounds: Bounds,
  /// Isovalue the surface was extracted at.
  pub isovalue: f32,
  /// Number of unique corner-grid points evaluated.
  pub grid_points: usize,
}

/// Run the full pipeline: build the octree, derive the corner grid, evaluate
/// the field, extract the isosurface.
///
/// `make_field` receives the samples after normalization into the unit cube,
/// together with the normalization frame, and returns the field evaluator.
pub fn reconstruct<E, F>(
  samples: &mut [OrientedSample],
  config: &ReconConfig,
  isovalue: IsoValue,
  make_field: F,
) -> Result<Reconstruction>
where
  E: FieldEvaluator,
  F: FnOnce(&[OrientedSample], &Bounds) -> E,
{
  let (mut tree, bounds) = build_octree(samples, config)?;
  let mut grid = build_corner_grid(&mut tree)?;

  let evaluator = make_field(samples, &bounds);
  let field = evaluator.evaluate(&grid.positions());
  grid.apply_field(&field)?;

  let isovalue = match isovalue {
    IsoValue::Fixed(value) => value,
    IsoValue::MedianAtSamples => {
      let positions: Vec<_> = samples.iter().map(|s| s.position).collect();
      let mut values: Vec<f32> = evaluator
        .evaluate(&positions)
        .iter()
        .map(|s| s.value)
        .collect();
      let mid = values.len() / 2;
      values.select_nth_unstable_by(mid, f32::total_cmp);
      values[mid]
    }
  };
  info!(isovalue, grid_points = grid.len(), "field evaluated");

  let mesh = extract_iso_surface(&mut tree, &grid, isovalue, config)?;
  Ok(Reconstruction {
    mesh,
    bounds,
    isovalue,
    grid_points: grid.len(),
  })
}
