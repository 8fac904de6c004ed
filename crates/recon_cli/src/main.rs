//! Surface reconstruction from oriented point clouds.
//!
//! Reads a line-oriented point file (`x y z nx ny nz` per line), estimates
//! per-sample areas, builds the adaptive octree, evaluates the smoothed
//! winding-number field on the corner grid, extracts the isosurface and
//! writes an ASCII PLY mesh.

mod area;
mod gauss;
mod ply;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use recon_core::{reconstruct, Bounds, IsoValue, OrientedSample, ReconConfig};
use tracing::info;

use gauss::GaussField;

/// Watertight surface reconstruction from an oriented point cloud.
#[derive(Parser, Debug)]
#[command(name = "recon")]
#[command(about = "Reconstructs a triangle mesh from oriented points")]
struct Args {
  /// Input point file: six floats per line (position and normal).
  #[arg(short, long)]
  input: PathBuf,

  /// Output PLY path.
  #[arg(short, long)]
  output: PathBuf,

  /// Maximum octree depth.
  #[arg(short = 'd', long, default_value_t = 8)]
  depth: u8,

  /// Minimum octree depth.
  #[arg(short = 'm', long, default_value_t = 1)]
  min_depth: u8,

  /// Neighbor count for local area estimation (0 disables).
  #[arg(short = 'a', long, default_value_t = 16)]
  neighbors: usize,

  /// Smoothing width of the winding-number field.
  #[arg(short = 'w', long, default_value_t = 0.01)]
  width: f32,

  /// Fixed isovalue; defaults to the median field value at the samples.
  #[arg(long)]
  iso: Option<f32>,

  /// Emit n-gon polygons instead of triangulating loops.
  #[arg(long)]
  polygon: bool,

  /// Fan-triangulate coplanar loops around a barycenter vertex.
  #[arg(long)]
  barycenter: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_max_level(tracing::Level::INFO)
    .init();

  let args = Args::parse();

  let file = File::open(&args.input)
    .with_context(|| format!("cannot open input file {}", args.input.display()))?;
  let mut samples = recon_core::read_oriented_points(BufReader::new(file))
    .with_context(|| format!("cannot parse samples from {}", args.input.display()))?;
  info!(samples = samples.len(), "point cloud loaded");

  if args.neighbors > 0 {
    area::estimate_sample_areas(&mut samples, args.neighbors);
    info!(neighbors = args.neighbors, "sample areas estimated");
  }

  let config = ReconConfig::new()
    .with_max_depth(args.depth)
    .with_min_depth(args.min_depth)
    .with_polygon_mesh(args.polygon)
    .with_barycenter(args.barycenter);

  let isovalue = match args.iso {
    Some(value) => IsoValue::Fixed(value),
    None => IsoValue::MedianAtSamples,
  };

  let width = args.width;
  let result = reconstruct(
    &mut samples,
    &config,
    isovalue,
    |samples: &[OrientedSample], _bounds: &Bounds| GaussField::new(samples, width),
  )?;
  info!(
    isovalue = result.isovalue,
    grid_points = result.grid_points,
    polygons = result.mesh.polygon_count(),
    vertices = result.mesh.vertex_count(),
    "surface extracted"
  );

  ply::write_polygons(&args.output, &result.mesh, &result.bounds)?;
  info!(path = %args.output.display(), "mesh written");
  Ok(())
}
