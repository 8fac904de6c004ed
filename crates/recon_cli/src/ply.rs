//! ASCII PLY polygon writer.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use recon_core::{Bounds, CoredMesh};

/// Write the mesh as an ASCII PLY file, denormalizing every vertex back
/// into the input cloud's coordinate frame.
///
/// In-core points come first; out-of-core (barycenter) points follow, so
/// polygon references into the second pool are offset by the in-core count.
pub fn write_polygons(path: &Path, mesh: &CoredMesh, bounds: &Bounds) -> Result<()> {
  let file = std::fs::File::create(path)
    .with_context(|| format!("cannot write mesh to {}", path.display()))?;
  let mut out = BufWriter::new(file);

  writeln!(out, "ply")?;
  writeln!(out, "format ascii 1.0")?;
  writeln!(out, "element vertex {}", mesh.vertex_count())?;
  writeln!(out, "property float x")?;
  writeln!(out, "property float y")?;
  writeln!(out, "property float z")?;
  writeln!(out, "element face {}", mesh.polygon_count())?;
  writeln!(out, "property list uchar int vertex_indices")?;
  writeln!(out, "end_header")?;

  for &point in mesh.in_core_points.iter().chain(&mesh.out_of_core_points) {
    let world = bounds.denormalize(point);
    writeln!(out, "{} {} {}", world.x, world.y, world.z)?;
  }

  let offset = mesh.in_core_points.len() as u32;
  for polygon in &mesh.polygons {
    write!(out, "{}", polygon.len())?;
    for vertex in polygon {
      let index = if vertex.in_core {
        vertex.index
      } else {
        vertex.index + offset
      };
      write!(out, " {}", index)?;
    }
    writeln!(out)?;
  }

  out.flush()?;
  Ok(())
}
