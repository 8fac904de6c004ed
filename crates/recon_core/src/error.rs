//! Error types for octree construction and isosurface extraction.

use std::fmt;

/// Error type for the reconstruction pipeline.
///
/// Internal-consistency variants indicate a construction bug or corrupted
/// state; extraction aborts instead of emitting degenerate geometry.
#[derive(Debug)]
pub enum ReconError {
  /// Reading the input stream failed.
  Io(std::io::Error),
  /// No well-formed sample line could be parsed.
  NoSamples,
  /// The field evaluator returned the wrong number of samples.
  FieldSizeMismatch { expected: usize, actual: usize },
  /// A corner key expected in the grid map was never created.
  MissingGridPoint { key: u64 },
  /// A triangle segment endpoint could not be resolved to an edge root.
  UnresolvedSegment { depth: u8 },
  /// A cut-off edge's sibling root is not present in the collected set.
  RootPairMissing { key: u64 },
  /// A root still has non-zero signed multiplicity after loop repair.
  UnbalancedLoop { key: u64, multiplicity: i32 },
  /// An assembled edge chain did not close on itself.
  OpenLoop,
  /// A loop references a root key with no recorded mesh vertex.
  UnknownRootKey { key: u64 },
}

impl fmt::Display for ReconError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReconError::Io(err) => write!(f, "input read error: {}", err),
      ReconError::NoSamples => write!(f, "no valid samples in input"),
      ReconError::FieldSizeMismatch { expected, actual } => write!(
        f,
        "field evaluator returned {} samples for {} grid points",
        actual, expected
      ),
      ReconError::MissingGridPoint { key } => {
        write!(f, "no grid point for corner key {:#x}", key)
      }
      ReconError::UnresolvedSegment { depth } => {
        write!(f, "unresolved iso-segment endpoint at depth {}", depth)
      }
      ReconError::RootPairMissing { key } => {
        write!(f, "sibling root {:#x} missing from edge set", key)
      }
      ReconError::UnbalancedLoop { key, multiplicity } => write!(
        f,
        "root {:#x} left with multiplicity {} after repair",
        key, multiplicity
      ),
      ReconError::OpenLoop => write!(f, "iso-edge chain did not close into a loop"),
      ReconError::UnknownRootKey { key } => {
        write!(f, "no mesh vertex recorded for root key {:#x}", key)
      }
    }
  }
}

impl std::error::Error for ReconError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReconError::Io(err) => Some(err),
      _ => None,
    }
  }
}

impl From<std::io::Error> for ReconError {
  fn from(err: std::io::Error) -> Self {
    ReconError::Io(err)
  }
}

/// Crate-wide result alias.
pub type Result<T, E = ReconError> = std::result::Result<T, E>;
