use std::io::Cursor;

use super::*;

/// Well-formed lines parse into position and normal.
#[test]
fn test_parse_samples() {
  let input = "0 0 0 0 0 1\n1.5 -2 3 0 1 0\n";
  let samples = read_oriented_points(Cursor::new(input)).unwrap();
  assert_eq!(samples.len(), 2);
  assert_eq!(samples[1].position, glam::Vec3::new(1.5, -2.0, 3.0));
  assert_eq!(samples[1].normal, glam::Vec3::new(0.0, 1.0, 0.0));
}

/// The first malformed line terminates ingestion without error.
#[test]
fn test_malformed_line_terminates() {
  let input = "0 0 0 0 0 1\nnot a sample\n1 1 1 0 1 0\n";
  let samples = read_oriented_points(Cursor::new(input)).unwrap();
  assert_eq!(samples.len(), 1, "parsing must stop at the malformed line");
}

/// A line with fewer than six numbers is malformed.
#[test]
fn test_short_line_terminates() {
  let input = "0 0 0 0 0 1\n1 2 3 4 5\n";
  let samples = read_oriented_points(Cursor::new(input)).unwrap();
  assert_eq!(samples.len(), 1);
}

/// Zero parsed samples is a hard failure.
#[test]
fn test_no_samples_is_error() {
  let result = read_oriented_points(Cursor::new(""));
  assert!(matches!(result, Err(ReconError::NoSamples)));

  let result = read_oriented_points(Cursor::new("garbage\n0 0 0 0 0 1\n"));
  assert!(matches!(result, Err(ReconError::NoSamples)));
}

/// Extra whitespace is tolerated.
#[test]
fn test_free_form_whitespace() {
  let input = "  0.5\t0.5  0.5   0 0 1  \n";
  let samples = read_oriented_points(Cursor::new(input)).unwrap();
  assert_eq!(samples.len(), 1);
  assert_eq!(samples[0].position, glam::Vec3::splat(0.5));
}
