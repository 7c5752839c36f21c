//! Reading and writing xyz point files
//!
//! The first line of an xyz file is a header (usually the point count) and
//! is skipped. Every other non-blank line holds whitespace-separated numeric
//! fields; the leading fields are the coordinates and anything after them
//! (typically a label or a `z` column) is ignored.

use crate::types::PointSet;
use crate::{HullError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// How to read coordinates out of an xyz file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XyzOptions {
    /// Coordinates per point. `None` infers it from the first data line as
    /// its field count minus one trailing label.
    pub dimension: Option<usize>,
}

impl Default for XyzOptions {
    fn default() -> Self {
        Self { dimension: Some(2) }
    }
}

impl XyzOptions {
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
        }
    }

    pub fn inferred() -> Self {
        Self { dimension: None }
    }
}

/// Load points from an xyz file
pub fn load_xyz<P: AsRef<Path>>(path: P, options: &XyzOptions) -> Result<PointSet> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = parse_xyz(BufReader::new(file), options)?;
    log::info!(
        "Loaded {} points ({}D) from {}",
        points.len(),
        points.dimension(),
        path.display()
    );
    Ok(points)
}

/// Parse xyz content from any buffered reader
pub fn parse_xyz<R: BufRead>(reader: R, options: &XyzOptions) -> Result<PointSet> {
    let mut dimension = options.dimension;
    // field count of the first data line, enforced when inferring
    let mut expected_fields: Option<usize> = None;
    let mut rows: Vec<f64> = Vec::new();
    let mut count = 0;

    for (line_idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_no = line_idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let dim = match dimension {
            Some(d) => d,
            None => {
                let d = fields.len().saturating_sub(1).max(1);
                expected_fields = Some(fields.len());
                dimension = Some(d);
                d
            }
        };

        if let Some(expected) = expected_fields
            && fields.len() != expected
        {
            return Err(HullError::DimensionMismatch {
                index: count,
                expected: dim,
                got: fields.len().saturating_sub(1),
            });
        }

        if fields.len() < dim {
            return Err(HullError::Parse {
                line: line_no,
                message: format!(
                    "expected {} numeric fields, found {}",
                    dim,
                    fields.len()
                ),
            });
        }

        for (col, field) in fields.iter().take(dim).enumerate() {
            let value: f64 = field.parse().map_err(|_| HullError::Parse {
                line: line_no,
                message: format!("invalid number '{}' in column {}", field, col + 1),
            })?;
            rows.push(value);
        }
        count += 1;
    }

    let dim = dimension.unwrap_or(0);
    // every counted line pushed exactly `dim` values
    let coords = ndarray::Array2::from_shape_fn((count, dim), |(i, j)| rows[i * dim + j]);
    Ok(PointSet::from_array(coords))
}

/// Save points as an xyz file that [`load_xyz`] reads back
///
/// Writes the point count as header, then the coordinates of each point
/// followed by a `0` label column.
pub fn save_xyz<P: AsRef<Path>>(points: &PointSet, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{}", points.len())?;
    for point in points.iter() {
        for c in point.iter() {
            write!(out, "{:.6} ", c)?;
        }
        writeln!(out, "0")?;
    }
    out.flush()?;

    log::info!("Saved {} points to {}", points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Cursor;

    #[test]
    fn test_parse_skips_header_and_label() {
        let content = "4\n0 0 a\n1 0 b\n1 1 c\n0 1 d\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::default()).unwrap();
        assert_eq!(
            points.coords(),
            &array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
        );
    }

    #[test]
    fn test_parse_drops_z_column() {
        let content = "2\n1.5 2.5 0\n-3 4e1 0\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::default()).unwrap();
        assert_eq!(points.coords(), &array![[1.5, 2.5], [-3.0, 40.0]]);
    }

    #[test]
    fn test_parse_three_dimensions() {
        let content = "header\n1 2 3 label\n4 5 6 label\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::with_dimension(3)).unwrap();
        assert_eq!(points.coords(), &array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = "3\n0 0 0\n\n   \n1 1 0\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::default()).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_short_line_is_parse_error() {
        let content = "1\n0\n";
        let result = parse_xyz(Cursor::new(content), &XyzOptions::default());
        assert!(matches!(result, Err(HullError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_non_numeric_field_is_parse_error() {
        let content = "2\n0 0 x\n1 oops x\n";
        let result = parse_xyz(Cursor::new(content), &XyzOptions::default());
        assert!(matches!(result, Err(HullError::Parse { line: 3, .. })));
    }

    #[test]
    fn test_trailing_label_not_validated() {
        let content = "1\n0 0 not-a-number\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::default()).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_inferred_dimension() {
        let content = "2\n0 0 0 a\n1 2 3 b\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::inferred()).unwrap();
        assert_eq!(points.dimension(), 3);
        assert_eq!(points.point(1).to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_inferred_dimension_mismatch() {
        let content = "2\n0 0 a\n1 2 3 b\n";
        let result = parse_xyz(Cursor::new(content), &XyzOptions::inferred());
        assert!(matches!(
            result,
            Err(HullError::DimensionMismatch {
                index: 1,
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_header_only() {
        let points = parse_xyz(Cursor::new("0\n"), &XyzOptions::default()).unwrap();
        assert!(points.is_empty());
        assert_eq!(points.dimension(), 2);
    }

    #[test]
    fn test_parsed_rows_keep_point_order() {
        let content = "3\n1 2 3 a\n4 5 6 b\n\n7 8 9 c\n";
        let points = parse_xyz(Cursor::new(content), &XyzOptions::with_dimension(3)).unwrap();
        assert_eq!(
            points.coords(),
            &ndarray::array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]
        );
    }
}
