//! Test data for convex hull tests
//!
//! Point sets with known hulls in 2D and 3D, plus a reader for the OBJ files
//! written by [`export_obj`](crate::export_obj).

use crate::types::PointSet;
use crate::{HullError, Result};
use ndarray::{Array2, array};
use rand::Rng;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The unit square corners followed by its center
pub fn unit_square_with_center() -> PointSet {
    PointSet::from_array(array![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [0.5, 0.5],
    ])
}

/// `n` points evenly spaced on a circle; every one is a hull vertex
pub fn circle_points(n: usize, radius: f64) -> PointSet {
    let mut coords = Array2::zeros((n, 2));
    for i in 0..n {
        let theta = 2.0 * PI * (i as f64) / (n as f64);
        coords[[i, 0]] = radius * theta.cos();
        coords[[i, 1]] = radius * theta.sin();
    }
    PointSet::from_array(coords)
}

/// Square corners (indices 0..4) followed by `n_interior` random points
/// strictly inside the square
pub fn square_with_interior_points(size: f64, n_interior: usize) -> PointSet {
    let mut rng = rand::rng();
    let s = size / 2.0;
    let mut coords = Array2::zeros((4 + n_interior, 2));

    for (i, (x, y)) in [(-s, -s), (s, -s), (s, s), (-s, s)].into_iter().enumerate() {
        coords[[i, 0]] = x;
        coords[[i, 1]] = y;
    }
    for i in 0..n_interior {
        // keep clear of the boundary
        coords[[4 + i, 0]] = (rng.random::<f64>() * 1.8 - 0.9) * s;
        coords[[4 + i, 1]] = (rng.random::<f64>() * 1.8 - 0.9) * s;
    }

    PointSet::from_array(coords)
}

/// Random points uniformly distributed in a disk
pub fn random_disk_points(n: usize, radius: f64) -> PointSet {
    let mut rng = rand::rng();
    let mut coords = Array2::zeros((n, 2));

    for i in 0..n {
        let theta = rng.random::<f64>() * 2.0 * PI;
        let r = radius * rng.random::<f64>().sqrt();
        coords[[i, 0]] = r * theta.cos();
        coords[[i, 1]] = r * theta.sin();
    }

    PointSet::from_array(coords)
}

/// `n` points on the line y = 2x + 1
pub fn collinear_points(n: usize) -> PointSet {
    let mut coords = Array2::zeros((n, 2));
    for i in 0..n {
        coords[[i, 0]] = i as f64;
        coords[[i, 1]] = 2.0 * i as f64 + 1.0;
    }
    PointSet::from_array(coords)
}

/// Generate a simple tetrahedron
pub fn tetrahedron_vertices() -> PointSet {
    PointSet::from_array(array![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.5, (3.0_f64).sqrt() / 2.0, 0.0],
        [0.5, (3.0_f64).sqrt() / 6.0, (2.0 / 3.0_f64).sqrt()],
    ])
}

/// Generate a cube's vertices
pub fn cube_vertices(size: f64) -> PointSet {
    let s = size / 2.0;
    PointSet::from_array(array![
        [-s, -s, -s],
        [s, -s, -s],
        [s, s, -s],
        [-s, s, -s],
        [-s, -s, s],
        [s, -s, s],
        [s, s, s],
        [-s, s, s],
    ])
}

/// Cube corners (indices 0..8) followed by random interior points
pub fn cube_with_interior_points(size: f64, n_interior: usize) -> PointSet {
    let corners = cube_vertices(size);
    let mut rng = rand::rng();
    let s = size / 2.0;

    let mut coords = Array2::zeros((8 + n_interior, 3));
    coords
        .slice_mut(ndarray::s![..8, ..])
        .assign(corners.coords());
    for i in 0..n_interior {
        for axis in 0..3 {
            coords[[8 + i, axis]] = (rng.random::<f64>() * 1.8 - 0.9) * s;
        }
    }

    PointSet::from_array(coords)
}

/// Cube corners (indices 0..8), then the 6 face centres, the 12 edge
/// midpoints and the centre
///
/// Only the corners are hull vertices; the other boundary points lie on a
/// face or an edge.
pub fn cube_with_boundary_points(size: f64) -> PointSet {
    let s = size / 2.0;
    let mut rows: Vec<[f64; 3]> = cube_vertices(size)
        .iter()
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    for axis in 0..3 {
        for side in [-s, s] {
            let mut p = [0.0; 3];
            p[axis] = side;
            rows.push(p);
        }
    }
    for axis in 0..3 {
        for (a, b) in [(-s, -s), (s, -s), (s, s), (-s, s)] {
            let mut p = [0.0; 3];
            p[(axis + 1) % 3] = a;
            p[(axis + 2) % 3] = b;
            rows.push(p);
        }
    }
    rows.push([0.0; 3]);

    PointSet::from_array(Array2::from_shape_fn((rows.len(), 3), |(i, j)| rows[i][j]))
}

/// Generate vertices for an octahedron
pub fn octahedron_vertices() -> PointSet {
    PointSet::from_array(array![
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ])
}

/// Generate uniformly distributed points on a sphere using Fibonacci lattice
pub fn fibonacci_sphere_points(n: usize, radius: f64) -> PointSet {
    let mut coords = Array2::zeros((n, 3));
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;

    for i in 0..n {
        let theta = 2.0 * PI * (i as f64) / golden_ratio;
        let phi = ((2 * i + 1) as f64 / n as f64 - 1.0).acos();

        coords[[i, 0]] = radius * phi.sin() * theta.cos();
        coords[[i, 1]] = radius * phi.sin() * theta.sin();
        coords[[i, 2]] = radius * phi.cos();
    }

    PointSet::from_array(coords)
}

/// Load the vertex coordinates of an OBJ file
///
/// Reads `v` lines only. `dimension` selects how many coordinates are kept
/// (2 for the polygons written by `export_obj`, 3 for meshes).
pub fn load_obj_points<P: AsRef<Path>>(path: P, dimension: usize) -> Result<PointSet> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let Some(rest) = line.strip_prefix("v ") else {
            continue;
        };

        let coords: std::result::Result<Vec<f64>, _> = rest
            .split_whitespace()
            .take(dimension)
            .map(str::parse::<f64>)
            .collect();
        match coords {
            Ok(c) if c.len() == dimension => rows.push(c),
            _ => {
                return Err(HullError::Parse {
                    line: line_idx + 1,
                    message: format!("expected {dimension} coordinates in vertex line"),
                });
            }
        }
    }

    PointSet::from_rows(&rows)
}
