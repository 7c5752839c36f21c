//! Andrew's monotone chain algorithm for 2D convex hulls
//!
//! Based on:
//! - Andrew, A.M., "Another efficient algorithm for convex hulls in two
//!   dimensions," Information Processing Letters, 9(5):216-219, 1979.
//!
//! Points are sorted by (x, y) and the lower and upper chains are built with
//! a stack, popping every point that does not make a strict left turn. Points
//! lying on a hull edge are therefore dropped, and so are duplicates.

use crate::geometry::{compute_relative_epsilon, cross_2d, deduplicate_points};
use crate::types::{Hull, PointSet};
use crate::{HullError, Result};
use ndarray::Array2;

/// Build a 2D convex hull
///
/// Vertices come out counter-clockwise, starting from the leftmost (then
/// lowest) point.
pub fn monotone_chain_2d(points: &PointSet) -> Result<Hull> {
    let eps = compute_relative_epsilon(points);

    let unique = deduplicate_points(points, eps);
    if unique.len() < 3 {
        return Err(HullError::DegenerateInput(format!(
            "need at least 3 distinct points for a 2D hull, got {}",
            unique.len()
        )));
    }

    let mut sorted = unique;
    sorted.sort_by(|&a, &b| {
        let (pa, pb) = (points.point(a), points.point(b));
        pa[0]
            .total_cmp(&pb[0])
            .then(pa[1].total_cmp(&pb[1]))
            .then(a.cmp(&b))
    });

    // `next` must lie more than `eps` to the left of the line through the
    // last two chain points
    let is_left_turn = |chain: &[usize], next: usize| -> bool {
        let n = chain.len();
        let (o, a) = (points.point(chain[n - 2]), points.point(chain[n - 1]));
        let base = (a[0] - o[0]).hypot(a[1] - o[1]);
        cross_2d(o, a, points.point(next)) > eps * base
    };

    let mut lower: Vec<usize> = Vec::with_capacity(sorted.len());
    for &idx in &sorted {
        while lower.len() >= 2 && !is_left_turn(&lower, idx) {
            lower.pop();
        }
        lower.push(idx);
    }

    let mut upper: Vec<usize> = Vec::with_capacity(sorted.len());
    for &idx in sorted.iter().rev() {
        while upper.len() >= 2 && !is_left_turn(&upper, idx) {
            upper.pop();
        }
        upper.push(idx);
    }

    // the last point of each chain is the first point of the other one
    lower.pop();
    upper.pop();
    let mut vertices = lower;
    vertices.append(&mut upper);

    if vertices.len() < 3 {
        return Err(HullError::DegenerateInput(
            "all points are collinear".to_string(),
        ));
    }

    log::debug!(
        "Monotone chain: {} input points, {} hull vertices",
        points.len(),
        vertices.len()
    );

    let k = vertices.len();
    let mut simplices = Array2::<usize>::zeros((k, 2));
    let mut equations = Array2::<f64>::zeros((k, 3));

    for i in 0..k {
        let (a, b) = (vertices[i], vertices[(i + 1) % k]);
        let (pa, pb) = (points.point(a), points.point(b));
        let (dx, dy) = (pb[0] - pa[0], pb[1] - pa[1]);
        let len = dx.hypot(dy);
        // counter-clockwise winding puts the outside on the right of a -> b
        let (nx, ny) = (dy / len, -dx / len);

        simplices[[i, 0]] = a;
        simplices[[i, 1]] = b;
        equations[[i, 0]] = nx;
        equations[[i, 1]] = ny;
        equations[[i, 2]] = -(nx * pa[0] + ny * pa[1]);
    }

    Ok(Hull::new(2, points.len(), vertices, simplices, equations, eps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_square_with_interior_point() {
        let points = PointSet::from_array(array![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.5, 0.5],
        ]);

        let hull = monotone_chain_2d(&points).unwrap();
        assert_eq!(hull.vertices(), &[0, 1, 2, 3]);
        assert_eq!(hull.num_simplices(), 4);
        assert_eq!(hull.simplices().row(0).to_vec(), vec![0, 1]);
        assert_eq!(hull.simplices().row(3).to_vec(), vec![3, 0]);
    }

    #[test]
    fn test_collinear_points() {
        let points = PointSet::from_array(array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let result = monotone_chain_2d(&points);
        assert!(matches!(result, Err(HullError::DegenerateInput(_))));
    }

    #[test]
    fn test_too_few_distinct_points() {
        let points = PointSet::from_array(array![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let result = monotone_chain_2d(&points);
        assert!(matches!(result, Err(HullError::DegenerateInput(_))));
    }

    #[test]
    fn test_edge_points_excluded() {
        // (1, 0) and (2, 1) sit on edges of the triangle
        let points = PointSet::from_array(array![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [2.0, 2.0],
        ]);

        let hull = monotone_chain_2d(&points).unwrap();
        assert_eq!(hull.vertices(), &[0, 2, 4]);
    }

    #[test]
    fn test_offset_right_triangle() {
        for offset in [1e5, 1e6] {
            let points = PointSet::from_array(array![
                [offset, offset],
                [offset + 1.0, offset],
                [offset, offset + 1.0],
            ]);
            let hull = monotone_chain_2d(&points).unwrap();
            assert_eq!(hull.vertices(), &[0, 1, 2], "offset {offset}");
        }
    }

    #[test]
    fn test_tiny_square_with_edge_point() {
        let s = 1e-6;
        let points = PointSet::from_array(array![
            [0.0, 0.0],
            [s, 0.0],
            [s, s],
            [0.0, s],
            [s / 2.0, 0.0],
            [s / 2.0, s / 2.0],
        ]);
        let hull = monotone_chain_2d(&points).unwrap();
        assert_eq!(hull.vertices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_tiny_collinear_points() {
        let points = PointSet::from_array(array![[0.0, 0.0], [1e-6, 1e-6], [2e-6, 2e-6]]);
        assert!(matches!(
            monotone_chain_2d(&points),
            Err(HullError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_equations_point_outward() {
        let points = PointSet::from_array(array![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]);
        let hull = monotone_chain_2d(&points).unwrap();

        // bottom edge (0,0) -> (2,0) has outward normal (0, -1)
        let bottom = hull.equations().row(0);
        assert!((bottom[0] - 0.0).abs() < 1e-12);
        assert!((bottom[1] + 1.0).abs() < 1e-12);
        assert!(bottom[2].abs() < 1e-12);
    }
}
