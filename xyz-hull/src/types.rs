//! Core data types for convex hull computation

use crate::geometry::facet_measure;
use crate::{HullError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered set of points, one row per point
///
/// Row order is the order in which the points were read; duplicates are
/// allowed. The set is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    coords: Array2<f64>,
}

impl PointSet {
    /// Wrap an `n x D` coordinate matrix
    pub fn from_array(coords: Array2<f64>) -> Self {
        Self { coords }
    }

    /// Build a point set from coordinate rows, checking they share a dimension
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let dimension = rows.first().map_or(0, |r| r.as_ref().len());

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.as_ref().len() != dimension)
        {
            return Err(HullError::DimensionMismatch {
                index,
                expected: dimension,
                got: row.as_ref().len(),
            });
        }

        let coords = Array2::from_shape_fn((rows.len(), dimension), |(i, j)| rows[i].as_ref()[j]);
        Ok(Self { coords })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.nrows() == 0
    }

    /// Coordinates per point
    pub fn dimension(&self) -> usize {
        self.coords.ncols()
    }

    /// Coordinates of the point at `index`
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn point(&self, index: usize) -> ArrayView1<'_, f64> {
        self.coords.row(index)
    }

    pub fn coords(&self) -> &Array2<f64> {
        &self.coords
    }

    /// Iterate over the point rows in order
    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.coords.rows().into_iter()
    }

    /// New point set made of the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> PointSet {
        PointSet::from_array(self.coords.select(Axis(0), indices))
    }

    /// Values of one coordinate axis across all points
    pub fn column(&self, axis: usize) -> Vec<f64> {
        self.coords.column(axis).to_vec()
    }
}

/// The result of a convex hull computation
///
/// All indices refer to rows of the [`PointSet`] the hull was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    dimension: usize,
    num_points: usize,
    /// Hull vertices: counter-clockwise in 2D, ascending in 3D
    vertices: Vec<usize>,
    /// Boundary facets, `D` indices per row
    simplices: Array2<usize>,
    /// Outward unit normal and offset per facet, `D + 1` values per row
    equations: Array2<f64>,
    /// Distance within which a point counts as lying on a facet
    tolerance: f64,
}

impl Hull {
    pub(crate) fn new(
        dimension: usize,
        num_points: usize,
        vertices: Vec<usize>,
        simplices: Array2<usize>,
        equations: Array2<f64>,
        tolerance: f64,
    ) -> Self {
        debug_assert_eq!(simplices.nrows(), equations.nrows());
        debug_assert!(tolerance >= 0.0);
        debug_assert!(vertices.iter().all(|&v| v < num_points));
        Self {
            dimension,
            num_points,
            vertices,
            simplices,
            equations,
            tolerance,
        }
    }

    /// Build a convex hull with the algorithm matching the point dimension
    pub fn build(points: &PointSet) -> Result<Self> {
        crate::compute_hull(points)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Size of the point set the hull was computed from
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn simplices(&self) -> &Array2<usize> {
        &self.simplices
    }

    pub fn equations(&self) -> &Array2<f64> {
        &self.equations
    }

    /// Facet distance tolerance derived from the input's extent and magnitude
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_simplices(&self) -> usize {
        self.simplices.nrows()
    }

    /// Sorted unique indices referenced by the simplices
    pub fn hull_point_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.simplices.iter().copied().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Coordinates of the hull vertices, in vertex order
    pub fn vertex_points(&self, points: &PointSet) -> PointSet {
        points.select(&self.vertices)
    }

    /// Whether `point` lies inside the hull or on its boundary
    ///
    /// Points within [`Hull::tolerance`] of the boundary count as inside.
    /// Returns `false` for a point of the wrong dimension.
    pub fn contains(&self, point: ArrayView1<'_, f64>) -> bool {
        if point.len() != self.dimension {
            return false;
        }
        self.equations.rows().into_iter().all(|eq| {
            let (normal, offset) = (eq.slice(ndarray::s![..-1]), eq[self.dimension]);
            normal.dot(&point) + offset <= self.tolerance
        })
    }

    /// Boundary measure: perimeter in 2D, surface area in 3D
    pub fn area(&self, points: &PointSet) -> f64 {
        self.simplices
            .rows()
            .into_iter()
            .map(|facet| facet_measure(points, facet))
            .sum()
    }

    /// Enclosed measure: polygon area in 2D, solid volume in 3D
    ///
    /// Sums the pyramids joining an interior reference point to every facet.
    pub fn volume(&self, points: &PointSet) -> f64 {
        let centroid = self.vertex_points(points).coords().mean_axis(Axis(0));
        let Some(centroid) = centroid else {
            return 0.0;
        };

        let d = self.dimension as f64;
        self.simplices
            .rows()
            .into_iter()
            .zip(self.equations.rows())
            .map(|(facet, eq)| {
                let height = -(eq.slice(ndarray::s![..-1]).dot(&centroid) + eq[self.dimension]);
                facet_measure(points, facet) * height / d
            })
            .sum()
    }
}

impl fmt::Display for Hull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConvexHull(dimension={}, points={}, vertices={}, simplices={})",
            self.dimension,
            self.num_points,
            self.vertices.len(),
            self.simplices.nrows()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_rows() {
        let points = PointSet::from_rows(&[[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points.dimension(), 2);
        assert_eq!(points.point(1).to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_from_rows_dimension_mismatch() {
        let rows = vec![vec![0.0, 1.0], vec![2.0, 3.0, 4.0]];
        let result = PointSet::from_rows(&rows);
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
    fn test_empty_point_set() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let points = PointSet::from_rows(&rows).unwrap();
        assert!(points.is_empty());
        assert_eq!(points.dimension(), 0);
    }

    #[test]
    fn test_from_rows_of_empty_rows() {
        let rows: Vec<Vec<f64>> = vec![Vec::new(), Vec::new()];
        let points = PointSet::from_rows(&rows).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points.dimension(), 0);
    }

    #[test]
    fn test_select_keeps_order() {
        let points = PointSet::from_array(array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        let picked = points.select(&[2, 0]);
        assert_eq!(picked.coords(), &array![[2.0, 2.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_hull_point_indices_sorted_unique() {
        let hull = Hull::new(
            2,
            4,
            vec![2, 0, 1],
            array![[2, 0], [0, 1], [1, 2]],
            Array2::zeros((3, 3)),
            0.0,
        );
        assert_eq!(hull.hull_point_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_contains_far_from_origin() {
        let offset = 1e6;
        let points = PointSet::from_array(array![
            [offset, offset],
            [offset + 1.0, offset],
            [offset + 1.0, offset + 1.0],
            [offset, offset + 1.0],
        ]);
        let hull = crate::compute_hull(&points).unwrap();

        for p in points.iter() {
            assert!(hull.contains(p), "hull point {p} reported outside");
        }
        assert!(hull.contains(ndarray::aview1(&[offset + 0.5, offset + 1.0])));
        assert!(!hull.contains(ndarray::aview1(&[offset + 0.5, offset + 1.001])));
    }
}
