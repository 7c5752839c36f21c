//! Geometric utility functions

use crate::EPSILON;
use crate::types::PointSet;
use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Roundoff allowance per unit of absolute coordinate magnitude
const ROUNDOFF: f64 = 1000.0 * f64::EPSILON;

/// A 3D vector used by the Quickhull implementation
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a vector from the first three coordinates of a point row
    pub fn from_row(row: ArrayView1<'_, f64>) -> Self {
        Self::new(row[0], row[1], row[2])
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn scale(&self, s: f64) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Normalize to unit length, or `None` for a zero vector
    pub fn try_normalize(&self) -> Option<Vec3> {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Some(self.scale(1.0 / mag))
        } else {
            None
        }
    }

    pub fn distance(&self, other: &Vec3) -> f64 {
        self.sub(other).magnitude()
    }
}

/// Twice the signed area of the triangle (o, a, b).
///
/// Positive when `o -> a -> b` turns counter-clockwise, negative when it
/// turns clockwise and zero when the three points are collinear.
#[inline]
pub fn cross_2d(o: ArrayView1<'_, f64>, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Largest side of the axis-aligned bounding box
pub fn bounding_extent(points: &PointSet) -> f64 {
    points
        .coords()
        .columns()
        .into_iter()
        .map(|axis| {
            let (lo, hi) = axis
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
                    (lo.min(c), hi.max(c))
                });
            if hi >= lo { hi - lo } else { 0.0 }
        })
        .fold(0.0, f64::max)
}

/// Largest absolute coordinate of the set
pub fn max_abs_coordinate(points: &PointSet) -> f64 {
    points.coords().iter().fold(0.0_f64, |acc, &c| acc.max(c.abs()))
}

/// Distance tolerance for an input set
///
/// Grows with the spread of the points and with the floating-point roundoff
/// of their absolute position, so a translated or rescaled set keeps the
/// same classification.
pub fn compute_relative_epsilon(points: &PointSet) -> f64 {
    EPSILON * bounding_extent(points) + ROUNDOFF * max_abs_coordinate(points)
}

/// Lexicographic order on point rows, ties broken by index
fn lexicographic(points: &PointSet, a: usize, b: usize) -> Ordering {
    points
        .point(a)
        .iter()
        .zip(points.point(b).iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
        .then(a.cmp(&b))
}

/// Indices of the points sorted lexicographically by coordinates
pub fn sorted_indices(points: &PointSet) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| lexicographic(points, a, b));
    order
}

/// Collapse duplicate points, keeping the lowest index of each group.
///
/// Two points are duplicates when every coordinate differs by at most
/// `epsilon`. The result is in ascending index order.
pub fn deduplicate_points(points: &PointSet, epsilon: f64) -> Vec<usize> {
    let order = sorted_indices(points);
    let mut keep: Vec<usize> = Vec::with_capacity(order.len());

    // first member of the current group in sorted order
    let mut anchor: Option<usize> = None;

    for idx in order {
        let is_duplicate = anchor.is_some_and(|first| {
            points
                .point(first)
                .iter()
                .zip(points.point(idx).iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
        });
        if is_duplicate {
            // the group is represented by its lowest index
            if let Some(last) = keep.last_mut()
                && idx < *last
            {
                *last = idx;
            }
        } else {
            anchor = Some(idx);
            keep.push(idx);
        }
    }

    let removed = points.len() - keep.len();
    if removed > 0 {
        log::warn!("Collapsed {} duplicate point(s)", removed);
    }

    keep.sort_unstable();
    keep
}

/// (D-1)-measure of a facet: edge length in 2D, triangle area in 3D
pub fn facet_measure(points: &PointSet, facet: ArrayView1<'_, usize>) -> f64 {
    match facet.len() {
        2 => {
            let a = points.point(facet[0]);
            let b = points.point(facet[1]);
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| (y - x) * (y - x))
                .sum::<f64>()
                .sqrt()
        }
        3 => {
            let a = Vec3::from_row(points.point(facet[0]));
            let b = Vec3::from_row(points.point(facet[1]));
            let c = Vec3::from_row(points.point(facet[2]));
            b.sub(&a).cross(&c.sub(&a)).magnitude() / 2.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, aview1};

    #[test]
    fn test_vec3_products() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);

        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(x.dot(&y), 0.0);
        assert!((x.add(&y).magnitude() - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_try_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0).try_normalize().unwrap();
        assert!((v.magnitude() - 1.0).abs() < 1e-12);
        assert!(Vec3::new(0.0, 0.0, 0.0).try_normalize().is_none());
    }

    #[test]
    fn test_cross_2d_orientation() {
        let o = aview1(&[0.0, 0.0]);
        let a = aview1(&[1.0, 0.0]);
        let ccw = aview1(&[1.0, 1.0]);
        let cw = aview1(&[1.0, -1.0]);
        let on_line = aview1(&[2.0, 0.0]);

        assert!(cross_2d(o, a, ccw) > 0.0);
        assert!(cross_2d(o, a, cw) < 0.0);
        assert_eq!(cross_2d(o, a, on_line), 0.0);
    }

    #[test]
    fn test_deduplicate_keeps_lowest_index() {
        let points = PointSet::from_array(array![
            [1.0, 1.0],
            [0.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
            [2.0, 0.0],
        ]);
        assert_eq!(deduplicate_points(&points, 1e-10), vec![0, 1, 4]);
    }

    #[test]
    fn test_deduplicate_groups_by_first_member() {
        // 1 is within epsilon of 0, 2 is within epsilon of 1 but not of 0
        let points = PointSet::from_array(array![[0.0, 0.0], [0.6, 0.0], [1.2, 0.0]]);
        assert_eq!(deduplicate_points(&points, 1.0), vec![0, 2]);

        // the lower index replaces the representative, not the anchor
        let points = PointSet::from_array(array![[0.6, 0.0], [0.0, 0.0], [1.2, 0.0]]);
        assert_eq!(deduplicate_points(&points, 1.0), vec![0, 2]);
    }

    #[test]
    fn test_bounding_extent() {
        let points = PointSet::from_array(array![[1e6, 1e6], [1e6 + 2.0, 1e6 + 0.5]]);
        assert_eq!(bounding_extent(&points), 2.0);
        assert_eq!(max_abs_coordinate(&points), 1e6 + 2.0);
    }

    #[test]
    fn test_relative_epsilon_scales_with_input() {
        let unit = PointSet::from_array(array![[0.0, 0.0], [1.0, 1.0]]);
        let tiny = unit.coords().mapv(|c| c * 1e-6);
        let far = unit.coords().mapv(|c| c + 1e6);

        let unit_eps = compute_relative_epsilon(&unit);
        let tiny_eps = compute_relative_epsilon(&PointSet::from_array(tiny));
        let far_eps = compute_relative_epsilon(&PointSet::from_array(far));

        // shrinks with the data, grows with the roundoff of the offset
        assert!(tiny_eps < 1e-14);
        assert!(unit_eps < 1e-9);
        assert!(far_eps > 1e-8 && far_eps < 1e-6);
    }

    #[test]
    fn test_facet_measure() {
        let points = PointSet::from_array(array![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
        ]);
        assert!((facet_measure(&points, aview1(&[0, 1, 2])) - 2.0).abs() < 1e-12);

        let flat = PointSet::from_array(array![[0.0, 0.0], [3.0, 4.0]]);
        assert!((facet_measure(&flat, aview1(&[0, 1])) - 5.0).abs() < 1e-12);
    }
}
