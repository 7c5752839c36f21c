//! Hull computation entry points
//!
//! [`compute_hull`] is the single pure function callers need. The concrete
//! algorithms sit behind [`HullAlgorithm`] so a caller can pin one or plug
//! in another without touching the rest of the pipeline.

use crate::monotone_chain::monotone_chain_2d;
use crate::quickhull::quickhull_3d;
use crate::types::{Hull, PointSet};
use crate::{HullError, Result};

/// A convex hull algorithm
pub trait HullAlgorithm {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Point dimensions the algorithm handles
    fn supports(&self, dimension: usize) -> bool;

    /// Compute the hull, assuming the shape checks already passed
    fn compute_unchecked(&self, points: &PointSet) -> Result<Hull>;

    /// Validate the input, then compute the hull
    fn compute(&self, points: &PointSet) -> Result<Hull> {
        validate(points)?;
        if !self.supports(points.dimension()) {
            return Err(HullError::UnsupportedDimension(points.dimension()));
        }
        log::debug!(
            "Computing {}D hull of {} points with {}",
            points.dimension(),
            points.len(),
            self.name()
        );
        self.compute_unchecked(points)
    }
}

/// Andrew's monotone chain, 2D only
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotoneChain;

impl HullAlgorithm for MonotoneChain {
    fn name(&self) -> &'static str {
        "monotone chain"
    }

    fn supports(&self, dimension: usize) -> bool {
        dimension == 2
    }

    fn compute_unchecked(&self, points: &PointSet) -> Result<Hull> {
        monotone_chain_2d(points)
    }
}

/// Quickhull, 3D only
#[derive(Debug, Clone, Copy, Default)]
pub struct Quickhull;

impl HullAlgorithm for Quickhull {
    fn name(&self) -> &'static str {
        "quickhull"
    }

    fn supports(&self, dimension: usize) -> bool {
        dimension == 3
    }

    fn compute_unchecked(&self, points: &PointSet) -> Result<Hull> {
        quickhull_3d(points)
    }
}

/// Picks [`MonotoneChain`] in 2D and [`Quickhull`] in 3D
#[derive(Debug, Clone, Copy, Default)]
pub struct Auto;

impl HullAlgorithm for Auto {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports(&self, dimension: usize) -> bool {
        MonotoneChain.supports(dimension) || Quickhull.supports(dimension)
    }

    fn compute_unchecked(&self, points: &PointSet) -> Result<Hull> {
        match points.dimension() {
            2 => MonotoneChain.compute_unchecked(points),
            3 => Quickhull.compute_unchecked(points),
            d => Err(HullError::UnsupportedDimension(d)),
        }
    }
}

/// Shape checks shared by every algorithm
///
/// A hull in D dimensions needs at least D + 1 points, all of them finite.
pub(crate) fn validate(points: &PointSet) -> Result<()> {
    if points.is_empty() {
        return Err(HullError::DegenerateInput("no points".to_string()));
    }

    let dimension = points.dimension();
    if dimension == 0 {
        return Err(HullError::UnsupportedDimension(0));
    }
    if points.len() < dimension + 1 {
        return Err(HullError::DegenerateInput(format!(
            "need at least {} points in {}D, got {}",
            dimension + 1,
            dimension,
            points.len()
        )));
    }
    if let Some(index) = points.iter().position(|p| p.iter().any(|c| !c.is_finite())) {
        return Err(HullError::DegenerateInput(format!(
            "point {index} has a non-finite coordinate"
        )));
    }

    Ok(())
}

/// Compute the convex hull of a point set
///
/// Pure function of its input: the same `PointSet` always yields the same
/// `Hull`. Points lying on a hull edge or facet without being a corner are
/// not reported as vertices.
///
/// # Errors
/// - [`HullError::DegenerateInput`] for fewer than D + 1 distinct points or
///   affinely dependent points (collinear in 2D, coplanar in 3D)
/// - [`HullError::UnsupportedDimension`] unless D is 2 or 3
pub fn compute_hull(points: &PointSet) -> Result<Hull> {
    Auto.compute(points)
}

/// The points of `query` inside `hull` or on its boundary, in input order
///
/// # Errors
/// [`HullError::DimensionMismatch`] when the query points do not have the
/// hull's dimension.
pub fn filter_inside(query: &PointSet, hull: &Hull) -> Result<PointSet> {
    if !query.is_empty() && query.dimension() != hull.dimension() {
        return Err(HullError::DimensionMismatch {
            index: 0,
            expected: hull.dimension(),
            got: query.dimension(),
        });
    }

    let inside: Vec<usize> = query
        .iter()
        .enumerate()
        .filter(|(_, p)| hull.contains(p.view()))
        .map(|(i, _)| i)
        .collect();

    log::debug!("{} of {} query points inside the hull", inside.len(), query.len());
    Ok(query.select(&inside))
}
