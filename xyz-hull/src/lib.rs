//! Convex hulls of 2D and 3D point sets read from xyz files
//!
//! The 2D hull uses Andrew's monotone chain, the 3D hull uses the Quickhull
//! algorithm. Both return a [`Hull`] whose indices point back into the input
//! [`PointSet`], together with facet equations for containment tests.
//!
//! # 2D Convex Hull Example
//! ```
//! use xyz_hull::{PointSet, compute_hull};
//!
//! let points = PointSet::from_rows(&[
//!     [0.0, 0.0],
//!     [1.0, 0.0],
//!     [1.0, 1.0],
//!     [0.0, 1.0],
//!     [0.5, 0.5],
//! ])
//! .unwrap();
//!
//! let hull = compute_hull(&points).unwrap();
//! assert_eq!(hull.vertices(), &[0, 1, 2, 3]);
//! println!("{hull}");
//! ```

mod error;
mod export;
mod geometry;
mod hull;
mod io;
mod monotone_chain;
mod quickhull;
mod types;

// Make testdata publicly available for tests
pub mod testdata;

pub use error::{HullError, Result};
pub use export::{export_html, export_obj, render_plot, show_plot};
pub use hull::{Auto, HullAlgorithm, MonotoneChain, Quickhull, compute_hull, filter_inside};
pub use io::{XyzOptions, load_xyz, parse_xyz, save_xyz};
pub use types::{Hull, PointSet};

/// Relative tolerance for floating-point comparisons
///
/// Scaled by the extent of each input set before it is used for duplicate
/// detection, orientation and visibility checks, and degeneracy detection.
pub(crate) const EPSILON: f64 = 1e-10;
