//! Quickhull algorithm implementation for 3D convex hulls
//!
//! Based on:
//! - Barber, C.B., Dobkin, D.P., and Huhdanpaa, H.T., "The Quickhull algorithm
//!   for convex hulls," ACM Trans. on Mathematical Software, 22(4):469-483, 1996.
//!
//! Implementation notes:
//! - Generation-based face deletion (faces are flagged, then compacted)
//! - Pre-allocated scratch buffers
//! - Furthest point tracked during assignment
//! - Horizon edges kept in a `BTreeMap` so the output does not depend on
//!   hashing order

use crate::geometry::{Vec3, compute_relative_epsilon, deduplicate_points};
use crate::types::{Hull, PointSet};
use crate::{HullError, Result};
use ndarray::Array2;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

const MAX_ITERATIONS: usize = 100000;

/// Sine of the smallest angle between facet normals treated as distinct
const NORMAL_TOLERANCE: f64 = 1e-8;

/// Internal representation of a face during hull construction
///
/// Vertex ids index the deduplicated point list, not the input set.
#[derive(Debug, Clone)]
struct HullFace {
    vertices: [usize; 3],
    normal: Vec3,
    d: f64, // Plane constant: normal.dot(v0)
    outside_points: Vec<usize>,
    furthest_point: Option<usize>,
    furthest_distance: f64,
    deleted: bool,
}

impl HullFace {
    fn new(v0: usize, v1: usize, v2: usize, vertices: &[Vec3]) -> Self {
        let p0 = &vertices[v0];
        let p1 = &vertices[v1];
        let p2 = &vertices[v2];

        let normal = p1
            .sub(p0)
            .cross(&p2.sub(p0))
            .try_normalize()
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, 1.0));
        let d = normal.dot(p0);

        Self {
            vertices: [v0, v1, v2],
            normal,
            d,
            outside_points: Vec::new(),
            furthest_point: None,
            furthest_distance: 0.0,
            deleted: false,
        }
    }

    /// Signed distance from point to plane (positive = outside)
    #[inline]
    fn signed_distance(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) - self.d
    }

    #[inline]
    fn is_visible_from(&self, point: &Vec3, epsilon: f64) -> bool {
        self.signed_distance(point) > epsilon
    }

    fn assign_point(&mut self, point_idx: usize, distance: f64) {
        self.outside_points.push(point_idx);
        if distance > self.furthest_distance {
            self.furthest_point = Some(point_idx);
            self.furthest_distance = distance;
        }
    }

    fn flip(&mut self) {
        self.vertices.swap(1, 2);
        self.normal = self.normal.scale(-1.0);
        self.d = -self.d;
    }
}

/// Edge representation for horizon computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    /// Orientation-independent key
    #[inline]
    fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }

    /// Create with explicit orientation (don't normalize)
    #[inline]
    fn oriented(v0: usize, v1: usize) -> Self {
        Self { v0, v1 }
    }
}

/// Scratch buffers to avoid allocations in the main loop
struct ScratchBuffers {
    visible_face_indices: Vec<usize>,
    orphaned_points: Vec<usize>,
    new_faces: Vec<HullFace>,
    edge_to_face: BTreeMap<Edge, usize>,
    horizon_edges: Vec<Edge>,
}

impl ScratchBuffers {
    fn new() -> Self {
        Self {
            visible_face_indices: Vec::with_capacity(64),
            orphaned_points: Vec::with_capacity(256),
            new_faces: Vec::with_capacity(64),
            edge_to_face: BTreeMap::new(),
            horizon_edges: Vec::with_capacity(64),
        }
    }

    fn clear(&mut self) {
        self.visible_face_indices.clear();
        self.orphaned_points.clear();
        self.new_faces.clear();
        self.edge_to_face.clear();
        self.horizon_edges.clear();
    }
}

/// Build a 3D convex hull using the Quickhull algorithm
///
/// Points lying on a hull face or edge can be picked as furthest points
/// before the hull is complete. When the first pass ends with such points
/// among its vertices, the hull is rebuilt from the corners alone.
pub fn quickhull_3d(points: &PointSet) -> Result<Hull> {
    let eps = compute_relative_epsilon(points);

    // ids[i] is the input index of unique vertex i
    let ids = deduplicate_points(points, eps);
    if ids.len() < 4 {
        return Err(HullError::DegenerateInput(format!(
            "need at least 4 distinct points for a 3D hull, got {}",
            ids.len()
        )));
    }
    let vertices: Vec<Vec3> = ids.iter().map(|&i| Vec3::from_row(points.point(i))).collect();

    let mut hull_faces = expand_hull(&vertices, eps)?;

    let used = face_vertices(&hull_faces);
    let corners = corner_vertices(&hull_faces, &used);
    if corners.len() < used.len() {
        log::debug!(
            "Quickhull: {} of {} vertices lie on a face or edge, rebuilding",
            used.len() - corners.len(),
            used.len()
        );
        let corner_points: Vec<Vec3> = corners.iter().map(|&c| vertices[c]).collect();
        hull_faces = expand_hull(&corner_points, eps)?;
        for face in &mut hull_faces {
            for v in &mut face.vertices {
                *v = corners[*v];
            }
        }
    }

    Ok(build_hull(points, &ids, &vertices, &hull_faces, eps))
}

/// Run Quickhull over `vertices`, returning the final faces
fn expand_hull(vertices: &[Vec3], eps: f64) -> Result<Vec<HullFace>> {
    let simplex = find_initial_simplex(vertices, eps)?;

    // Centroid of the initial simplex - guaranteed to be inside the hull
    let interior = simplex
        .iter()
        .fold(Vec3::new(0.0, 0.0, 0.0), |acc, &i| acc.add(&vertices[i]))
        .scale(0.25);

    let mut hull_faces = create_initial_hull(&simplex, vertices, &interior);

    let unprocessed: Vec<usize> = (0..vertices.len())
        .filter(|i| !simplex.contains(i))
        .collect();
    assign_points(&mut hull_faces, vertices, &unprocessed, eps);

    let mut scratch = ScratchBuffers::new();
    let mut iterations = 0;

    loop {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            log::error!(
                "Max iterations exceeded with {} faces",
                hull_faces.iter().filter(|f| !f.deleted).count()
            );
            return Err(HullError::MaxIterationsExceeded(MAX_ITERATIONS));
        }

        let deleted_count = hull_faces.iter().filter(|f| f.deleted).count();
        if deleted_count * 10 > hull_faces.len() * 3 {
            compact_faces(&mut hull_faces);
            log::debug!(
                "Iteration {}: {} faces after compaction",
                iterations,
                hull_faces.len()
            );
        }

        let Some((face_idx, point_idx)) = find_face_with_furthest_point(&hull_faces) else {
            break; // No more outside points
        };
        let point = vertices[point_idx];

        scratch.clear();

        for (i, face) in hull_faces.iter().enumerate() {
            if !face.deleted && face.is_visible_from(&point, eps) {
                scratch.visible_face_indices.push(i);
            }
        }

        if scratch.visible_face_indices.is_empty() {
            // the tracked point no longer sees its face; drop it
            let face = &mut hull_faces[face_idx];
            face.outside_points.retain(|&p| p != point_idx);
            face.furthest_point = None;
            face.furthest_distance = 0.0;
            refresh_furthest(face, vertices);
            continue;
        }

        find_horizon(
            &hull_faces,
            &scratch.visible_face_indices,
            &mut scratch.edge_to_face,
            &mut scratch.horizon_edges,
        );

        for &visible in &scratch.visible_face_indices {
            scratch
                .orphaned_points
                .extend(hull_faces[visible].outside_points.iter().copied());
        }
        scratch.orphaned_points.retain(|&p| p != point_idx);

        for &visible in &scratch.visible_face_indices {
            hull_faces[visible].deleted = true;
            hull_faces[visible].outside_points.clear();
        }

        for edge in &scratch.horizon_edges {
            let mut face = HullFace::new(edge.v0, edge.v1, point_idx, vertices);
            // normal must point away from the interior
            if face.normal.dot(&interior.sub(&vertices[face.vertices[0]])) > 0.0 {
                face.flip();
            }
            scratch.new_faces.push(face);
        }

        // Reassign orphaned points to new faces; points seeing none are inside
        for &orphan_idx in &scratch.orphaned_points {
            let orphan = &vertices[orphan_idx];
            if let Some(face) = scratch
                .new_faces
                .iter_mut()
                .find(|f| f.is_visible_from(orphan, eps))
            {
                let distance = face.signed_distance(orphan);
                face.assign_point(orphan_idx, distance);
            }
        }

        hull_faces.append(&mut scratch.new_faces);
    }

    compact_faces(&mut hull_faces);
    Ok(hull_faces)
}

/// Sorted unique vertex ids referenced by the faces
fn face_vertices(faces: &[HullFace]) -> Vec<usize> {
    let mut used: Vec<usize> = faces.iter().flat_map(|f| f.vertices).collect();
    used.sort_unstable();
    used.dedup();
    used
}

/// The vertices whose incident faces span three independent directions
///
/// A vertex on a flat face sees a single normal direction and one on an edge
/// sees two, so neither is a corner of the hull.
fn corner_vertices(faces: &[HullFace], used: &[usize]) -> Vec<usize> {
    used.iter()
        .copied()
        .filter(|&v| {
            let normals: Vec<Vec3> = faces
                .iter()
                .filter(|f| f.vertices.contains(&v))
                .map(|f| f.normal)
                .collect();
            spans_three_directions(&normals)
        })
        .collect()
}

fn spans_three_directions(normals: &[Vec3]) -> bool {
    let Some(first) = normals.first() else {
        return false;
    };
    let Some(edge) = normals
        .iter()
        .map(|n| first.cross(n))
        .find(|c| c.magnitude() > NORMAL_TOLERANCE)
    else {
        return false;
    };
    let edge = edge.scale(1.0 / edge.magnitude());
    normals.iter().any(|n| edge.dot(n).abs() > NORMAL_TOLERANCE)
}

/// Convert the internal faces into a [`Hull`] over input indices
fn build_hull(
    points: &PointSet,
    ids: &[usize],
    vertices: &[Vec3],
    faces: &[HullFace],
    tolerance: f64,
) -> Hull {
    let mut simplices = Array2::<usize>::zeros((faces.len(), 3));
    let mut equations = Array2::<f64>::zeros((faces.len(), 4));

    for (row, face) in faces.iter().enumerate() {
        // recompute the plane from the final vertices for a tight offset
        let [a, b, c] = face.vertices;
        let normal = vertices[b]
            .sub(&vertices[a])
            .cross(&vertices[c].sub(&vertices[a]))
            .try_normalize()
            .unwrap_or(face.normal);

        for (col, &v) in face.vertices.iter().enumerate() {
            simplices[[row, col]] = ids[v];
        }
        equations[[row, 0]] = normal.x;
        equations[[row, 1]] = normal.y;
        equations[[row, 2]] = normal.z;
        equations[[row, 3]] = -normal.dot(&vertices[a]);
    }

    let mut hull_vertices: Vec<usize> = simplices.iter().copied().collect();
    hull_vertices.sort_unstable();
    hull_vertices.dedup();

    log::debug!(
        "Quickhull: {} input points, {} hull vertices, {} faces",
        points.len(),
        hull_vertices.len(),
        faces.len()
    );

    Hull::new(3, points.len(), hull_vertices, simplices, equations, tolerance)
}

/// Assign each point to the first face it sees
fn assign_points(hull_faces: &mut [HullFace], vertices: &[Vec3], points: &[usize], eps: f64) {
    for &point_idx in points {
        let vertex = &vertices[point_idx];
        if let Some(face) = hull_faces
            .iter_mut()
            .find(|f| f.is_visible_from(vertex, eps))
        {
            let distance = face.signed_distance(vertex);
            face.assign_point(point_idx, distance);
        }
    }
}

fn refresh_furthest(face: &mut HullFace, vertices: &[Vec3]) {
    for i in 0..face.outside_points.len() {
        let idx = face.outside_points[i];
        let distance = face.signed_distance(&vertices[idx]);
        if distance > face.furthest_distance {
            face.furthest_point = Some(idx);
            face.furthest_distance = distance;
        }
    }
}

/// Find the extreme points (min/max along each axis)
fn find_extreme_points(vertices: &[Vec3]) -> [usize; 6] {
    let mut extremes = [0usize; 6];

    for (i, v) in vertices.iter().enumerate() {
        let coords = [v.x, v.y, v.z];
        for axis in 0..3 {
            let min = &vertices[extremes[2 * axis]];
            let max = &vertices[extremes[2 * axis + 1]];
            let (min_c, max_c) = match axis {
                0 => (min.x, max.x),
                1 => (min.y, max.y),
                _ => (min.z, max.z),
            };
            if coords[axis] < min_c {
                extremes[2 * axis] = i;
            }
            if coords[axis] > max_c {
                extremes[2 * axis + 1] = i;
            }
        }
    }

    extremes
}

/// Find the initial simplex (tetrahedron) to start the algorithm
fn find_initial_simplex(vertices: &[Vec3], epsilon: f64) -> Result<[usize; 4]> {
    let extremes = find_extreme_points(vertices);

    // The pair of extreme points furthest apart
    let mut max_distance = 0.0;
    let mut v0 = 0;
    let mut v1 = 0;

    for i in 0..6 {
        for j in (i + 1)..6 {
            let dist = vertices[extremes[i]].distance(&vertices[extremes[j]]);
            if dist > max_distance {
                max_distance = dist;
                v0 = extremes[i];
                v1 = extremes[j];
            }
        }
    }

    if max_distance < epsilon {
        return Err(HullError::DegenerateInput(
            "all points coincide".to_string(),
        ));
    }

    // The point furthest from the line v0-v1
    let line_dir = vertices[v1].sub(&vertices[v0]).scale(1.0 / max_distance);

    let mut max_distance = 0.0;
    let mut v2 = 0;

    for (i, vertex) in vertices.iter().enumerate() {
        let to_point = vertex.sub(&vertices[v0]);
        let rejection = to_point.sub(&line_dir.scale(to_point.dot(&line_dir)));
        let dist = rejection.magnitude();

        if dist > max_distance {
            max_distance = dist;
            v2 = i;
        }
    }

    if max_distance < epsilon {
        return Err(HullError::DegenerateInput(
            "all points are collinear".to_string(),
        ));
    }

    // The point furthest from the plane v0, v1, v2, on either side
    let Some(normal) = vertices[v1]
        .sub(&vertices[v0])
        .cross(&vertices[v2].sub(&vertices[v0]))
        .try_normalize()
    else {
        return Err(HullError::DegenerateInput(
            "all points are collinear".to_string(),
        ));
    };

    let mut max_distance = 0.0;
    let mut v3 = 0;

    for (i, vertex) in vertices.iter().enumerate() {
        let dist = normal.dot(&vertex.sub(&vertices[v0])).abs();
        if dist > max_distance {
            max_distance = dist;
            v3 = i;
        }
    }

    if max_distance < epsilon {
        return Err(HullError::DegenerateInput(
            "all points are coplanar".to_string(),
        ));
    }

    Ok([v0, v1, v2, v3])
}

/// Create the initial hull from the simplex, all normals pointing outward
fn create_initial_hull(simplex: &[usize; 4], vertices: &[Vec3], interior: &Vec3) -> Vec<HullFace> {
    let [v0, v1, v2, v3] = *simplex;

    let mut faces = vec![
        HullFace::new(v0, v1, v2, vertices),
        HullFace::new(v0, v2, v3, vertices),
        HullFace::new(v0, v3, v1, vertices),
        HullFace::new(v1, v3, v2, vertices),
    ];

    for face in &mut faces {
        let to_interior = interior.sub(&vertices[face.vertices[0]]);
        if face.normal.dot(&to_interior) > 0.0 {
            face.flip();
        }
    }

    faces
}

/// Find the face with the furthest outside point
///
/// Ties go to the lowest face index, which keeps the run deterministic.
fn find_face_with_furthest_point(hull_faces: &[HullFace]) -> Option<(usize, usize)> {
    let mut max_distance = 0.0;
    let mut result = None;

    for (face_idx, face) in hull_faces.iter().enumerate() {
        if face.deleted {
            continue;
        }

        if let Some(point_idx) = face.furthest_point
            && face.furthest_distance > max_distance
        {
            max_distance = face.furthest_distance;
            result = Some((face_idx, point_idx));
        }
    }

    result
}

/// Collect the oriented horizon edges of the visible region
///
/// An edge belongs to the horizon when exactly one of its two faces is
/// visible.
fn find_horizon(
    hull_faces: &[HullFace],
    visible_faces: &[usize],
    edge_to_face: &mut BTreeMap<Edge, usize>,
    horizon: &mut Vec<Edge>,
) {
    edge_to_face.clear();
    horizon.clear();

    for &face_idx in visible_faces {
        let [a, b, c] = hull_faces[face_idx].vertices;
        for (v0, v1) in [(a, b), (b, c), (c, a)] {
            match edge_to_face.entry(Edge::new(v0, v1)) {
                Entry::Vacant(e) => {
                    e.insert(face_idx);
                }
                Entry::Occupied(e) => {
                    // Shared by two visible faces - not a horizon edge
                    e.remove();
                }
            }
        }
    }

    for (&key, &face_idx) in edge_to_face.iter() {
        let [a, b, c] = hull_faces[face_idx].vertices;
        if let Some((v0, v1)) = [(a, b), (b, c), (c, a)]
            .into_iter()
            .find(|&(v0, v1)| Edge::new(v0, v1) == key)
        {
            horizon.push(Edge::oriented(v0, v1));
        }
    }
}

/// Remove deleted faces from the vector
fn compact_faces(hull_faces: &mut Vec<HullFace>) {
    hull_faces.retain(|f| !f.deleted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_simple_tetrahedron() {
        let points = PointSet::from_array(array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);

        let hull = quickhull_3d(&points).unwrap();
        assert_eq!(hull.num_simplices(), 4);
        assert_eq!(hull.vertices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_cube() {
        let points = PointSet::from_array(array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
            [0.5, 0.5, 0.5],
        ]);

        let hull = quickhull_3d(&points).unwrap();
        // 8 corners, 12 triangular faces (2 per square face)
        assert_eq!(hull.vertices(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(hull.num_simplices(), 12);
    }

    #[test]
    fn test_cube_with_face_and_edge_points() {
        let points = crate::testdata::cube_with_boundary_points(1.0);

        let hull = quickhull_3d(&points).unwrap();
        assert_eq!(hull.vertices(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(hull.num_simplices(), 12);
        assert!((hull.volume(&points) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spans_three_directions() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = Vec3::new(0.0, 0.0, 1.0);

        assert!(spans_three_directions(&[x, y, z]));
        assert!(spans_three_directions(&[x, x, y, y, z]));
        // flat face and edge
        assert!(!spans_three_directions(&[z, z, z]));
        assert!(!spans_three_directions(&[x, y, x, y]));
        assert!(!spans_three_directions(&[]));
    }

    #[test]
    fn test_rescaled_tetrahedron() {
        for (scale, offset) in [(1e-6, 0.0), (1.0, 1e6)] {
            let points = PointSet::from_array(
                array![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, 0.0, 1.0],
                    [0.1, 0.1, 0.1],
                ]
                .mapv(|c| c * scale + offset),
            );

            let hull = quickhull_3d(&points).unwrap();
            assert_eq!(hull.vertices(), &[0, 1, 2, 3], "scale {scale} offset {offset}");
            assert_eq!(hull.num_simplices(), 4);
        }
    }

    #[test]
    fn test_insufficient_vertices() {
        let points = PointSet::from_array(array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);

        let result = quickhull_3d(&points);
        assert!(matches!(result, Err(HullError::DegenerateInput(_))));
    }

    #[test]
    fn test_coplanar_points() {
        let points = PointSet::from_array(array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.5, 0.2, 0.0],
        ]);

        let result = quickhull_3d(&points);
        assert!(matches!(result, Err(HullError::DegenerateInput(_))));
    }

    #[test]
    fn test_horizon_of_single_face() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![HullFace::new(0, 1, 2, &vertices)];
        let mut edge_to_face = BTreeMap::new();
        let mut horizon = Vec::new();

        find_horizon(&faces, &[0], &mut edge_to_face, &mut horizon);

        assert_eq!(
            horizon,
            vec![
                Edge::oriented(0, 1),
                Edge::oriented(2, 0),
                Edge::oriented(1, 2)
            ]
        );
    }
}
