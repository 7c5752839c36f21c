//! Export and rendering functions for convex hulls

use crate::types::{Hull, PointSet};
use crate::{HullError, Result};
use plotly::common::{DashType, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a convex hull to OBJ format
///
/// Only the hull vertices are written, in hull order, and the facets are
/// reindexed to them (OBJ uses 1-based indexing).
/// - 2D: `v x y 0` per vertex and one `l i j` line per edge of the closed loop
/// - 3D: `v x y z` per vertex and one `f i j k` line per triangle
pub fn export_obj<P: AsRef<Path>>(points: &PointSet, hull: &Hull, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "# Convex Hull OBJ Export")?;
    writeln!(file, "# Vertices: {}", hull.num_vertices())?;
    writeln!(file, "# Facets: {}", hull.num_simplices())?;

    // input index -> 1-based OBJ index
    let mut obj_index = vec![0usize; points.len()];
    for (i, &v) in hull.vertices().iter().enumerate() {
        obj_index[v] = i + 1;
        let p = points.point(v);
        match hull.dimension() {
            2 => writeln!(file, "v {:.6} {:.6} 0", p[0], p[1])?,
            _ => writeln!(file, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?,
        }
    }

    match hull.dimension() {
        2 => {
            let k = hull.num_vertices();
            for i in 0..k {
                writeln!(file, "l {} {}", i + 1, (i + 1) % k + 1)?;
            }
        }
        3 => {
            for facet in hull.simplices().rows() {
                writeln!(
                    file,
                    "f {} {} {}",
                    obj_index[facet[0]], obj_index[facet[1]], obj_index[facet[2]]
                )?;
            }
        }
        d => return Err(HullError::UnsupportedDimension(d)),
    }

    file.flush()?;
    log::info!("Exported OBJ: {}", path.display());
    Ok(())
}

/// Render the points and their hull as a 2D plotly figure
///
/// Uses the first two coordinates, so a 3D hull is drawn as its projection
/// onto the xy plane.
/// - every point as a small circle marker
/// - every simplex as a solid black segment
/// - the closed vertex loop as a dashed red line
/// - the first hull vertex as a large red marker
pub fn render_plot(points: &PointSet, hull: &Hull, title: &str) -> Plot {
    let mut plot = Plot::new();

    let trace_points = Scatter::new(points.column(0), points.column(1))
        .mode(Mode::Markers)
        .name("Points")
        .marker(
            Marker::new()
                .color("rgba(31, 119, 180, 0.9)")
                .size(7)
                .symbol(MarkerSymbol::Circle),
        );
    plot.add_trace(trace_points);

    for (i, facet) in hull.simplices().rows().into_iter().enumerate() {
        // closing the facet draws a triangle outline in 3D, a segment in 2D
        let mut loop_idx: Vec<usize> = facet.to_vec();
        if loop_idx.len() > 2 {
            loop_idx.push(facet[0]);
        }
        let xs: Vec<f64> = loop_idx.iter().map(|&v| points.point(v)[0]).collect();
        let ys: Vec<f64> = loop_idx.iter().map(|&v| points.point(v)[1]).collect();

        let edge = Scatter::new(xs, ys)
            .mode(Mode::Lines)
            .name("Simplices")
            .legend_group("simplices")
            .show_legend(i == 0)
            .line(Line::new().color("black").width(1.0));
        plot.add_trace(edge);
    }

    if let Some(&first) = hull.vertices().first() {
        let mut ring: Vec<usize> = hull.vertices().to_vec();
        ring.push(first);
        let xs: Vec<f64> = ring.iter().map(|&v| points.point(v)[0]).collect();
        let ys: Vec<f64> = ring.iter().map(|&v| points.point(v)[1]).collect();

        let boundary = Scatter::new(xs, ys)
            .mode(Mode::Lines)
            .name("Hull vertices")
            .line(
                Line::new()
                    .color("rgba(220, 20, 20, 1.0)")
                    .width(2.0)
                    .dash(DashType::Dash),
            );
        plot.add_trace(boundary);

        let p = points.point(first);
        let start = Scatter::new(vec![p[0]], vec![p[1]])
            .mode(Mode::Markers)
            .name("First vertex")
            .marker(
                Marker::new()
                    .color("rgba(220, 20, 20, 1.0)")
                    .size(12)
                    .symbol(MarkerSymbol::Circle),
            );
        plot.add_trace(start);
    }

    let layout = Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text("x")))
        .y_axis(Axis::new().title(Title::with_text("y")));
    plot.set_layout(layout);

    plot
}

/// Export the hull plot to a standalone HTML file
pub fn export_html<P: AsRef<Path>>(
    points: &PointSet,
    hull: &Hull,
    path: P,
    title: &str,
) -> Result<()> {
    let path = path.as_ref();
    let plot = render_plot(points, hull, title);
    std::fs::write(path, plot.to_html())?;
    log::info!("Exported HTML: {}", path.display());
    Ok(())
}

/// Render the hull plot and open it in the default browser
pub fn show_plot(points: &PointSet, hull: &Hull, title: &str) {
    render_plot(points, hull, title).show();
}
