use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use xyz_hull::{
    Hull, PointSet, XyzOptions, compute_hull, export_html, export_obj, filter_inside, load_xyz,
    save_xyz, show_plot,
};

/// CLI arguments for the convex hull viewer
#[derive(Parser, Debug)]
#[command(name = "xyz-hull")]
#[command(about = "Compute the convex hull of an xyz point file and plot it with Plotly")]
struct Args {
    /// Input xyz file (first line is a header)
    #[arg(short, long, default_value = "points.xyz")]
    input: PathBuf,

    /// Coordinates per point (0 infers it from the first data line)
    #[arg(short, long, default_value_t = 2)]
    dim: usize,

    /// Write the plot to this HTML file instead of opening it
    #[arg(long)]
    html: Option<PathBuf>,

    /// Export the hull as a Wavefront OBJ file
    #[arg(long)]
    obj: Option<PathBuf>,

    /// xyz file of query points to test against the hull
    #[arg(long)]
    query: Option<PathBuf>,

    /// Where the query points inside the hull are saved
    #[arg(long, default_value = "inside.xyz")]
    inside_output: PathBuf,

    /// Plot title
    #[arg(long, default_value = "Convex Hull")]
    title: String,

    /// Skip rendering the plot
    #[arg(long)]
    no_plot: bool,

    /// Print the hull as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

impl Args {
    fn xyz_options(&self) -> XyzOptions {
        match self.dim {
            0 => XyzOptions::inferred(),
            d => XyzOptions::with_dimension(d),
        }
    }
}

fn print_summary(points: &PointSet, hull: &Hull) {
    println!("{hull}");
    println!("Volume: {:.6}", hull.volume(points));
    println!("Area: {:.6}", hull.area(points));
    println!("Hull points:");
    for index in hull.hull_point_indices() {
        let coords: Vec<String> = points
            .point(index)
            .iter()
            .map(|c| format!("{c:.6}"))
            .collect();
        println!("  [{index:>4}] {}", coords.join(" "));
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = args.xyz_options();

    let points = load_xyz(&args.input, &options)
        .with_context(|| format!("failed to load points from {}", args.input.display()))?;

    let hull = compute_hull(&points).context("failed to compute convex hull")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&hull).context("failed to serialize hull")?
        );
    } else {
        print_summary(&points, &hull);
    }

    if let Some(obj_path) = &args.obj {
        export_obj(&points, &hull, obj_path)
            .with_context(|| format!("failed to export OBJ to {}", obj_path.display()))?;
    }

    if let Some(query_path) = &args.query {
        let query = load_xyz(query_path, &options)
            .with_context(|| format!("failed to load query points from {}", query_path.display()))?;
        let inside = filter_inside(&query, &hull)
            .context("query points do not match the hull dimension")?;
        println!(
            "{} of {} query points inside the hull",
            inside.len(),
            query.len()
        );
        save_xyz(&inside, &args.inside_output).with_context(|| {
            format!(
                "failed to save inside points to {}",
                args.inside_output.display()
            )
        })?;
    }

    if !args.no_plot {
        match &args.html {
            Some(html_path) => export_html(&points, &hull, html_path, &args.title)
                .with_context(|| format!("failed to write plot to {}", html_path.display()))?,
            None => show_plot(&points, &hull, &args.title),
        }
    }

    Ok(())
}
