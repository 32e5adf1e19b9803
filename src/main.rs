use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use landpoints::api::{BoundarySource, TableOutcome, fetch_boundary, resolve_boundary, submit_points};
use landpoints::config::{DEFAULT_NUM_POINTS, FileConfig};
use landpoints::domain::{Boundary, SamplePoint};
use landpoints::geometry::generate;
use landpoints::output::{
    OutputPaths, api_format::preview, api_points, curl_command, format_points_for_api,
    save_api_format, save_points_json, save_response,
};

/// Points shown in the API format and curl examples
const EXAMPLE_POINTS: usize = 5;
/// Characters of the request body echoed before sending
const PREVIEW_CHARS: usize = 100;

/// Generate random geographical points within a region's land boundary and
/// submit them to a driving table API
///
/// Examples:
///   # 100 points inside Malta (default region)
///   landpoints
///
///   # 500 points
///   landpoints -n 500
///
///   # Use a config file (region, seed, API URL, output directory)
///   landpoints --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "landpoints")]
#[command(version, about, long_about = None)]
struct Args {
    /// The number of random points to generate (default: 100)
    #[arg(short = 'n', long = "num-points", alias = "num_points")]
    num_points: Option<usize>,

    /// Path to config file (optional, auto-searches landpoints.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config: FileConfig = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_tracing(verbose);

    let num_points = args
        .num_points
        .or(file_config.num_points)
        .unwrap_or(DEFAULT_NUM_POINTS);
    let region = file_config.region.clone();
    let paths = OutputPaths::for_region(&file_config.output_dir, &region);
    let total_start = Instant::now();

    println!("landpoints - Random Land Point Generator");
    println!("========================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Region: {}", region);
        println!("  Points: {}", num_points);
        match file_config.seed {
            Some(seed) => println!("  Seed: {}", seed),
            None => println!("  Seed: random"),
        }
        if let Some(max) = file_config.max_points {
            println!("  Max points per request: {}", max);
        }
        println!("  Nominatim: {}", file_config.nominatim.url);
        println!("  Table API: {}", file_config.table.url);
        println!("  Output dir: {}", file_config.output_dir.display());
        println!();
    }

    println!(
        "Starting {} point generation for {} points...",
        region, num_points
    );

    let spinner = create_spinner(&format!("Fetching {} boundary from OpenStreetMap...", region));
    let start = Instant::now();
    let fallback = file_config
        .fallback_ring()
        .map(|ring| Boundary::from_lon_lat(&ring))
        .unwrap_or_else(Boundary::fallback);
    let (boundary, source) = resolve_boundary(
        fetch_boundary(&region, &file_config.nominatim),
        fallback,
    );
    match source {
        BoundarySource::Remote => spinner.finish_with_message(format!(
            "Fetched {} boundary: {} polygon(s), {} vertices [{:.1}s]",
            region,
            boundary.polygon_count(),
            boundary.vertex_count(),
            start.elapsed().as_secs_f32()
        )),
        BoundarySource::Fallback { ref reason } => {
            spinner.finish_with_message(format!(
                "Warning: Could not fetch {} boundary from OSM: {}",
                region, reason
            ));
            println!("Using fallback approximate {} boundary...", region);
        }
    }

    let mut rng = match file_config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let spinner = create_spinner(&format!(
        "Generating {} points within {}'s boundaries...",
        num_points, region
    ));
    let start = Instant::now();
    let report = generate(&boundary, num_points, &mut rng);
    spinner.finish_with_message(format!(
        "Generated {}/{} points in {} attempts [{:.1}s]",
        report.points.len(),
        report.requested,
        report.attempts,
        start.elapsed().as_secs_f32()
    ));
    if !report.is_complete() {
        println!(
            "Warning: Only generated {} points out of {} requested after {} attempts.",
            report.points.len(),
            report.requested,
            report.max_attempts
        );
    }

    let points = report.points;
    if points.is_empty() {
        println!("No points were generated. Exiting.");
        return Ok(());
    }

    print_points(&points, &region, file_config.sample_size);
    println!();

    std::fs::create_dir_all(&file_config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            file_config.output_dir.display()
        )
    })?;

    save_points_json(&paths.points_json, &points)?;
    println!(
        "Saved {} points to {}",
        points.len(),
        paths.points_json.display()
    );

    save_api_format(&paths.api_format, &points)?;
    println!(
        "Saved {} points in API format to {}",
        points.len(),
        paths.api_format.display()
    );
    println!("Format: longitude,latitude;longitude,latitude...");

    let request_points = api_points(&points, file_config.max_points);
    let example_points = &request_points[..EXAMPLE_POINTS.min(request_points.len())];

    print_section(&format!("API FORMAT EXAMPLE (first {} points):", EXAMPLE_POINTS));
    println!("{}", format_points_for_api(example_points));

    print_section(&format!("SAMPLE CURL COMMAND (first {} points):", EXAMPLE_POINTS));
    println!("{}", curl_command(example_points, &file_config.table.url));

    print_section(&format!(
        "MAKING API REQUEST (ALL {} points):",
        request_points.len()
    ));
    let body = format_points_for_api(request_points);
    println!("Making API request to: {}", file_config.table.url);
    println!("Sending {} points...", request_points.len());
    println!("Data: {}", preview(&body, PREVIEW_CHARS));

    let spinner = create_spinner("Waiting for routing API...");
    let outcome = submit_points(&body, &file_config.table);
    spinner.finish_with_message(describe_outcome(&outcome));

    match save_response(&paths.api_response, &outcome) {
        Ok(()) => println!(
            "\nAPI response successfully saved to {}",
            paths.api_response.display()
        ),
        Err(e) => eprintln!("\nError: Could not save API response to file: {:#}", e),
    }

    print_section("SUMMARY:");
    println!("Total points generated: {}", points.len());
    if let Some(duration) = outcome.request_duration_seconds() {
        println!("API request time: {:.4} seconds", duration);
    }
    println!("JSON format saved to: {}", paths.points_json.display());
    println!("API format saved to: {}", paths.api_format.display());
    println!("API response saved to: {}", paths.api_response.display());
    if source.is_fallback() {
        println!("Points are within the approximate fallback boundary");
    } else {
        println!("All points are within {}'s boundary", region);
    }
    println!("All coordinates have 6 decimal precision");
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_points(points: &[SamplePoint], region: &str, num_to_show: usize) {
    println!();
    println!("Generated {} random points in {}:", points.len(), region);
    println!("{}", "-".repeat(50));

    for (i, p) in points.iter().take(num_to_show).enumerate() {
        println!("Point {:3}: {:.6}, {:.6}", i + 1, p.latitude, p.longitude);
    }

    if points.len() > num_to_show {
        println!("... and {} more points", points.len() - num_to_show);
    }
}

fn print_section(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn describe_outcome(outcome: &TableOutcome) -> String {
    match outcome {
        TableOutcome::Success(_) | TableOutcome::NonObject { .. } | TableOutcome::RawText { .. } => {
            format!(
                "Routing API responded [{:.2}s]",
                outcome.request_duration_seconds().unwrap_or_default()
            )
        }
        TableOutcome::Failed { error, .. } | TableOutcome::Unreachable { error, .. } => {
            format!("Routing API error: {}", error)
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
