use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use drivetimes::api::{GoogleDistanceMatrix, TravelMode};
use drivetimes::batch::batch_count;
use drivetimes::config::{FileConfig, Overrides, RunConfig, parse_corner};
use drivetimes::pipeline::{generate_dataset, sample_pairs};

/// Generate synthetic travel-time test data
///
/// Samples random origin/destination pairs inside a polygon, asks the
/// Google Distance Matrix API for the travel time of each pair, and writes
/// the results as CSV.
///
/// Examples:
///   # 50 pairs in the default area, key from the environment
///   GOOGLE_MAPS_API_KEY=... drivetimes
///
///   # 200 reproducible pairs in a custom triangle
///   drivetimes -n 200 --seed 42 --corner 40.0,-75.0 --corner 40.1,-75.0 --corner 40.05,-74.9
///
///   # Check the sampled points without calling the API
///   drivetimes --dry-run -n 5
#[derive(Parser, Debug)]
#[command(name = "drivetimes")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches drivetimes.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Google Maps API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of origin/destination pairs to generate
    #[arg(short = 'n', long)]
    pairs: Option<usize>,

    /// Output CSV path (defaults to distance_results.csv)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pairs per API request (1-25)
    #[arg(short = 'b', long)]
    batch_size: Option<usize>,

    /// Sampling attempts per point before the polygon is considered degenerate
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Polygon corner as LAT,LON; repeat at least three times to replace the default area
    #[arg(long = "corner", value_name = "LAT,LON", value_parser = parse_corner, allow_hyphen_values = true)]
    corners: Vec<(f64, f64)>,

    /// Travel mode
    #[arg(long)]
    mode: Option<TravelMode>,

    /// Distance Matrix endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds, 0 to wait indefinitely
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the sampled pairs and exit without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn into_overrides(self) -> Overrides {
        Overrides {
            api_key: self.api_key,
            pairs: self.pairs,
            output: self.output,
            batch_size: self.batch_size,
            max_attempts: self.max_attempts,
            seed: self.seed,
            corners: self.corners,
            mode: self.mode,
            endpoint: self.endpoint,
            timeout_secs: self.timeout_secs,
            verbose: self.verbose,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => FileConfig::from_path(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };
    let config = RunConfig::resolve(args.into_overrides(), file_config)?;

    init_logging(config.verbose);
    tracing::info!(
        pairs = config.pairs,
        batch_size = config.batch_size.get(),
        corners = config.corners.len(),
        mode = config.mode.as_str(),
        seed = ?config.seed,
        "configuration"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let spinner = create_spinner("Sampling points inside the polygon...");
    let start = Instant::now();
    let pairs = sample_pairs(&config, &mut rng)?;
    spinner.finish_with_message(format!(
        "Sampled {} pairs [{:.1}s]",
        pairs.len(),
        start.elapsed().as_secs_f32()
    ));

    if config.dry_run {
        println!("origin_lat,origin_lng,dest_lat,dest_lng");
        for pair in &pairs {
            println!(
                "{},{},{},{}",
                pair.origin.y(),
                pair.origin.x(),
                pair.destination.y(),
                pair.destination.x()
            );
        }
        return Ok(());
    }

    let api_key = config
        .api_key
        .clone()
        .context("Missing API key")?;
    let matrix = GoogleDistanceMatrix::new(api_key, &config.endpoint, config.mode, config.timeout)?;

    let progress = create_progress_bar(batch_count(pairs.len(), config.batch_size) as u64);
    let rows = generate_dataset(&config, &pairs, &matrix, |_| progress.inc(1))
        .context("Failed to generate travel-time data")?;
    progress.finish_and_clear();

    println!(
        "Done! Saved {} valid pairs to {} [{:.1}s]",
        rows.len(),
        config.output.display(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} Querying travel times [{bar:30}] {pos}/{len} batches")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}
