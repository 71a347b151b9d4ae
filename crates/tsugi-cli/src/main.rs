//! tsugi: order image files into their most continuous vertical
//! stacking sequence.
//!
//! Loads the given images, runs the sequencing engine, and prints the
//! computed order as a human-readable report or JSON. With `--output`
//! the ordered images are also composited top-to-bottom into one PNG.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin tsugi -- [OPTIONS] <IMAGES>...
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use image::RgbaImage;
use tsugi_engine::{Dimensions, EngineConfig, NoopSink, RowSource, SequenceReport};

/// Order vertically split images into their most continuous stacking
/// sequence, discounting letterbox padding at the edges.
#[derive(Parser)]
#[command(name = "tsugi", version)]
struct Cli {
    /// Paths of the images to sequence (PNG, JPEG, BMP, WebP).
    #[arg(required = false)]
    images: Vec<PathBuf>,

    /// Blank-color tolerance (Euclidean RGB distance).
    #[arg(long, default_value_t = EngineConfig::DEFAULT_BLANK_TOLERANCE)]
    tolerance: f64,

    /// Letterbox scan window as a fraction of image height.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_SCAN_WINDOW_RATIO)]
    window_ratio: f64,

    /// Cap on the letterbox scan window, in rows.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_SCAN_WINDOW_CAP)]
    window_cap: u32,

    /// Pixel sampling stride for edge fingerprints.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_SAMPLE_STRIDE)]
    stride: usize,

    /// Relative aspect-ratio tolerance for the pre-check.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_ASPECT_TOLERANCE)]
    aspect_tolerance: f64,

    /// Largest image set the exhaustive search will attempt.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_MAX_SEARCH_IMAGES)]
    max_search: usize,

    /// Sequence even when the aspect ratios disagree.
    #[arg(long)]
    force: bool,

    /// Print the report as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Print engine diagnostics to stderr while sequencing.
    #[arg(long)]
    verbose: bool,

    /// Composite the images vertically in the computed order and write
    /// the result to this path (PNG recommended).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            blank_tolerance: self.tolerance,
            scan_window_ratio: self.window_ratio,
            scan_window_cap: self.window_cap,
            sample_stride: self.stride,
            aspect_tolerance: self.aspect_tolerance,
            max_search_images: self.max_search,
        }
    }
}

/// Load every input file, aborting on the first decode failure. The
/// engine's precondition is that each supplied image is fully readable.
fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbaImage>, String> {
    paths
        .iter()
        .map(|path| {
            image::open(path)
                .map(|img| img.to_rgba8())
                .map_err(|e| format!("Error reading {}: {e}", path.display()))
        })
        .collect()
}

/// Pre-check: all images must share the first image's aspect ratio
/// within the configured tolerance, otherwise they are unlikely to be
/// pieces of one split composite.
fn mismatched_aspect(images: &[RgbaImage], tolerance: f64) -> Option<(usize, Dimensions)> {
    let first = RowSource::dimensions(images.first()?);
    images
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, img)| !RowSource::dimensions(*img).aspect_within(first, tolerance))
        .map(|(i, img)| (i, RowSource::dimensions(img)))
}

/// Stack the images top-to-bottom in the computed order, left-aligned
/// on a canvas as wide as the widest input.
fn composite(images: &[RgbaImage], report: &SequenceReport) -> RgbaImage {
    let ordered: Vec<&RgbaImage> = report.order.permute(images);
    let width = ordered.iter().map(|img| img.width()).max().unwrap_or(0);
    let height = ordered.iter().map(|img| img.height()).sum();

    let mut canvas = RgbaImage::new(width, height);
    let mut y_offset: i64 = 0;
    for img in ordered {
        image::imageops::overlay(&mut canvas, img, 0, y_offset);
        y_offset += i64::from(img.height());
    }
    canvas
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.engine_config();

    let images = match load_images(&cli.images) {
        Ok(images) => images,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if !cli.force
        && let Some((index, dimensions)) = mismatched_aspect(&images, config.aspect_tolerance)
    {
        eprintln!(
            "{}: aspect ratio {}x{} deviates from the first image by more than {:.0}% \
             (use --force to sequence anyway)",
            cli.images[index].display(),
            dimensions.width,
            dimensions.height,
            config.aspect_tolerance * 100.0,
        );
        return ExitCode::FAILURE;
    }

    let stderr_sink = |message: &str| eprintln!("[engine] {message}");
    let result = if cli.verbose {
        tsugi_engine::order_report(&images, &config, &stderr_sink)
    } else {
        tsugi_engine::order_report(&images, &config, &NoopSink)
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.report());
        for &index in report.order.indices() {
            println!("  {}", cli.images[index].display());
        }
    }

    if let Some(ref output) = cli.output {
        let stacked = composite(&images, &report);
        if let Err(e) = stacked.save(output) {
            eprintln!("Error writing {}: {e}", output.display());
            return ExitCode::FAILURE;
        }
        eprintln!(
            "Wrote {} ({}x{})",
            output.display(),
            stacked.width(),
            stacked.height(),
        );
    }

    ExitCode::SUCCESS
}
