use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use skin_palette_wasm::config::DEFAULT_CLUSTERS;
use skin_palette_wasm::swatch::{SwatchLayout, render_swatches};
use skin_palette_wasm::{PaletteConfig, Point, encode_png, extract_palette_bytes};

/// Extract a skin-tone palette from a face photo and its detected landmarks.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// JSON file holding the 68 face landmarks as `[x, y]` pairs
    #[arg(short, long)]
    landmarks: PathBuf,

    /// Number of colors in the palette
    #[arg(short = 'k', long, default_value_t = DEFAULT_CLUSTERS)]
    clusters: usize,

    /// Seed for K-Means++ initialisation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the clipped face region to this PNG
    #[arg(long)]
    cutout: Option<PathBuf>,

    /// Write a swatch strip of the palette to this PNG
    #[arg(long)]
    swatches: Option<PathBuf>,

    /// Print the palette as a JSON array instead of one color per line
    #[arg(long)]
    json: bool,
}

fn read_landmarks(path: &Path) -> Result<Vec<Point>> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let pairs: Vec<[f32; 2]> =
        serde_json::from_slice(&raw).context("landmarks must be a JSON array of [x, y] pairs")?;
    Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
}

fn write_png(path: &Path, img: &RgbaImage) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, encode_png(img)?)?;
    eprintln!("Saved → {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bytes = fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let landmarks = read_landmarks(&args.landmarks)?;
    let config = PaletteConfig::with_clusters(args.clusters);

    let extraction =
        extract_palette_bytes(&bytes, &landmarks, &config, args.seed).context("palette extraction failed")?;
    tracing::info!(
        samples = extraction.samples,
        iterations = extraction.clustering.iterations,
        converged = extraction.clustering.converged,
        shares = ?extraction.clustering.shares(),
        "extracted palette"
    );

    if let Some(path) = &args.cutout {
        write_png(path, &extraction.cutout)?;
    }
    if let Some(path) = &args.swatches {
        write_png(path, &render_swatches(extraction.palette(), SwatchLayout::default()))?;
    }

    let hex = extraction.hex();
    if args.json {
        println!("{}", serde_json::to_string(&hex)?);
    } else {
        for color in hex {
            println!("{color}");
        }
    }

    Ok(())
}
