//! CIF CLI - tools for the sparse color-indexed image format.
//!
//! Converts rasters (binary PPM) to and from CIF text files, inspects
//! them, and recolors pixels or whole color buckets in place.

mod ppm;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;

use cif_codec::{pipeline, row, rows, Cif};
use cif_core::{coord, CifError, Color};

#[derive(Parser)]
#[command(name = "cif")]
#[command(author, version, about = "Sparse color-indexed image format tools")]
#[command(long_about = "
CIF represents an image as one text row per color, each row listing the
pixel ids holding that color (optionally run-length compressed). The
format does not store image dimensions, so decode-side commands take
--width and --height.

Examples:
  cif encode photo.ppm photo.cif
  cif encode photo.ppm photo.cif --compress
  cif decode photo.cif restored.ppm --width 640 --height 480
  cif info photo.cif --width 640 --height 480 --json
  cif recolor photo.cif --width 640 --height 480 --from FF0000 --to 00FF00
  cif recolor photo.cif --width 640 --height 480 --pixel 3,7 --to 000000
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a PPM raster into a CIF file
    #[command(alias = "e")]
    Encode {
        /// Input raster (binary PPM, P6)
        input: PathBuf,

        /// Output CIF file
        output: PathBuf,

        /// Use range-compressed rows
        #[arg(short, long)]
        compress: bool,

        /// Show progress bar
        #[arg(short = 'P', long, default_value = "true")]
        progress: bool,
    },

    /// Decode a CIF file back into a PPM raster
    #[command(alias = "d")]
    Decode {
        /// Input CIF file
        input: PathBuf,

        /// Output raster (binary PPM, P6)
        output: PathBuf,

        /// Image width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,
    },

    /// Show information about a CIF file
    #[command(alias = "i")]
    Info {
        /// CIF file to inspect
        file: PathBuf,

        /// Image width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// List every color bucket
        #[arg(short, long)]
        verbose: bool,
    },

    /// Recolor one pixel or a whole color bucket
    #[command(alias = "r")]
    Recolor {
        /// CIF file to modify
        file: PathBuf,

        /// Image width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Recolor the single pixel at X,Y
        #[arg(short, long, value_name = "X,Y", conflicts_with = "from")]
        pixel: Option<String>,

        /// Recolor every pixel of this color (RRGGBB or RRGGBB:ALPHA)
        #[arg(short, long, value_name = "COLOR")]
        from: Option<String>,

        /// Target color (RRGGBB or RRGGBB:ALPHA)
        #[arg(short, long, value_name = "COLOR")]
        to: String,

        /// Write here instead of rewriting the input file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force range-compressed rows (default: keep the input layout)
        #[arg(short, long)]
        compress: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            compress,
            progress,
        } => cmd_encode(&input, &output, compress, progress),
        Commands::Decode {
            input,
            output,
            width,
            height,
        } => cmd_decode(&input, &output, width, height),
        Commands::Info {
            file,
            width,
            height,
            json,
            verbose,
        } => cmd_info(&file, width, height, json, verbose),
        Commands::Recolor {
            file,
            width,
            height,
            pixel,
            from,
            to,
            output,
            compress,
        } => cmd_recolor(&file, width, height, pixel, from, &to, output, compress),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_encode(input: &PathBuf, output: &PathBuf, compress: bool, progress: bool) -> CmdResult {
    let buffer = ppm::read_ppm(input)?;
    let cif = pipeline::cif_from_buffer(&buffer);

    let pb = create_progress_bar(cif.color_count() as u64, progress);
    let mut encoded = Vec::new();
    for (color, ids) in cif.buckets().filter(|(_, ids)| !ids.is_empty()) {
        encoded.push(row::serialize_row(color, ids, compress));
        pb.inc(1);
    }
    pb.finish_and_clear();
    rows::write_rows(output, &encoded)?;

    println!(
        "Encoded {}x{} raster: {} colors, {} rows{}",
        buffer.width(),
        buffer.height(),
        cif.color_count(),
        encoded.len(),
        if compress { " (compressed)" } else { "" }
    );
    Ok(())
}

fn cmd_decode(input: &PathBuf, output: &PathBuf, width: u32, height: u32) -> CmdResult {
    let buffer = pipeline::load_image(input, width, height)?;
    ppm::write_ppm(&buffer, output)?;
    println!("Decoded {} -> {} ({width}x{height})", input.display(), output.display());
    Ok(())
}

#[derive(Serialize)]
struct InfoReport {
    file: String,
    width: u32,
    height: u32,
    compressed: bool,
    colors: usize,
    pixels: usize,
    coverage_percent: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buckets: Vec<BucketReport>,
}

#[derive(Serialize)]
struct BucketReport {
    hex: String,
    alpha: u8,
    pixels: usize,
}

fn cmd_info(file: &PathBuf, width: u32, height: u32, json: bool, verbose: bool) -> CmdResult {
    let cif = pipeline::load_cif(file, width, height)?;

    let coverage = if cif.checksum() > 0 {
        cif.len() as f64 / cif.checksum() as f64 * 100.0
    } else {
        0.0
    };
    let buckets: Vec<BucketReport> = if verbose || json {
        cif.buckets()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(color, ids)| BucketReport {
                hex: color.to_hex(),
                alpha: color.a,
                pixels: ids.len(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let report = InfoReport {
        file: file.display().to_string(),
        width,
        height,
        compressed: cif.compressed(),
        colors: cif.color_count(),
        pixels: cif.len(),
        coverage_percent: coverage,
        buckets,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("CIF file: {}", report.file);
    println!("  Dimensions: {}x{}", report.width, report.height);
    println!(
        "  Layout: {}",
        if report.compressed {
            "range-compressed"
        } else {
            "literal ids"
        }
    );
    println!("  Colors: {}", report.colors);
    println!(
        "  Pixels: {} / {} ({:.1}% coverage)",
        report.pixels,
        cif.checksum(),
        report.coverage_percent
    );
    if verbose {
        println!("{:>8} {:>5} {:>10}", "Color", "Alpha", "Pixels");
        println!("{}", "-".repeat(26));
        for b in &report.buckets {
            println!("{:>8} {:>5} {:>10}", b.hex, b.alpha, b.pixels);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_recolor(
    file: &PathBuf,
    width: u32,
    height: u32,
    pixel: Option<String>,
    from: Option<String>,
    to: &str,
    output: Option<PathBuf>,
    compress: bool,
) -> CmdResult {
    let mut cif = pipeline::load_cif(file, width, height)?;
    let to = parse_color_spec(to)?;

    let target = match (pixel, from) {
        (Some(pixel), None) => {
            let (x, y) = parse_pixel_spec(&pixel)?;
            RecolorTarget::Pixel(x, y)
        }
        (None, Some(from)) => RecolorTarget::Bucket(parse_color_spec(&from)?),
        _ => return Err("exactly one of --pixel or --from is required".into()),
    };

    let changed = match target {
        RecolorTarget::Pixel(x, y) => cif.recolor_pixel(x, y, to),
        RecolorTarget::Bucket(from) => cif.recolor_bucket(from, to),
    };

    if !changed {
        eprintln!("Nothing to change: {}", no_change_reason(&cif, target, to));
        std::process::exit(2);
    }

    let target = output.as_ref().unwrap_or(file);
    let layout = compress || cif.compressed();
    pipeline::save_cif(&cif, target, layout)?;
    println!("Recolored -> {}", target.display());
    Ok(())
}

/// What a recolor invocation is aimed at.
#[derive(Clone, Copy)]
enum RecolorTarget {
    Pixel(u32, u32),
    Bucket(Color),
}

/// Diagnose why a recolor call reported nothing to change.
fn no_change_reason(cif: &Cif, target: RecolorTarget, to: Color) -> String {
    match target {
        RecolorTarget::Pixel(x, y) => {
            if x >= cif.width() || y >= cif.height() {
                CifError::out_of_bounds(
                    y.saturating_mul(cif.width()).saturating_add(x),
                    cif.checksum(),
                )
                .to_string()
            } else if cif.owner_of(coord::to_id(x, y, cif.width())).is_none() {
                CifError::pixel_not_found(x, y).to_string()
            } else {
                format!("pixel ({x}, {y}) already has color {to}")
            }
        }
        RecolorTarget::Bucket(from) => {
            if cif.ids_of(from).is_none() {
                CifError::color_not_found(from.to_hex()).to_string()
            } else {
                format!("--from already equals --to ({to})")
            }
        }
    }
}

/// Parse `RRGGBB` or `RRGGBB:ALPHA` (alpha defaults to 255).
fn parse_color_spec(spec: &str) -> Result<Color, Box<dyn std::error::Error>> {
    let (hex, alpha) = match spec.split_once(':') {
        Some((hex, alpha)) => (
            hex,
            alpha
                .parse::<u8>()
                .map_err(|_| format!("bad alpha in color spec {spec:?}"))?,
        ),
        None => (spec, 255),
    };
    Ok(Color::from_hex(hex.trim_start_matches('#'), alpha)?)
}

/// Parse an `X,Y` pixel position.
fn parse_pixel_spec(spec: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let parsed = spec
        .split_once(',')
        .and_then(|(x, y)| Some((x.trim().parse().ok()?, y.trim().parse().ok()?)));
    parsed.ok_or_else(|| format!("bad pixel spec {spec:?}, expected X,Y").into())
}

/// Create a progress bar with standard styling.
fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_spec() {
        assert_eq!(parse_color_spec("FF0000").unwrap(), Color::RED);
        assert_eq!(
            parse_color_spec("FF0000:128").unwrap(),
            Color::new(128, 255, 0, 0)
        );
        assert_eq!(parse_color_spec("#00FF00").unwrap(), Color::GREEN);
        assert!(parse_color_spec("FF0000:300").is_err());
        assert!(parse_color_spec("red").is_err());
    }

    #[test]
    fn test_no_change_reason() {
        let cif = Cif::from_image(2, 2, false, vec![(Color::BLACK, vec![0, 1, 2])]);

        let oob = no_change_reason(&cif, RecolorTarget::Pixel(0, 1 << 31), Color::RED);
        assert!(oob.contains("out of bounds"), "{oob}");

        let unowned = no_change_reason(&cif, RecolorTarget::Pixel(1, 1), Color::RED);
        assert!(unowned.contains("not present"), "{unowned}");

        let same = no_change_reason(&cif, RecolorTarget::Pixel(0, 0), Color::BLACK);
        assert!(same.contains("already"), "{same}");

        let missing = no_change_reason(&cif, RecolorTarget::Bucket(Color::RED), Color::BLACK);
        assert!(missing.contains("FF0000"), "{missing}");

        let noop = no_change_reason(&cif, RecolorTarget::Bucket(Color::BLACK), Color::BLACK);
        assert!(noop.contains("already"), "{noop}");
    }

    #[test]
    fn test_parse_pixel_spec() {
        assert_eq!(parse_pixel_spec("3,7").unwrap(), (3, 7));
        assert_eq!(parse_pixel_spec(" 0 , 0 ").unwrap(), (0, 0));
        assert!(parse_pixel_spec("3").is_err());
        assert!(parse_pixel_spec("3,y").is_err());
    }
}
