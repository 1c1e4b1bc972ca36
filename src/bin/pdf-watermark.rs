//! PDF Watermark CLI tool
//!
//! A command-line tool for previewing and stamping tiled text watermarks.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use pdf_watermark::config::{
    FontConfig, ANGLE_RANGE, DEFAULT_ANGLE, DEFAULT_COLOR, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE,
    DEFAULT_OPACITY, DEFAULT_SPACING, DEFAULT_TEXT, FONT_SIZE_RANGE, OPACITY_RANGE, SPACING_RANGE,
};
use pdf_watermark::pdf::{document_info, preview_tile, stamp_document, watermarked_file_name};
use pdf_watermark::{Error, Rgb, WatermarkSpec};

/// PDF Watermark - Stamp a tiled text watermark onto every page of a PDF
#[derive(Parser)]
#[command(name = "pdf-watermark")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Stamp with the defaults, writing watermarked_report.pdf
    pdf-watermark stamp report.pdf

    # Preview a red, steeper watermark as PNG
    pdf-watermark preview report.pdf -o tile.png --color 200,0,0 --angle 45

    # Use a specific font
    pdf-watermark --font fonts/NotoSansTC.ttf stamp report.pdf --text \"僅供內部使用\"")]
struct Cli {
    /// Font file used to draw the watermark text
    #[arg(long, global = true, default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the watermark tile for the first page as a PNG
    Preview {
        /// Input PDF file
        input: PathBuf,

        /// Output PNG path (default: <input stem>_watermark.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        watermark: WatermarkArgs,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Stamp the watermark onto every page of a PDF
    Stamp {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF path (default: watermarked_<input name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        watermark: WatermarkArgs,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

/// Watermark appearance
#[derive(Args)]
struct WatermarkArgs {
    /// Watermark text
    #[arg(long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Font size in pixels (10-50)
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE, value_parser = parse_font_size)]
    font_size: u32,

    /// Opacity (0.1-1.0)
    #[arg(long, default_value_t = DEFAULT_OPACITY, value_parser = parse_opacity)]
    opacity: f32,

    /// Counter-clockwise rotation in degrees (0-90)
    #[arg(long, default_value_t = DEFAULT_ANGLE, value_parser = parse_angle)]
    angle: u32,

    /// Gap between repeated texts in pixels (50-200)
    #[arg(long, default_value_t = DEFAULT_SPACING, value_parser = parse_spacing)]
    spacing: u32,

    /// Text colour as "r,g,b" or "#rrggbb"
    #[arg(long, default_value = DEFAULT_COLOR, value_parser = parse_color)]
    color: Rgb,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Resolved once; the file itself is checked when an action needs it
    let font_config = FontConfig::new(cli.font);

    let result = match cli.command {
        Commands::Preview { input, output, watermark, open } => {
            cmd_preview(&font_config, input, output, watermark, open)
        }
        Commands::Stamp { input, output, watermark, open } => {
            cmd_stamp(&font_config, input, output, watermark, open)
        }
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = e.chain().find_map(|cause| cause.downcast_ref::<Error>()).and_then(Error::hint) {
            eprintln!("Hint: {}", hint);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(format!("pdf_watermark={}", level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn parse_ranged<T>(s: &str, range: RangeInclusive<T>, what: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + Display,
{
    let value: T = s.trim().parse().map_err(|_| format!("'{}' is not a valid {}", s, what))?;
    if !range.contains(&value) {
        return Err(format!(
            "{} must be between {} and {}",
            what,
            range.start(),
            range.end()
        ));
    }
    Ok(value)
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    parse_ranged(s, FONT_SIZE_RANGE, "font size")
}

fn parse_opacity(s: &str) -> Result<f32, String> {
    parse_ranged(s, OPACITY_RANGE, "opacity")
}

fn parse_angle(s: &str) -> Result<u32, String> {
    parse_ranged(s, ANGLE_RANGE, "angle")
}

fn parse_spacing(s: &str) -> Result<u32, String> {
    parse_ranged(s, SPACING_RANGE, "spacing")
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    s.parse::<Rgb>().map_err(|e| e.to_string())
}

impl WatermarkArgs {
    fn into_spec(self, font_config: &FontConfig) -> anyhow::Result<WatermarkSpec> {
        let font = font_config.load()?;
        Ok(WatermarkSpec {
            text: self.text,
            font,
            font_size: self.font_size,
            color: self.color,
            opacity: self.opacity,
            rotation: self.angle,
            spacing: self.spacing,
        })
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<Vec<u8>> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// Write a PNG preview of the tile for the first page
fn cmd_preview(
    font_config: &FontConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    watermark: WatermarkArgs,
    open: bool,
) -> anyhow::Result<()> {
    // Font problems surface before the PDF is touched
    let spec = watermark.into_spec(font_config)?;
    let source = read_input(&input)?;

    let output = output.unwrap_or_else(|| {
        let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        input.with_file_name(format!("{}_watermark.png", stem))
    });

    eprintln!("Rendering watermark preview...");
    let png = preview_tile(&source, &spec)?;
    std::fs::write(&output, png).with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Preview: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Stamp the watermark onto every page
fn cmd_stamp(
    font_config: &FontConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    watermark: WatermarkArgs,
    open: bool,
) -> anyhow::Result<()> {
    let spec = watermark.into_spec(font_config)?;
    let source = read_input(&input)?;
    let output = output.unwrap_or_else(|| watermarked_file_name(&input));

    eprintln!("Stamping watermark...");
    let stamped = stamp_document(&source, &spec)?;
    std::fs::write(&output, stamped).with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Output: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let source = read_input(&input)?;
    let info = document_info(&source)?;

    println!("File: {}", input.display());
    println!("Pages: {}", info.page_count);
    println!(
        "First page: {} x {} pt",
        info.first_page.width(),
        info.first_page.height()
    );

    Ok(())
}
