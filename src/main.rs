use clap::{Parser, ValueEnum};
use slantmesh::{DeformConfig, Operation};
use std::path::PathBuf;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Italic,
    Condense,
}

#[derive(Parser)]
#[command(name = "slantmesh", about = "Synthesize italic or condensed glyphs in a UFO")]
struct Cli {
    /// Input UFO path
    #[arg(short, long)]
    input: PathBuf,

    /// Output UFO path
    #[arg(short, long)]
    output: PathBuf,

    /// Deformation to apply
    #[arg(short, long, value_enum, default_value = "italic")]
    mode: Mode,

    /// Slant angle in degrees
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    angle: f64,

    /// Stem width in font units
    #[arg(long, default_value = "185")]
    stem_width: f64,

    /// Vertical centre of the slant (font units, usually negative)
    #[arg(long, default_value = "-825", allow_hyphen_values = true)]
    mean_y_center: f64,

    /// Horizontal scale of italic advance widths and anchors
    #[arg(long, default_value = "1.0")]
    narrow: f64,

    /// Horizontal scale of condensed glyphs
    #[arg(long, default_value = "0.8")]
    scale: f64,

    /// Only deform these glyphs (comma-separated names)
    #[arg(short, long, value_delimiter = ',')]
    glyphs: Option<Vec<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = DeformConfig {
        slant_angle: cli.angle,
        stem_width: cli.stem_width,
        mean_y_center: cli.mean_y_center,
        narrow_amount: cli.narrow,
        condense_scale: cli.scale,
        ..DeformConfig::default()
    };
    let operation = match cli.mode {
        Mode::Italic => Operation::Italicize,
        Mode::Condense => Operation::Condense,
    };

    // Header
    eprintln!();
    eprintln!("  slantmesh \u{00b7} {:?} \u{00b7} {}", operation, cli.input.display());
    eprintln!();

    let mut font = norad::Font::load(&cli.input)?;
    let report = slantmesh::ufo::deform_font(&mut font, operation, &config, cli.glyphs.as_deref())?;
    font.save(&cli.output)?;

    // Footer
    eprintln!();
    eprintln!(
        "  \u{2713} {}  ({} deformed, {} unchanged, {} failed)",
        cli.output.display(),
        report.deformed,
        report.unchanged,
        report.failed
    );
    eprintln!();

    Ok(())
}
