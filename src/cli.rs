use std::path::PathBuf;

use catfont::{
    BatchOptions, DEFAULT_FONT_OUTPUT, DEFAULT_INPUT_DIR, DEFAULT_SVG_DIR, ENV_FONT_OUTPUT,
    ENV_INPUT_DIR, ENV_SVG_DIR, FontOptions, RenameOptions, TraceOptions, TurnPolicy,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Directory holding the source drawings
    #[arg(long = "input-dir", global = true, env = ENV_INPUT_DIR, default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,
    /// Directory receiving the traced SVG files
    #[arg(long = "svg-dir", global = true, env = ENV_SVG_DIR, default_value = DEFAULT_SVG_DIR)]
    pub svg_dir: PathBuf,
    /// Path of the generated font
    #[arg(long = "font-output", global = true, env = ENV_FONT_OUTPUT, default_value = DEFAULT_FONT_OUTPUT)]
    pub font_output: PathBuf,
    /// Extension of the source drawings
    #[arg(long, global = true, default_value = "jpg")]
    pub extension: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename the drawings in the input directory to A, B, C, ...
    Rename,
    /// Trace a single image into an SVG silhouette
    Convert(ConvertCommand),
    /// Trace every drawing in the input directory into the SVG directory
    Batch(BatchCommand),
    /// Build a font from the single-character SVG files
    Font(FontCommand),
    /// Rename, trace, and build the font in one go
    Run(RunCommand),
}

#[derive(Args, Debug)]
pub struct ConvertCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub trace_options: TraceOptionsArgs,
}

#[derive(Args, Debug)]
pub struct BatchCommand {
    #[command(flatten)]
    pub trace_options: TraceOptionsArgs,
}

#[derive(Args, Debug)]
pub struct FontCommand {
    #[command(flatten)]
    pub font_options: FontOptionsArgs,
}

#[derive(Args, Debug)]
pub struct RunCommand {
    /// Skip the renaming step
    #[arg(long = "no-rename")]
    pub no_rename: bool,
    #[command(flatten)]
    pub trace_options: TraceOptionsArgs,
    #[command(flatten)]
    pub font_options: FontOptionsArgs,
}

/// Which tracing algorithm to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TracerArg {
    Potrace,
    #[cfg(feature = "tracer-visioncortex")]
    Visioncortex,
}

/// Turn policies for ambiguous pixel corners.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TurnPolicyArg {
    Black,
    White,
    Left,
    Right,
    Minority,
    Majority,
}

impl From<TurnPolicyArg> for TurnPolicy {
    fn from(value: TurnPolicyArg) -> Self {
        match value {
            TurnPolicyArg::Black => TurnPolicy::Black,
            TurnPolicyArg::White => TurnPolicy::White,
            TurnPolicyArg::Left => TurnPolicy::Left,
            TurnPolicyArg::Right => TurnPolicy::Right,
            TurnPolicyArg::Minority => TurnPolicy::Minority,
            TurnPolicyArg::Majority => TurnPolicy::Majority,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceOptionsArgs {
    /// Tracing algorithm
    #[arg(long, value_enum, default_value_t = TracerArg::Potrace)]
    pub tracer: TracerArg,
    /// Gray level cutoff; darker or equal samples are traced (0-255 or 0.0-1.0)
    #[arg(long, default_value_t = catfont::config::DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: u8,
    /// Drop traced regions with an area up to this many pixels
    #[arg(long = "turd-size", default_value_t = 2)]
    pub turd_size: u32,
    /// How ambiguous pixel corners are resolved
    #[arg(long = "turn-policy", value_enum, default_value_t = TurnPolicyArg::Minority)]
    pub turn_policy: TurnPolicyArg,
    /// Corner threshold; lower values give more corners
    #[arg(long = "alpha-max", default_value_t = 1.0)]
    pub alpha_max: f64,
    /// Keep every smoothed segment instead of joining them
    #[arg(long = "no-opt-curve")]
    pub no_opt_curve: bool,
    /// Maximum error allowed when joining segments
    #[arg(long = "opt-tolerance", default_value_t = 0.2)]
    pub opt_tolerance: f64,
    /// Path precision override (decimal places)
    #[arg(long = "path-precision")]
    pub path_precision: Option<u32>,
}

impl From<&TraceOptionsArgs> for TraceOptions {
    fn from(args: &TraceOptionsArgs) -> Self {
        TraceOptions::default()
            .with_threshold(args.threshold)
            .with_turd_size(args.turd_size)
            .with_turn_policy(args.turn_policy.into())
            .with_alpha_max(args.alpha_max)
            .with_opt_curve(!args.no_opt_curve)
            .with_opt_tolerance(args.opt_tolerance)
            .with_path_precision(args.path_precision)
    }
}

/// Container format of the generated font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FontFormatArg {
    /// OpenType with TrueType outlines
    Otf,
    /// SVG 1.1 font document
    Svg,
}

#[derive(Args, Debug)]
pub struct FontOptionsArgs {
    /// Font file format
    #[arg(long = "font-format", value_enum, default_value_t = FontFormatArg::Otf)]
    pub font_format: FontFormatArg,
    /// Family name of the generated font
    #[arg(long = "font-name", default_value = "CatFont_")]
    pub font_name: String,
    /// Height every glyph is scaled to, in font units
    #[arg(long = "glyph-height", default_value_t = 700.0)]
    pub glyph_height: f64,
    /// Blank space on each side of a glyph, in font units
    #[arg(long = "side-bearing", default_value_t = 50.0)]
    pub side_bearing: f64,
    /// Height above the baseline
    #[arg(long, default_value_t = 800)]
    pub ascent: u32,
    /// Depth below the baseline
    #[arg(long, default_value_t = 200)]
    pub descent: u32,
}

impl From<&FontOptionsArgs> for FontOptions {
    fn from(args: &FontOptionsArgs) -> Self {
        FontOptions::default()
            .with_font_name(args.font_name.clone())
            .with_glyph_height(args.glyph_height)
            .with_side_bearing(args.side_bearing)
            .with_vertical_metrics(args.ascent, args.descent)
    }
}

impl From<&GlobalOptions> for BatchOptions {
    fn from(global: &GlobalOptions) -> Self {
        BatchOptions::default().with_extension(global.extension.clone())
    }
}

impl From<&GlobalOptions> for RenameOptions {
    fn from(global: &GlobalOptions) -> Self {
        RenameOptions::default().with_extension(global.extension.clone())
    }
}

fn parse_threshold(value: &str) -> Result<u8, String> {
    if let Ok(int_value) = value.parse::<u8>() {
        return Ok(int_value);
    }

    let float_value = value
        .parse::<f32>()
        .map_err(|_| format!("threshold must be numeric (0-255 or 0.0-1.0), got `{value}`"))?;

    if (0.0..=1.0).contains(&float_value) {
        let scaled = (float_value * 255.0).round() as i32;
        return Ok(scaled.clamp(0, 255) as u8);
    }

    if float_value.fract().abs() <= f32::EPSILON && (0.0..=255.0).contains(&float_value) {
        return Ok(float_value as u8);
    }

    Err(format!(
        "threshold {value} is out of range; expected 0-255 or 0.0-1.0"
    ))
}
