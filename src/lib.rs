pub mod batch;
pub mod config;
pub mod error;
pub mod files;
pub mod font;
pub mod geometry;
pub mod mask;
pub mod rename;
pub mod svg;
pub mod tracer;
pub mod vectorizer;

pub use batch::{BatchReport, FileOutcome, run_batch};
pub use config::{BatchOptions, FontOptions, RenameOptions, TraceOptions, TurnPolicy};
pub use error::{CatfontError, CatfontResult, ConvertError};
pub use font::{
    FontWriter, Glyph, GlyphSet, OtfWriter, SvgFontWriter, build_font, collect_glyphs, fit_glyph,
};
pub use geometry::{Curve, Point, Segment, VectorPath};
pub use mask::BinaryMask;
pub use rename::{RenameOutcome, RenameReport, rename_to_letters};
pub use tracer::{MaskTracer, PotraceTracer};
#[cfg(feature = "tracer-visioncortex")]
pub use tracer::visioncortex::{SplineOptions, VisionCortexTracer};
pub use vectorizer::{Conversion, RenderedSvg, Vectorizer};

/// Default directory holding the source drawings.
pub const DEFAULT_INPUT_DIR: &str = "cat_jpg";
/// Default directory receiving the traced SVG files.
pub const DEFAULT_SVG_DIR: &str = "cat_svg";
/// Default path of the generated font.
pub const DEFAULT_FONT_OUTPUT: &str = "CatFont_.otf";

/// Environment variable naming the input directory.
pub const ENV_INPUT_DIR: &str = "CATFONT_INPUT_DIR";
/// Environment variable naming the SVG directory.
pub const ENV_SVG_DIR: &str = "CATFONT_SVG_DIR";
/// Environment variable naming the font output path.
pub const ENV_FONT_OUTPUT: &str = "CATFONT_FONT_OUTPUT";
