use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`CatfontError`].
pub type CatfontResult<T> = std::result::Result<T, CatfontError>;

/// Error types that can occur while running a pipeline stage.
///
/// Failures of a single file inside a batch are reported through [`ConvertError`]
/// instead, so one bad drawing never stops the rest of the run.
#[derive(Debug, Error)]
pub enum CatfontError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Vectorization or tracing operation failed.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// An SVG file could not be parsed into an outline.
    #[error("SVG parsing failed: {0}")]
    Svg(#[from] usvg::Error),
    /// A single image failed to convert.
    #[error(transparent)]
    Convert(#[from] ConvertError),
    /// The glyphs could not be compiled into a font.
    #[error("Font compilation failed: {0}")]
    Font(String),
    /// The input directory holds no file with the expected extension.
    #[error("No .{extension} files found in {}", dir.display())]
    NoInputs { dir: PathBuf, extension: String },
}

/// Why a single image could not be converted.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file is missing, unreadable, corrupt, or in an unsupported format.
    #[error("cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The tracer could not produce a path for the mask.
    #[error("cannot trace {}: {reason}", path.display())]
    Trace { path: PathBuf, reason: String },
    /// The destination could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Short name of the failure class, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Input { .. } => "input",
            ConvertError::Trace { .. } => "trace",
            ConvertError::Output { .. } => "output",
        }
    }
}
