use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{DEFAULT_THRESHOLD, TraceOptions};
use crate::error::ConvertError;
use crate::files::write_atomically;
use crate::mask::{BinaryMask, load_grayscale};
use crate::svg::to_svg_string;
use crate::tracer::{MaskTracer, PotraceTracer};

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Number of `<path>` elements written.
    pub curves: usize,
}

/// An SVG document held in memory, with the facts about its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSvg {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub curves: usize,
}

/// Converts raster images into SVG silhouettes with a pluggable tracer.
pub struct Vectorizer<T: MaskTracer = PotraceTracer> {
    tracer: T,
    options: T::Options,
    threshold: u8,
    path_precision: Option<u32>,
}

impl Vectorizer<PotraceTracer> {
    /// Vectorizer using the built-in tracer.
    pub fn new(options: TraceOptions) -> Self {
        Self {
            tracer: PotraceTracer,
            threshold: options.threshold,
            path_precision: options.path_precision,
            options,
        }
    }
}

impl Default for Vectorizer<PotraceTracer> {
    fn default() -> Self {
        Self::new(TraceOptions::default())
    }
}

impl<T: MaskTracer> Vectorizer<T> {
    /// Vectorizer using any tracer, thresholding at the default cutoff.
    pub fn with_tracer(tracer: T, options: T::Options) -> Self {
        Self {
            tracer,
            options,
            threshold: DEFAULT_THRESHOLD,
            path_precision: None,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_path_precision(mut self, path_precision: Option<u32>) -> Self {
        self.path_precision = path_precision;
        self
    }

    /// Trace the image at `input` and return the SVG document text.
    pub fn render(&self, input: &Path) -> Result<RenderedSvg, ConvertError> {
        let gray = load_grayscale(input).map_err(|source| ConvertError::Input {
            path: input.to_path_buf(),
            source,
        })?;
        let (width, height) = gray.dimensions();
        let mask = BinaryMask::from_gray(&gray, self.threshold);

        let path = self
            .tracer
            .trace(&mask, &self.options)
            .map_err(|err| ConvertError::Trace {
                path: input.to_path_buf(),
                reason: err.to_string(),
            })?;
        debug!(
            "{}: {} curves, {} segments",
            input.display(),
            path.len(),
            path.segment_count()
        );

        Ok(RenderedSvg {
            svg: to_svg_string(&path, width, height, self.path_precision),
            width,
            height,
            curves: path.len(),
        })
    }

    /// Convert `input` into an SVG file at `output`, replacing any existing file.
    ///
    /// The document is written to a temporary file next to `output` and renamed
    /// into place, so a failure leaves the previous contents untouched.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<Conversion, ConvertError> {
        let rendered = self.render(input)?;
        write_atomically(output, rendered.svg.as_bytes()).map_err(|source| ConvertError::Output {
            path: output.to_path_buf(),
            source,
        })?;
        info!("Converted {} to {}", input.display(), output.display());
        Ok(Conversion {
            output: output.to_path_buf(),
            width: rendered.width,
            height: rendered.height,
            curves: rendered.curves,
        })
    }
}
