use std::path::{Path, PathBuf};

use catfont::{CatfontResult, MaskTracer, TraceOptions, Vectorizer};
#[cfg(feature = "tracer-visioncortex")]
use catfont::{SplineOptions, VisionCortexTracer};

use crate::cli::{TraceOptionsArgs, TracerArg};

/// Something to do with a vectorizer, whatever tracer backs it.
pub trait WithVectorizer {
    type Output;

    fn call<T: MaskTracer>(self, vectorizer: &Vectorizer<T>) -> CatfontResult<Self::Output>;
}

/// Build the vectorizer selected by `args` and hand it to `job`.
pub fn with_vectorizer<J: WithVectorizer>(args: &TraceOptionsArgs, job: J) -> CatfontResult<J::Output> {
    let options: TraceOptions = args.into();
    match args.tracer {
        TracerArg::Potrace => job.call(&Vectorizer::new(options)),
        #[cfg(feature = "tracer-visioncortex")]
        TracerArg::Visioncortex => {
            let vectorizer = Vectorizer::with_tracer(VisionCortexTracer, SplineOptions::default())
                .with_threshold(options.threshold)
                .with_path_precision(options.path_precision);
            job.call(&vectorizer)
        }
    }
}

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("svg");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_replaces_extension() {
        assert_eq!(derive_svg_path(Path::new("cat_jpg/A.jpg")), PathBuf::from("cat_jpg/A.svg"));
        assert_eq!(derive_svg_path(Path::new("plain")), PathBuf::from("plain.svg"));
    }
}
