use crate::CatfontResult;
use crate::geometry::VectorPath;
use crate::mask::BinaryMask;

/// An algorithm that turns a binary mask into closed vector curves.
pub trait MaskTracer {
    type Options;

    fn trace(&self, mask: &BinaryMask, options: &Self::Options) -> CatfontResult<VectorPath>;
}

pub mod potrace;
#[cfg(feature = "tracer-visioncortex")]
pub mod visioncortex;

pub use potrace::PotraceTracer;
