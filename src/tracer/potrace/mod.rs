//! Native bitmap tracer producing corner and smooth Bézier segments.
//!
//! The pipeline per boundary path is: polygon fit, vertex adjustment,
//! smoothing, and optional curve joining.

mod curve;
mod decompose;
mod polygon;

use log::debug;

use crate::config::TraceOptions;
use crate::geometry::VectorPath;
use crate::mask::BinaryMask;
use crate::{CatfontError, CatfontResult};

use self::curve::{adjust_vertices, opti_curve, smooth};
use self::decompose::{Orientation, decompose};
use self::polygon::{best_polygon, calc_lon, calc_sums};

use super::MaskTracer;

/// The default tracer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotraceTracer;

impl MaskTracer for PotraceTracer {
    type Options = TraceOptions;

    fn trace(&self, mask: &BinaryMask, options: &Self::Options) -> CatfontResult<VectorPath> {
        let path = trace_mask(mask, options);
        if let Some(index) = path.curves.iter().position(|c| c.segments.is_empty()) {
            return Err(CatfontError::Trace(format!("curve {index} has no segments")));
        }
        Ok(path)
    }
}

/// Trace every foreground region of `mask` into closed curves.
///
/// Holes come out with the opposite orientation of the region around them.
pub fn trace_mask(mask: &BinaryMask, options: &TraceOptions) -> VectorPath {
    let paths = decompose(mask, options.turd_size, options.turn_policy);
    debug!("decomposed mask into {} boundary paths", paths.len());

    let curves = paths
        .iter()
        .map(|path| {
            let pt = &path.points;
            let sums = calc_sums(pt);
            let lon = calc_lon(pt);
            let po = best_polygon(pt, &lon, &sums);
            let mut vertex = adjust_vertices(pt, &sums, &po);
            if path.orientation == Orientation::Hole {
                vertex.reverse();
            }
            let mut curve = smooth(&vertex, options.alpha_max);
            if options.opt_curve {
                curve = opti_curve(&curve, options.opt_tolerance);
            }
            curve.to_curve()
        })
        .collect();

    VectorPath::new(curves)
}
