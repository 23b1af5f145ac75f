use visioncortex::{BinaryImage, CompoundPathElement, PathSimplifyMode, PointF64};

use crate::geometry::{Curve, Point, Segment, VectorPath};
use crate::mask::BinaryMask;
use crate::{CatfontError, CatfontResult};

use super::MaskTracer;

/// Options for tracing with the visioncortex spline fitter.
#[derive(Debug, Clone)]
pub struct SplineOptions {
    /// Clusters smaller than this many pixels are dropped.
    pub filter_speckle: usize,
    /// Minimum angle in degrees for a point to count as a corner.
    pub corner_threshold: i32,
    pub length_threshold: f64,
    pub max_iterations: usize,
    /// Minimum angle displacement in degrees to splice a spline.
    pub splice_threshold: i32,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            filter_speckle: 4,
            corner_threshold: 60,
            length_threshold: 4.0,
            max_iterations: 10,
            splice_threshold: 45,
        }
    }
}

/// Alternative tracer built on visioncortex; emits smooth segments only.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisionCortexTracer;

impl MaskTracer for VisionCortexTracer {
    type Options = SplineOptions;

    fn trace(&self, mask: &BinaryMask, options: &Self::Options) -> CatfontResult<VectorPath> {
        let (width, height) = mask.dimensions();
        let mut image = BinaryImage::new_w_h(width as usize, height as usize);
        for y in 0..height {
            for x in 0..width {
                if mask.get(x as i32, y as i32) {
                    image.set_pixel(x as usize, y as usize, true);
                }
            }
        }

        let clusters = image.to_clusters(false);
        let mut curves = Vec::new();
        for i in 0..clusters.len() {
            let cluster = clusters.get_cluster(i);
            if cluster.size() < options.filter_speckle {
                continue;
            }
            let compound = cluster.to_compound_path(
                PathSimplifyMode::Spline,
                f64::from(options.corner_threshold).to_radians(),
                options.length_threshold,
                options.max_iterations,
                f64::from(options.splice_threshold).to_radians(),
            );
            for element in &compound.paths {
                curves.push(element_to_curve(element)?);
            }
        }

        Ok(VectorPath::new(curves))
    }
}

fn to_point(p: &PointF64) -> Point {
    Point::new(p.x, p.y)
}

/// Straight edges become corner segments with the corner at the midpoint.
fn polygon_to_curve(points: &[Point]) -> Option<Curve> {
    let (&start, rest) = points.split_first()?;
    let mut prev = start;
    let segments = rest
        .iter()
        .chain(std::iter::once(&start))
        .map(|&end| {
            let corner = prev.lerp(end, 0.5);
            prev = end;
            Segment::Corner { corner, end }
        })
        .collect();
    Some(Curve::new(start, segments))
}

fn element_to_curve(element: &CompoundPathElement) -> CatfontResult<Curve> {
    let curve = match element {
        CompoundPathElement::Spline(spline) => spline.points.split_first().map(|(start, rest)| {
            let segments = rest
                .chunks_exact(3)
                .map(|c| Segment::Smooth {
                    c1: to_point(&c[0]),
                    c2: to_point(&c[1]),
                    end: to_point(&c[2]),
                })
                .collect();
            Curve::new(to_point(start), segments)
        }),
        CompoundPathElement::PathI32(path) => polygon_to_curve(
            &path
                .path
                .iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect::<Vec<_>>(),
        ),
        CompoundPathElement::PathF64(path) => {
            polygon_to_curve(&path.path.iter().map(to_point).collect::<Vec<_>>())
        }
    };

    match curve {
        Some(curve) if !curve.segments.is_empty() => Ok(curve),
        _ => Err(CatfontError::Trace(
            "visioncortex returned an empty path".to_string(),
        )),
    }
}
