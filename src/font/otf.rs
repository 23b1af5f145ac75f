use std::fmt::Display;
use std::path::Path;

use kurbo::{BezPath, CubicBez, PathEl, Point};
use log::debug;
use write_fonts::FontBuilder;
use write_fonts::read::tables::glyf::CurvePoint;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{Contour, GlyfLocaBuilder, Glyph as GlyfGlyph, SimpleGlyph};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::Os2;
use write_fonts::tables::post::Post;
use write_fonts::types::{FWord, Fixed, GlyphId, NameId, UfWord};

use crate::config::FontOptions;
use crate::files::write_atomically;
use crate::{CatfontError, CatfontResult};

use super::{FontWriter, Glyph};

/// Maximum distance between a cubic segment and its quadratic replacement, in font units.
const QUAD_ACCURACY: f64 = 0.5;

const NOTDEF: &str = ".notdef";

/// Writes a TrueType-outline OpenType font.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtfWriter;

impl FontWriter for OtfWriter {
    fn write(&self, glyphs: &[Glyph], options: &FontOptions, output: &Path) -> CatfontResult<()> {
        let bytes = to_otf(glyphs, options)?;
        write_atomically(output, &bytes)?;
        Ok(())
    }
}

fn font_error(err: impl Display) -> CatfontError {
    CatfontError::Font(err.to_string())
}

/// Horizontal metrics and extents of one compiled glyph.
#[derive(Debug, Clone, Copy, Default)]
struct Extents {
    advance: u16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    empty: bool,
}

/// Compile the glyphs into font bytes. Glyph 0 is an empty `.notdef`.
pub fn to_otf(glyphs: &[Glyph], options: &FontOptions) -> CatfontResult<Vec<u8>> {
    let upm = u16::try_from(options.units_per_em())
        .map_err(|_| font_error(format!("units per em {} does not fit", options.units_per_em())))?;
    let ascent = to_i16(f64::from(options.ascent));
    let descent = -to_i16(f64::from(options.descent));

    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut extents = Vec::with_capacity(glyphs.len() + 1);
    let mut max_points = 0u16;
    let mut max_contours = 0u16;

    glyf_builder.add_glyph(&GlyfGlyph::Empty).map_err(font_error)?;
    extents.push(Extents {
        advance: to_u16(2.0 * options.side_bearing),
        empty: true,
        ..Extents::default()
    });

    for glyph in glyphs {
        let advance = u16::try_from(glyph.advance).unwrap_or(u16::MAX);
        match simple_glyph(&glyph.outline) {
            Some(simple) => {
                let points: usize = simple.contours.iter().map(Contour::len).sum();
                max_points = max_points.max(u16::try_from(points).unwrap_or(u16::MAX));
                max_contours =
                    max_contours.max(u16::try_from(simple.contours.len()).unwrap_or(u16::MAX));
                extents.push(Extents {
                    advance,
                    x_min: simple.bbox.x_min,
                    y_min: simple.bbox.y_min,
                    x_max: simple.bbox.x_max,
                    y_max: simple.bbox.y_max,
                    empty: false,
                });
                glyf_builder
                    .add_glyph(&GlyfGlyph::Simple(simple))
                    .map_err(font_error)?;
            }
            None => {
                extents.push(Extents {
                    advance,
                    empty: true,
                    ..Extents::default()
                });
                glyf_builder.add_glyph(&GlyfGlyph::Empty).map_err(font_error)?;
            }
        }
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let num_glyphs = u16::try_from(extents.len())
        .map_err(|_| font_error(format!("{} glyphs do not fit in one font", extents.len())))?;
    let inked: Vec<&Extents> = extents.iter().filter(|e| !e.empty).collect();

    let mut head = Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em: upm,
        lowest_rec_ppem: 8,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };
    if !inked.is_empty() {
        head.x_min = inked.iter().map(|e| e.x_min).min().unwrap_or(0);
        head.y_min = inked.iter().map(|e| e.y_min).min().unwrap_or(0);
        head.x_max = inked.iter().map(|e| e.x_max).max().unwrap_or(0);
        head.y_max = inked.iter().map(|e| e.y_max).max().unwrap_or(0);
    }

    let hhea = Hhea {
        ascender: FWord::new(ascent),
        descender: FWord::new(descent),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(extents.iter().map(|e| e.advance).max().unwrap_or(0)),
        min_left_side_bearing: FWord::new(inked.iter().map(|e| e.x_min).min().unwrap_or(0)),
        min_right_side_bearing: FWord::new(
            inked
                .iter()
                .map(|e| to_i16(f64::from(e.advance) - f64::from(e.x_max)))
                .min()
                .unwrap_or(0),
        ),
        x_max_extent: FWord::new(inked.iter().map(|e| e.x_max).max().unwrap_or(0)),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
        ..Default::default()
    };

    let hmtx = Hmtx::new(
        extents
            .iter()
            .map(|e| LongMetric::new(e.advance, e.x_min))
            .collect(),
        Vec::new(),
    );

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(max_points),
        max_contours: Some(max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
        ..Default::default()
    };

    let cmap = Cmap::from_mappings(
        glyphs
            .iter()
            .zip(1u32..)
            .map(|(glyph, gid)| (glyph.codepoint, GlyphId::new(gid))),
    )
    .map_err(font_error)?;

    let codepoints = || glyphs.iter().map(|g| u32::from(g.codepoint).min(0xFFFF) as u16);
    let spacing: Vec<u32> = extents
        .iter()
        .filter(|e| e.advance > 0)
        .map(|e| u32::from(e.advance))
        .collect();
    let avg_width = match spacing.len() {
        0 => 0,
        n => spacing.iter().sum::<u32>() / n as u32,
    };
    let os2 = Os2 {
        x_avg_char_width: i16::try_from(avg_width).unwrap_or(i16::MAX),
        us_weight_class: 400,
        us_width_class: 5,
        us_first_char_index: codepoints().min().unwrap_or(0),
        us_last_char_index: codepoints().max().unwrap_or(0),
        s_typo_ascender: ascent,
        s_typo_descender: descent,
        s_typo_line_gap: 0,
        us_win_ascent: u16::try_from(head.y_max.max(ascent)).unwrap_or(0),
        us_win_descent: u16::try_from(-(head.y_min.min(descent))).unwrap_or(0),
        ..Default::default()
    };

    let names: Vec<&str> = std::iter::once(NOTDEF)
        .chain(glyphs.iter().map(|g| g.name.as_str()))
        .collect();
    let post = Post::new_v2(names.iter().copied());

    let name = name_table(&options.font_name);

    let mut builder = FontBuilder::new();
    builder.add_table(&head).map_err(font_error)?;
    builder.add_table(&hhea).map_err(font_error)?;
    builder.add_table(&maxp).map_err(font_error)?;
    builder.add_table(&os2).map_err(font_error)?;
    builder.add_table(&hmtx).map_err(font_error)?;
    builder.add_table(&cmap).map_err(font_error)?;
    builder.add_table(&loca).map_err(font_error)?;
    builder.add_table(&glyf).map_err(font_error)?;
    builder.add_table(&name).map_err(font_error)?;
    builder.add_table(&post).map_err(font_error)?;
    let bytes = builder.build();
    debug!("compiled {} glyphs into {} bytes", num_glyphs, bytes.len());
    Ok(bytes)
}

fn name_table(font_name: &str) -> Name {
    let postscript: String = font_name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .collect();
    let mut records = vec![
        (NameId::FAMILY_NAME, font_name.to_string()),
        (NameId::SUBFAMILY_NAME, "Regular".to_string()),
        (NameId::UNIQUE_ID, format!("{postscript}-Regular")),
        (NameId::FULL_NAME, font_name.to_string()),
        (NameId::VERSION_STRING, "Version 1.000".to_string()),
        (NameId::POSTSCRIPT_NAME, postscript),
    ];
    records.sort_by_key(|(id, _)| *id);
    Name::new(
        records
            .into_iter()
            .map(|(id, value)| NameRecord::new(3, 1, 0x409, id, value.into()))
            .collect(),
    )
}

/// Convert an outline into glyf contours; `None` when nothing is drawn.
fn simple_glyph(outline: &BezPath) -> Option<SimpleGlyph> {
    let contours: Vec<Contour> = contour_points(outline)
        .into_iter()
        .filter(|points| points.len() > 2)
        .map(Contour::from)
        .collect();
    if contours.is_empty() {
        return None;
    }
    let mut simple = SimpleGlyph {
        bbox: Default::default(),
        contours,
        instructions: Vec::new(),
    };
    simple.recompute_bounding_box();
    Some(simple)
}

/// Split the outline into closed point lists, with cubics replaced by quadratics.
fn contour_points(outline: &BezPath) -> Vec<Vec<CurvePoint>> {
    let mut contours = Vec::new();
    let mut current: Vec<CurvePoint> = Vec::new();
    let mut last = Point::ZERO;

    for el in outline.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish_contour(&mut contours, &mut current);
                current.push(on_curve(p));
                last = p;
            }
            PathEl::LineTo(p) => {
                current.push(on_curve(p));
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                current.push(off_curve(c));
                current.push(on_curve(p));
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                for (_, _, quad) in CubicBez::new(last, c1, c2, p).to_quads(QUAD_ACCURACY) {
                    current.push(off_curve(quad.p1));
                    current.push(on_curve(quad.p2));
                }
                last = p;
            }
            PathEl::ClosePath => finish_contour(&mut contours, &mut current),
        }
    }
    finish_contour(&mut contours, &mut current);
    contours
}

fn finish_contour(contours: &mut Vec<Vec<CurvePoint>>, current: &mut Vec<CurvePoint>) {
    if current.len() > 1 && current.first() == current.last() {
        current.pop();
    }
    if !current.is_empty() {
        contours.push(std::mem::take(current));
    }
}

fn on_curve(p: Point) -> CurvePoint {
    CurvePoint::new(to_i16(p.x), to_i16(p.y), true)
}

fn off_curve(p: Point) -> CurvePoint {
    CurvePoint::new(to_i16(p.x), to_i16(p.y), false)
}

fn to_i16(v: f64) -> i16 {
    v.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

fn to_u16(v: f64) -> u16 {
    v.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fit_glyph;
    use kurbo::{Affine, Circle, Shape};
    use skrifa::instance::{LocationRef, Size};
    use skrifa::metrics::GlyphMetrics;
    use skrifa::{FontRef, MetadataProvider};
    use tempfile::TempDir;

    fn square(codepoint: char, side: f64) -> Glyph {
        let mut outline = BezPath::new();
        outline.move_to((0.0, 0.0));
        outline.line_to((side, 0.0));
        outline.line_to((side, side));
        outline.line_to((0.0, side));
        outline.close_path();
        fit_glyph(codepoint, &outline, &FontOptions::default())
    }

    fn disc(codepoint: char) -> Glyph {
        let mut outline = Circle::new((0.0, 0.0), 10.0).to_path(0.1);
        outline.apply_affine(Affine::translate((20.0, 20.0)));
        fit_glyph(codepoint, &outline, &FontOptions::default())
    }

    mod to_otf {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn cmap_metrics_and_bounds_read_back() {
                let glyphs = vec![square('A', 10.0), disc('B')];
                let bytes = to_otf(&glyphs, &FontOptions::default()).expect("compile");

                let font = FontRef::new(&bytes).expect("parse");
                let charmap = font.charmap();
                let a = charmap.map('A').expect("A mapped");
                let b = charmap.map('B').expect("B mapped");
                assert!(charmap.map('C').is_none());

                let metrics = GlyphMetrics::new(&font, Size::unscaled(), LocationRef::default());
                assert_eq!(metrics.advance_width(a), Some(800.0));
                assert_eq!(metrics.advance_width(b), Some(f32::from(glyphs[1].advance as u16)));
                for gid in [a, b] {
                    let bounds = metrics.bounds(gid).expect("bounds");
                    // rounding and quadratic control points may stick out a little
                    assert!((bounds.y_max - bounds.y_min - 700.0).abs() <= 2.0);
                    assert!(bounds.y_min.abs() <= 2.0);
                    assert!((bounds.x_min - 50.0).abs() <= 2.0);
                }
            }

            #[test]
            fn vertical_metrics_follow_options() {
                let options = FontOptions::default().with_vertical_metrics(900, 300);
                let bytes = to_otf(&[square('Z', 5.0)], &options).expect("compile");

                let font = FontRef::new(&bytes).expect("parse");
                let metrics = font.metrics(Size::unscaled(), LocationRef::default());
                assert_eq!(metrics.units_per_em, 1200);
                assert_eq!(metrics.ascent, 900.0);
                assert_eq!(metrics.descent, -300.0);
                assert_eq!(metrics.glyph_count, 2);
            }

            #[test]
            fn empty_outline_still_gets_an_advance() {
                let glyph = fit_glyph('E', &BezPath::new(), &FontOptions::default());
                let bytes = to_otf(&[glyph], &FontOptions::default()).expect("compile");

                let font = FontRef::new(&bytes).expect("parse");
                let gid = font.charmap().map('E').expect("mapped");
                let metrics = GlyphMetrics::new(&font, Size::unscaled(), LocationRef::default());
                assert_eq!(metrics.advance_width(gid), Some(100.0));
            }

            #[test]
            fn writer_creates_the_file() {
                let dir = TempDir::new().expect("tempdir");
                let output = dir.path().join("Cats.otf");
                OtfWriter
                    .write(&[square('A', 3.0)], &FontOptions::default(), &output)
                    .expect("write");

                let bytes = std::fs::read(&output).expect("read");
                assert!(FontRef::new(&bytes).is_ok());
            }
        }
    }

    mod contour_points {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn closing_point_is_not_repeated() {
                let mut outline = BezPath::new();
                outline.move_to((0.0, 0.0));
                outline.line_to((10.0, 0.0));
                outline.line_to((10.0, 10.0));
                outline.line_to((0.0, 0.0));
                outline.close_path();

                let contours = contour_points(&outline);
                assert_eq!(contours.len(), 1);
                assert_eq!(contours[0].len(), 3);
                assert!(contours[0].iter().all(|p| p.on_curve));
            }

            #[test]
            fn cubics_become_alternating_quadratic_points() {
                let mut outline = BezPath::new();
                outline.move_to((0.0, 0.0));
                outline.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
                outline.close_path();

                let contours = contour_points(&outline);
                assert_eq!(contours.len(), 1);
                let points = &contours[0];
                assert!(points.len() >= 3);
                assert!(points[0].on_curve);
                assert!(!points[1].on_curve);
                assert!(points.iter().any(|p| p.x == 100 && p.y == 0 && p.on_curve));
            }

            #[test]
            fn each_subpath_is_a_contour() {
                let mut outline = BezPath::new();
                for x in [0.0, 50.0] {
                    outline.move_to((x, 0.0));
                    outline.line_to((x + 10.0, 0.0));
                    outline.line_to((x + 10.0, 10.0));
                    outline.close_path();
                }
                assert_eq!(contour_points(&outline).len(), 2);
            }
        }
    }
}
