//! Turning single-character SVG files into glyphs and writing them out as a font.

mod otf;
mod svg_font;

pub use otf::{OtfWriter, to_otf};
pub use svg_font::{SvgFontWriter, to_svg_font};

use std::fs;
use std::path::{Path, PathBuf};

use kurbo::{Affine, BezPath, Shape};
use log::{info, warn};
use usvg::tiny_skia_path::PathSegment;
use usvg::{Group, Node, Tree};

use crate::CatfontResult;
use crate::config::FontOptions;
use crate::files::list_with_extension;

/// One character of the font, in font units with Y pointing up.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub codepoint: char,
    pub name: String,
    pub outline: BezPath,
    pub advance: u32,
}

/// Something that can serialize a set of glyphs into a font file.
pub trait FontWriter {
    fn write(&self, glyphs: &[Glyph], options: &FontOptions, output: &Path) -> CatfontResult<()>;
}

/// Glyphs collected from a directory, plus the files that did not make it.
#[derive(Debug, Default)]
pub struct GlyphSet {
    pub glyphs: Vec<Glyph>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Read every SVG file and collect all path geometry in document coordinates.
pub fn load_outline(path: &Path) -> CatfontResult<BezPath> {
    let text = fs::read_to_string(path)?;
    let tree = Tree::from_str(&text, &usvg::Options::default())?;
    let mut outline = BezPath::new();
    collect_paths(tree.root(), &mut outline);
    Ok(outline)
}

fn collect_paths(group: &Group, outline: &mut BezPath) {
    for node in group.children() {
        match node {
            Node::Group(group) => collect_paths(group, outline),
            Node::Path(path) => {
                let t = path.abs_transform();
                let affine = Affine::new([
                    f64::from(t.sx),
                    f64::from(t.ky),
                    f64::from(t.kx),
                    f64::from(t.sy),
                    f64::from(t.tx),
                    f64::from(t.ty),
                ]);
                let mut local = BezPath::new();
                for segment in path.data().segments() {
                    match segment {
                        PathSegment::MoveTo(p) => local.move_to(pt(p)),
                        PathSegment::LineTo(p) => local.line_to(pt(p)),
                        PathSegment::QuadTo(p1, p2) => local.quad_to(pt(p1), pt(p2)),
                        PathSegment::CubicTo(p1, p2, p3) => {
                            local.curve_to(pt(p1), pt(p2), pt(p3))
                        }
                        PathSegment::Close => local.close_path(),
                    }
                }
                local.apply_affine(affine);
                outline.extend(local.elements().iter().copied());
            }
            _ => {}
        }
    }
}

fn pt(p: usvg::tiny_skia_path::Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

/// Place an SVG outline into the em-box.
///
/// The outline is flipped into Y-up space, scaled uniformly to `glyph_height`, dropped onto
/// the baseline, and shifted right by the side bearing. Empty or flat outlines keep scale 1.
pub fn fit_glyph(codepoint: char, outline: &BezPath, options: &FontOptions) -> Glyph {
    let mut path = outline.clone();
    path.apply_affine(Affine::FLIP_Y);

    let has_geometry = path.segments().next().is_some();
    let advance_of = |width: f64| (width + 2.0 * options.side_bearing).trunc().max(0.0) as u32;

    if !has_geometry {
        return Glyph {
            codepoint,
            name: glyph_name(codepoint),
            outline: BezPath::new(),
            advance: advance_of(0.0),
        };
    }

    let bbox = path.bounding_box();
    let scale = if bbox.height() > 0.0 {
        options.glyph_height / bbox.height()
    } else {
        1.0
    };
    path.apply_affine(Affine::scale(scale));

    let bbox = path.bounding_box();
    path.apply_affine(Affine::translate((options.side_bearing - bbox.x0, -bbox.y0)));

    Glyph {
        codepoint,
        name: glyph_name(codepoint),
        outline: path,
        advance: advance_of(bbox.width()),
    }
}

/// PostScript-style name: the letter itself for ASCII alphanumerics, `uniXXXX` otherwise.
pub fn glyph_name(c: char) -> String {
    if c.is_ascii_alphanumeric() {
        c.to_string()
    } else {
        format!("uni{:04X}", u32::from(c))
    }
}

/// The character a file stands for, if its stem is exactly one character.
fn single_char_stem(path: &Path) -> Option<char> {
    let stem = path.file_stem()?.to_str()?;
    let mut chars = stem.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Fit every `<char>.svg` in `svg_dir` into a glyph, in file name order.
pub fn collect_glyphs(svg_dir: &Path, options: &FontOptions) -> CatfontResult<GlyphSet> {
    let mut set = GlyphSet::default();
    for path in list_with_extension(svg_dir, "svg")? {
        let Some(codepoint) = single_char_stem(&path) else {
            info!("Skipping {}: not a single character", path.display());
            set.skipped
                .push((path, "not a single character".to_string()));
            continue;
        };
        match load_outline(&path) {
            Ok(outline) => set.glyphs.push(fit_glyph(codepoint, &outline, options)),
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                set.skipped.push((path, err.to_string()));
            }
        }
    }
    Ok(set)
}

/// Collect the glyphs in `svg_dir` and write them to `output` with `writer`.
pub fn build_font<W: FontWriter>(
    writer: &W,
    svg_dir: &Path,
    output: &Path,
    options: &FontOptions,
) -> CatfontResult<GlyphSet> {
    let set = collect_glyphs(svg_dir, options)?;
    writer.write(&set.glyphs, options, output)?;
    info!(
        "Font {} written to {} with {} glyphs",
        options.font_name,
        output.display(),
        set.glyphs.len()
    );
    Ok(set)
}
