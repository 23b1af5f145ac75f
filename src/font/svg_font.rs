use std::fmt::Write as _;
use std::path::Path;

use kurbo::{BezPath, PathEl, Point};

use crate::CatfontResult;
use crate::config::FontOptions;
use crate::files::write_atomically;
use crate::svg::format_number;

use super::{FontWriter, Glyph};

const PATH_PRECISION: Option<u32> = Some(2);

/// Writes an SVG 1.1 font document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgFontWriter;

impl FontWriter for SvgFontWriter {
    fn write(&self, glyphs: &[Glyph], options: &FontOptions, output: &Path) -> CatfontResult<()> {
        let text = to_svg_font(glyphs, options);
        write_atomically(output, text.as_bytes())?;
        Ok(())
    }
}

/// Render the glyphs as a `<font>` element inside a standalone SVG document.
pub fn to_svg_font(glyphs: &[Glyph], options: &FontOptions) -> String {
    let name = escape(&options.font_name);
    let upm = options.units_per_em();
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n");
    out.push_str("<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    let _ = writeln!(out, "<font id=\"{name}\" horiz-adv-x=\"{upm}\">");
    let _ = writeln!(
        out,
        "  <font-face font-family=\"{name}\" units-per-em=\"{upm}\" ascent=\"{}\" descent=\"-{}\" />",
        options.ascent, options.descent
    );
    let _ = writeln!(
        out,
        "  <missing-glyph horiz-adv-x=\"{}\" />",
        (2.0 * options.side_bearing) as u32
    );
    for glyph in glyphs {
        let mut unicode = [0u8; 4];
        let _ = writeln!(
            out,
            "  <glyph unicode=\"{}\" glyph-name=\"{}\" horiz-adv-x=\"{}\" d=\"{}\" />",
            escape(glyph.codepoint.encode_utf8(&mut unicode)),
            escape(&glyph.name),
            glyph.advance,
            glyph_path_data(&glyph.outline)
        );
    }
    out.push_str("</font>\n</defs>\n</svg>\n");
    out
}

fn coord(p: Point) -> String {
    format!(
        "{} {}",
        format_number(p.x, PATH_PRECISION),
        format_number(p.y, PATH_PRECISION)
    )
}

fn glyph_path_data(path: &BezPath) -> String {
    let parts: Vec<String> = path
        .elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => format!("M{}", coord(p)),
            PathEl::LineTo(p) => format!("L{}", coord(p)),
            PathEl::QuadTo(p1, p2) => format!("Q{} {}", coord(p1), coord(p2)),
            PathEl::CurveTo(p1, p2, p3) => format!("C{} {} {}", coord(p1), coord(p2), coord(p3)),
            PathEl::ClosePath => "Z".to_string(),
        })
        .collect();
    parts.join(" ")
}

/// Escape the characters that cannot appear verbatim inside an attribute value.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fit_glyph;

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.curve_to((5.0, 12.0), (2.0, 12.0), (0.0, 10.0));
        path.close_path();
        path
    }

    mod to_svg_font {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn font_face_carries_metrics() {
                let svg = to_svg_font(&[], &FontOptions::default());
                assert!(svg.contains("<font id=\"CatFont_\" horiz-adv-x=\"1000\">"));
                assert!(svg.contains(
                    "<font-face font-family=\"CatFont_\" units-per-em=\"1000\" ascent=\"800\" descent=\"-200\" />"
                ));
                assert!(!svg.contains("<glyph "));
                assert!(svg.ends_with("</svg>\n"));
            }

            #[test]
            fn one_glyph_element_per_glyph() {
                let options = FontOptions::default();
                let glyphs = vec![fit_glyph('A', &square(), &options), fit_glyph('&', &square(), &options)];
                let svg = to_svg_font(&glyphs, &options);
                assert_eq!(svg.matches("<glyph ").count(), 2);
                assert!(svg.contains("unicode=\"A\" glyph-name=\"A\""));
                assert!(svg.contains("unicode=\"&amp;\" glyph-name=\"uni0026\""));
                assert!(svg.contains(&format!("horiz-adv-x=\"{}\"", glyphs[0].advance)));
            }

            #[test]
            fn custom_name_and_metrics() {
                let options = FontOptions::default()
                    .with_font_name("Paws")
                    .with_vertical_metrics(900, 124);
                let svg = to_svg_font(&[], &options);
                assert!(svg.contains("font-family=\"Paws\" units-per-em=\"1024\" ascent=\"900\" descent=\"-124\""));
            }
        }
    }

    mod glyph_path_data {
        use super::*;

        #[test]
        fn uses_absolute_commands() {
            assert_eq!(
                glyph_path_data(&square()),
                "M0 0 L10 0 L10 10 C5 12 2 12 0 10 Z"
            );
        }

        #[test]
        fn coordinates_are_rounded() {
            let mut path = BezPath::new();
            path.move_to((1.23456, -0.001));
            assert_eq!(glyph_path_data(&path), "M1.23 0");
        }
    }

    mod escape {
        use super::*;

        #[test]
        fn special_characters() {
            assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
            assert_eq!(escape("plain"), "plain");
        }
    }

    mod svg_font_writer {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn writes_the_document() {
            let dir = TempDir::new().expect("tempdir");
            let output = dir.path().join("font.svg");
            let options = FontOptions::default();
            let glyphs = vec![fit_glyph('Z', &square(), &options)];

            SvgFontWriter.write(&glyphs, &options, &output).expect("write");
            let text = std::fs::read_to_string(&output).expect("read");
            assert_eq!(text, to_svg_font(&glyphs, &options));
        }
    }
}
