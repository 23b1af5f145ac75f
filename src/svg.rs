//! Serialization of traced curves into a standalone SVG document.

use std::fmt::Write as _;

use crate::geometry::{Curve, Point, Segment, VectorPath};

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";

/// Render `path` as an SVG document sized `width` by `height` pixels.
///
/// Each curve becomes its own black `<path>`.
pub fn to_svg_string(path: &VectorPath, width: u32, height: u32, precision: Option<u32>) -> String {
    let mut out = String::from(XML_HEADER);
    let _ = writeln!(
        out,
        "<svg width=\"{width}\" height=\"{height}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">"
    );
    for curve in &path.curves {
        let _ = writeln!(
            out,
            "  <path d=\"{}\" fill=\"black\" />",
            path_data(curve, precision)
        );
    }
    out.push_str("</svg>");
    out
}

/// The `d` attribute of one closed curve.
pub fn path_data(curve: &Curve, precision: Option<u32>) -> String {
    let mut d = format!("M{} ", coord(curve.start, precision));
    for segment in &curve.segments {
        match *segment {
            Segment::Corner { corner, end } => {
                let _ = write!(
                    d,
                    "L{} L{} ",
                    coord(corner, precision),
                    coord(end, precision)
                );
            }
            Segment::Smooth { c1, c2, end } => {
                let _ = write!(
                    d,
                    "C{} {} {} ",
                    coord(c1, precision),
                    coord(c2, precision),
                    coord(end, precision)
                );
            }
        }
    }
    d.push('z');
    d
}

fn coord(p: Point, precision: Option<u32>) -> String {
    format!(
        "{},{}",
        format_number(p.x, precision),
        format_number(p.y, precision)
    )
}

/// Shortest decimal form of `v`, or `precision` decimals with trailing zeros trimmed.
pub fn format_number(v: f64, precision: Option<u32>) -> String {
    let text = match precision {
        None => format!("{v}"),
        Some(p) => {
            let fixed = format!("{:.*}", p as usize, v);
            if fixed.contains('.') {
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                fixed
            }
        }
    };
    if text == "-0" { "0".to_string() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Curve {
        Curve::new(
            Point::new(0.0, 5.0),
            vec![
                Segment::Corner {
                    corner: Point::new(0.0, 10.0),
                    end: Point::new(5.0, 10.0),
                },
                Segment::Smooth {
                    c1: Point::new(7.5, 10.0),
                    c2: Point::new(10.0, 7.5),
                    end: Point::new(10.0, 5.0),
                },
                Segment::Corner {
                    corner: Point::new(10.0, 0.0),
                    end: Point::new(0.0, 5.0),
                },
            ],
        )
    }

    mod path_data {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn exact_layout() {
                assert_eq!(
                    path_data(&square(), None),
                    "M0,5 L0,10 L5,10 C7.5,10 10,7.5 10,5 L10,0 L0,5 z"
                );
            }

            #[test]
            fn one_command_group_per_segment() {
                let d = path_data(&square(), None);
                assert_eq!(d.matches('M').count(), 1);
                assert!(d.starts_with('M'));
                assert!(d.ends_with(" z"));
                assert_eq!(d.matches('z').count(), 1);
                // a corner writes two L, a smooth segment one C
                let groups = d.matches('C').count() + d.matches('L').count() / 2;
                assert_eq!(groups, 3);
            }
        }
    }

    mod to_svg_string {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn empty_path_keeps_header_and_footer() {
                let svg = to_svg_string(&VectorPath::default(), 64, 48, None);
                assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n"));
                assert!(svg.contains(
                    "<svg width=\"64\" height=\"48\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n"
                ));
                assert!(svg.ends_with("</svg>"));
                assert!(!svg.contains("<path"));
            }

            #[test]
            fn one_element_per_curve() {
                let path = VectorPath::new(vec![square(), square()]);
                let svg = to_svg_string(&path, 10, 10, None);
                assert_eq!(svg.matches("<path d=\"").count(), 2);
                assert_eq!(svg.matches("fill=\"black\" />").count(), 2);
            }

            #[test]
            fn output_parses_as_svg() {
                let svg = to_svg_string(&VectorPath::new(vec![square()]), 10, 10, Some(2));
                let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).expect("parse");
                assert_eq!(tree.size().width(), 10.0);
            }
        }
    }

    mod format_number {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn shortest_form() {
                assert_eq!(format_number(2.0, None), "2");
                assert_eq!(format_number(1.25, None), "1.25");
                assert_eq!(format_number(-3.5, None), "-3.5");
            }

            #[test]
            fn fixed_precision_trims_zeros() {
                assert_eq!(format_number(1.2345, Some(2)), "1.23");
                assert_eq!(format_number(1.5, Some(3)), "1.5");
                assert_eq!(format_number(7.0, Some(2)), "7");
                assert_eq!(format_number(7.4, Some(0)), "7");
            }

            #[test]
            fn negative_zero_is_zero() {
                assert_eq!(format_number(-0.0, None), "0");
                assert_eq!(format_number(-0.001, Some(2)), "0");
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// the shortest form parses back to the same value
                #[test]
                fn shortest_round_trips(v in -1.0e6f64..1.0e6) {
                    let text = format_number(v, None);
                    let parsed: f64 = text.parse().expect("number");
                    prop_assert_eq!(parsed, if v == 0.0 { 0.0 } else { v });
                }

                #[test]
                fn precision_bounds_decimals(v in -1.0e4f64..1.0e4, p in 0u32..6) {
                    let text = format_number(v, Some(p));
                    let decimals = text.split('.').nth(1).map_or(0, str::len);
                    prop_assert!(decimals <= p as usize);
                    prop_assert!(!text.ends_with('.'));
                }
            }
        }
    }
}
