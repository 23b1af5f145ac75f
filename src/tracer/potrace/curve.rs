//! Vertex adjustment, corner/smooth classification, and curve joining.

use crate::geometry::{Curve, Point, Segment};

use super::decompose::IPoint;
use super::polygon::Sums;

type Quad = [[f64; 3]; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Corner,
    Curve,
}

/// Working representation between smoothing and output.
///
/// Segment `i` ends at `c[i][2]`; a corner uses `c[i][1]` as its corner point,
/// a curve uses `c[i][0]` and `c[i][1]` as Bézier controls.
#[derive(Debug, Clone)]
pub(crate) struct PrivCurve {
    pub tag: Vec<Tag>,
    pub c: Vec<[Point; 3]>,
    pub vertex: Vec<Point>,
    pub alpha: Vec<f64>,
}

impl PrivCurve {
    fn with_len(n: usize) -> Self {
        Self {
            tag: vec![Tag::Corner; n],
            c: vec![[Point::default(); 3]; n],
            vertex: vec![Point::default(); n],
            alpha: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.tag.len()
    }

    /// Convert to the public curve type, starting where the last segment ends.
    pub fn to_curve(&self) -> Curve {
        let n = self.len();
        let start = if n == 0 {
            Point::default()
        } else {
            self.c[n - 1][2]
        };
        let segments = self
            .tag
            .iter()
            .zip(&self.c)
            .map(|(tag, c)| match tag {
                Tag::Corner => Segment::Corner {
                    corner: c[1],
                    end: c[2],
                },
                Tag::Curve => Segment::Smooth {
                    c1: c[0],
                    c2: c[1],
                    end: c[2],
                },
            })
            .collect();
        Curve::new(start, segments)
    }
}

fn fsign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Area of the parallelogram spanned by `p1 - p0` and `p2 - p0`.
fn dpara(p0: Point, p1: Point, p2: Point) -> f64 {
    let (x1, y1) = (p1.x - p0.x, p1.y - p0.y);
    let (x2, y2) = (p2.x - p0.x, p2.y - p0.y);
    x1 * y2 - x2 * y1
}

/// Denominator of the smoothing ratio: the L1 distance between the points.
fn ddenom(p0: Point, p2: Point) -> f64 {
    let ry = f64::from(fsign(p2.x - p0.x));
    let rx = -f64::from(fsign(p2.y - p0.y));
    ry * (p2.x - p0.x) - rx * (p2.y - p0.y)
}

fn cprod(p0: Point, p1: Point, p2: Point, p3: Point) -> f64 {
    let (x1, y1) = (p1.x - p0.x, p1.y - p0.y);
    let (x2, y2) = (p3.x - p2.x, p3.y - p2.y);
    x1 * y2 - x2 * y1
}

fn iprod(p0: Point, p1: Point, p2: Point) -> f64 {
    let (x1, y1) = (p1.x - p0.x, p1.y - p0.y);
    let (x2, y2) = (p2.x - p0.x, p2.y - p0.y);
    x1 * x2 + y1 * y2
}

fn iprod1(p0: Point, p1: Point, p2: Point, p3: Point) -> f64 {
    let (x1, y1) = (p1.x - p0.x, p1.y - p0.y);
    let (x2, y2) = (p3.x - p2.x, p3.y - p2.y);
    x1 * x2 + y1 * y2
}

fn bezier(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let s = 1.0 - t;
    let a = s * s * s;
    let b = 3.0 * (s * s * t);
    let c = 3.0 * (t * t * s);
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Parameter in [0, 1] where the Bézier is parallel to `q0 -> q1`, or -1 if none.
fn tangent(p0: Point, p1: Point, p2: Point, p3: Point, q0: Point, q1: Point) -> f64 {
    let a_ = cprod(p0, p1, q0, q1);
    let b_ = cprod(p1, p2, q0, q1);
    let c_ = cprod(p2, p3, q0, q1);

    let a = a_ - 2.0 * b_ + c_;
    let b = -2.0 * a_ + 2.0 * b_;
    let c = a_;
    let d = b * b - 4.0 * a * c;

    if a == 0.0 || d < 0.0 {
        return -1.0;
    }

    let s = d.sqrt();
    let r1 = (-b + s) / (2.0 * a);
    let r2 = (-b - s) / (2.0 * a);

    if (0.0..=1.0).contains(&r1) {
        r1
    } else if (0.0..=1.0).contains(&r2) {
        r2
    } else {
        -1.0
    }
}

fn quadform(q: &Quad, w: Point) -> f64 {
    let v = [w.x, w.y, 1.0];
    let mut sum = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            sum += v[i] * q[i][j] * v[j];
        }
    }
    sum
}

/// Centroid and principal direction of the points `i..=j` (indices may wrap).
fn point_slope(pt: &[IPoint], sums: &[Sums], i: i64, j: i64) -> (Point, Point) {
    let n = pt.len() as i64;
    let (mut i, mut j, mut r) = (i, j, 0i64);
    while j >= n {
        j -= n;
        r += 1;
    }
    while i >= n {
        i -= n;
        r -= 1;
    }
    while j < 0 {
        j += n;
        r -= 1;
    }
    while i < 0 {
        i += n;
        r += 1;
    }

    let (iu, ju, nu) = (i as usize, j as usize, n as usize);
    let rf = r as f64;
    let x = sums[ju + 1].x - sums[iu].x + rf * sums[nu].x;
    let y = sums[ju + 1].y - sums[iu].y + rf * sums[nu].y;
    let x2 = sums[ju + 1].x2 - sums[iu].x2 + rf * sums[nu].x2;
    let xy = sums[ju + 1].xy - sums[iu].xy + rf * sums[nu].xy;
    let y2 = sums[ju + 1].y2 - sums[iu].y2 + rf * sums[nu].y2;
    let k = (j + 1 - i + r * n) as f64;

    let ctr = Point::new(x / k, y / k);

    let mut a = (x2 - x * x / k) / k;
    let b = (xy - x * y / k) / k;
    let mut c = (y2 - y * y / k) / k;

    // larger eigenvalue of the covariance matrix
    let lambda2 = (a + c + ((a - c) * (a - c) + 4.0 * b * b).sqrt()) / 2.0;
    a -= lambda2;
    c -= lambda2;

    let dir = if a.abs() >= c.abs() {
        let l = (a * a + b * b).sqrt();
        if l != 0.0 {
            Point::new(-b / l, a / l)
        } else {
            Point::default()
        }
    } else {
        let l = (c * c + b * b).sqrt();
        if l != 0.0 {
            Point::new(-c / l, b / l)
        } else {
            Point::default()
        }
    };

    (ctr, dir)
}

/// Move each polygon vertex to the intersection of its two best-fit lines,
/// staying within the unit square centred on its lattice point.
pub(crate) fn adjust_vertices(pt: &[IPoint], sums: &[Sums], po: &[usize]) -> Vec<Point> {
    let m = po.len();
    let n = pt.len() as i64;
    let x0 = f64::from(pt[0].x);
    let y0 = f64::from(pt[0].y);

    let lines: Vec<(Point, Point)> = (0..m)
        .map(|i| {
            let next = po[(i + 1) % m] as i64;
            let start = po[i] as i64;
            let j = (next - start).rem_euclid(n) + start;
            point_slope(pt, sums, start, j)
        })
        .collect();

    let q: Vec<Quad> = lines
        .iter()
        .map(|&(ctr, dir)| {
            let mut q = [[0.0; 3]; 3];
            let d = dir.x * dir.x + dir.y * dir.y;
            if d != 0.0 {
                let v = [dir.y, -dir.x, dir.x * ctr.y - dir.y * ctr.x];
                for l in 0..3 {
                    for k in 0..3 {
                        q[l][k] = v[l] * v[k] / d;
                    }
                }
            }
            q
        })
        .collect();

    let mut vertex = Vec::with_capacity(m);
    for i in 0..m {
        let s = Point::new(f64::from(pt[po[i]].x) - x0, f64::from(pt[po[i]].y) - y0);
        let j = (i + m - 1) % m;

        let mut qm: Quad = [[0.0; 3]; 3];
        for l in 0..3 {
            for k in 0..3 {
                qm[l][k] = q[j][l][k] + q[i][l][k];
            }
        }

        let w = loop {
            let det = qm[0][0] * qm[1][1] - qm[0][1] * qm[1][0];
            if det != 0.0 {
                break Point::new(
                    (-qm[0][2] * qm[1][1] + qm[1][2] * qm[0][1]) / det,
                    (qm[0][2] * qm[1][0] - qm[1][2] * qm[0][0]) / det,
                );
            }

            // parallel lines: add a line through s orthogonal to them
            let (v0, v1) = if qm[0][0] > qm[1][1] {
                (-qm[0][1], qm[0][0])
            } else if qm[1][1] != 0.0 {
                (-qm[1][1], qm[1][0])
            } else {
                (1.0, 0.0)
            };
            let d = v0 * v0 + v1 * v1;
            let v = [v0, v1, -v1 * s.y - v0 * s.x];
            for l in 0..3 {
                for k in 0..3 {
                    qm[l][k] += v[l] * v[k] / d;
                }
            }
        };

        if (w.x - s.x).abs() <= 0.5 && (w.y - s.y).abs() <= 0.5 {
            vertex.push(Point::new(w.x + x0, w.y + y0));
            continue;
        }

        // the optimum lies outside the square; search its boundary
        let mut min = quadform(&qm, s);
        let mut best = s;

        if qm[0][0] != 0.0 {
            for z in 0..2 {
                let wy = s.y - 0.5 + f64::from(z);
                let wx = -(qm[0][1] * wy + qm[0][2]) / qm[0][0];
                let cand = quadform(&qm, Point::new(wx, wy));
                if (wx - s.x).abs() <= 0.5 && cand < min {
                    min = cand;
                    best = Point::new(wx, wy);
                }
            }
        }

        if qm[1][1] != 0.0 {
            for z in 0..2 {
                let wx = s.x - 0.5 + f64::from(z);
                let wy = -(qm[1][0] * wx + qm[1][2]) / qm[1][1];
                let cand = quadform(&qm, Point::new(wx, wy));
                if (wy - s.y).abs() <= 0.5 && cand < min {
                    min = cand;
                    best = Point::new(wx, wy);
                }
            }
        }

        for l in 0..2 {
            for k in 0..2 {
                let corner = Point::new(s.x - 0.5 + f64::from(l), s.y - 0.5 + f64::from(k));
                let cand = quadform(&qm, corner);
                if cand < min {
                    min = cand;
                    best = corner;
                }
            }
        }

        vertex.push(Point::new(best.x + x0, best.y + y0));
    }

    vertex
}

/// Decide for every vertex whether it is a corner or a smooth turn and place
/// the control points accordingly.
pub(crate) fn smooth(vertex: &[Point], alpha_max: f64) -> PrivCurve {
    let m = vertex.len();
    let mut curve = PrivCurve::with_len(m);
    curve.vertex = vertex.to_vec();

    for i in 0..m {
        let j = (i + 1) % m;
        let k = (i + 2) % m;
        let p4 = vertex[k].lerp(vertex[j], 0.5);

        let denom = ddenom(vertex[i], vertex[k]);
        let mut alpha = if denom != 0.0 {
            let dd = (dpara(vertex[i], vertex[j], vertex[k]) / denom).abs();
            let a = if dd > 1.0 { 1.0 - 1.0 / dd } else { 0.0 };
            a / 0.75
        } else {
            4.0 / 3.0
        };

        if alpha >= alpha_max {
            curve.tag[j] = Tag::Corner;
            curve.c[j][1] = vertex[j];
            curve.c[j][2] = p4;
        } else {
            alpha = alpha.clamp(0.55, 1.0);
            let p2 = vertex[i].lerp(vertex[j], 0.5 + 0.5 * alpha);
            let p3 = vertex[k].lerp(vertex[j], 0.5 + 0.5 * alpha);
            curve.tag[j] = Tag::Curve;
            curve.c[j] = [p2, p3, p4];
        }
        curve.alpha[j] = alpha;
    }

    curve
}

#[derive(Debug, Clone, Copy)]
struct Opti {
    pen: f64,
    c: [Point; 2],
    s: f64,
    alpha: f64,
}

/// Try to replace segments `i+1..=j` by a single Bézier; `None` if it would not fit.
fn opti_penalty(
    curve: &PrivCurve,
    i: usize,
    j: usize,
    tolerance: f64,
    convc: &[i32],
    areac: &[f64],
) -> Option<Opti> {
    let m = curve.len();
    let vertex = &curve.vertex;

    if i == j {
        return None;
    }

    let i1 = (i + 1) % m;
    let mut k1 = i1;
    let conv = convc[k1];
    if conv == 0 {
        return None;
    }

    // all turns must bend the same way and the total turn must stay below 179 degrees
    let d = vertex[i].distance(vertex[i1]);
    let mut k = k1;
    while k != j {
        k1 = (k + 1) % m;
        let k2 = (k + 2) % m;
        if convc[k1] != conv {
            return None;
        }
        if fsign(cprod(vertex[i], vertex[i1], vertex[k1], vertex[k2])) != conv {
            return None;
        }
        if iprod1(vertex[i], vertex[i1], vertex[k1], vertex[k2])
            < d * vertex[k1].distance(vertex[k2]) * -0.999847695156
        {
            return None;
        }
        k = k1;
    }

    let p0 = curve.c[i][2];
    let mut p1 = vertex[i1];
    let mut p2 = vertex[j];
    let p3 = curve.c[j][2];

    let mut area = areac[j] - areac[i];
    area -= dpara(vertex[0], curve.c[i][2], curve.c[j][2]) / 2.0;
    if i >= j {
        area += areac[m];
    }

    let a1 = dpara(p0, p1, p2);
    let a2 = dpara(p0, p1, p3);
    let a3 = dpara(p0, p2, p3);
    let a4 = a1 + a3 - a2;

    if a2 == a1 {
        return None;
    }

    let t = a3 / (a3 - a4);
    let s = a2 / (a2 - a1);
    let a = a2 * t / 2.0;

    if a == 0.0 {
        return None;
    }

    let r = area / a;
    let alpha = 2.0 - (4.0 - r / 0.3).sqrt();
    if !alpha.is_finite() {
        return None;
    }

    let c = [p0.lerp(p1, t * alpha), p3.lerp(p2, s * alpha)];
    p1 = c[0];
    p2 = c[1];

    let mut pen = 0.0;

    // the curve must stay close to every polygon edge it replaces
    let mut k = i1;
    while k != j {
        let k1 = (k + 1) % m;
        let tt = tangent(p0, p1, p2, p3, vertex[k], vertex[k1]);
        if tt < -0.5 {
            return None;
        }
        let pt = bezier(tt, p0, p1, p2, p3);
        let d = vertex[k].distance(vertex[k1]);
        if d == 0.0 {
            return None;
        }
        let d1 = dpara(vertex[k], vertex[k1], pt) / d;
        if d1.abs() > tolerance {
            return None;
        }
        if iprod(vertex[k], vertex[k1], pt) < 0.0 || iprod(vertex[k1], vertex[k], pt) < 0.0 {
            return None;
        }
        pen += d1 * d1;
        k = k1;
    }

    // and must not cut the corners of the unjoined curve
    let mut k = i;
    while k != j {
        let k1 = (k + 1) % m;
        let (e0, e1) = (curve.c[k][2], curve.c[k1][2]);
        let tt = tangent(p0, p1, p2, p3, e0, e1);
        if tt < -0.5 {
            return None;
        }
        let pt = bezier(tt, p0, p1, p2, p3);
        let d = e0.distance(e1);
        if d == 0.0 {
            return None;
        }
        let mut d1 = dpara(e0, e1, pt) / d;
        let mut d2 = dpara(e0, e1, vertex[k1]) / d * 0.75 * curve.alpha[k1];
        if d2 < 0.0 {
            d1 = -d1;
            d2 = -d2;
        }
        if d1 < d2 - tolerance {
            return None;
        }
        if d1 < d2 {
            pen += (d1 - d2) * (d1 - d2);
        }
        k = k1;
    }

    Some(Opti {
        pen,
        c,
        s,
        alpha,
    })
}

/// Join runs of smooth segments into fewer Béziers where the fit allows it.
pub(crate) fn opti_curve(curve: &PrivCurve, tolerance: f64) -> PrivCurve {
    let m = curve.len();
    if m == 0 {
        return curve.clone();
    }
    let vert = &curve.vertex;

    let convc: Vec<i32> = (0..m)
        .map(|i| match curve.tag[i] {
            Tag::Curve => fsign(dpara(vert[(i + m - 1) % m], vert[i], vert[(i + 1) % m])),
            Tag::Corner => 0,
        })
        .collect();

    let mut areac = vec![0.0f64; m + 1];
    let mut area = 0.0;
    let p0 = vert[0];
    for i in 0..m {
        let i1 = (i + 1) % m;
        if curve.tag[i1] == Tag::Curve {
            let alpha = curve.alpha[i1];
            area += 0.3 * alpha * (4.0 - alpha) * dpara(curve.c[i][2], vert[i1], curve.c[i1][2]) / 2.0;
            area += dpara(p0, curve.c[i][2], curve.c[i1][2]) / 2.0;
        }
        areac[i + 1] = area;
    }

    let mut pt = vec![0usize; m + 1];
    let mut pen = vec![0.0f64; m + 1];
    let mut len = vec![0usize; m + 1];
    let mut opt: Vec<Option<Opti>> = vec![None; m + 1];

    for j in 1..=m {
        pt[j] = j - 1;
        pen[j] = pen[j - 1];
        len[j] = len[j - 1] + 1;

        for i in (0..j - 1).rev() {
            let Some(o) = opti_penalty(curve, i, j % m, tolerance, &convc, &areac) else {
                break;
            };
            if len[j] > len[i] + 1 || (len[j] == len[i] + 1 && pen[j] > pen[i] + o.pen) {
                pt[j] = i;
                pen[j] = pen[i] + o.pen;
                len[j] = len[i] + 1;
                opt[j] = Some(o);
            }
        }
    }

    let om = len[m];
    let mut out = PrivCurve::with_len(om);

    let mut j = m;
    for i in (0..om).rev() {
        let jm = j % m;
        match opt[j] {
            Some(o) if pt[j] != j - 1 => {
                out.tag[i] = Tag::Curve;
                out.c[i] = [o.c[0], o.c[1], curve.c[jm][2]];
                out.vertex[i] = curve.c[jm][2].lerp(vert[jm], o.s);
                out.alpha[i] = o.alpha;
            }
            _ => {
                out.tag[i] = curve.tag[jm];
                out.c[i] = curve.c[jm];
                out.vertex[i] = curve.vertex[jm];
                out.alpha[i] = curve.alpha[jm];
            }
        }
        j = pt[j];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, side),
            Point::new(side, side),
            Point::new(side, 0.0),
        ]
    }

    /// Regular polygon approximating a circle.
    fn circle(radius: f64, sides: usize) -> Vec<Point> {
        (0..sides)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / sides as f64;
                Point::new(radius + radius * a.cos(), radius + radius * a.sin())
            })
            .collect()
    }

    mod smooth {
        use super::*;

        #[test]
        fn large_square_has_only_corners() {
            let curve = smooth(&square(32.0), 1.0);
            assert!(curve.tag.iter().all(|t| *t == Tag::Corner));
            // corner segments run vertex -> midpoint of the next edge
            assert_eq!(curve.c[1][1], Point::new(0.0, 32.0));
            assert_eq!(curve.c[1][2], Point::new(16.0, 32.0));
        }

        #[test]
        fn small_square_is_rounded() {
            let curve = smooth(&square(4.0), 1.0);
            assert!(curve.tag.iter().all(|t| *t == Tag::Curve));
            assert!(curve.alpha.iter().all(|a| (0.55..=1.0).contains(a)));
        }

        #[test]
        fn alpha_max_zero_forces_corners() {
            let curve = smooth(&circle(20.0, 16), 0.0);
            assert!(curve.tag.iter().all(|t| *t == Tag::Corner));
        }

        #[test]
        fn to_curve_starts_at_last_endpoint() {
            let curve = smooth(&square(32.0), 1.0);
            let out = curve.to_curve();
            assert_eq!(out.segments.len(), 4);
            assert_eq!(out.start, out.segments[3].end());
        }
    }

    mod opti_curve {
        use super::*;

        #[test]
        fn circle_segments_are_joined() {
            let curve = smooth(&circle(50.0, 24), 1.0);
            assert!(curve.tag.iter().all(|t| *t == Tag::Curve));
            let joined = opti_curve(&curve, 0.2);
            assert!(joined.len() < curve.len());
            assert!(joined.len() >= 2);
        }

        #[test]
        fn corners_are_kept() {
            let curve = smooth(&square(32.0), 1.0);
            let joined = opti_curve(&curve, 0.2);
            assert_eq!(joined.len(), 4);
            // output starts one segment later
            for i in 0..4 {
                assert_eq!(joined.c[i], curve.c[(i + 1) % 4]);
            }
        }

        #[test]
        fn joined_segments_end_on_input_endpoints() {
            let curve = smooth(&circle(50.0, 24), 1.0);
            let joined = opti_curve(&curve, 0.2);
            for c in &joined.c {
                assert!(curve.c.iter().any(|input| input[2] == c[2]));
            }
            assert!(joined.alpha.iter().all(|a| a.is_finite()));
        }
    }

    mod helpers {
        use super::*;

        #[test]
        fn bezier_endpoints() {
            let p = [
                Point::new(0.0, 0.0),
                Point::new(1.0, 2.0),
                Point::new(3.0, 2.0),
                Point::new(4.0, 0.0),
            ];
            assert_eq!(bezier(0.0, p[0], p[1], p[2], p[3]), p[0]);
            assert_eq!(bezier(1.0, p[0], p[1], p[2], p[3]), p[3]);
        }

        #[test]
        fn tangent_finds_horizontal_point() {
            let p = [
                Point::new(0.0, 0.0),
                Point::new(1.0, 3.0),
                Point::new(2.0, 1.0),
                Point::new(4.0, 2.0),
            ];
            let t = tangent(p[0], p[1], p[2], p[3], Point::new(0.0, 5.0), Point::new(1.0, 5.0));
            assert_eq!(t, 0.5);
        }

        #[test]
        fn tangent_of_symmetric_arch_is_rejected() {
            // the quadratic degenerates to a line
            let p = [
                Point::new(0.0, 0.0),
                Point::new(1.0, 2.0),
                Point::new(3.0, 2.0),
                Point::new(4.0, 0.0),
            ];
            let t = tangent(p[0], p[1], p[2], p[3], Point::new(0.0, 5.0), Point::new(1.0, 5.0));
            assert_eq!(t, -1.0);
        }

        #[test]
        fn ddenom_is_l1_distance() {
            assert_eq!(ddenom(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 7.0);
            assert_eq!(ddenom(Point::new(1.0, 1.0), Point::new(-2.0, 5.0)), 7.0);
        }
    }
}
