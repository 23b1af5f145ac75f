//! Optimal polygon approximation of a boundary path.

use super::decompose::IPoint;

/// Prefix sums of coordinates (relative to the first point) and their products.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Sums {
    pub x: f64,
    pub y: f64,
    pub xy: f64,
    pub x2: f64,
    pub y2: f64,
}

pub(crate) fn calc_sums(pt: &[IPoint]) -> Vec<Sums> {
    let origin = pt[0];
    let mut sums = Vec::with_capacity(pt.len() + 1);
    let mut acc = Sums::default();
    sums.push(acc);
    for p in pt {
        let x = f64::from(p.x - origin.x);
        let y = f64::from(p.y - origin.y);
        acc = Sums {
            x: acc.x + x,
            y: acc.y + y,
            xy: acc.xy + x * y,
            x2: acc.x2 + x * x,
            y2: acc.y2 + y * y,
        };
        sums.push(acc);
    }
    sums
}

fn sign(v: i32) -> i32 {
    v.signum()
}

fn xprod(p1: IPoint, p2: IPoint) -> i64 {
    i64::from(p1.x) * i64::from(p2.y) - i64::from(p1.y) * i64::from(p2.x)
}

/// True when `b` lies in the cyclic half-open interval `[a, c)`.
pub(crate) fn cyclic(a: usize, b: usize, c: usize) -> bool {
    if a <= c {
        a <= b && b < c
    } else {
        a <= b || b < c
    }
}

/// Direction index of a unit (or sign-reduced) step, 0..=3.
fn dir_index(dx: i32, dy: i32) -> usize {
    ((3 + 3 * dx + dy) / 2) as usize
}

/// For every point, the furthest index reachable by a straight subpath.
pub(crate) fn calc_lon(pt: &[IPoint]) -> Vec<usize> {
    let n = pt.len();
    let mut pivk = vec![0usize; n];
    let mut nc = vec![0usize; n];

    // nc[i]: next corner, the first index after i not aligned with pt[i] on either axis
    let mut k = 0;
    for i in (0..n).rev() {
        if pt[i].x != pt[k].x && pt[i].y != pt[k].y {
            k = i + 1;
        }
        nc[i] = k;
    }

    for i in (0..n).rev() {
        let mut ct = [0u32; 4];
        let next = pt[(i + 1) % n];
        ct[dir_index(next.x - pt[i].x, next.y - pt[i].y)] += 1;

        let mut constraint = [IPoint::default(); 2];
        let mut k = nc[i];
        let mut k1 = i;
        let mut found = false;

        loop {
            ct[dir_index(sign(pt[k].x - pt[k1].x), sign(pt[k].y - pt[k1].y))] += 1;

            if ct.iter().all(|&c| c > 0) {
                pivk[i] = k1;
                found = true;
                break;
            }

            let cur = IPoint::new(pt[k].x - pt[i].x, pt[k].y - pt[i].y);
            if xprod(constraint[0], cur) < 0 || xprod(constraint[1], cur) > 0 {
                break;
            }

            if cur.x.abs() > 1 || cur.y.abs() > 1 {
                let off = IPoint::new(
                    cur.x + if cur.y >= 0 && (cur.y > 0 || cur.x < 0) { 1 } else { -1 },
                    cur.y + if cur.x <= 0 && (cur.x < 0 || cur.y < 0) { 1 } else { -1 },
                );
                if xprod(constraint[0], off) >= 0 {
                    constraint[0] = off;
                }
                let off = IPoint::new(
                    cur.x + if cur.y <= 0 && (cur.y < 0 || cur.x < 0) { 1 } else { -1 },
                    cur.y + if cur.x >= 0 && (cur.x > 0 || cur.y < 0) { 1 } else { -1 },
                );
                if xprod(constraint[1], off) <= 0 {
                    constraint[1] = off;
                }
            }

            k1 = k;
            k = nc[k1];
            if !cyclic(k, i, k1) {
                break;
            }
        }

        if !found {
            // the straight run ends between k1 and k; find the last admissible step
            let dk = IPoint::new(sign(pt[k].x - pt[k1].x), sign(pt[k].y - pt[k1].y));
            let cur = IPoint::new(pt[k1].x - pt[i].x, pt[k1].y - pt[i].y);
            let a = xprod(constraint[0], cur);
            let b = xprod(constraint[0], dk);
            let c = xprod(constraint[1], cur);
            let d = xprod(constraint[1], dk);

            let mut j = 10_000_000i64;
            if b < 0 {
                j = a.div_euclid(-b);
            }
            if d > 0 {
                j = j.min((-c).div_euclid(d));
            }
            pivk[i] = (k1 as i64 + j).rem_euclid(n as i64) as usize;
        }
    }

    let mut lon = vec![0usize; n];
    let mut j = pivk[n - 1];
    lon[n - 1] = j;
    for i in (0..n - 1).rev() {
        if cyclic(i + 1, pivk[i], j) {
            j = pivk[i];
        }
        lon[i] = j;
    }

    let mut i = n - 1;
    while cyclic((i + 1) % n, j, lon[i]) {
        lon[i] = j;
        if i == 0 {
            break;
        }
        i -= 1;
    }

    lon
}

/// Penalty of replacing the subpath `i..=j` by a straight segment.
///
/// `j` may exceed the path length by up to one full turn.
fn penalty3(pt: &[IPoint], sums: &[Sums], i: usize, j: usize) -> f64 {
    let n = pt.len();
    let (j, r) = if j >= n { (j - n, 1.0) } else { (j, 0.0) };

    let x = sums[j + 1].x - sums[i].x + r * sums[n].x;
    let y = sums[j + 1].y - sums[i].y + r * sums[n].y;
    let x2 = sums[j + 1].x2 - sums[i].x2 + r * sums[n].x2;
    let xy = sums[j + 1].xy - sums[i].xy + r * sums[n].xy;
    let y2 = sums[j + 1].y2 - sums[i].y2 + r * sums[n].y2;
    let k = (j + 1) as f64 - i as f64 + r * n as f64;

    let px = f64::from(pt[i].x + pt[j].x) / 2.0 - f64::from(pt[0].x);
    let py = f64::from(pt[i].y + pt[j].y) / 2.0 - f64::from(pt[0].y);
    let ey = f64::from(pt[j].x - pt[i].x);
    let ex = -f64::from(pt[j].y - pt[i].y);

    let a = (x2 - 2.0 * x * px) / k + px * px;
    let b = (xy - x * py - y * px) / k + px * py;
    let c = (y2 - 2.0 * y * py) / k + py * py;

    let s = ex * ex * a + 2.0 * ex * ey * b + ey * ey * c;
    s.max(0.0).sqrt()
}

/// Indices of the polygon with the fewest vertices, ties broken by least penalty.
pub(crate) fn best_polygon(pt: &[IPoint], lon: &[usize], sums: &[Sums]) -> Vec<usize> {
    let n = pt.len();
    let mut pen = vec![0.0f64; n + 1];
    let mut prev = vec![0usize; n + 1];
    let mut clip0 = vec![0usize; n];
    let mut clip1 = vec![0usize; n + 1];
    let mut seg0 = vec![0usize; n + 1];
    let mut seg1 = vec![0usize; n + 1];

    for i in 0..n {
        let mut c = (lon[(i + n - 1) % n] + n - 1) % n;
        if c == i {
            c = (i + 1) % n;
        }
        clip0[i] = if c < i { n } else { c };
    }

    let mut j = 1;
    for i in 0..n {
        while j <= clip0[i] {
            clip1[j] = i;
            j += 1;
        }
    }

    let mut i = 0;
    let mut j = 0;
    while i < n {
        seg0[j] = i;
        i = clip0[i];
        j += 1;
    }
    seg0[j] = n;
    let m = j;

    let mut i = n;
    for j in (1..=m).rev() {
        seg1[j] = i;
        i = clip1[i];
    }
    seg1[0] = 0;

    for j in 1..=m {
        for i in seg1[j]..=seg0[j] {
            let mut best = -1.0;
            for k in (clip1[i]..=seg0[j - 1]).rev() {
                let this = penalty3(pt, sums, k, i) + pen[k];
                if best < 0.0 || this < best {
                    prev[i] = k;
                    best = this;
                }
            }
            pen[i] = best;
        }
    }

    let mut po = vec![0usize; m];
    let mut i = n;
    for j in (0..m).rev() {
        i = prev[i];
        po[j] = i;
    }
    po
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lattice walk around a `w` by `h` rectangle, in the order the decomposer produces.
    fn rectangle(w: i32, h: i32) -> Vec<IPoint> {
        let mut pts = Vec::new();
        for y in 0..h {
            pts.push(IPoint::new(0, y));
        }
        for x in 0..w {
            pts.push(IPoint::new(x, h));
        }
        for y in (1..=h).rev() {
            pts.push(IPoint::new(w, y));
        }
        for x in (1..=w).rev() {
            pts.push(IPoint::new(x, 0));
        }
        pts
    }

    #[test]
    fn cyclic_intervals() {
        assert!(cyclic(1, 2, 5));
        assert!(!cyclic(1, 5, 5));
        assert!(cyclic(5, 0, 2));
        assert!(cyclic(5, 6, 2));
        assert!(!cyclic(5, 3, 2));
    }

    #[test]
    fn sums_accumulate_relative_to_origin() {
        let pts = [IPoint::new(2, 3), IPoint::new(2, 4), IPoint::new(3, 4)];
        let sums = calc_sums(&pts);
        assert_eq!(sums.len(), 4);
        let last = sums[3];
        assert_eq!(last.x, 1.0);
        assert_eq!(last.y, 2.0);
        assert_eq!(last.xy, 1.0);
        assert_eq!(last.x2, 1.0);
        assert_eq!(last.y2, 2.0);
    }

    #[test]
    fn rectangle_polygon_has_four_corners() {
        let pts = rectangle(12, 8);
        let sums = calc_sums(&pts);
        let lon = calc_lon(&pts);
        let po = best_polygon(&pts, &lon, &sums);
        assert_eq!(po.len(), 4);
        let mut corners: Vec<IPoint> = po.iter().map(|&i| pts[i]).collect();
        corners.sort_by_key(|p| (p.x, p.y));
        assert_eq!(
            corners,
            vec![
                IPoint::new(0, 0),
                IPoint::new(0, 8),
                IPoint::new(12, 0),
                IPoint::new(12, 8)
            ]
        );
    }

    #[test]
    fn straight_edge_has_no_penalty() {
        let pts = rectangle(6, 4);
        let sums = calc_sums(&pts);
        // 0..=4 runs down the left edge
        assert_eq!(penalty3(&pts, &sums, 0, 4), 0.0);
    }
}
