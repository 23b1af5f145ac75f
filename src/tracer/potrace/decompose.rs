//! Split a mask into closed boundary paths running along pixel edges.

use crate::config::TurnPolicy;
use crate::mask::BinaryMask;

/// A pixel corner: lattice point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Whether a path encloses foreground (`Outer`) or a hole inside it (`Hole`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    Outer,
    Hole,
}

/// A closed walk around one region, one lattice point per unit step.
#[derive(Debug, Clone)]
pub(crate) struct BoundaryPath {
    pub points: Vec<IPoint>,
    pub area: i64,
    pub orientation: Orientation,
    max_x: i32,
}

/// Walk every region of `mask`, dropping those whose area is at most `turd_size`.
///
/// Regions are found in row-major order. Each found region is cleared from a
/// working copy by inverting its interior, which also exposes its holes as new
/// regions for later iterations.
pub(crate) fn decompose(mask: &BinaryMask, turd_size: u32, policy: TurnPolicy) -> Vec<BoundaryPath> {
    let mut work = mask.clone();
    let mut paths = Vec::new();
    let mut cursor = (0, 0);

    while let Some((x, y)) = work.find_from(cursor.0, cursor.1) {
        let path = find_path(mask, &work, IPoint::new(x, y), policy);
        xor_path(&mut work, &path);
        if path.area > i64::from(turd_size) {
            paths.push(path);
        }
        cursor = (x, y);
    }

    paths
}

fn find_path(mask: &BinaryMask, work: &BinaryMask, start: IPoint, policy: TurnPolicy) -> BoundaryPath {
    let orientation = if mask.get(start.x, start.y) {
        Orientation::Outer
    } else {
        Orientation::Hole
    };

    let (mut x, mut y) = (start.x, start.y);
    let (mut dirx, mut diry) = (0i32, 1i32);
    let mut points = Vec::new();
    let mut area = 0i64;
    let mut max_x = start.x;

    loop {
        points.push(IPoint::new(x, y));
        max_x = max_x.max(x);

        x += dirx;
        y += diry;
        area -= i64::from(x) * i64::from(diry);

        if x == start.x && y == start.y {
            break;
        }

        // pixels ahead of the current edge, on its left and right
        let left = work.get(x + (dirx + diry - 1) / 2, y + (diry - dirx - 1) / 2);
        let right = work.get(x + (dirx - diry - 1) / 2, y + (diry + dirx - 1) / 2);

        if right && !left {
            let turn_right = match policy {
                TurnPolicy::Right => true,
                TurnPolicy::Left => false,
                TurnPolicy::Black => orientation == Orientation::Outer,
                TurnPolicy::White => orientation == Orientation::Hole,
                TurnPolicy::Majority => majority(work, x, y),
                TurnPolicy::Minority => !majority(work, x, y),
            };
            (dirx, diry) = if turn_right { (-diry, dirx) } else { (diry, -dirx) };
        } else if right {
            (dirx, diry) = (-diry, dirx);
        } else if !left {
            (dirx, diry) = (diry, -dirx);
        }
    }

    BoundaryPath {
        points,
        area,
        orientation,
        max_x,
    }
}

/// Local majority color around a lattice point, growing the window until it is decided.
fn majority(mask: &BinaryMask, x: i32, y: i32) -> bool {
    let vote = |set: bool| if set { 1 } else { -1 };
    for i in 2..5 {
        let mut ct = 0;
        for a in (-i + 1)..=(i - 1) {
            ct += vote(mask.get(x + a, y + i - 1));
            ct += vote(mask.get(x + i - 1, y + a - 1));
            ct += vote(mask.get(x + a - 1, y - i));
            ct += vote(mask.get(x - i, y + a));
        }
        if ct > 0 {
            return true;
        } else if ct < 0 {
            return false;
        }
    }
    false
}

/// Invert every pixel enclosed by `path` in the working mask.
fn xor_path(work: &mut BinaryMask, path: &BoundaryPath) {
    let mut y1 = path.points[0].y;
    for p in &path.points[1..] {
        if p.y != y1 {
            let min_y = y1.min(p.y);
            for x in p.x..path.max_x {
                work.toggle(x, min_y);
            }
            y1 = p.y;
        }
    }
}
