//! Slide edge geometry: cubic bezier edges for slide segments and
//! curve/horizontal-line intersection for interpolated diamonds.

use super::constants::*;
use super::layout::Layout;
use super::slides::SlideSegment;

const BISECTION_STEPS: usize = 64;
const Y_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cubic bezier curve in SVG coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point {
            x: b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x + b3 * self.p3.x,
            y: b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y + b3 * self.p3.y,
        }
    }

    /// Point where the curve crosses the horizontal line at `y`.
    ///
    /// Assumes y(t) is monotonic on [0, 1], which holds for slide edges
    /// since both control points lie between the endpoints vertically.
    pub fn intersect_horizontal(&self, y: f64) -> Option<Point> {
        let (y0, y3) = (self.p0.y, self.p3.y);
        let (low, high) = if y0 <= y3 { (y0, y3) } else { (y3, y0) };
        if y < low - Y_EPSILON || y > high + Y_EPSILON {
            return None;
        }
        if high - low < Y_EPSILON {
            return Some(self.p0);
        }

        let rising = y3 > y0;
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..BISECTION_STEPS {
            let mid = (lo + hi) / 2.0;
            let below_target = self.point_at(mid).y < y;
            if below_target == rising {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(self.point_at((lo + hi) / 2.0))
    }
}

/// Left and right boundary curves of a slide segment within one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentEdges {
    pub left: CubicBezier,
    pub right: CubicBezier,
}

fn ease_ratio(eased: bool) -> f64 {
    if eased {
        CURVE_EASE_RATIO
    } else {
        STRAIGHT_EASE_RATIO
    }
}

impl SegmentEdges {
    /// Edges of `segment` drawn in `row`, with positions of other rows
    /// shifted off the row vertically.
    pub fn for_row(layout: &Layout, segment: &SlideSegment, row: usize) -> Self {
        let shrink = layout.lane_width / SLIDE_SHRINK_DIVISOR;
        let row_x = layout.row_x(row);
        let (from, to) = (&segment.start, &segment.end);

        let from_left = layout.lane_left(from.lane - crate::model::FIRST_PLAYABLE_LANE);
        let to_left = layout.lane_left(to.lane - crate::model::FIRST_PLAYABLE_LANE);
        let from_left_x = (from_left + shrink).ceil() + row_x;
        let from_right_x = (from_left + layout.lane_width * from.width as f64 - shrink).floor() + row_x;
        let to_left_x = (to_left + shrink).ceil() + row_x;
        let to_right_x = (to_left + layout.lane_width * to.width as f64 - shrink).floor() + row_x;

        let from_y = layout.row_y(from.measure, from.tick, row).floor();
        let to_y = layout.row_y(to.measure, to.tick, row).floor();

        let rise = from_y - to_y;
        let from_control_y = from_y - rise * ease_ratio(segment.ease_in);
        let to_control_y = to_y + rise * ease_ratio(segment.ease_out);

        let edge = |from_x: f64, to_x: f64| CubicBezier {
            p0: Point::new(from_x, from_y),
            p1: Point::new(from_x, from_control_y),
            p2: Point::new(to_x, to_control_y),
            p3: Point::new(to_x, to_y),
        };

        Self {
            left: edge(from_left_x, to_left_x),
            right: edge(from_right_x, to_right_x),
        }
    }

    /// Closed outline: up the left edge, across the end, down the right.
    pub fn to_path_data(&self) -> String {
        let (l, r) = (&self.left, &self.right);
        format!(
            "M{:.1},{:.1}C{:.1},{:.1},{:.1},{:.1},{:.1},{:.1}H{:.1}C{:.1},{:.1},{:.1},{:.1},{:.1},{:.1}z",
            l.p0.x, l.p0.y,
            l.p1.x, l.p1.y,
            l.p2.x, l.p2.y,
            l.p3.x, l.p3.y,
            r.p3.x,
            r.p2.x, r.p2.y,
            r.p1.x, r.p1.y,
            r.p0.x, r.p0.y,
        )
    }

    /// Horizontal center of the path at `y`, or `None` when either edge
    /// does not cross that line.
    pub fn center_at(&self, y: f64) -> Option<f64> {
        let left = snap(self.left.intersect_horizontal(y)?.x).ceil();
        let right = snap(self.right.intersect_horizontal(y)?.x).floor();
        Some((left + right) / 2.0)
    }
}

/// Drop solver noise so an exact pixel edge is not rounded a whole pixel away.
fn snap(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Rows a segment passes through, from its start's row to its end's row.
pub fn segment_rows(layout: &Layout, segment: &SlideSegment) -> std::ops::RangeInclusive<usize> {
    let from = layout.row_of(segment.start.measure);
    let to = layout.row_of(segment.end.measure);
    from..=to.max(from)
}
