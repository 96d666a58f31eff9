//! Hit-testing over drawn figures.
//!
//! Everything here is a pure function of its arguments. The containment test
//! casts a horizontal ray from the query point and counts crossings against
//! every segment of every figure, so segments of different figures can close
//! a region together.

use crate::{Figure, Point};

/// Width of the drawing surface used as the ray extent when the caller has
/// no better value.
pub const DEFAULT_SURFACE_WIDTH: f64 = 800.0;

pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Signed orientation of `c` relative to the directed line `a -> b`.
/// Zero when the three points are collinear.
pub fn direction(a: Point, b: Point, c: Point) -> f64 {
    (c.x - a.x) * (b.y - a.y) - (b.x - a.x) * (c.y - a.y)
}

/// Inclusive bounding-box check of `p` against `a`/`b`. Only meaningful when
/// `p` is already collinear with `a` and `b`.
pub fn is_point_on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn straddles(first: f64, second: f64) -> bool {
    (first > 0.0 && second < 0.0) || (first < 0.0 && second > 0.0)
}

pub fn segments_intersect(p0: Point, p1: Point, p2: Point, p3: Point) -> bool {
    let d1 = direction(p2, p3, p0);
    let d2 = direction(p2, p3, p1);
    let d3 = direction(p0, p1, p2);
    let d4 = direction(p0, p1, p3);

    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    (d1 == 0.0 && is_point_on_segment(p2, p3, p0))
        || (d2 == 0.0 && is_point_on_segment(p2, p3, p1))
        || (d3 == 0.0 && is_point_on_segment(p0, p1, p2))
        || (d4 == 0.0 && is_point_on_segment(p0, p1, p3))
}

pub fn point_in_figure_set(point: Point, figures: &[Figure]) -> bool {
    point_in_figure_set_within(point, figures, DEFAULT_SURFACE_WIDTH)
}

/// Odd/even ray-cast against the union of all segments of all figures.
///
/// The ray runs from `point` rightwards to just past the surface edge, the
/// query point and every segment endpoint, whichever lies furthest right.
pub fn point_in_figure_set_within(point: Point, figures: &[Figure], surface_width: f64) -> bool {
    let ray_end = Point::new(ray_extent(point, figures, surface_width), point.y);
    let crossings = figures
        .iter()
        .flat_map(|figure| figure.segments.iter())
        .filter(|segment| segments_intersect(point, ray_end, segment.start, segment.end))
        .count();
    crossings % 2 == 1
}

/// Always strictly right of `point` and of every endpoint.
fn ray_extent(point: Point, figures: &[Figure], surface_width: f64) -> f64 {
    figures
        .iter()
        .flat_map(|figure| figure.segments.iter())
        .flat_map(|segment| [segment.start.x, segment.end.x])
        .fold(surface_width.max(point.x), f64::max)
        + 1.0
}

/// Figure owning the segment whose start point is closest to `point`.
/// The first candidate wins ties.
pub fn nearest_figure_to_point(point: Point, figures: &[Figure]) -> Option<&Figure> {
    let mut best: Option<(&Figure, f64)> = None;
    for figure in figures {
        for segment in &figure.segments {
            let candidate = distance(segment.start, point);
            match best {
                Some((_, current)) if candidate >= current => {}
                _ => best = Some((figure, candidate)),
            }
        }
    }
    best.map(|(figure, _)| figure)
}

/// Figure under `point`, if the point is inside the drawn region at all.
pub fn hit_test(point: Point, figures: &[Figure], surface_width: f64) -> Option<&Figure> {
    if !point_in_figure_set_within(point, figures, surface_width) {
        return None;
    }
    nearest_figure_to_point(point, figures)
}
