//! Planar geometry helpers: distances, projections, segment intersection,
//! and radius-limited nearest-point search.

use kurbo::Point;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// A degenerate line (`a == b`) is treated as the point `a`.
pub fn point_line_distance(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return distance(p, a);
    }
    // |Ax + By + C| / sqrt(A² + B²)
    let ca = b.y - a.y;
    let cb = a.x - b.x;
    let cc = b.x * a.y - a.x * b.y;
    (ca * p.x + cb * p.y + cc).abs() / ca.hypot(cb)
}

/// The point on segment `a`–`b` closest to `p`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to the closed segment `a`–`b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    distance(p, closest_point_on_segment(p, a, b))
}

/// Intersection of segments `a1`–`a2` and `b1`–`b2`.
///
/// Returns `None` for parallel (including collinear) segments or when the
/// crossing lies outside either segment. Endpoints count as inside.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return None;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1 + (a2 - a1) * ua)
    } else {
        None
    }
}

/// Find the candidate closest to `query` strictly within `radius`.
///
/// Linear scan. A candidate exactly `radius` away is excluded, and on equal
/// distances the first candidate in iteration order wins.
pub fn nearest_within<K, I>(candidates: I, query: Point, radius: f64) -> Option<(K, f64)>
where
    I: IntoIterator<Item = (K, Point)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, point) in candidates {
        let d = distance(query, point);
        let closer = match &best {
            Some((_, min)) => d < *min,
            None => true,
        };
        if closer && d < radius {
            best = Some((key, d));
        }
    }
    best
}
