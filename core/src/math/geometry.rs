use imageproc::geometry;
use imageproc::point::Point as ImPoint;
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate, `x` to the right and `y` down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<ImPoint<i32>> for Point {
    fn from(p: ImPoint<i32>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for ImPoint<i32> {
    fn from(p: Point) -> Self {
        ImPoint::new(p.x, p.y)
    }
}

/// Convex hull of `points` through `imageproc`; vertices are taken from the input.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }
    let input: Vec<ImPoint<i32>> = sorted.into_iter().map(ImPoint::from).collect();
    geometry::convex_hull(input.as_slice())
        .into_iter()
        .map(Point::from)
        .collect()
}

/// Hull of the pixel squares centred on `points`, with vertices on pixel
/// corners: pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)`, so a filled
/// `w x h` block has hull area `w * h`. `None` when the centres are collinear.
pub fn pixel_hull(points: &[Point]) -> Option<Vec<Point>> {
    let centres = convex_hull(points);
    if centres.len() < 3 || polygon_moments(&centres).area() == 0.0 {
        return None;
    }
    let corners: Vec<Point> = centres
        .iter()
        .flat_map(|p| {
            [(0, 0), (1, 0), (0, 1), (1, 1)].map(|(dx, dy)| Point::new(p.x + dx, p.y + dy))
        })
        .collect();
    Some(convex_hull(&corners))
}

/// Zeroth and first order area moments of a simple polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl PolygonMoments {
    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// `(M10 / M00, M01 / M00)`, or `None` for a degenerate polygon.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            None
        } else {
            Some((self.m10 / self.m00, self.m01 / self.m00))
        }
    }
}

/// Green's theorem moments over the closed polygon `vertices`. The sign of
/// `m00` follows the winding; the centroid is winding independent.
pub fn polygon_moments(vertices: &[Point]) -> PolygonMoments {
    let mut m00 = 0.0;
    let mut m10 = 0.0;
    let mut m01 = 0.0;
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let (ax, ay, bx, by) = (f64::from(a.x), f64::from(a.y), f64::from(b.x), f64::from(b.y));
        let c = ax * by - bx * ay;
        m00 += c;
        m10 += (ax + bx) * c;
        m01 += (ay + by) * c;
    }
    PolygonMoments {
        m00: m00 / 2.0,
        m10: m10 / 6.0,
        m01: m01 / 6.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn hull_drops_interior_points() {
        let points = pts(&[(0, 0), (4, 0), (4, 4), (2, 2), (0, 4), (1, 3), (0, 0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        for corner in pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]) {
            assert!(hull.contains(&corner));
        }
    }

    #[test]
    fn pixel_hull_covers_whole_pixels() {
        // 3 x 2 block of pixel centres
        let hull = pixel_hull(&pts(&[(5, 7), (7, 7), (7, 8), (5, 8), (6, 7)])).unwrap();
        let moments = polygon_moments(&hull);
        assert_eq!(moments.area(), 6.0);
        let (cx, cy) = moments.centroid().unwrap();
        assert!((cx - 6.5).abs() < 1e-9);
        assert!((cy - 8.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_hull_of_line_is_degenerate() {
        assert!(pixel_hull(&pts(&[(0, 0), (1, 1), (2, 2), (3, 3)])).is_none());
        assert!(pixel_hull(&pts(&[(3, 3)])).is_none());
    }

    #[test]
    fn rectangle_moments_give_center() {
        let moments = polygon_moments(&pts(&[(10, 20), (30, 20), (30, 60), (10, 60)]));
        assert_eq!(moments.area(), 800.0);
        let (cx, cy) = moments.centroid().unwrap();
        assert!((cx - 20.0).abs() < 1e-9);
        assert!((cy - 40.0).abs() < 1e-9);
    }

    #[test]
    fn triangle_centroid_is_vertex_mean() {
        let moments = polygon_moments(&pts(&[(0, 0), (6, 0), (0, 9)]));
        assert_eq!(moments.area(), 27.0);
        let (cx, cy) = moments.centroid().unwrap();
        assert!((cx - 2.0).abs() < 1e-9);
        assert!((cy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_ignores_winding() {
        let cw = pts(&[(0, 0), (0, 4), (4, 4), (4, 0)]);
        let ccw: Vec<Point> = cw.iter().rev().copied().collect();
        assert_eq!(
            polygon_moments(&cw).centroid(),
            polygon_moments(&ccw).centroid()
        );
        assert_eq!(polygon_moments(&cw).m00, -polygon_moments(&ccw).m00);
    }
}
