use crate::interface::Mask;
use crate::math::Point;
use crate::prelude::{ProcessingStage, StageResult};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Closed boundary of one connected region, compressed to its direction changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point>,
    /// Hole borders separate a region from a background pocket it encloses.
    pub is_hole: bool,
    /// Index of the enclosing contour in the same extraction result.
    pub parent: Option<usize>,
}

/// Edge detection, morphological closing and border following over a mask.
#[derive(Debug, Default)]
pub struct ContourExtractor;

impl ContourExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessingStage for ContourExtractor {
    type Input = Mask;
    type Output = Vec<Contour>;

    fn name(&self) -> &'static str {
        "contour-extractor"
    }

    fn execute(&self, mask: &Mask) -> StageResult<Vec<Contour>> {
        let edges = close(&detect_edges(&mask.to_gray()));
        Ok(trace_borders(&edges))
    }
}

/// Inner morphological gradient: foreground pixels removed by a 4-neighbour
/// (L1, radius 1) erosion.
pub fn detect_edges(mask: &GrayImage) -> GrayImage {
    let eroded = morphology::erode(mask, Norm::L1, 1);
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let on_boundary = mask.get_pixel(x, y)[0] > 0 && eroded.get_pixel(x, y)[0] == 0;
        Luma([if on_boundary { 255 } else { 0 }])
    })
}

/// One closing pass with the 3x3 (8-connected) structuring element.
pub fn close(edges: &GrayImage) -> GrayImage {
    morphology::close(edges, Norm::LInf, 1)
}

/// Suzuki-Abe border following. Returns every outer and hole border in
/// raster order of their starting pixels, with tree parents.
pub fn trace_borders(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .map(|border| {
            let pixels: Vec<Point> = border.points.into_iter().map(Point::from).collect();
            Contour {
                points: compress_runs(&pixels),
                is_hole: matches!(border.border_type, BorderType::Hole),
                parent: border.parent,
            }
        })
        .collect()
}

/// Drops every point that continues a straight run, keeping run endpoints.
fn compress_runs(pixels: &[Point]) -> Vec<Point> {
    let mut path = pixels.to_vec();
    path.dedup();
    if path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    let n = path.len();
    if n < 3 {
        return path;
    }
    (0..n)
        .filter(|&i| {
            let prev = path[(i + n - 1) % n];
            let cur = path[i];
            let next = path[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| path[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outer(contours: &[Contour]) -> Vec<&Contour> {
        contours.iter().filter(|c| !c.is_hole).collect()
    }

    fn lit(image: &GrayImage, x: u32, y: u32) -> bool {
        image.get_pixel(x, y)[0] > 0
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = Mask::new(32, 24);
        let contours = ContourExtractor::new().execute(&mask).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn edges_of_filled_rectangle_form_a_ring() {
        let mut mask = Mask::new(20, 20);
        mask.fill_rect(5, 5, 15, 12);
        let edges = detect_edges(&mask.to_gray());
        assert!(lit(&edges, 5, 5));
        assert!(lit(&edges, 14, 11));
        assert!(!lit(&edges, 8, 8));
        assert_eq!(Mask::from_gray(&edges).count(), 2 * 10 + 2 * 5);
    }

    #[test]
    fn closing_bridges_single_pixel_gap() {
        let mut mask = Mask::new(12, 5);
        mask.fill_rect(1, 2, 5, 3);
        mask.fill_rect(6, 2, 10, 3);
        let closed = close(&mask.to_gray());
        assert!(lit(&closed, 5, 2));
        assert!(lit(&closed, 1, 2));
        assert!(!lit(&closed, 10, 2));
        assert!(!lit(&closed, 5, 1));
    }

    #[test]
    fn solid_rectangle_traces_to_four_corners() {
        let mut mask = Mask::new(12, 10);
        mask.fill_rect(2, 3, 8, 7);
        let contours = trace_borders(&mask.to_gray());
        assert_eq!(contours.len(), 1);
        let border = &contours[0];
        assert!(!border.is_hole);
        assert_eq!(border.parent, None);
        let mut corners = border.points.clone();
        corners.sort();
        assert_eq!(
            corners,
            vec![
                Point::new(2, 3),
                Point::new(2, 6),
                Point::new(7, 3),
                Point::new(7, 6)
            ]
        );
    }

    #[test]
    fn ring_produces_outer_and_hole_borders() {
        let mut mask = Mask::new(20, 20);
        mask.fill_rect(3, 3, 15, 15);
        for y in 6..12 {
            for x in 6..12 {
                mask.set(x, y, false);
            }
        }
        let contours = trace_borders(&mask.to_gray());
        assert_eq!(contours.len(), 2);
        assert!(!contours[0].is_hole);
        assert!(contours[1].is_hole);
        assert_eq!(contours[1].parent, Some(0));
    }

    #[test]
    fn nested_region_is_child_of_hole() {
        let mut mask = Mask::new(30, 30);
        mask.fill_rect(2, 2, 28, 28);
        for y in 6..24 {
            for x in 6..24 {
                mask.set(x, y, false);
            }
        }
        mask.fill_rect(12, 12, 18, 18);
        let contours = trace_borders(&mask.to_gray());
        assert_eq!(contours.len(), 3);
        assert_eq!(contours[2].parent, Some(1));
        assert!(!contours[2].is_hole);
    }

    #[test]
    fn isolated_pixel_is_single_point_contour() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true);
        let contours = trace_borders(&mask.to_gray());
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![Point::new(2, 2)]);
    }

    #[test]
    fn runs_collapse_to_their_endpoints() {
        let path: Vec<Point> = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1), (0, 0)]
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect();
        assert_eq!(
            compress_runs(&path),
            vec![
                Point::new(0, 0),
                Point::new(2, 0),
                Point::new(2, 2),
                Point::new(0, 2)
            ]
        );
    }

    #[test]
    fn extractor_finds_each_disjoint_blob() {
        let mut mask = Mask::new(60, 40);
        mask.fill_rect(5, 5, 20, 20);
        mask.fill_rect(35, 10, 55, 30);
        let contours = ContourExtractor::new().execute(&mask).unwrap();
        assert_eq!(outer(&contours).len(), 2);
        assert!(contours.iter().all(|c| c.points.len() >= 4));
    }
}
