pub mod color;
pub mod geometry;

pub use color::rgb_to_hsv;
pub use geometry::{convex_hull, pixel_hull, polygon_moments, Point, PolygonMoments};
