pub mod bearing;
pub mod contour;
pub mod hull;
pub mod segment;
pub mod select;

pub use bearing::BearingEstimator;
pub use contour::{Contour, ContourExtractor};
pub use hull::{Hull, HullAnalyzer, HullReport};
pub use segment::ColorSegmenter;
pub use select::CandidateSelector;
