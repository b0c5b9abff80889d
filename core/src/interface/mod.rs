pub mod detection;
pub mod frame;

pub use detection::{BearingResult, Candidate};
pub use frame::{Frame, Mask};
