pub mod geometry;
pub mod ids;

pub use geometry::{Rect, Size};
pub use ids::AnchorId;
