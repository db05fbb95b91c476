//! Geometry primitives and the caller-owned body/line data model.

pub mod body;
pub mod intersect;
pub mod line;
pub mod polygon;

pub use body::{Body, BodyPart};
pub use intersect::segment_intersection;
pub use line::{Line, LineCollection};
pub use polygon::CollisionPolygon;
