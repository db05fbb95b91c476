//! Collision Module
//!
//! Batched collision detection and resolution over groups of convex bodies
//! and clip lines. The scalar engine in [`scalar`] defines the semantics;
//! the [`gpu`] module runs the same algorithms as compute kernels over
//! named buffer segments.

pub mod config;
pub mod gpu;
pub mod pairs;
pub mod records;
pub mod scalar;
pub mod segments;

pub use config::{BufferCapacities, CollisionConfig};
pub use pairs::{build_pair_table, build_pair_table_with};
pub use records::{
    BodyPartRecord, BodyRecord, DispatchParams, HitRecord, LineCollectionRecord, LineRecord,
    PairRecord, ResolutionRecord,
};
pub use scalar::HitPair;
pub use segments::{SegmentError, SegmentRange};
