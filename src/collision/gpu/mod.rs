//! GPU Collision Module
//!
//! Contains the wgpu compute path of the collision engine: device context,
//! buffer set, kernel pipelines and the batched dispatch front end.

pub mod buffers;
pub mod context;
pub mod dispatch;
pub mod pipelines;

pub use buffers::CollisionBuffers;
pub use context::GpuContext;
pub use dispatch::{BatchCollisionEngine, BatchError};
pub use pipelines::{CollisionBindGroups, CollisionPipelines};
