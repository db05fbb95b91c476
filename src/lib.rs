//! # impact2d: Batched 2D Collision Detection
//!
//! impact2d detects and resolves contacts between groups of convex 2D bodies
//! and clips line probes against them. Every query is batched: callers upload
//! named groups once and dispatch group-against-group operations, on the GPU
//! through wgpu compute kernels or on the CPU through the scalar engine that
//! defines the semantics.
//!
//! ## Architecture Overview
//!
//! The crate is organized into two subsystems:
//!
//! ### 1. Geometry ([`geometry`])
//!
//! The shape and line model shared by both execution paths:
//! - [`geometry::BodyPart`] - Tagged shape parts (circle, rectangle, triangle)
//! - [`geometry::Body`] - A positioned group of parts with a broad-phase radius
//! - [`geometry::CollisionPolygon`] - Counter-clockwise vertex loop with outward edge normals
//! - [`geometry::Line`] / [`geometry::LineCollection`] - Directed and fixed-point clip lines
//! - [`geometry::segment_intersection`] - The segment crossing predicate behind line clipping
//!
//! **Key Design**: every part polygonizes to a counter-clockwise convex loop at
//! construction, so narrow-phase code never re-derives winding or normals.
//!
//! ### 2. Collision ([`collision`])
//!
//! Batched detection, resolution and restriction:
//! - [`collision::scalar`] - Scalar reference engine plus `_st`/`_parallel` batch helpers
//! - [`collision::records`] - Plain-old-data records shared with the WGSL kernels
//! - [`collision::segments`] - Named segment staging with whole-or-nothing uploads
//! - [`collision::pairs`] - Exemption table construction for owned line collections
//! - [`collision::gpu`] - Device context, buffer set, pipelines and the batch engine
//!
//! **Key Design**: the scalar functions and the five compute kernels implement
//! the same algorithms step for step, so either path can check the other.
//!
//! ## Data Flow
//!
//! ```text
//! Bodies / LineCollections → stage into records → upload → dispatch by
//! segment name → kernels append or write results → blocking readback
//! ```
//!
//! ## Collision Model
//!
//! - **Overlap**: separating axis test across both polygons' edge normals;
//!   touching intervals count as overlap.
//! - **Resolution**: iterated minimum translation vectors, smallest
//!   penetration first, capped by [`collision::CollisionConfig`].
//! - **Restriction**: lines clip to the nearest intersected body edge,
//!   never growing past their own length.
//!
//! ## Dependencies
//!
//! - **GPU**: `wgpu` (compute pipelines), `pollster` (blocking on device futures)
//! - **Math**: `glam` (2D vector math), `bytemuck` (safe transmutation)
//! - **Errors**: `thiserror` (error enums), `log` (structured logging)
//! - **Concurrency**: `rayon` (parallel batch helpers)
//! - **Serialization**: `serde` (config and shape definitions)

pub mod collision;
pub mod geometry;
