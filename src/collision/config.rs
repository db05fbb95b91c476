use serde::{Deserialize, Serialize};

/// Collision tuning shared by the scalar and batched paths.
///
/// The same values travel to the kernels through the per-dispatch parameter
/// record, so both paths resolve with an identical iteration budget and
/// epsilon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Upper bound on MTV iterations when resolving one body.
    pub resolve_iterations: u32,

    /// Penetrations at or below this depth are ignored during resolution,
    /// so near-touching contacts do not jitter.
    pub penetration_epsilon: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            resolve_iterations: 16,
            penetration_epsilon: 1e-4,
        }
    }
}

/// Fixed record capacities for one engine's buffers.
///
/// Device storage is allocated once from these limits; an upload that does
/// not fit fails with a capacity error instead of growing or truncating.
/// Growing means building a new engine with larger capacities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferCapacities {
    pub max_bodies: usize,
    pub max_parts: usize,
    pub max_collections: usize,
    pub max_lines: usize,
    pub max_pairs: usize,
    pub max_hits: usize,
}

impl Default for BufferCapacities {
    fn default() -> Self {
        Self {
            max_bodies: 1024,
            max_parts: 4096,
            max_collections: 1024,
            max_lines: 4096,
            max_pairs: 256,
            max_hits: 4096,
        }
    }
}
