//! GPU Buffer Set for Batched Collision
//!
//! One fixed-capacity allocation per record kind, created once and reused
//! across dispatches. Uploads overwrite from slot zero; capacities come from
//! [`BufferCapacities`] and overflows are caught during staging, before any
//! bytes move.
//!
//! ## Buffers
//! - `params`: per-dispatch uniform, rewritten before every submit
//! - `bodies` / `parts`: flattened body records
//! - `collections` / `lines`: flattened line collection records
//! - `pairs`: exempted (body, collection) combinations
//! - `hits` + `hit_count`: append output of the detection kernels
//! - `resolutions`: fixed-size output of the resolve kernel
//! - `restricted_lengths`: one f32 per line slot, written by the restrict kernel
//! - `readback`: MAP_READ staging shared by every result copy

use crate::collision::config::BufferCapacities;
use crate::collision::records::{
    BodyPartRecord, BodyRecord, DispatchParams, HitRecord, LineCollectionRecord, LineRecord,
    PairRecord, ResolutionRecord,
};

/// Byte offset of the record payload in the readback buffer. The leading
/// bytes hold the hit counter for the detection kernels.
pub const READBACK_HEADER: u64 = 8;

pub struct CollisionBuffers {
    pub params: wgpu::Buffer,
    pub bodies: wgpu::Buffer,
    pub parts: wgpu::Buffer,
    pub collections: wgpu::Buffer,
    pub lines: wgpu::Buffer,
    pub pairs: wgpu::Buffer,
    pub hits: wgpu::Buffer,
    pub hit_count: wgpu::Buffer,
    pub resolutions: wgpu::Buffer,
    pub restricted_lengths: wgpu::Buffer,
    pub readback: wgpu::Buffer,
}

impl CollisionBuffers {
    pub fn new(device: &wgpu::Device, capacities: &BufferCapacities) -> Self {
        // A capacity of zero still allocates one record; wgpu rejects
        // zero-sized bindings.
        let body_count = capacities.max_bodies.max(1) as u64;
        let part_count = capacities.max_parts.max(1) as u64;
        let collection_count = capacities.max_collections.max(1) as u64;
        let line_count = capacities.max_lines.max(1) as u64;
        let pair_count = capacities.max_pairs.max(1) as u64;
        let hit_count_cap = capacities.max_hits.max(1) as u64;

        let body_bytes = body_count * std::mem::size_of::<BodyRecord>() as u64;
        let part_bytes = part_count * std::mem::size_of::<BodyPartRecord>() as u64;
        let collection_bytes =
            collection_count * std::mem::size_of::<LineCollectionRecord>() as u64;
        let line_bytes = line_count * std::mem::size_of::<LineRecord>() as u64;
        let pair_bytes = pair_count * std::mem::size_of::<PairRecord>() as u64;
        let hit_bytes = hit_count_cap * std::mem::size_of::<HitRecord>() as u64;
        let resolution_bytes = body_count * std::mem::size_of::<ResolutionRecord>() as u64;
        let restricted_bytes = line_count * std::mem::size_of::<f32>() as u64;

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dispatch Params Uniform"),
            size: std::mem::size_of::<DispatchParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bodies = Self::create_storage_buffer(device, body_bytes, "Body Records");
        let parts = Self::create_storage_buffer(device, part_bytes, "Body Part Records");
        let collections =
            Self::create_storage_buffer(device, collection_bytes, "Line Collection Records");
        let lines = Self::create_storage_buffer(device, line_bytes, "Line Records");
        let pairs = Self::create_storage_buffer(device, pair_bytes, "Pair Records");
        let hits = Self::create_storage_buffer(device, hit_bytes, "Hit Records");
        let hit_count = Self::create_storage_buffer(device, 4, "Hit Counter");
        let resolutions = Self::create_storage_buffer(device, resolution_bytes, "Resolutions");
        let restricted_lengths =
            Self::create_storage_buffer(device, restricted_bytes, "Restricted Lengths");

        // Large enough for the biggest single result region plus the header.
        let result_bytes = hit_bytes
            .max(resolution_bytes)
            .max(restricted_bytes)
            .max(collection_bytes);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Collision Readback"),
            size: READBACK_HEADER + result_bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            params,
            bodies,
            parts,
            collections,
            lines,
            pairs,
            hits,
            hit_count,
            resolutions,
            restricted_lengths,
            readback,
        }
    }

    pub fn write_params(&self, queue: &wgpu::Queue, params: &DispatchParams) {
        queue.write_buffer(&self.params, 0, bytemuck::bytes_of(params));
    }

    pub fn write_bodies(
        &self,
        queue: &wgpu::Queue,
        records: &[BodyRecord],
        parts: &[BodyPartRecord],
    ) {
        if !records.is_empty() {
            queue.write_buffer(&self.bodies, 0, bytemuck::cast_slice(records));
        }
        if !parts.is_empty() {
            queue.write_buffer(&self.parts, 0, bytemuck::cast_slice(parts));
        }
    }

    pub fn write_lines(
        &self,
        queue: &wgpu::Queue,
        records: &[LineCollectionRecord],
        lines: &[LineRecord],
    ) {
        if !records.is_empty() {
            queue.write_buffer(&self.collections, 0, bytemuck::cast_slice(records));
        }
        if !lines.is_empty() {
            queue.write_buffer(&self.lines, 0, bytemuck::cast_slice(lines));
        }
    }

    pub fn write_pairs(&self, queue: &wgpu::Queue, pairs: &[PairRecord]) {
        if !pairs.is_empty() {
            queue.write_buffer(&self.pairs, 0, bytemuck::cast_slice(pairs));
        }
    }

    /// Create a storage buffer with optimal settings for compute shaders
    fn create_storage_buffer(device: &wgpu::Device, size: u64, label: &str) -> wgpu::Buffer {
        // Align size to 16-byte boundary for GPU compatibility
        let aligned_size = (size + 15) & !15;

        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: aligned_size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}
