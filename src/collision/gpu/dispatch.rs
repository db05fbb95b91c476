//! Batched Collision Dispatch
//!
//! The [`BatchCollisionEngine`] owns the device handles, pipelines, buffers
//! and staged uploads, and turns segment names into kernel dispatches.
//!
//! ## Operations
//! | Operation | Kernel | Grid | Result |
//! |-----------|--------|------|--------|
//! | `body_body_hits` | body_body_hits | a_len x b_len / 8x8 | sorted relative hit pairs |
//! | `resolve_bodies` | body_body_resolve | a_len / 64 | one translation per movable |
//! | `line_body_hits` | line_body_hits | a_len x b_len / 8x8 | sorted relative hit pairs |
//! | `restrict_lines` | line_restrict | a_len / 64 | clipped length per line |
//! | `increment_offsets` | offset_increment | a_len / 64 | none (in-place update) |
//!
//! Group arguments are segment names from the last upload; `None` means the
//! whole upload. Empty ranges are legal and return empty results without
//! touching the GPU. Detection results overflowing the hit capacity are an
//! error, never a silent truncation.

use glam::Vec2;
use thiserror::Error;

use crate::collision::config::{BufferCapacities, CollisionConfig};
use crate::collision::records::{
    DispatchParams, HitRecord, LineCollectionRecord, PairRecord, ResolutionRecord,
};
use crate::collision::scalar::HitPair;
use crate::collision::segments::{BodyArena, LineArena, SegmentError, SegmentRange};
use crate::geometry::body::Body;
use crate::geometry::line::LineCollection;

use super::buffers::{CollisionBuffers, READBACK_HEADER};
use super::context::GpuContext;
use super::pipelines::{CollisionBindGroups, CollisionPipelines};

/// Threads per axis of the pair-grid kernels. Must match the shaders'
/// @workgroup_size.
const PAIR_TILE: u32 = 8;
/// Threads per workgroup of the one-dimensional kernels.
const LINEAR_TILE: u32 = 64;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("readback mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("readback channel disconnected")]
    Disconnected,
    #[error("hit buffer overflow: {counted} hits counted, capacity {capacity}")]
    ResultOverflow { counted: u32, capacity: u32 },
    #[error(transparent)]
    Segment(#[from] SegmentError),
}

/// GPU collision engine over named buffer segments.
///
/// Uploads replace the previous staging wholesale; dispatches then select
/// groups by name. Every operation rewrites the shared params uniform or
/// readback buffer, so all of them take `&mut self`. All result reads are
/// blocking, so every operation returns finished data.
pub struct BatchCollisionEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipelines: CollisionPipelines,
    buffers: CollisionBuffers,
    bind_groups: CollisionBindGroups,
    bodies: BodyArena,
    lines: LineArena,
    capacities: BufferCapacities,
    config: CollisionConfig,
    pair_count: u32,
}

impl BatchCollisionEngine {
    pub fn new(context: &GpuContext, config: CollisionConfig, capacities: BufferCapacities) -> Self {
        let pipelines = CollisionPipelines::new(&context.device);
        let buffers = CollisionBuffers::new(&context.device, &capacities);
        let bind_groups = pipelines.create_bind_groups(&context.device, &buffers);

        log::info!(
            "collision engine ready: {} bodies, {} collections, {} hit capacity",
            capacities.max_bodies,
            capacities.max_collections,
            capacities.max_hits
        );

        Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
            pipelines,
            buffers,
            bind_groups,
            bodies: BodyArena::new(capacities.max_bodies, capacities.max_parts),
            lines: LineArena::new(capacities.max_collections, capacities.max_lines),
            capacities,
            config,
            pair_count: 0,
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Stage and upload named body groups, replacing the previous upload.
    pub fn upload_bodies(&mut self, groups: &[(&str, &[Body])]) -> Result<(), SegmentError> {
        self.bodies.stage(groups)?;
        self.buffers
            .write_bodies(&self.queue, self.bodies.records(), self.bodies.parts());
        Ok(())
    }

    /// Stage and upload named line collection groups, replacing the previous
    /// upload. Collection offsets later moved by [`Self::increment_offsets`]
    /// are reset to the staged values.
    pub fn upload_lines(&mut self, groups: &[(&str, &[LineCollection])]) -> Result<(), SegmentError> {
        self.lines.stage(groups)?;
        self.buffers
            .write_lines(&self.queue, self.lines.records(), self.lines.lines());
        Ok(())
    }

    /// Upload the exemption table for the line kernels.
    ///
    /// Indices in the records are relative to the groups named in the next
    /// line dispatch, so the table is rebuilt when those groups change.
    /// An empty slice clears the table.
    pub fn upload_pairs(&mut self, pairs: &[PairRecord]) -> Result<(), SegmentError> {
        if pairs.len() > self.capacities.max_pairs {
            return Err(SegmentError::Capacity {
                kind: "pair",
                needed: pairs.len(),
                capacity: self.capacities.max_pairs,
            });
        }
        self.buffers.write_pairs(&self.queue, pairs);
        self.pair_count = pairs.len() as u32;
        Ok(())
    }

    pub fn body_range(&self, name: Option<&str>) -> Result<SegmentRange, SegmentError> {
        self.bodies.range(name)
    }

    pub fn line_range(&self, name: Option<&str>) -> Result<SegmentRange, SegmentError> {
        self.lines.range(name)
    }

    // ========================================================================
    // Body Operations
    // ========================================================================

    /// Every overlapping (a, b) combination between two body groups.
    ///
    /// Pairs are relative to the dispatched ranges and sorted. When both
    /// groups are the same slots, a body is never tested against itself.
    pub fn body_body_hits(
        &mut self,
        group_a: Option<&str>,
        group_b: Option<&str>,
    ) -> Result<Vec<HitPair>, BatchError> {
        let a = self.bodies.range(group_a)?;
        let b = self.bodies.range(group_b)?;
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }

        self.push_params(DispatchParams {
            a_start: a.start,
            a_len: a.len,
            b_start: b.start,
            b_len: b.len,
            result_capacity: self.hit_capacity(),
            pair_count: 0,
            resolve_iterations: self.config.resolve_iterations,
            penetration_epsilon: self.config.penetration_epsilon,
        });
        self.run_hit_kernel(
            &self.pipelines.body_hits,
            &self.bind_groups.body_hits,
            "Body Hits",
            a.len,
            b.len,
        )
    }

    /// Translation that moves each body of `movable` out of the `obstacles`
    /// group, indexed by position in the movable range.
    ///
    /// Translations are computed against the uploaded offsets and are not
    /// applied to the buffers; callers fold them into their own state and
    /// re-upload.
    pub fn resolve_bodies(
        &mut self,
        movable: Option<&str>,
        obstacles: Option<&str>,
    ) -> Result<Vec<Vec2>, BatchError> {
        let a = self.bodies.range(movable)?;
        let b = self.bodies.range(obstacles)?;
        if a.is_empty() {
            return Ok(Vec::new());
        }
        if b.is_empty() {
            return Ok(vec![Vec2::ZERO; a.len as usize]);
        }

        self.push_params(DispatchParams {
            a_start: a.start,
            a_len: a.len,
            b_start: b.start,
            b_len: b.len,
            result_capacity: a.len,
            pair_count: 0,
            resolve_iterations: self.config.resolve_iterations,
            penetration_epsilon: self.config.penetration_epsilon,
        });

        let byte_len = a.len as u64 * std::mem::size_of::<ResolutionRecord>() as u64;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Body Resolve Encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Body Resolve"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipelines.body_resolve);
            compute_pass.set_bind_group(0, &self.bind_groups.body_resolve, &[]);
            compute_pass.dispatch_workgroups(grid(a.len, LINEAR_TILE), 1, 1);
        }
        encoder.copy_buffer_to_buffer(&self.buffers.resolutions, 0, &self.buffers.readback, 0, byte_len);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.with_mapped(byte_len, |bytes| {
            bytes
                .chunks_exact(std::mem::size_of::<ResolutionRecord>())
                .map(|chunk| {
                    bytemuck::pod_read_unaligned::<ResolutionRecord>(chunk).translation_vec()
                })
                .collect()
        })
    }

    // ========================================================================
    // Line Operations
    // ========================================================================

    /// Every (collection, body) combination where a line of the collection
    /// crosses an edge of the body, skipping combinations in the pair table.
    pub fn line_body_hits(
        &mut self,
        collections: Option<&str>,
        bodies: Option<&str>,
    ) -> Result<Vec<HitPair>, BatchError> {
        let a = self.lines.range(collections)?;
        let b = self.bodies.range(bodies)?;
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }

        self.push_params(DispatchParams {
            a_start: a.start,
            a_len: a.len,
            b_start: b.start,
            b_len: b.len,
            result_capacity: self.hit_capacity(),
            pair_count: self.pair_count,
            resolve_iterations: self.config.resolve_iterations,
            penetration_epsilon: self.config.penetration_epsilon,
        });
        self.run_hit_kernel(
            &self.pipelines.line_hits,
            &self.bind_groups.line_hits,
            "Line Hits",
            a.len,
            b.len,
        )
    }

    /// Clipped length for every line of every collection in the group,
    /// shaped as `result[collection][line]` in upload order.
    ///
    /// Unrestrictable lines report their effective length; paired bodies do
    /// not clip. Offsets moved by [`Self::increment_offsets`] are honored.
    pub fn restrict_lines(
        &mut self,
        collections: Option<&str>,
        obstacles: Option<&str>,
    ) -> Result<Vec<Vec<f32>>, BatchError> {
        let a = self.lines.range(collections)?;
        let b = self.bodies.range(obstacles)?;
        if a.is_empty() {
            return Ok(Vec::new());
        }
        let (span_start, span_len) = line_span(self.lines.records(), a);
        if span_len == 0 {
            return Ok(vec![Vec::new(); a.len as usize]);
        }

        self.push_params(DispatchParams {
            a_start: a.start,
            a_len: a.len,
            b_start: b.start,
            b_len: b.len,
            result_capacity: 0,
            pair_count: self.pair_count,
            resolve_iterations: self.config.resolve_iterations,
            penetration_epsilon: self.config.penetration_epsilon,
        });

        let byte_len = span_len as u64 * std::mem::size_of::<f32>() as u64;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Line Restrict Encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Line Restrict"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipelines.line_restrict);
            compute_pass.set_bind_group(0, &self.bind_groups.line_restrict, &[]);
            compute_pass.dispatch_workgroups(grid(a.len, LINEAR_TILE), 1, 1);
        }
        encoder.copy_buffer_to_buffer(
            &self.buffers.restricted_lengths,
            span_start as u64 * std::mem::size_of::<f32>() as u64,
            &self.buffers.readback,
            0,
            byte_len,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        self.with_mapped(byte_len, |bytes| {
            self.lines.records()[a.start as usize..a.end() as usize]
                .iter()
                .map(|record| {
                    let first = (record.line_start as u32 - span_start) as usize;
                    (0..record.line_len as usize)
                        .map(|l| {
                            let at = (first + l) * 4;
                            bytemuck::pod_read_unaligned::<f32>(&bytes[at..at + 4])
                        })
                        .collect()
                })
                .collect()
        })
    }

    /// Fold every collection's velocity-line displacement into its GPU-side
    /// offset. Collections without a velocity line are untouched.
    ///
    /// No readback is performed; queue ordering makes the update visible to
    /// every later dispatch.
    pub fn increment_offsets(&mut self, collections: Option<&str>) -> Result<(), BatchError> {
        let a = self.lines.range(collections)?;
        if a.is_empty() {
            return Ok(());
        }

        self.push_params(DispatchParams {
            a_start: a.start,
            a_len: a.len,
            b_start: 0,
            b_len: 0,
            result_capacity: 0,
            pair_count: 0,
            resolve_iterations: self.config.resolve_iterations,
            penetration_epsilon: self.config.penetration_epsilon,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offset Increment Encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Offset Increment"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipelines.offset_increment);
            compute_pass.set_bind_group(0, &self.bind_groups.offset_increment, &[]);
            compute_pass.dispatch_workgroups(grid(a.len, LINEAR_TILE), 1, 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Current GPU-side offset of every collection in the group, in upload
    /// order. Reflects any increments applied since the upload.
    pub fn read_collection_offsets(
        &mut self,
        collections: Option<&str>,
    ) -> Result<Vec<Vec2>, BatchError> {
        let a = self.lines.range(collections)?;
        if a.is_empty() {
            return Ok(Vec::new());
        }

        let record_size = std::mem::size_of::<LineCollectionRecord>() as u64;
        let byte_len = a.len as u64 * record_size;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Collection Offset Readback"),
            });
        encoder.copy_buffer_to_buffer(
            &self.buffers.collections,
            a.start as u64 * record_size,
            &self.buffers.readback,
            0,
            byte_len,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        self.with_mapped(byte_len, |bytes| {
            bytes
                .chunks_exact(record_size as usize)
                .map(|chunk| {
                    bytemuck::pod_read_unaligned::<LineCollectionRecord>(chunk).offset_vec()
                })
                .collect()
        })
    }

    // ========================================================================
    // Dispatch Internals
    // ========================================================================

    fn hit_capacity(&self) -> u32 {
        self.capacities.max_hits.max(1) as u32
    }

    fn push_params(&self, params: DispatchParams) {
        self.buffers.write_params(&self.queue, &params);
    }

    /// Clear the counter, run one detection kernel over an a x b grid, and
    /// read the appended hits back.
    fn run_hit_kernel(
        &self,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        label: &str,
        a_len: u32,
        b_len: u32,
    ) -> Result<Vec<HitPair>, BatchError> {
        let capacity = self.hit_capacity();
        let hit_bytes = capacity as u64 * std::mem::size_of::<HitRecord>() as u64;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        encoder.clear_buffer(&self.buffers.hit_count, 0, None);
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(pipeline);
            compute_pass.set_bind_group(0, bind_group, &[]);
            compute_pass.dispatch_workgroups(grid(a_len, PAIR_TILE), grid(b_len, PAIR_TILE), 1);
        }
        encoder.copy_buffer_to_buffer(&self.buffers.hit_count, 0, &self.buffers.readback, 0, 4);
        encoder.copy_buffer_to_buffer(
            &self.buffers.hits,
            0,
            &self.buffers.readback,
            READBACK_HEADER,
            hit_bytes,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        self.with_mapped(READBACK_HEADER + hit_bytes, |bytes| {
            decode_hits(bytes, capacity)
        })?
    }

    /// Map the readback buffer, hand the bytes to `read`, and unmap.
    fn with_mapped<R>(
        &self,
        byte_len: u64,
        read: impl FnOnce(&[u8]) -> R,
    ) -> Result<R, BatchError> {
        let slice = self.buffers.readback.slice(..byte_len);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::PollType::Wait)?;

        match rx.recv() {
            Ok(mapped) => {
                mapped?;
                let view = slice.get_mapped_range();
                let value = read(&view);
                drop(view);
                self.buffers.readback.unmap();
                Ok(value)
            }
            Err(_) => Err(BatchError::Disconnected),
        }
    }
}

fn grid(len: u32, tile: u32) -> u32 {
    (len + tile - 1) / tile
}

/// Absolute line slot span covered by a contiguous collection range.
fn line_span(records: &[LineCollectionRecord], range: SegmentRange) -> (u32, u32) {
    if range.is_empty() {
        return (0, 0);
    }
    let first = &records[range.start as usize];
    let last = &records[range.end() as usize - 1];
    let start = first.line_start as u32;
    (start, (last.line_start + last.line_len) as u32 - start)
}

/// Decode the counter-prefixed hit readback into sorted pairs.
fn decode_hits(bytes: &[u8], capacity: u32) -> Result<Vec<HitPair>, BatchError> {
    let counted = bytemuck::pod_read_unaligned::<u32>(&bytes[..4]);
    if counted > capacity {
        return Err(BatchError::ResultOverflow { counted, capacity });
    }

    let mut hits: Vec<HitPair> = bytes[READBACK_HEADER as usize..]
        .chunks_exact(std::mem::size_of::<HitRecord>())
        .take(counted as usize)
        .map(|chunk| {
            let record = bytemuck::pod_read_unaligned::<HitRecord>(chunk);
            HitPair {
                index_a: record.index_a as usize,
                index_b: record.index_b as usize,
            }
        })
        .collect();

    // GPU append order is nondeterministic; sort for stable results.
    hits.sort_unstable();
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::pairs::build_pair_table_with;
    use crate::collision::scalar::{
        detect_body_hits_st, detect_line_hits_st, resolve_bodies_st, restrict_collections_st,
    };
    use crate::geometry::body::BodyPart;
    use crate::geometry::line::Line;

    fn circle_body(x: f32, y: f32, radius: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y));
        body.push_part(BodyPart::circle(Vec2::ZERO, radius, 16));
        body
    }

    fn square_body(x: f32, y: f32, size: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y));
        body.push_part(BodyPart::rect(Vec2::ZERO, size, size, 0.0));
        body
    }

    fn test_engine(capacities: BufferCapacities) -> Option<BatchCollisionEngine> {
        let _ = env_logger::builder().is_test(true).try_init();
        let context = match GpuContext::new() {
            Ok(context) => context,
            Err(err) => {
                log::warn!("no GPU adapter available, skipping: {err}");
                return None;
            }
        };
        Some(BatchCollisionEngine::new(
            &context,
            CollisionConfig::default(),
            capacities,
        ))
    }

    #[test]
    fn test_detection_results_round_trip_through_the_buffers() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let group = vec![circle_body(0.0, 0.0, 2.0), circle_body(3.0, 0.0, 2.0)];
        engine.upload_bodies(&[("all", &group)]).unwrap();

        let hits = engine.body_body_hits(None, None).unwrap();
        assert_eq!(
            hits,
            vec![
                HitPair { index_a: 0, index_b: 1 },
                HitPair { index_a: 1, index_b: 0 },
            ]
        );
    }

    #[test]
    fn test_sequential_dispatches_reuse_the_params_uniform() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let rocks = vec![circle_body(0.0, 0.0, 2.0), circle_body(3.0, 0.0, 2.0)];
        let probes = vec![circle_body(2.0, 0.5, 1.0)];
        engine
            .upload_bodies(&[("rocks", &rocks), ("probes", &probes)])
            .unwrap();

        let first = engine.body_body_hits(Some("probes"), Some("rocks")).unwrap();
        // A dispatch over different ranges rewrites the shared uniform in
        // between; exclusive receivers serialize the rewrites.
        let full = engine.body_body_hits(None, None).unwrap();
        let second = engine.body_body_hits(Some("probes"), Some("rocks")).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
        assert!(full.len() >= first.len());
    }

    #[test]
    fn test_body_hits_match_the_scalar_reference() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let rocks = vec![
            circle_body(0.0, 0.0, 2.0),
            circle_body(3.0, 0.0, 2.0),
            square_body(20.0, 20.0, 2.0),
        ];
        let probes = vec![circle_body(2.0, 0.5, 1.0), square_body(10.0, 0.0, 2.0)];
        engine
            .upload_bodies(&[("rocks", &rocks), ("probes", &probes)])
            .unwrap();

        let gpu = engine
            .body_body_hits(Some("probes"), Some("rocks"))
            .unwrap();
        assert_eq!(gpu, detect_body_hits_st(&probes, &rocks));

        // Full-range self test skips the diagonal the same way the scalar
        // helper does.
        let mut all = rocks.clone();
        all.extend(probes.clone());
        let gpu_all = engine.body_body_hits(None, None).unwrap();
        assert_eq!(gpu_all, detect_body_hits_st(&all, &all));
    }

    #[test]
    fn test_resolve_matches_the_scalar_reference() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        // Rectangles keep the SAT arithmetic exact on both paths.
        let movers = vec![square_body(0.5, 1.6, 2.0), square_body(50.0, 50.0, 2.0)];
        let walls = vec![square_body(0.0, 0.0, 2.0), square_body(4.0, 0.0, 2.0)];
        engine
            .upload_bodies(&[("movers", &movers), ("walls", &walls)])
            .unwrap();

        let gpu = engine
            .resolve_bodies(Some("movers"), Some("walls"))
            .unwrap();
        let cpu = resolve_bodies_st(&movers, &walls, engine.config());

        assert_eq!(gpu.len(), cpu.len());
        for (gpu_push, cpu_push) in gpu.iter().zip(&cpu) {
            assert!((*gpu_push - *cpu_push).length() < 1e-4);
        }
        assert!((gpu[0] - Vec2::new(0.0, 0.4)).length() < 1e-4);
        assert_eq!(gpu[1], Vec2::ZERO);
    }

    #[test]
    fn test_line_ops_match_the_scalar_reference() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let walls = vec![square_body(0.0, 0.0, 2.0), square_body(8.0, 0.0, 2.0)];

        let mut crossing = LineCollection::new(Vec2::new(-6.0, 0.0));
        crossing.push_line(Line::directed(Vec2::ZERO, Vec2::X, 20.0));
        let mut plumb = LineCollection::new(Vec2::new(0.0, 6.0));
        plumb.push_line(Line::fixed(Vec2::ZERO, Vec2::new(0.0, -6.0)));
        let collections = vec![crossing, plumb];

        // The plumb collection belongs to the first wall, so that wall must
        // not clip or report it.
        let pairs = build_pair_table_with(walls.len(), collections.len(), |body, collection| {
            body == 0 && collection == 1
        });

        engine.upload_bodies(&[("walls", &walls)]).unwrap();
        engine.upload_lines(&[("all", &collections)]).unwrap();
        engine.upload_pairs(&pairs).unwrap();

        let gpu_hits = engine.line_body_hits(None, None).unwrap();
        assert_eq!(gpu_hits, detect_line_hits_st(&collections, &walls, &pairs));
        assert_eq!(
            gpu_hits,
            vec![
                HitPair { index_a: 0, index_b: 0 },
                HitPair { index_a: 0, index_b: 1 },
            ]
        );

        let gpu_lengths = engine.restrict_lines(None, None).unwrap();
        let cpu_lengths = restrict_collections_st(&collections, &walls, &pairs);
        assert_eq!(gpu_lengths.len(), cpu_lengths.len());
        for (gpu_collection, cpu_collection) in gpu_lengths.iter().zip(&cpu_lengths) {
            assert_eq!(gpu_collection.len(), cpu_collection.len());
            for (gpu_length, cpu_length) in gpu_collection.iter().zip(cpu_collection) {
                assert!((gpu_length - cpu_length).abs() < 1e-3);
            }
        }
        assert!((gpu_lengths[0][0] - 5.0).abs() < 1e-3);
        assert!((gpu_lengths[1][0] - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_offset_increments_accumulate_on_the_gpu() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let mut mover = LineCollection::new(Vec2::new(1.0, 0.0));
        let index = mover.push_line(Line::directed(Vec2::ZERO, Vec2::Y, 2.0));
        mover.velocity_line = Some(index);
        let mut still = LineCollection::new(Vec2::new(-3.0, -3.0));
        still.push_line(Line::directed(Vec2::ZERO, Vec2::X, 1.0));
        let collections = vec![mover, still];

        engine.upload_lines(&[("all", &collections)]).unwrap();
        engine.upload_pairs(&[]).unwrap();
        engine.increment_offsets(None).unwrap();
        engine.increment_offsets(None).unwrap();

        let offsets = engine.read_collection_offsets(None).unwrap();
        assert!((offsets[0] - Vec2::new(1.0, 4.0)).length() < 1e-5);
        assert!((offsets[1] - Vec2::new(-3.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_hit_overflow_reports_the_counted_size() {
        let capacities = BufferCapacities {
            max_hits: 1,
            ..Default::default()
        };
        let Some(mut engine) = test_engine(capacities) else {
            return;
        };
        let group = vec![
            circle_body(0.0, 0.0, 2.0),
            circle_body(1.0, 0.0, 2.0),
            circle_body(2.0, 0.0, 2.0),
        ];
        engine.upload_bodies(&[("all", &group)]).unwrap();

        // Every ordered combination of the three circles hits.
        let err = engine.body_body_hits(None, None).unwrap_err();
        match err {
            BatchError::ResultOverflow { counted, capacity } => {
                assert_eq!(counted, 6);
                assert_eq!(capacity, 1);
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_segments_are_quiet_noops() {
        let Some(mut engine) = test_engine(BufferCapacities::default()) else {
            return;
        };
        let solo = vec![circle_body(0.0, 0.0, 1.0)];
        let none: Vec<Body> = Vec::new();
        engine
            .upload_bodies(&[("solo", &solo), ("none", &none)])
            .unwrap();

        assert_eq!(
            engine.body_body_hits(Some("none"), Some("solo")).unwrap(),
            Vec::new()
        );
        assert_eq!(
            engine.resolve_bodies(Some("none"), Some("solo")).unwrap(),
            Vec::<Vec2>::new()
        );

        let err = engine.body_body_hits(Some("missing"), None).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Segment(SegmentError::UnknownSegment(_))
        ));

        // No line upload has happened yet.
        let err = engine.line_body_hits(None, None).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Segment(SegmentError::NothingUploaded)
        ));
    }
}
