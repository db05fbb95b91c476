//! Headless GPU Context
//!
//! Owns the wgpu device and queue used for collision compute dispatch.
//! No surface or window is involved; the context talks to the first
//! high-performance adapter the instance offers.

use crate::collision::gpu::dispatch::BatchError;

/// Device and queue handle shared by every engine built on it.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquire an adapter and device for compute work.
    ///
    /// Fails when the host has no usable GPU, which callers treat as
    /// "run the scalar path instead".
    pub fn new() -> Result<Self, BatchError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        log::info!("collision compute adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Collision Compute Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))?;

        Ok(Self { device, queue })
    }

    /// Wrap an externally created device, for callers that already run wgpu.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }
}
