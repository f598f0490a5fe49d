// Copyright 2025 Gravity Engine Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! GPU force back-end. One compute-shader invocation per body, summing that
//! body's force from every other body in a single dispatch — the original
//! accelerator's one-thread-per-target-body design, ported from an OpenCL
//! kernel to WGSL so it runs on any `wgpu`-supported driver.
//!
//! Positions and masses are downcast to `f32` before upload: WGSL has no
//! portable `f64` support, and the original accelerator this is grounded on
//! used `float` buffers for the same reason. Forces are upcast back to `f64`
//! on readback, so a GPU-backed simulation trades some precision for
//! throughput relative to the scalar and SIMD back-ends.
//!
//! Collision detection has no GPU kernel in the original design either, so
//! this back-end reuses the same sequential scan every other back-end falls
//! back on for it.

use std::sync::Mutex;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{collisions_sequential_range, CollisionPair, ForceBackend};
use crate::error::{EngineError, Result};
use crate::store::BodyStore;
use crate::vector::Vec2;

const FORCE_SHADER: &str = include_str!("force_kernel.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Params {
    count: u32,
    g: f32,
    _pad: [u32; 2],
}

/// Force back-end dispatching the O(n^2) gravity kernel on the GPU.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    // wgpu::Queue::submit takes &self, but keeping a single in-flight
    // dispatch at a time keeps the readback logic simple.
    _serialize: Mutex<()>,
}

impl GpuBackend {
    /// Requests an adapter/device and compiles the force kernel. Fails if no
    /// suitable GPU is available, matching the original accelerator's
    /// fail-fast behavior when no OpenCL platform can be found.
    pub fn try_new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or_else(|| EngineError::BackendUnavailable {
            reason: "no wgpu adapter available".to_string(),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gravity-engine-gpu-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))
        .map_err(|e| EngineError::BackendUnavailable {
            reason: e.to_string(),
        })?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gravity-force-kernel"),
            source: wgpu::ShaderSource::Wgsl(FORCE_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gravity-force-bind-group-layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, false),
                storage_entry(4, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gravity-force-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("gravity-force-pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main",
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            _serialize: Mutex::new(()),
        })
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ForceBackend for GpuBackend {
    fn name(&self) -> &str {
        "gpu"
    }

    fn forces(&self, store: &BodyStore) -> Vec<Vec2> {
        let n = store.len();
        if n == 0 {
            return Vec::new();
        }
        let _guard = self._serialize.lock().unwrap();

        let x: Vec<f32> = store.x().iter().map(|&v| v as f32).collect();
        let y: Vec<f32> = store.y().iter().map(|&v| v as f32).collect();
        let mass: Vec<f32> = store.mass().iter().map(|&v| v as f32).collect();

        let x_buf = self.upload(&x, "x");
        let y_buf = self.upload(&y, "y");
        let mass_buf = self.upload(&mass, "mass");

        let out_bytes = (n * std::mem::size_of::<f32>()) as u64;
        let fx_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fx"),
            size: out_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let fy_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fy"),
            size: out_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let params = Params {
            count: n as u32,
            g: super::G as f32,
            _pad: [0; 2],
        };
        let params_buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gravity-force-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: x_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: y_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: mass_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: fx_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 4, resource: fy_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 5, resource: params_buf.as_entire_binding() },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("gravity-force-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let workgroups = (n as u32).div_ceil(64);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }

        let fx_staging = self.staging_buffer(out_bytes, "fx-staging");
        let fy_staging = self.staging_buffer(out_bytes, "fy-staging");
        encoder.copy_buffer_to_buffer(&fx_buf, 0, &fx_staging, 0, out_bytes);
        encoder.copy_buffer_to_buffer(&fy_buf, 0, &fy_staging, 0, out_bytes);
        self.queue.submit(Some(encoder.finish()));

        let fx: Vec<f32> = self.read_back(&fx_staging, n);
        let fy: Vec<f32> = self.read_back(&fy_staging, n);

        fx.into_iter()
            .zip(fy)
            .map(|(fx, fy)| Vec2::new(fx as f64, fy as f64))
            .collect()
    }

    fn collisions(&self, store: &BodyStore) -> Vec<CollisionPair> {
        collisions_sequential_range(store, 0..store.len())
    }
}

impl GpuBackend {
    fn upload(&self, data: &[f32], label: &str) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn staging_buffer(&self, size: u64, label: &str) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn read_back(&self, buffer: &wgpu::Buffer, n: usize) -> Vec<f32> {
        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv().unwrap().unwrap();
        let data = slice.get_mapped_range();
        let values: Vec<f32> = bytemuck::cast_slice(&data)[..n].to_vec();
        drop(data);
        buffer.unmap();
        values
    }
}
