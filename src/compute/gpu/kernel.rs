//! Quantization compute pipeline and per-image dispatch.
//!
//! The shader reads the source image as packed u32 words, so the host pads
//! the byte buffer to a multiple of four. Each output pixel is one u32
//! holding a palette color in its low three bytes.

use std::time::Instant;

use intensity_quant::{Color, PixelImage, QuantLevel, REFERENCE_PALETTE};
use wgpu::util::DeviceExt;

use super::device::GpuContext;
use crate::compute::Dispatch;
use crate::error::BenchError;
use crate::models::Workgroup;

const SHADER_SRC: &str = include_str!("../../shaders/quantize.wgsl");

/// Uniform block matching `Params` in `quantize.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelParams {
    pub width: u32,
    pub height: u32,
    pub levels: u32,
    pub _pad: u32,
}

/// Compiled quantization kernel plus its bind group layout.
pub struct QuantizePipeline {
    pipeline: wgpu::ComputePipeline,
    bgl: wgpu::BindGroupLayout,
    workgroup: Workgroup,
}

impl QuantizePipeline {
    /// Compile the kernel for the given workgroup shape.
    ///
    /// Shader validation errors are captured through an error scope and
    /// reported as a device error for the "compile kernel" step, with the
    /// compiler's diagnostic text as the detail.
    pub async fn new(gpu: &GpuContext, workgroup: Workgroup) -> Result<Self, BenchError> {
        let src = shader_source(workgroup);

        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("quantize"),
                source: wgpu::ShaderSource::Wgsl(src.into()),
            });
        if let Some(err) = gpu.device.pop_error_scope().await {
            tracing::error!("Kernel build log:\n{err}");
            return Err(BenchError::device("compile kernel", err));
        }

        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bgl = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quantize_bgl"),
                entries: &[
                    storage(0, true),
                    storage(1, false),
                    storage(2, true),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
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

        let layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quantize_layout"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            });

        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = gpu
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("quantize"),
                layout: Some(&layout),
                module: &shader,
                entry_point: "quantize",
                compilation_options: Default::default(),
                cache: None,
            });
        if let Some(err) = gpu.device.pop_error_scope().await {
            tracing::error!("Kernel build log:\n{err}");
            return Err(BenchError::device("compile kernel", err));
        }

        tracing::debug!(%workgroup, "Compiled quantize kernel");
        Ok(Self {
            pipeline,
            bgl,
            workgroup,
        })
    }

    /// Quantize one image on the device.
    ///
    /// `kernel_time` covers the compute submission up to its completion.
    /// Uploads are flushed before the clock starts and readback happens
    /// after it stops.
    pub async fn run(
        &self,
        gpu: &GpuContext,
        image: &PixelImage,
        level: QuantLevel,
    ) -> Result<Dispatch, BenchError> {
        let width = image.width() as u32;
        let height = image.height() as u32;
        let src_words = pack_pixels(image.as_bytes());
        let src_size = (src_words.len() * 4) as u64;
        let dst_size = (image.pixel_count() * 4) as u64;

        let max_binding = gpu.limits.max_storage_buffer_binding_size as u64;
        if src_size > max_binding || dst_size > max_binding {
            return Err(BenchError::device(
                "allocate buffers",
                format!(
                    "{width}x{height} image needs {} bytes per binding, device allows {max_binding}",
                    src_size.max(dst_size)
                ),
            ));
        }

        let (wg_x, wg_y) = self.workgroup.dispatch_size(width, height);
        let max_groups = gpu.limits.max_compute_workgroups_per_dimension;
        if wg_x > max_groups || wg_y > max_groups {
            return Err(BenchError::device(
                "dispatch kernel",
                format!("{wg_x}x{wg_y} workgroups exceed the per-dimension limit {max_groups}"),
            ));
        }

        gpu.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let src_buf = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quantize_src"),
                contents: bytemuck::cast_slice(&src_words),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let dst_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quantize_dst"),
            size: dst_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let palette_words: Vec<u32> = REFERENCE_PALETTE.iter().map(pack_color).collect();
        let palette_buf = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quantize_palette"),
                contents: bytemuck::cast_slice(&palette_words),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let params = KernelParams {
            width,
            height,
            levels: level.get() as u32,
            _pad: 0,
        };
        let params_buf = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quantize_params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let readback_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quantize_readback"),
            size: dst_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quantize_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: src_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: dst_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: palette_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buf.as_entire_binding(),
                },
            ],
        });

        // Flush the buffer uploads so they stay outside the timed window.
        gpu.queue.submit(std::iter::empty::<wgpu::CommandBuffer>());
        gpu.device.poll(wgpu::Maintain::Wait);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quantize"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("quantize"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(wg_x, wg_y, 1);
        }

        let start = Instant::now();
        let index = gpu.queue.submit(std::iter::once(encoder.finish()));
        gpu.device
            .poll(wgpu::Maintain::WaitForSubmissionIndex(index));
        let kernel_time = start.elapsed();

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quantize_copy"),
            });
        encoder.copy_buffer_to_buffer(&dst_buf, 0, &readback_buf, 0, dst_size);
        gpu.queue.submit(std::iter::once(encoder.finish()));

        // Both scopes are popped before either error is reported.
        let validation = gpu.device.pop_error_scope().await;
        let out_of_memory = gpu.device.pop_error_scope().await;
        scope_result(validation, out_of_memory)?;

        let words = read_back(gpu, &readback_buf)?;
        let bytes = unpack_colors(&words);
        let image = PixelImage::from_raw(image.width(), image.height(), bytes)
            .map_err(|e| BenchError::device("read back result", e))?;

        Ok(Dispatch { image, kernel_time })
    }
}

/// First error captured by the dispatch's validation and out-of-memory
/// scopes, validation first.
fn scope_result<E: ToString>(
    validation: Option<E>,
    out_of_memory: Option<E>,
) -> Result<(), BenchError> {
    if let Some(err) = validation {
        return Err(BenchError::device("dispatch kernel", err));
    }
    if let Some(err) = out_of_memory {
        return Err(BenchError::device("allocate buffers", err));
    }
    Ok(())
}

fn read_back(gpu: &GpuContext, buffer: &wgpu::Buffer) -> Result<Vec<u32>, BenchError> {
    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        // The receiver outlives the poll below, so a send failure cannot occur.
        let _ = tx.send(result);
    });
    gpu.device.poll(wgpu::Maintain::Wait);

    rx.recv()
        .map_err(|_| BenchError::device("read back result", "map callback never fired"))?
        .map_err(|e| BenchError::device("read back result", e))?;

    let words = {
        let mapped = slice.get_mapped_range();
        bytemuck::cast_slice::<u8, u32>(&mapped).to_vec()
    };
    buffer.unmap();
    Ok(words)
}

/// Substitute the workgroup dimensions into the shader template.
pub fn shader_source(workgroup: Workgroup) -> String {
    SHADER_SRC
        .replace("{{WG_X}}", &workgroup.x.to_string())
        .replace("{{WG_Y}}", &workgroup.y.to_string())
}

/// Pack a byte buffer into little-endian u32 words, zero-padding the tail.
pub fn pack_pixels(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

pub fn pack_color(color: Color) -> u32 {
    let [c0, c1, c2] = color.to_bytes();
    u32::from_le_bytes([c0, c1, c2, 0])
}

/// Expand one packed color per word back into 3-byte pixels.
pub fn unpack_colors(words: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 3);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes()[..3]);
    }
    bytes
}
