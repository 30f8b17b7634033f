//! GPU side of a linked shader program
//!
//! Turns a [`LinkedProgram`] into wgpu shader modules and a render pipeline,
//! plus the uniform buffer that carries the background color.

use std::borrow::Cow;

use tracing::{info, warn};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPass, RenderPipeline, TextureFormat};

use super::quad::Vertex;
use crate::app::shader_system::{CompiledShader, LinkedProgram, ShaderError};

/// Bind group and binding of the fragment stage's uniform block
pub const UNIFORM_GROUP: u32 = 0;
pub const UNIFORM_BINDING: u32 = 0;

/// std140 image of `uniform FluidParameters { vec3 backgroundColor; }`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FluidUniforms {
    pub background_color: [f32; 3],
    _padding: f32,
}

impl FluidUniforms {
    pub fn new(background_color: [f32; 3]) -> Self {
        Self {
            background_color,
            _padding: 0.0,
        }
    }
}

/// Pipeline, shader modules and uniform storage for the quad
pub struct ShaderProgram {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
}

impl ShaderProgram {
    /// Creates the shader modules and pipeline
    ///
    /// Errors the device reports while creating a module are compile errors;
    /// errors while creating the pipeline are link errors.
    pub async fn new(
        device: &Device,
        format: TextureFormat,
        program: LinkedProgram,
    ) -> Result<Self, ShaderError> {
        if !program.has_uniform_block(UNIFORM_GROUP, UNIFORM_BINDING) {
            warn!(
                group = UNIFORM_GROUP,
                binding = UNIFORM_BINDING,
                "Shader program declares no backgroundColor uniform block; color changes will be ignored"
            );
        }

        let LinkedProgram {
            vertex,
            fragment,
            vertex_entry,
            fragment_entry,
        } = program;

        let vertex_module = create_module(device, vertex).await?;
        let fragment_module = create_module(device, fragment).await?;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fluid Uniform Buffer"),
            contents: bytemuck::bytes_of(&FluidUniforms::new([0.0; 3])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Fluid Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Fluid Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Fluid Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Fluid Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(vertex_entry.as_str()),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(fragment_entry.as_str()),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(ShaderError::Link {
                log: error.to_string(),
            });
        }

        info!("Shader program linked");

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
        })
    }

    /// Uploads the background color for the next draw
    pub fn set_background_color(&self, queue: &Queue, color: [f32; 3]) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&FluidUniforms::new(color)),
        );
    }

    /// Binds the pipeline and its uniforms
    pub fn bind(&self, rpass: &mut RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(UNIFORM_GROUP, &self.bind_group, &[]);
    }
}

async fn create_module(
    device: &Device,
    shader: CompiledShader,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let CompiledShader {
        stage, path, module, ..
    } = shader;

    let label = format!("{stage} shader ({})", path.display());

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label.as_str()),
        source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
    });

    match device.pop_error_scope().await {
        Some(error) => Err(ShaderError::Compile {
            stage,
            path,
            log: error.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_are_std140_sized() {
        assert_eq!(std::mem::size_of::<FluidUniforms>(), 16);
    }

    #[test]
    fn test_uniform_bytes_carry_color() {
        let uniforms = FluidUniforms::new([0.25, 0.5, 1.0]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(floats, &[0.25, 0.5, 1.0, 0.0]);
    }
}
