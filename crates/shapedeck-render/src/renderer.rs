//! wgpu backend: uploads staged meshes and draws the preview pass.

use crate::mesh::{MeshData, Vertex};
use crate::scene::PreviewScene;
use bytemuck::{Pod, Zeroable};
use thiserror::Error;
use wgpu::util::DeviceExt;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Ambient light strength (the rest of the shading is the point light).
const AMBIENT: f32 = 0.25;

/// Camera and light uniforms, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

/// Per-mesh model matrix, fed through an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
}

/// Triangle mesh uploaded to the GPU.
struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, data: &MeshData) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("preview mesh vertices"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("preview mesh indices"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buf,
            index_buf,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Draws a [`PreviewScene`]: one pipeline, a depth buffer, camera/light
/// uniforms, and the currently uploaded mesh set.
///
/// [`rebuild`](Self::rebuild) releases every previously uploaded mesh
/// before uploading the new scene, so a scene swap never accumulates GPU
/// resources. Dropping the renderer releases everything.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buf: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    depth_view: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
    instance_buf: Option<wgpu::Buffer>,
    instance_capacity: usize,
    meshes: Vec<GpuMesh>,
}

impl MeshRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("preview mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("preview globals layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("preview globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("preview globals bind group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("preview pipeline layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4
            ],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("preview mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[vertex_layout, instance_layout],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Solid primitives occlude themselves through the depth
                // buffer; skipping culling sidesteps winding concerns.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            globals_buf,
            globals_bind_group,
            depth_view: None,
            depth_size: (0, 0),
            instance_buf: None,
            instance_capacity: 0,
            meshes: Vec::new(),
        }
    }

    /// Number of meshes currently uploaded.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Tear down the previous mesh set and upload the scene's meshes.
    pub fn rebuild(&mut self, device: &wgpu::Device, scene: &PreviewScene) {
        self.meshes.clear();
        for staged in &scene.staged {
            let data = MeshData::from_geometry(&staged.geometry);
            self.meshes.push(GpuMesh::upload(device, &data));
        }
        log::debug!("Preview scene rebuilt with {} mesh(es)", self.meshes.len());
    }

    fn ensure_depth(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if self.depth_view.is_some() && self.depth_size == size {
            return;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("preview depth"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        self.depth_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.depth_size = size;
    }

    fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &PreviewScene,
    ) {
        let instances: Vec<InstanceRaw> = scene
            .staged
            .iter()
            .map(|s| InstanceRaw {
                model: s.model_matrix().to_cols_array_2d(),
            })
            .collect();
        if instances.is_empty() {
            return;
        }

        if self.instance_buf.is_none() || self.instance_capacity < instances.len() {
            self.instance_buf = Some(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("preview instances"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                },
            ));
            self.instance_capacity = instances.len();
        } else if let Some(buf) = &self.instance_buf {
            queue.write_buffer(buf, 0, bytemuck::cast_slice(&instances));
        }
    }

    /// Record and submit one preview pass into `target`.
    ///
    /// Clears color and depth, then draws each uploaded mesh with its
    /// staged model matrix. The caller is responsible for having called
    /// [`rebuild`](Self::rebuild) whenever the scene's shape set changed.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        viewport: (u32, u32),
        scene: &PreviewScene,
        clear_color: wgpu::Color,
    ) -> Result<(), RendererError> {
        if self.meshes.len() != scene.staged.len() {
            return Err(RendererError::RenderFailed(format!(
                "scene has {} mesh(es) but {} are uploaded; rebuild first",
                scene.staged.len(),
                self.meshes.len()
            )));
        }

        self.ensure_depth(device, viewport);
        self.write_instances(device, queue, scene);

        let aspect = viewport.0 as f32 / viewport.1.max(1) as f32;
        let globals = Globals {
            view_proj: scene.camera.view_proj(aspect).to_cols_array_2d(),
            light_pos: [
                scene.light.position.x,
                scene.light.position.y,
                scene.light.position.z,
                1.0,
            ],
            light_color: [
                scene.light.color[0],
                scene.light.color[1],
                scene.light.color[2],
                AMBIENT,
            ],
        };
        queue.write_buffer(&self.globals_buf, 0, bytemuck::bytes_of(&globals));

        let depth_view = self
            .depth_view
            .as_ref()
            .ok_or_else(|| RendererError::RenderFailed("missing depth buffer".to_string()))?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("preview encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("preview pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            if let Some(instance_buf) = &self.instance_buf {
                pass.set_vertex_buffer(1, instance_buf.slice(..));
                for (i, mesh) in self.meshes.iter().enumerate() {
                    let i = i as u32;
                    pass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                    pass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, i..i + 1);
                }
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
