use anyhow::{Result, bail};
use wgpu::util::DeviceExt;

use crate::coords::Mat4;
use crate::render::{RenderCtx, RenderTarget};

use super::batch::{INDEX_CAPACITY_FACTOR, Topology, Vertex};
use super::context::{Draw2dConfig, GeometrySink};

/// GPU half of the draw layer: two pipelines (triangles, lines) over one
/// shader, one projection uniform, and a fixed vertex/index buffer pair per
/// topology. All resources are created up front from the same
/// [`Draw2dConfig`] that sizes the CPU batches.
pub struct GeometryRenderer {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    projection_ubo: wgpu::Buffer,
    triangles: TopologyBuffers,
    lines: TopologyBuffers,
}

impl GeometryRenderer {
    /// Builds the pipelines and buffers eagerly.
    ///
    /// The whole setup runs under a validation error scope, so a rejected
    /// shader or descriptor surfaces here as an `Err` instead of a later
    /// uncaptured-error panic.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &Draw2dConfig,
    ) -> Result<Self> {
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scrawl draw2d shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw2d.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scrawl draw2d bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<Mat4>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let projection_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scrawl draw2d projection ubo"),
            contents: bytemuck::bytes_of(&Mat4::IDENTITY),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scrawl draw2d bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scrawl draw2d pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let triangle_pipeline =
            build_pipeline(device, &pipeline_layout, &shader, surface_format, Topology::Triangles);
        let line_pipeline =
            build_pipeline(device, &pipeline_layout, &shader, surface_format, Topology::Lines);

        let triangles = TopologyBuffers::new(device, Topology::Triangles, config);
        let lines = TopologyBuffers::new(device, Topology::Lines, config);

        if let Some(err) = pollster::block_on(scope.pop()) {
            bail!("draw2d pipeline setup failed validation: {err}");
        }

        Ok(Self { triangle_pipeline, line_pipeline, bind_group, projection_ubo, triangles, lines })
    }

    /// Opens this frame's flush target. Hand it to
    /// [`Draw2d::end`](crate::draw::Draw2d::end), then call
    /// [`GeometryPass::finish`] to encode the draw.
    pub fn pass<'a, 'e>(
        &'a self,
        ctx: &RenderCtx<'a>,
        target: &'a mut RenderTarget<'e>,
    ) -> GeometryPass<'a> {
        GeometryPass {
            renderer: self,
            queue: ctx.queue,
            encoder: &mut *target.encoder,
            color_view: target.color_view,
            pending_triangles: None,
            pending_lines: None,
        }
    }

    fn buffers(&self, topology: Topology) -> &TopologyBuffers {
        match topology {
            Topology::Triangles => &self.triangles,
            Topology::Lines => &self.lines,
        }
    }
}

/// One frame's flush target.
///
/// Implements [`GeometrySink`] by uploading the live prefix of each submitted
/// batch, then [`finish`](Self::finish) encodes a single render pass drawing
/// whatever arrived. The pass loads the existing target contents, so clears
/// belong to whoever owns the frame.
pub struct GeometryPass<'a> {
    renderer: &'a GeometryRenderer,
    queue: &'a wgpu::Queue,
    encoder: &'a mut wgpu::CommandEncoder,
    color_view: &'a wgpu::TextureView,
    pending_triangles: Option<u32>,
    pending_lines: Option<u32>,
}

impl GeometryPass<'_> {
    /// Encodes the render pass. When nothing was submitted no pass is encoded
    /// at all, so an empty frame costs nothing.
    pub fn finish(self) {
        if self.pending_triangles.is_none() && self.pending_lines.is_none() {
            return;
        }

        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scrawl draw2d pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &self.renderer.bind_group, &[]);

        if let Some(count) = self.pending_triangles {
            let buffers = &self.renderer.triangles;
            rpass.set_pipeline(&self.renderer.triangle_pipeline);
            rpass.set_vertex_buffer(0, buffers.vertices.slice(..));
            rpass.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..count, 0, 0..1);
        }

        if let Some(count) = self.pending_lines {
            let buffers = &self.renderer.lines;
            rpass.set_pipeline(&self.renderer.line_pipeline);
            rpass.set_vertex_buffer(0, buffers.vertices.slice(..));
            rpass.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..count, 0, 0..1);
        }
    }
}

impl GeometrySink for GeometryPass<'_> {
    fn set_projection(&mut self, projection: Mat4) {
        self.queue.write_buffer(&self.renderer.projection_ubo, 0, bytemuck::bytes_of(&projection));
    }

    fn submit(&mut self, topology: Topology, vertices: &[Vertex], indices: &[u32]) {
        let buffers = self.renderer.buffers(topology);
        // Context batches and GPU buffers are sized from the same config; a
        // larger slice means the two went out of sync. Clamp rather than trip
        // buffer validation in release builds.
        debug_assert!(vertices.len() <= buffers.vertex_capacity);
        debug_assert!(indices.len() <= buffers.index_capacity);
        let vertices = &vertices[..vertices.len().min(buffers.vertex_capacity)];
        let indices = &indices[..indices.len().min(buffers.index_capacity)];

        self.queue.write_buffer(&buffers.vertices, 0, bytemuck::cast_slice(vertices));
        self.queue.write_buffer(&buffers.indices, 0, bytemuck::cast_slice(indices));

        let count = Some(indices.len() as u32);
        match topology {
            Topology::Triangles => self.pending_triangles = count,
            Topology::Lines => self.pending_lines = count,
        }
    }
}

struct TopologyBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl TopologyBuffers {
    fn new(device: &wgpu::Device, topology: Topology, config: &Draw2dConfig) -> Self {
        let (vbo_label, ibo_label) = match topology {
            Topology::Triangles => ("scrawl draw2d triangle vbo", "scrawl draw2d triangle ibo"),
            Topology::Lines => ("scrawl draw2d line vbo", "scrawl draw2d line ibo"),
        };
        let vertex_capacity = config.max_vertices;
        let index_capacity = config.max_vertices * INDEX_CAPACITY_FACTOR;

        let vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(vbo_label),
            size: (vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(ibo_label),
            size: (index_capacity * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { vertices, indices, vertex_capacity, index_capacity }
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    topology: Topology,
) -> wgpu::RenderPipeline {
    let label = match topology {
        Topology::Triangles => "scrawl draw2d triangle pipeline",
        Topology::Lines => "scrawl draw2d line pipeline",
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: topology.to_wgpu(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
