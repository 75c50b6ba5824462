//! GPU rendering for the cube scene.
//!
//! Handles all graphics resources using wgpu: the vertex buffer refreshed
//! wholesale from the CPU mirror each frame, an instance-rate color buffer
//! selecting one color per draw, the index buffer with its rewritable
//! highlight region, and one triangle plus one line pipeline sharing a
//! single shader.

use iced::widget::shader::wgpu::{self, CommandEncoder, Device, Queue, TextureFormat, TextureView};
use iced::{Rectangle, Size};
use wgpu::util::DeviceExt;

use crate::animation::VertexSink;
use crate::app::Highlight;
use crate::camera::ViewUniform;
use crate::cube::{
    self, BASE_INDICES, FACE_COLORS, FACE_COUNT, HIGHLIGHT_COLOR_SLOT, HIGHLIGHT_INDEX_OFFSET,
    INDEX_CAPACITY, MARKER_COLOR_SLOT, VERTEX_COUNT,
};

/// CPU-side mirror of the GPU vertex buffer. Every vertex mutation lands
/// here immediately and the whole array is uploaded next frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VertexMirror(pub(crate) [[f32; 3]; VERTEX_COUNT]);

impl VertexMirror {
    pub(crate) fn new(vertices: &[nalgebra::Point3<f32>]) -> Self {
        let mut mirror = Self([[0.0; 3]; VERTEX_COUNT]);
        mirror.write(vertices);
        mirror
    }
}

impl VertexSink for VertexMirror {
    fn write(&mut self, vertices: &[nalgebra::Point3<f32>]) {
        for (slot, v) in self.0.iter_mut().zip(vertices) {
            *slot = [v.x, v.y, v.z];
        }
    }
}

/// GPU renderer for the cube scene.
#[derive(Debug)]
pub(crate) struct Renderer {
    /// Bounds within the viewport to render to.
    bounds: Rectangle<f32>,
    /// Pipeline filling the six face quads
    triangle_pipeline: wgpu::RenderPipeline,
    /// Pipeline for the net marker and selection wireframes
    line_pipeline: wgpu::RenderPipeline,
    /// Buffer holding the 24 live vertex positions
    vertex_buffer: wgpu::Buffer,
    /// Instance-rate buffer of face and line colors
    color_buffer: wgpu::Buffer,
    /// Index buffer; the tail past the base indices is rewritten per frame
    index_buffer: wgpu::Buffer,
    /// Uniform buffer holding the model and projection-view matrices
    view_buffer: wgpu::Buffer,
    /// Bind group for the view uniform
    view_bind_group: wgpu::BindGroup,
    /// Depth texture for z-buffering the folded cube
    depth_texture: wgpu::Texture,
    /// Depth texture view for rendering
    depth_view: wgpu::TextureView,
    /// Size the depth texture was created with
    depth_size: Size<u32>,
    /// Wireframes to draw this frame
    highlight: Highlight,
}

impl Renderer {
    /// Creates a new renderer with initialized GPU resources.
    pub(crate) async fn new(
        device: &Device,
        format: TextureFormat,
        bounds: Rectangle<f32>,
        viewport_size: Size<u32>,
        vertices: &[[f32; 3]; VERTEX_COUNT],
    ) -> Self {
        let (depth_texture, depth_view) = create_depth_texture(device, viewport_size);

        let view_uniform = ViewUniform::new(1.0, false);
        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Buffer"),
            contents: bytemuck::cast_slice(&[view_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let view_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("View Bind Group Layout"),
            });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
            label: Some("View Bind Group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&view_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_state = wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                },
            ],
        };

        let fragment_state = wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        };

        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let triangle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Face Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: vertex_state.clone(),
            fragment: Some(fragment_state.clone()),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Quads flip winding as they fold, so nothing is culled.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: vertex_state,
            fragment: Some(fragment_state),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Color Buffer"),
            contents: bytemuck::cast_slice(&FACE_COLORS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut indices = [0u16; INDEX_CAPACITY];
        indices[..BASE_INDICES.len()].copy_from_slice(&BASE_INDICES);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            bounds,
            triangle_pipeline,
            line_pipeline,
            vertex_buffer,
            color_buffer,
            index_buffer,
            view_buffer,
            view_bind_group,
            depth_texture,
            depth_view,
            depth_size: viewport_size,
            highlight: Highlight::None,
        }
    }

    /// Tracks widget bounds and recreates the depth texture when the
    /// window surface changes size.
    pub(crate) fn resize(
        &mut self,
        device: &Device,
        new_bounds: Rectangle<f32>,
        new_size: Size<u32>,
    ) {
        if new_bounds.width > 0.0 && new_bounds.height > 0.0 {
            self.bounds = new_bounds;
        }
        if new_size != self.depth_size && new_size.width > 0 && new_size.height > 0 {
            let (texture, view) = create_depth_texture(device, new_size);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = new_size;
        }
    }

    /// Uploads the full CPU mirror; untouched vertices are re-sent
    /// byte-identical for simplicity.
    pub(crate) fn upload_vertices(&self, queue: &Queue, mirror: &VertexMirror) {
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mirror.0));
    }

    pub(crate) fn update_view(&self, queue: &Queue, uniform: &ViewUniform) {
        queue.write_buffer(&self.view_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Rewrites the highlight region of the index buffer with the selected
    /// faces' wireframes.
    pub(crate) fn update_highlight(&mut self, queue: &Queue, highlight: Highlight) {
        self.highlight = highlight;
        let mut ids: Vec<u16> = Vec::with_capacity(16);
        match highlight {
            Highlight::None => {}
            Highlight::One(face) => ids.extend_from_slice(&cube::wireframe_indices(face)),
            Highlight::Pair(first, second) => {
                ids.extend_from_slice(&cube::wireframe_indices(first));
                ids.extend_from_slice(&cube::wireframe_indices(second));
            }
        }
        if !ids.is_empty() {
            queue.write_buffer(
                &self.index_buffer,
                (HIGHLIGHT_INDEX_OFFSET * std::mem::size_of::<u16>()) as u64,
                bytemuck::cast_slice(&ids),
            );
        }
    }

    /// Draws the six faces, the net marker, and any selection wireframes
    /// within the widget bounds.
    pub(crate) fn render(&self, encoder: &mut CommandEncoder, target: &TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cube Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_viewport(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.bounds.height,
            0.0,
            1.0,
        );

        render_pass.set_bind_group(0, &self.view_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        render_pass.set_pipeline(&self.triangle_pipeline);
        for face in 0..FACE_COUNT as u32 {
            render_pass.draw_indexed(face * 6..face * 6 + 6, 0, face..face + 1);
        }

        render_pass.set_pipeline(&self.line_pipeline);
        render_pass.draw_indexed(36..38, 0, MARKER_COLOR_SLOT..MARKER_COLOR_SLOT + 1);

        let offset = HIGHLIGHT_INDEX_OFFSET as u32;
        let highlight_instance = HIGHLIGHT_COLOR_SLOT..HIGHLIGHT_COLOR_SLOT + 1;
        match self.highlight {
            Highlight::None => {}
            Highlight::One(_) => {
                render_pass.draw_indexed(offset..offset + 8, 0, highlight_instance);
            }
            Highlight::Pair(..) => {
                render_pass.draw_indexed(offset..offset + 16, 0, highlight_instance);
            }
        }
    }
}

fn create_depth_texture(
    device: &Device,
    size: Size<u32>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::NET_VERTICES;
    use nalgebra::Point3;

    #[test]
    fn mirror_tracks_writes() {
        let mut mirror = VertexMirror::new(&NET_VERTICES);
        assert_eq!(mirror.0[0], [-4.0, -1.0, 0.0]);

        let moved: Vec<Point3<f32>> = NET_VERTICES
            .iter()
            .map(|v| Point3::new(v.x + 1.0, v.y, v.z))
            .collect();
        mirror.write(&moved);
        assert_eq!(mirror.0[0], [-3.0, -1.0, 0.0]);
        assert_eq!(mirror.0[23], [3.0, 1.0, 0.0]);
    }
}
