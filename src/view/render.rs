use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::model::light::{DIRECTIONAL_LAYER, SHADOW_LAYERS, SPOT_LAYER};
use crate::model::{Camera, Lights, Node, Scene};
use crate::utils::{MeshBuffer, Vertex};
use crate::view::{GpuContext, SceneRenderer};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SHADOW_NORMAL_OFFSET: f32 = 0.02;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

impl CameraUniform {
    fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
        }
    }
}

/// Mirrors `Lights` in scene.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LightsUniform {
    ambient: [f32; 4],
    dir_color: [f32; 4],
    dir_direction: [f32; 4],
    spot_color: [f32; 4],
    spot_position: [f32; 4],
    spot_direction: [f32; 4],
    spot_params: [f32; 4],
    point_color: [f32; 4],
    point_position: [f32; 4],
    point_params: [f32; 4],
    shadow_params: [f32; 4],
    shadow_view_proj: [[[f32; 4]; 4]; SHADOW_LAYERS],
}

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

impl LightsUniform {
    fn new(lights: &Lights, shadow_map_size: u32) -> Self {
        let (ambient, dir, spot, point) = (&lights.ambient, &lights.directional, &lights.spot, &lights.point);
        let penumbra_cos = (spot.angle * (1.0 - spot.penumbra)).cos();

        Self {
            ambient: (ambient.color * ambient.intensity).extend(1.0).to_array(),
            dir_color: (dir.color * dir.intensity).extend(flag(dir.cast_shadow)).to_array(),
            dir_direction: dir.direction().extend(0.0).to_array(),
            spot_color: (spot.color * spot.intensity).extend(flag(spot.cast_shadow)).to_array(),
            spot_position: spot.position.extend(spot.distance).to_array(),
            spot_direction: spot.direction().extend(spot.angle.cos()).to_array(),
            spot_params: [spot.decay, penumbra_cos, 0.0, 0.0],
            point_color: (point.color * point.intensity).extend(flag(point.cast_shadow)).to_array(),
            point_position: point.position.extend(point.distance).to_array(),
            point_params: [point.decay, 0.0, 0.0, 0.0],
            shadow_params: [1.0 / shadow_map_size.max(1) as f32, SHADOW_NORMAL_OFFSET, 0.0, 0.0],
            shadow_view_proj: lights.shadow_view_projs().map(|m| m.to_cols_array_2d()),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    material: [f32; 4],
}

impl ObjectUniform {
    fn new(node: &Node, scene: &Scene) -> Self {
        let [r, g, b] = scene.material.color;
        Self {
            model: node.model_matrix().to_cols_array_2d(),
            color: [r, g, b, flag(node.receive_shadow)],
            material: [scene.material.roughness, scene.material.metalness, 0.0, 0.0],
        }
    }
}

/// egui output for the next frame, drawn over the scene.
pub struct UiOverlay {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl UiOverlay {
    /// Fold in the texture changes of an overlay that was never drawn, older
    /// deltas first. egui sends the font atlas once, so none may be dropped.
    pub fn merge_pending(mut self, pending: Option<UiOverlay>) -> Self {
        if let Some(pending) = pending {
            let mut textures_delta = pending.textures_delta;
            textures_delta.append(std::mem::take(&mut self.textures_delta));
            self.textures_delta = textures_delta;
        }
        self
    }
}

struct DrawObject {
    mesh: MeshBuffer,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    cast_shadow: bool,
}

struct ShadowLayer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    view: wgpu::TextureView,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: Option<wgpu::TextureFormat>,
    depth_format: wgpu::TextureFormat,
    cull_mode: wgpu::Face,
    bias: wgpu::DepthBiasState,
) -> wgpu::RenderPipeline {
    let targets = [color_format.map(|format| wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: color_format.map(|_| wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(cull_mode),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// Draws the scene: one depth pass per shadow layer, the lit pass, then the
/// egui overlay.
pub struct Renderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    lit_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    shadow_layers: Vec<ShadowLayer>,
    objects: Vec<DrawObject>,
    shadow_map_size: u32,
    clear_color: wgpu::Color,
    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<UiOverlay>,
}

impl Renderer {
    pub fn new(gpu: GpuContext, scene: &Scene, shadow_map_size: u32, clear_color: wgpu::Color) -> Self {
        let device = gpu.device.as_ref();
        let shadow_map_size = shadow_map_size.clamp(1, device.limits().max_texture_dimension_2d);
        let (_, depth_view) = create_depth_texture(device, gpu.config.width, gpu.config.height);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lights_buffer"),
            size: std::mem::size_of::<LightsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: shadow_map_size,
                height: shadow_map_size,
                depth_or_array_layers: SHADOW_LAYERS as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_array_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("shadow_map_array"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let light_camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("light_camera_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &scene_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: lights_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&shadow_array_view) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&shadow_sampler) },
            ],
        });

        let shadow_layers = (0..SHADOW_LAYERS as u32)
            .map(|layer| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("light_camera_buffer"),
                    contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array_2d()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("light_camera_bind_group"),
                    layout: &light_camera_bgl,
                    entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
                });
                let view = shadow_texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("shadow_map_layer"),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                });
                ShadowLayer { buffer, bind_group, view }
            })
            .collect();

        let objects = scene
            .nodes()
            .into_iter()
            .map(|node| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("object_buffer"),
                    contents: bytemuck::bytes_of(&ObjectUniform::new(node, scene)),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("object_bind_group"),
                    layout: &object_bgl,
                    entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
                });
                DrawObject {
                    mesh: node.geometry.build().upload(device),
                    buffer,
                    bind_group,
                    cast_shadow: node.cast_shadow,
                }
            })
            .collect();

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shadow.wgsl").into()),
        });

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&scene_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pipeline_layout"),
            bind_group_layouts: &[&light_camera_bgl, &object_bgl],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_pipeline(
            device,
            "lit_pipeline",
            &lit_layout,
            &scene_shader,
            Some(gpu.format),
            DEPTH_FORMAT,
            wgpu::Face::Back,
            wgpu::DepthBiasState::default(),
        );
        let shadow_pipeline = create_pipeline(
            device,
            "shadow_pipeline",
            &shadow_layout,
            &shadow_shader,
            None,
            SHADOW_FORMAT,
            wgpu::Face::Front,
            wgpu::DepthBiasState { constant: 2, slope_scale: 2.0, clamp: 0.0 },
        );

        let egui_renderer = egui_wgpu::Renderer::new(device, gpu.format, egui_wgpu::RendererOptions::default());

        tracing::info!(shadow_map_size, layers = SHADOW_LAYERS, "renderer ready");

        Self {
            gpu,
            depth_view,
            lit_pipeline,
            shadow_pipeline,
            camera_buffer,
            lights_buffer,
            scene_bind_group,
            shadow_layers,
            objects,
            shadow_map_size,
            clear_color,
            egui_renderer,
            overlay: None,
        }
    }

    /// UI to draw on top of the next frame. Texture changes of an overlay a
    /// skipped frame never drew are carried into this one.
    pub fn set_overlay(&mut self, overlay: UiOverlay) {
        self.overlay = Some(overlay.merge_pending(self.overlay.take()));
    }

    fn write_uniforms(&self, scene: &Scene, camera: &Camera) {
        let queue = &self.gpu.queue;
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&CameraUniform::new(camera)));
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&LightsUniform::new(&scene.lights, self.shadow_map_size)),
        );
        for (object, node) in self.objects.iter().zip(scene.nodes()) {
            queue.write_buffer(&object.buffer, 0, bytemuck::bytes_of(&ObjectUniform::new(node, scene)));
        }
        for (layer, view_proj) in self.shadow_layers.iter().zip(scene.lights.shadow_view_projs()) {
            queue.write_buffer(&layer.buffer, 0, bytemuck::cast_slice(&view_proj.to_cols_array_2d()));
        }
    }

    fn layer_casts(lights: &Lights, layer: usize) -> bool {
        match layer {
            DIRECTIONAL_LAYER => lights.directional.cast_shadow,
            SPOT_LAYER => lights.spot.cast_shadow,
            _ => lights.point.cast_shadow,
        }
    }

    fn shadow_passes(&self, encoder: &mut wgpu::CommandEncoder, lights: &Lights) {
        for (i, layer) in self.shadow_layers.iter().enumerate() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &layer.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // a cleared layer still has to exist for the sampler
            if !Self::layer_casts(lights, i) {
                continue;
            }

            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &layer.bind_group, &[]);
            for object in self.objects.iter().filter(|o| o.cast_shadow) {
                pass.set_bind_group(1, &object.bind_group, &[]);
                pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(object.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
            }
        }
    }
}

impl SceneRenderer for Renderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.write_uniforms(scene, camera);

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        self.shadow_passes(&mut encoder, &scene.lights);

        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
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

            rp.set_pipeline(&self.lit_pipeline);
            rp.set_bind_group(0, &self.scene_bind_group, &[]);
            for object in &self.objects {
                rp.set_bind_group(1, &object.bind_group, &[]);
                rp.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(object.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rp.draw_indexed(0..object.mesh.index_count, 0, 0..1);
            }
        }

        let mut ui_commands = Vec::new();
        if let Some(overlay) = self.overlay.take() {
            let device = self.gpu.device.as_ref();
            let queue = self.gpu.queue.as_ref();
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point: overlay.pixels_per_point,
            };

            for (id, image_delta) in &overlay.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            ui_commands = self.egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &overlay.primitives,
                &screen_descriptor,
            );

            {
                let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
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
                });

                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &overlay.primitives, &screen_descriptor);
            }

            for id in &overlay.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        self.gpu
            .queue
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.config.width = width;
        self.gpu.config.height = height;
        self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
        let (_, depth_view) = create_depth_texture(&self.gpu.device, width, height);
        self.depth_view = depth_view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 11 * 16 + SHADOW_LAYERS * 64);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
    }

    #[test]
    fn test_lights_uniform_scales_color_by_intensity() {
        let mut lights = Lights::default();
        lights.spot.intensity = 1.5;
        let u = LightsUniform::new(&lights, 512);
        assert_eq!(u.spot_color, [1.5, 1.5, 1.5, 1.0]);
        assert_eq!(u.dir_color, [0.4, 0.4, 0.4, 1.0]);
        assert_eq!(u.point_color, [0.3, 0.3, 0.3, 1.0]);
        assert_eq!(u.shadow_params[0], 1.0 / 512.0);
    }

    #[test]
    fn test_hard_spot_edge_has_equal_cosines() {
        let u = LightsUniform::new(&Lights::default(), 512);
        assert!((u.spot_direction[3] - u.spot_params[1]).abs() < 1e-6);
        let dir = Vec3::from_slice(&u.spot_direction[..3]);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_object_uniform_flags_receivers() {
        let scene = Scene::new();
        assert_eq!(ObjectUniform::new(&scene.plane, &scene).color[3], 1.0);
        assert_eq!(ObjectUniform::new(&scene.sphere, &scene).color[3], 0.0);
        assert_eq!(ObjectUniform::new(&scene.sphere, &scene).material, [0.4, 0.3, 0.0, 0.0]);
    }
}
