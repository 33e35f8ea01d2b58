//! wgpu implementation of [`RenderBackend`].

mod pipeline;

use std::sync::Arc;

use neogrid_config::VsyncMode;
use winit::window::Window;

use crate::atlas::AtlasUpload;
use crate::backend::{FrameUpload, RenderBackend};
use crate::error::RenderError;
use crate::vertex_stream::{CellVertex, VertexUpload};

/// Maximum frames the surface may queue ahead of presentation.
const SURFACE_FRAME_LATENCY: u32 = 2;

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,

    atlas_texture: wgpu::Texture,
    atlas_view: wgpu::TextureView,
    atlas_size: (u32, u32),

    quad_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    /// Records the instance buffer can hold
    instance_capacity: usize,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>, vsync_mode: VsyncMode) -> Result<Self, RenderError> {
        #[cfg(target_os = "windows")]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::DX12,
            ..Default::default()
        });
        #[cfg(target_os = "macos")]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterNotFound)?;
        log::info!("Using GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neogrid device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
            .await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::SurfaceCreation("surface reports no formats".into()))?;

        let requested_mode = vsync_mode.to_present_mode();
        let present_mode = if surface_caps.present_modes.contains(&requested_mode) {
            requested_mode
        } else {
            log::warn!(
                "Requested present mode {:?} not supported (available: {:?}), falling back to Fifo",
                requested_mode,
                surface_caps.present_modes
            );
            wgpu::PresentMode::Fifo
        };

        let alpha_mode = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::Auto,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: SURFACE_FRAME_LATENCY,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            surface_format,
            present_mode
        );

        let bind_group_layout = pipeline::create_bind_group_layout(&device);
        let pipeline = pipeline::create_cell_pipeline(&device, surface_format, &bind_group_layout);
        let sampler = pipeline::create_atlas_sampler(&device);
        let uniform_buffer = pipeline::create_uniform_buffer(&device);
        let (atlas_texture, atlas_view) = pipeline::create_atlas_texture(&device, 1, 1);
        let bind_group = pipeline::create_bind_group(
            &device,
            &bind_group_layout,
            &atlas_view,
            &sampler,
            &uniform_buffer,
        );
        let quad_buffer = pipeline::create_quad_buffer(&device);
        let instance_buffer = pipeline::create_instance_buffer(&device, 1);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            uniform_buffer,
            atlas_texture,
            atlas_view,
            atlas_size: (1, 1),
            quad_buffer,
            instance_buffer,
            instance_capacity: 1,
        })
    }

    fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn upload_atlas(&mut self, upload: AtlasUpload) {
        let (y, width, height, pixels) = match upload {
            AtlasUpload::Full {
                width,
                height,
                pixels,
            } => {
                if (width, height) != self.atlas_size {
                    let (texture, view) = pipeline::create_atlas_texture(&self.device, width, height);
                    self.atlas_texture = texture;
                    self.atlas_view = view;
                    self.atlas_size = (width, height);
                    self.bind_group = pipeline::create_bind_group(
                        &self.device,
                        &self.bind_group_layout,
                        &self.atlas_view,
                        &self.sampler,
                        &self.uniform_buffer,
                    );
                    log::debug!("Atlas texture recreated at {}x{}", width, height);
                }
                (0, width, height, pixels)
            }
            AtlasUpload::Rows { y, height, pixels } => (y, self.atlas_size.0, height, pixels),
        };
        if width == 0 || height == 0 {
            return;
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: 0, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn upload_vertices(&mut self, upload: VertexUpload<'_>) {
        match upload {
            VertexUpload::None => {}
            VertexUpload::Full { bytes } => {
                let records = bytes.len() / std::mem::size_of::<CellVertex>();
                if records > self.instance_capacity {
                    self.instance_buffer = pipeline::create_instance_buffer(&self.device, records);
                    self.instance_capacity = records;
                    log::debug!("Instance buffer reallocated for {} records", records);
                }
                self.queue.write_buffer(&self.instance_buffer, 0, bytes);
            }
            VertexUpload::Partial(spans) => {
                for span in spans {
                    self.queue
                        .write_buffer(&self.instance_buffer, span.byte_offset, span.bytes);
                }
            }
        }
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure_surface();
                Ok(self.surface.get_current_texture()?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure_surface();
    }

    fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn render(&mut self, frame: FrameUpload<'_>) -> Result<(), RenderError> {
        if let Some(atlas) = frame.atlas {
            self.upload_atlas(atlas);
        }
        self.upload_vertices(frame.vertices);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&frame.uniforms));

        let output = self.acquire_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cell render encoder"),
            });

        {
            let [r, g, b, a] = frame.clear_color.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cell render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let count = frame.instance_count.min(self.instance_capacity as u32);
            if count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.draw(0..4, 0..count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
