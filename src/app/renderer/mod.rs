//! wgpu renderer: full-screen quad with an egui overlay
//!
//! ## Architecture
//!
//! - `quad`: static full-screen quad geometry
//! - `program`: pipeline and uniforms built from a linked GLSL program

use std::sync::Arc;

use egui::Context;
use thiserror::Error;
use tracing::info;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::event::WindowEvent;
use winit::window::Window;

use super::config::AppConfig;
use super::debug_ui::SimulationParameters;
use super::shader_system::{ProgramSources, ShaderError};
use super::window::is_minimized;

pub mod program;
pub mod quad;

use program::ShaderProgram;
use quad::QuadMesh;

/// Fatal renderer initialization errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create GPU surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats for this adapter")]
    UnsupportedSurface,

    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Adapter and surface facts shown in the parameter panel
#[derive(Debug, Clone)]
pub struct RendererInfo {
    pub adapter_name: String,
    pub backend: wgpu::Backend,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

/// Renderer owns the GPU context, the quad program and the egui backend
pub struct Renderer {
    // Declaration order is drop order: UI, then GPU objects, then the device
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: Context,
    program: ShaderProgram,
    quad: QuadMesh,
    config: SurfaceConfiguration,
    clear_color: wgpu::Color,
    adapter_info: wgpu::AdapterInfo,
    surface: Surface<'static>,
    queue: Queue,
    device: Device,
}

impl Renderer {
    /// Adapter and surface details for display
    pub fn info(&self) -> RendererInfo {
        RendererInfo {
            adapter_name: self.adapter_info.name.clone(),
            backend: self.adapter_info.backend,
            width: self.config.width,
            height: self.config.height,
            format: self.config.format,
        }
    }

    /// Creates a new renderer for the given window
    ///
    /// Runs the whole startup sequence: GPU context, egui, quad upload,
    /// shader compile and link. Anything created before a failing step is
    /// dropped on return.
    pub async fn new(window: Arc<Window>, app_config: &AppConfig) -> Result<Self, RenderError> {
        info!("Initializing wgpu renderer");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            adapter.name = %adapter_info.name,
            adapter.backend = ?adapter_info.backend,
            "Found GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let present_mode = if app_config.window.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        info!(
            surface.width = config.width,
            surface.height = config.height,
            surface.format = ?config.format,
            surface.present_mode = ?config.present_mode,
            "Surface configured"
        );

        let egui_ctx = Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                ..Default::default()
            },
        );

        info!("egui initialized successfully");

        let quad = QuadMesh::new(&device);

        let linked = ProgramSources::load(&app_config.shaders)?.build()?;
        let program = ShaderProgram::new(&device, config.format, linked).await?;

        let [r, g, b, a] = app_config.render.clear_color;

        Ok(Self {
            egui_renderer,
            egui_state,
            egui_ctx,
            program,
            quad,
            config,
            clear_color: wgpu::Color { r, g, b, a },
            adapter_info,
            surface,
            queue,
            device,
        })
    }

    /// Handles window events for egui
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// Resizes the surface; zero-sized (minimized) windows are ignored
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if !is_minimized(new_size) {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            info!(
                width = new_size.width,
                height = new_size.height,
                "Surface resized"
            );
        }
    }

    /// Renders one frame
    ///
    /// The UI runs first so the color it edits is the one drawn this frame.
    /// Then the surface is cleared, the quad drawn, egui painted on top and
    /// the frame presented.
    pub fn draw(
        &mut self,
        window: &Window,
        params: &mut SimulationParameters,
        mut render_ui: impl FnMut(&Context, &mut SimulationParameters),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            render_ui(ctx, params);
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        self.program
            .set_background_color(&self.queue, params.background_color);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quad Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.program.bind(&mut rpass);
            self.quad.draw(&mut rpass);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let callback_buffers = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        // egui_wgpu needs a 'static pass, hence forget_lifetime()
        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
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
                .render(&mut rpass.forget_lifetime(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(
            callback_buffers
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        window.pre_present_notify();
        output.present();

        Ok(())
    }
}
