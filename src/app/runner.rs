//! Main application handler

use std::sync::Arc;

use anyhow::Context as _;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

#[cfg(debug_assertions)]
use winit::keyboard::{KeyCode, PhysicalKey};

use super::config::AppConfig;
use super::debug_ui::{DebugUIState, SimulationParameters};
use super::renderer::Renderer;
use super::window::{is_close_request, is_minimized, window_attributes_from_config};

/// Tornado simulation application
pub struct App {
    config: AppConfig,
    // Renderer is declared before the window so it is dropped first
    renderer: Option<Renderer>,
    window: Option<Arc<Window>>,
    params: SimulationParameters,
    debug_ui: DebugUIState,
    fatal: Option<anyhow::Error>,
}

impl App {
    /// Creates a new application with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting tornado simulation");
        info!(?config.window, "Window configuration");
        info!(
            vertex = %config.shaders.vertex.display(),
            fragment = %config.shaders.fragment.display(),
            "Shader sources"
        );

        Self {
            config,
            renderer: None,
            window: None,
            params: SimulationParameters::default(),
            debug_ui: DebugUIState::default(),
            fatal: None,
        }
    }

    /// Creates a new application with configuration loaded from environment
    pub fn from_env() -> Self {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        Self::new(config)
    }

    /// The error that stopped the event loop, if any
    pub fn take_fatal_error(&mut self) -> Option<anyhow::Error> {
        self.fatal.take()
    }

    /// Records a fatal error, releases GPU resources and stops the loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!(error = %format!("{err:#}"), "Fatal error, exiting");
        self.renderer = None;
        self.window = None;
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = window_attributes_from_config(&self.config.window);
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        let size = window.inner_size();
        info!(
            window.width = size.width,
            window.height = size.height,
            "Window created successfully"
        );

        let window = Arc::new(window);

        // winit's event loop is synchronous; wgpu setup is async
        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let renderer = runtime
            .block_on(Renderer::new(window.clone(), &self.config))
            .context("Failed to initialize renderer")?;

        info!("Renderer initialized successfully");
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        if is_minimized(window.inner_size()) {
            return;
        }

        let info = renderer.info();
        let debug_ui = &mut self.debug_ui;

        match renderer.draw(window, &mut self.params, |ctx, params| {
            debug_ui.render(ctx, params, Some(&info));
        }) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                let size = window.inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
            }
            Err(e) => {
                error!(error = %e, "Render error");
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            let _ = renderer.handle_event(window, &event);
        }

        // Debug hotkey (debug builds only)
        #[cfg(debug_assertions)]
        if let WindowEvent::KeyboardInput { event, .. } = &event
            && event.state.is_pressed()
            && !event.repeat
            && let PhysicalKey::Code(KeyCode::Backquote) = event.physical_key
        {
            self.debug_ui.toggle_window();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } if is_close_request(&event) => {
                info!("Escape pressed, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // UI and GPU objects go before the window that owns the surface
        self.renderer = None;
        self.window = None;
        info!(
            background_color = ?self.params.background_color,
            "Resources released"
        );
    }
}
