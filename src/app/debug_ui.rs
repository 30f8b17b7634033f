//! Parameter panel state and rendering

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use egui::color_picker::{self, Alpha};
use egui::ecolor::Hsva;

use super::renderer::RendererInfo;

const FRAME_HISTORY: usize = 100;

/// Values edited by the panel and consumed by the fragment shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Linear RGB written to the `backgroundColor` uniform every frame
    pub background_color: [f32; 3],
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Rolling frame-time window
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    last_frame: Option<Instant>,
}

impl FrameStats {
    /// Records the time elapsed since the previous call
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_frame {
            self.record(now - last);
        }
        self.last_frame = Some(now);
    }

    /// Adds one frame duration, dropping the oldest past the history size
    pub fn record(&mut self, frame_time: Duration) {
        self.frame_times.push_back(frame_time.as_secs_f32());
        if self.frame_times.len() > FRAME_HISTORY {
            self.frame_times.pop_front();
        }
    }

    /// Average frames per second over the history window
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Most recent frame time in milliseconds
    pub fn last_frame_ms(&self) -> f32 {
        self.frame_times.back().map_or(0.0, |t| t * 1000.0)
    }

    pub fn len(&self) -> usize {
        self.frame_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_times.is_empty()
    }
}

/// "Simulation Parameters" panel
#[derive(Debug, Clone)]
pub struct DebugUIState {
    pub show_window: bool,
    pub show_frame_stats: bool,
    pub show_renderer_info: bool,
    frame_stats: FrameStats,
    // Picker state keyed by the color it was last synced with, so hue
    // survives round trips through gray
    picker: Option<([f32; 3], Hsva)>,
}

impl Default for DebugUIState {
    fn default() -> Self {
        Self {
            show_window: true,
            show_frame_stats: false,
            show_renderer_info: false,
            frame_stats: FrameStats::default(),
            picker: None,
        }
    }
}

impl DebugUIState {
    /// Toggles the panel visibility (debug builds only)
    #[cfg(debug_assertions)]
    pub fn toggle_window(&mut self) {
        self.show_window = !self.show_window;
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.frame_stats
    }

    /// Picker color for `rgb`, reusing the cached HSV value when it still
    /// describes the same color
    fn picker_color(&self, rgb: [f32; 3]) -> Hsva {
        match self.picker {
            Some((synced, hsva)) if synced == rgb => hsva,
            _ => Hsva::from_rgb(rgb),
        }
    }

    /// Renders the panel; edits land in `params` immediately
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        params: &mut SimulationParameters,
        renderer: Option<&RendererInfo>,
    ) {
        self.frame_stats.tick();

        if !self.show_window {
            return;
        }

        egui::Window::new("Simulation Parameters")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Background color");

                let mut hsva = self.picker_color(params.background_color);
                if color_picker::color_picker_hsva_2d(ui, &mut hsva, Alpha::Opaque) {
                    params.background_color = hsva.to_rgb();
                }
                self.picker = Some((params.background_color, hsva));

                let [r, g, b] = params.background_color;
                ui.monospace(format!("rgb({r:.3}, {g:.3}, {b:.3})"));

                ui.separator();

                ui.checkbox(&mut self.show_frame_stats, "Frame Stats");
                if self.show_frame_stats {
                    ui.label(format!("FPS: {:.1}", self.frame_stats.fps()));
                    ui.label(format!(
                        "Frame time: {:.2}ms",
                        self.frame_stats.last_frame_ms()
                    ));
                }

                ui.checkbox(&mut self.show_renderer_info, "Renderer Info");
                if self.show_renderer_info {
                    match renderer {
                        Some(info) => {
                            ui.label(format!("Adapter: {}", info.adapter_name));
                            ui.label(format!("Backend: {:?}", info.backend));
                            ui.label(format!("Surface: {}x{}", info.width, info.height));
                            ui.label(format!("Format: {:?}", info.format));
                        }
                        None => {
                            ui.label("No renderer");
                        }
                    }
                }
            });
    }
}
