//! Application layer
//!
//! Handles windowing, shader loading, rendering, and the parameter panel.

pub mod config;
pub mod debug_ui;
pub mod renderer;
mod runner;
pub mod shader_system;
mod window;

pub use config::{AppConfig, RenderConfig, ShaderConfig, WindowConfig};
pub use debug_ui::{DebugUIState, SimulationParameters};
pub use runner::App;
pub use window::window_attributes_from_config;
