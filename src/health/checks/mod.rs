//! Built-in checks

pub mod build_info;
pub mod config;
pub mod graphics_backend;
pub mod parameter_panel;
pub mod shader_sources;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use graphics_backend::GraphicsBackendCheck;
pub use parameter_panel::ParameterPanelCheck;
pub use shader_sources::ShaderSourceCheck;
