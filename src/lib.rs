//! Tornado Simulation
//!
//! A window with a full-screen shaded quad and an egui parameter panel,
//! built on winit and wgpu.

/// Application - windowing, shaders, rendering, and the parameter panel
pub mod app;

/// Build-time information (git SHA, target, timestamp, etc.)
pub mod build_info;

/// Startup diagnostics for configuration, shaders, GPU and UI
pub mod health;
