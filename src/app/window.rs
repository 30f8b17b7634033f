//! Window configuration and management

use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, WindowAttributes};

use super::config::WindowConfig;

/// Creates window attributes from configuration
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

/// Escape pressed: the window should close
pub fn is_close_request(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && !event.repeat
        && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}

/// A zero-area window has no surface to present to
pub fn is_minimized(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}
