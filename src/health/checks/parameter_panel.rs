//! Parameter panel health check

use crate::app::{DebugUIState, SimulationParameters};
use crate::health::check::{CheckResult, SystemCheck};

const FRAMES: usize = 3;

/// Runs the parameter panel in a headless egui context
pub struct ParameterPanelCheck;

impl ParameterPanelCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParameterPanelCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ParameterPanelCheck {
    fn name(&self) -> &'static str {
        "Parameter Panel"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Renders the parameter panel without a window and checks it is stable")
    }

    fn check(&self) -> CheckResult {
        let ctx = egui::Context::default();
        let mut panel = DebugUIState::default();
        let mut params = SimulationParameters::default();
        let initial = params;
        let mut shapes = 0;

        for _ in 0..FRAMES {
            let output = ctx.run(egui::RawInput::default(), |ctx| {
                panel.render(ctx, &mut params, None);
            });
            shapes = output.shapes.len();
        }

        let details = vec![
            format!("  ✓ {FRAMES} frames rendered"),
            format!("  ✓ {shapes} shapes in the last frame"),
            format!("  Background color: {:?}", params.background_color),
        ];

        if params != initial {
            CheckResult::fail("Panel changed the color without input").with_details(details)
        } else if shapes == 0 {
            CheckResult::fail("Panel produced no shapes").with_details(details)
        } else {
            CheckResult::pass("Parameter panel renders").with_details(details)
        }
    }
}
