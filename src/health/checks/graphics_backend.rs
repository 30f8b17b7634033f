//! Graphics backend health check

use std::collections::BTreeSet;

use crate::health::check::{CheckResult, SystemCheck};

/// Checks that wgpu finds at least one adapter
pub struct GraphicsBackendCheck;

impl GraphicsBackendCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GraphicsBackendCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for GraphicsBackendCheck {
    fn name(&self) -> &'static str {
        "Graphics Backend"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates wgpu instance creation and adapter availability")
    }

    fn check(&self) -> CheckResult {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapters = instance.enumerate_adapters(wgpu::Backends::all());

        if adapters.is_empty() {
            return CheckResult::fail("No compatible graphics adapters available")
                .with_details(vec!["  ✗ No graphics adapters found".to_string()]);
        }

        let mut details = vec![format!("  ✓ Found {} adapter(s)", adapters.len())];
        let mut backends = BTreeSet::new();
        let mut hardware = false;

        for (i, adapter) in adapters.iter().enumerate() {
            let info = adapter.get_info();
            backends.insert(format!("{:?}", info.backend));
            hardware |= matches!(
                info.device_type,
                wgpu::DeviceType::DiscreteGpu | wgpu::DeviceType::IntegratedGpu
            );
            details.push(format!(
                "    [{i}] {} - {:?} ({:?})",
                info.name, info.device_type, info.backend
            ));
        }

        details.push(format!(
            "  Backends available: {}",
            backends.into_iter().collect::<Vec<_>>().join(", ")
        ));

        if hardware {
            CheckResult::pass(format!("{} adapters found", adapters.len())).with_details(details)
        } else {
            CheckResult::warn(format!(
                "{} adapters found (no hardware GPU detected)",
                adapters.len()
            ))
            .with_details(details)
        }
    }
}
