//! Shader source health check

use crate::app::ShaderConfig;
use crate::app::renderer::program::{UNIFORM_BINDING, UNIFORM_GROUP};
use crate::app::shader_system::ProgramSources;
use crate::health::check::{CheckResult, SystemCheck};

/// Reads, compiles and links the configured shader pair without a GPU
pub struct ShaderSourceCheck {
    paths: ShaderConfig,
}

impl ShaderSourceCheck {
    /// Checks the default `shaders/` pair
    pub fn new() -> Self {
        Self::with_paths(ShaderConfig::default())
    }

    pub fn with_paths(paths: ShaderConfig) -> Self {
        Self { paths }
    }
}

impl Default for ShaderSourceCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ShaderSourceCheck {
    fn name(&self) -> &'static str {
        "Shader Sources"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Reads, compiles and links the vertex/fragment shader pair")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();

        let sources = match ProgramSources::load(&self.paths) {
            Ok(sources) => sources,
            Err(e) => return CheckResult::fail("Shader sources unreadable").with_details(vec![e.to_string()]),
        };
        details.push(format!("  ✓ Read {}", self.paths.vertex.display()));
        details.push(format!("  ✓ Read {}", self.paths.fragment.display()));

        let program = match sources.build() {
            Ok(program) => program,
            Err(e) => {
                details.push(format!("  ✗ {e}"));
                return CheckResult::fail("Shader program failed to build").with_details(details);
            }
        };
        details.push(format!(
            "  ✓ Linked entry points '{}' / '{}'",
            program.vertex_entry, program.fragment_entry
        ));

        if program.has_uniform_block(UNIFORM_GROUP, UNIFORM_BINDING) {
            details.push("  ✓ backgroundColor uniform block present".to_string());
            CheckResult::pass("Shader program compiles and links").with_details(details)
        } else {
            details.push("  ⚠ No uniform block at set 0, binding 0".to_string());
            CheckResult::warn("Shader program ignores the background color").with_details(details)
        }
    }
}
