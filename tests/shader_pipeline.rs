//! Shader read/compile/link against files on disk

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tornado_simulation::app::ShaderConfig;
use tornado_simulation::app::shader_system::{ProgramSources, ShaderError, ShaderStage};

const VERTEX: &str = "#version 450 core
layout(location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos, 1.0);
}
";

const FRAGMENT: &str = "#version 450 core
layout(location = 0) out vec4 FragColor;
layout(set = 0, binding = 0) uniform FluidParameters { vec3 backgroundColor; };
void main() {
    FragColor = vec4(backgroundColor, 1.0);
}
";

fn write_pair(dir: &Path, vertex: &str, fragment: &str) -> ShaderConfig {
    let paths = ShaderConfig {
        vertex: dir.join("default.vert"),
        fragment: dir.join("fluid.frag"),
    };
    fs::write(&paths.vertex, vertex).unwrap();
    fs::write(&paths.fragment, fragment).unwrap();
    paths
}

#[test]
fn test_pair_from_disk_links() {
    let dir = TempDir::new().unwrap();
    let paths = write_pair(dir.path(), VERTEX, FRAGMENT);

    let sources = ProgramSources::load(&paths).unwrap();
    assert_eq!(sources.vertex.code, VERTEX);
    assert_eq!(sources.fragment.stage, ShaderStage::Fragment);

    let program = sources.build().unwrap();
    assert!(program.has_uniform_block(0, 0));
}

#[test]
fn test_missing_fragment_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_pair(dir.path(), VERTEX, FRAGMENT);
    paths.fragment = dir.path().join("absent.frag");

    match ProgramSources::load(&paths) {
        Err(ShaderError::Read { fragment, .. }) => assert_eq!(fragment, paths.fragment),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_bad_fragment_reports_path_in_message() {
    let dir = TempDir::new().unwrap();
    let paths = write_pair(dir.path(), VERTEX, "#version 450 core\nvoid main() { oops }\n");

    let err = ProgramSources::load(&paths).unwrap().build().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to compile fragment shader"), "{message}");
    assert!(message.contains("fluid.frag"), "{message}");
}

#[test]
fn test_bundled_shaders_are_the_defaults() {
    let paths = ShaderConfig::default();
    assert!(paths.vertex.exists(), "{} missing", paths.vertex.display());
    assert!(paths.fragment.exists(), "{} missing", paths.fragment.display());
}
