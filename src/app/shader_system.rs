//! Shader loading, compilation and linking
//!
//! GLSL sources are read from disk, compiled to naga IR and validated, then
//! linked by checking the interface between the vertex and fragment stages.
//! The GPU side of a linked program lives in `renderer::program`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Module, ResourceBinding, TypeInner};
use thiserror::Error;
use tracing::{debug, info};

use super::config::ShaderConfig;

/// Pipeline stage a GLSL source is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while building a shader program
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to load shaders from files\n{}\n{}", .vertex.display(), .fragment.display())]
    Read {
        vertex: PathBuf,
        fragment: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile {stage} shader ({})\n{log}", .path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },

    #[error("Failed to link shader program\n{log}")]
    Link { log: String },
}

/// GLSL source text of one stage, tagged with where it came from
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub path: PathBuf,
    pub code: String,
}

/// Vertex and fragment sources of one program
#[derive(Debug, Clone)]
pub struct ProgramSources {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ProgramSources {
    /// Reads both stages. Either file failing to read fails the whole load.
    pub fn load(paths: &ShaderConfig) -> Result<Self, ShaderError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
                vertex: paths.vertex.clone(),
                fragment: paths.fragment.clone(),
                source,
            })
        };

        let vertex = read(&paths.vertex)?;
        let fragment = read(&paths.fragment)?;

        info!(
            vertex = %paths.vertex.display(),
            fragment = %paths.fragment.display(),
            "Loaded shader sources"
        );

        Ok(Self {
            vertex: ShaderSource {
                stage: ShaderStage::Vertex,
                path: paths.vertex.clone(),
                code: vertex,
            },
            fragment: ShaderSource {
                stage: ShaderStage::Fragment,
                path: paths.fragment.clone(),
                code: fragment,
            },
        })
    }

    /// Compiles both stages in order and links them
    pub fn build(&self) -> Result<LinkedProgram, ShaderError> {
        let vertex = compile(&self.vertex)?;
        let fragment = compile(&self.fragment)?;
        link(vertex, fragment)
    }
}

/// A validated single-stage module
#[derive(Debug)]
pub struct CompiledShader {
    pub stage: ShaderStage,
    pub path: PathBuf,
    pub module: Module,
}

impl CompiledShader {
    fn entry_point(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.stage == self.stage.to_naga())
    }
}

/// Compiles GLSL source into validated naga IR
pub fn compile(source: &ShaderSource) -> Result<CompiledShader, ShaderError> {
    let compile_error = |log: String| ShaderError::Compile {
        stage: source.stage,
        path: source.path.clone(),
        log,
    };

    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(source.stage.to_naga());
    let module = frontend
        .parse(&options, &source.code)
        .map_err(|errors| compile_error(errors.emit_to_string(&source.code)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|error| compile_error(error.emit_to_string(&source.code)))?;

    debug!(stage = %source.stage, path = %source.path.display(), "Shader compiled");

    Ok(CompiledShader {
        stage: source.stage,
        path: source.path.clone(),
        module,
    })
}

/// A vertex/fragment pair whose stage interfaces agree
#[derive(Debug)]
pub struct LinkedProgram {
    pub vertex: CompiledShader,
    pub fragment: CompiledShader,
    pub vertex_entry: String,
    pub fragment_entry: String,
}

impl LinkedProgram {
    /// Whether either stage declares a uniform block at `group`/`binding`
    pub fn has_uniform_block(&self, group: u32, binding: u32) -> bool {
        let wanted = ResourceBinding { group, binding };
        [&self.vertex.module, &self.fragment.module]
            .into_iter()
            .flat_map(|module| module.global_variables.iter())
            .any(|(_, var)| var.space == AddressSpace::Uniform && var.binding == Some(wanted))
    }
}

/// Links two compiled stages
///
/// Fails when a stage has no entry point of its kind, when the fragment
/// stage reads a location the vertex stage never writes, or when the two
/// stages disagree on the type at a location.
pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<LinkedProgram, ShaderError> {
    let mut log = Vec::new();

    let vertex_ep = vertex.entry_point();
    let fragment_ep = fragment.entry_point();

    if vertex_ep.is_none() {
        log.push(format!(
            "error: {} has no vertex entry point",
            vertex.path.display()
        ));
    }
    if fragment_ep.is_none() {
        log.push(format!(
            "error: {} has no fragment entry point",
            fragment.path.display()
        ));
    }

    let (Some(vertex_ep), Some(fragment_ep)) = (vertex_ep, fragment_ep) else {
        return Err(ShaderError::Link {
            log: log.join("\n"),
        });
    };

    let written = output_locations(&vertex.module, vertex_ep);
    let read = input_locations(&fragment.module, fragment_ep);

    for (location, input) in &read {
        match written.get(location) {
            None => log.push(format!(
                "error: fragment input at location {location} is not written by the vertex stage"
            )),
            Some(output) if output != input => log.push(format!(
                "error: type mismatch at location {location}: vertex writes {}, fragment reads {}",
                describe(output),
                describe(input)
            )),
            Some(_) => {}
        }
    }

    if !log.is_empty() {
        return Err(ShaderError::Link {
            log: log.join("\n"),
        });
    }

    let vertex_entry = vertex_ep.name.clone();
    let fragment_entry = fragment_ep.name.clone();

    Ok(LinkedProgram {
        vertex,
        fragment,
        vertex_entry,
        fragment_entry,
    })
}

fn output_locations(module: &Module, ep: &naga::EntryPoint) -> BTreeMap<u32, TypeInner> {
    let mut locations = BTreeMap::new();
    if let Some(result) = &ep.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut locations);
    }
    locations
}

fn input_locations(module: &Module, ep: &naga::EntryPoint) -> BTreeMap<u32, TypeInner> {
    let mut locations = BTreeMap::new();
    for arg in &ep.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut locations);
    }
    locations
}

// Interface values are either bound directly or are structs of bound members
fn collect_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut BTreeMap<u32, TypeInner>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location, inner.clone());
        }
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn describe(ty: &TypeInner) -> String {
    match ty {
        TypeInner::Scalar(scalar) => format!("{:?}{}", scalar.kind, scalar.width * 8),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{:?}{}>", *size as u8, scalar.kind, scalar.width * 8)
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"#version 450 core
layout(location = 0) in vec3 aPos;
layout(location = 0) out vec2 vUv;
void main() {
    vUv = aPos.xy * 0.5 + 0.5;
    gl_Position = vec4(aPos, 1.0);
}
"#;

    const FRAGMENT: &str = r#"#version 450 core
layout(location = 0) in vec2 vUv;
layout(location = 0) out vec4 FragColor;
layout(set = 0, binding = 0) uniform FluidParameters { vec3 backgroundColor; };
void main() {
    FragColor = vec4(backgroundColor * vUv.x, 1.0);
}
"#;

    fn source(stage: ShaderStage, code: &str) -> ShaderSource {
        ShaderSource {
            stage,
            path: PathBuf::from(match stage {
                ShaderStage::Vertex => "test.vert",
                ShaderStage::Fragment => "test.frag",
            }),
            code: code.to_string(),
        }
    }

    fn build(vertex: &str, fragment: &str) -> Result<LinkedProgram, ShaderError> {
        ProgramSources {
            vertex: source(ShaderStage::Vertex, vertex),
            fragment: source(ShaderStage::Fragment, fragment),
        }
        .build()
    }

    #[test]
    fn test_valid_pair_links() {
        let program = build(VERTEX, FRAGMENT).unwrap();
        assert_eq!(program.vertex_entry, "main");
        assert_eq!(program.fragment_entry, "main");
        assert!(program.has_uniform_block(0, 0));
        assert!(!program.has_uniform_block(0, 1));
    }

    #[test]
    fn test_syntax_error_reports_stage_and_log() {
        let broken = "#version 450 core\nvoid main() { gl_Position = vec4(1.0 }\n";
        match build(broken, FRAGMENT) {
            Err(ShaderError::Compile { stage, path, log }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(path, PathBuf::from("test.vert"));
                assert!(!log.is_empty());
            }
            other => panic!("expected vertex compile error, got {other:?}"),
        }
    }

    #[test]
    fn test_fragment_compiled_after_vertex() {
        let broken = "#version 450 core\nvoid main() { undefined_fn(); }\n";
        match build(VERTEX, broken) {
            Err(ShaderError::Compile { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("expected fragment compile error, got {other:?}"),
        }
    }

    #[test]
    fn test_unwritten_fragment_input_fails_link() {
        let vertex = r#"#version 450 core
layout(location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos, 1.0);
}
"#;
        match build(vertex, FRAGMENT) {
            Err(ShaderError::Link { log }) => {
                assert!(log.contains("location 0"), "unexpected log: {log}");
            }
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_interface_type_fails_link() {
        let vertex = r#"#version 450 core
layout(location = 0) in vec3 aPos;
layout(location = 0) out vec3 vUv;
void main() {
    vUv = aPos;
    gl_Position = vec4(aPos, 1.0);
}
"#;
        match build(vertex, FRAGMENT) {
            Err(ShaderError::Link { log }) => {
                assert!(log.contains("type mismatch at location 0"), "unexpected log: {log}");
            }
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_uniform_block_still_links() {
        let fragment = r#"#version 450 core
layout(location = 0) out vec4 FragColor;
void main() {
    FragColor = vec4(0.0, 0.0, 0.0, 1.0);
}
"#;
        let program = build(VERTEX, fragment).unwrap();
        assert!(!program.has_uniform_block(0, 0));
    }

    #[test]
    fn test_read_error_names_both_paths() {
        let paths = ShaderConfig {
            vertex: PathBuf::from("does/not/exist.vert"),
            fragment: PathBuf::from("does/not/exist.frag"),
        };
        let err = ProgramSources::load(&paths).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("does/not/exist.vert"));
        assert!(message.contains("does/not/exist.frag"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
