use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder};
use vergen_gitcl::{Emitter as GitEmitter, GitclBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;

    let cargo = CargoBuilder::default()
        .opt_level(true)
        .target_triple(true)
        .build()?;

    let rustc = RustcBuilder::default()
        .semver(true)
        .channel(true)
        .build()?;

    // Git metadata is optional; a source tarball without .git still builds
    let gitcl = GitclBuilder::default()
        .sha(true)
        .branch(true)
        .dirty(true)
        .build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&rustc)?
        .emit()?;

    GitEmitter::default().add_instructions(&gitcl)?.emit()?;

    copy_profiles()?;

    println!("cargo:rerun-if-changed=shaders");

    Ok(())
}

/// Copies every `config/*.toml` profile to `target/{profile}/config` so the
/// binary finds them next to itself.
fn copy_profiles() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    // OUT_DIR is target/{profile}/build/tornado-simulation-xxx/out
    let target_dir = out_dir
        .ancestors()
        .nth(3)
        .ok_or("Could not determine target directory")?;

    let source_dir = Path::new("config");
    println!("cargo:rerun-if-changed=config");
    if !source_dir.exists() {
        return Ok(());
    }

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml")
            && let Some(name) = path.file_name()
        {
            fs::copy(&path, config_out_dir.join(name))?;
        }
    }

    Ok(())
}
