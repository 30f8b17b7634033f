//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.
//! Every field has a built-in default, so the program runs without any
//! config file present.

use std::path::PathBuf;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in logical pixels
    pub width: f64,
    /// Window height in logical pixels
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Whether presentation waits for vertical sync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tornado Simulation".to_string(),
            width: 640.0,
            height: 480.0,
            fullscreen: false,
            resizable: true,
            decorated: true,
            vsync: true,
        }
    }
}

/// Locations of the GLSL sources, relative to the working directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/default.vert"),
            fragment: PathBuf::from("shaders/fluid.frag"),
        }
    }
}

/// Per-frame render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color the surface is cleared to before the quad is drawn (RGBA)
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    pub window: WindowConfig,
    /// Shader source locations
    pub shaders: ShaderConfig,
    /// Render settings
    pub render: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, lowest precedence first:
    /// 1. Built-in defaults
    /// 2. config/{profile}.toml (optional)
    /// 3. Environment variables with prefix APP_ (e.g., APP_WINDOW__WIDTH=1920)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match Self::find_config_dir() {
            Some(dir) => {
                builder.add_source(File::from(dir.join(profile).as_path()).required(false))
            }
            None => builder.add_source(File::with_name(&format!("config/{profile}")).required(false)),
        };

        // Single _ after the prefix, __ between nested fields (APP_WINDOW__WIDTH)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder, profile)
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Builds a configuration from an in-memory TOML document layered over
    /// the defaults. Environment variables are not consulted.
    pub fn from_toml_str(profile: &str, toml: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder, profile)
    }

    fn finish(builder: ConfigBuilder<DefaultState>, profile: &str) -> Result<Self, ConfigError> {
        builder
            .set_override("profile", profile)?
            .build()?
            .try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Tornado Simulation");
        assert_eq!(config.window.width, 640.0);
        assert_eq!(config.window.height, 480.0);
        assert!(config.window.vsync);
        assert_eq!(config.shaders.vertex, PathBuf::from("shaders/default.vert"));
        assert_eq!(config.shaders.fragment, PathBuf::from("shaders/fluid.frag"));
        assert_eq!(config.render.clear_color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = AppConfig::from_toml_str("debug", "").unwrap();
        assert_eq!(config.profile, "debug");
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.shaders, ShaderConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let toml = r#"
            [window]
            width = 1024.0
            vsync = false

            [shaders]
            fragment = "shaders/other.frag"
        "#;
        let config = AppConfig::from_toml_str("debug", toml).unwrap();

        assert_eq!(config.window.width, 1024.0);
        assert!(!config.window.vsync);
        assert_eq!(config.window.height, 480.0);
        assert_eq!(config.window.title, "Tornado Simulation");
        assert_eq!(config.shaders.vertex, PathBuf::from("shaders/default.vert"));
        assert_eq!(config.shaders.fragment, PathBuf::from("shaders/other.frag"));
    }

    #[test]
    fn test_clear_color_override() {
        let toml = "[render]\nclear_color = [0.0, 0.5, 1.0, 1.0]\n";
        let config = AppConfig::from_toml_str("release", toml).unwrap();
        assert_eq!(config.render.clear_color, [0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_profile_override_wins_over_document() {
        let config = AppConfig::from_toml_str("release", "profile = \"debug\"").unwrap();
        assert_eq!(config.profile, "release");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(AppConfig::from_toml_str("debug", "[window\nwidth = ").is_err());
    }

    #[test]
    fn test_missing_profile_file_is_not_an_error() {
        let config = AppConfig::load("no-such-profile").unwrap();
        assert_eq!(config.profile, "no-such-profile");
    }
}
