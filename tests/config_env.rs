//! Environment layer of the configuration
//!
//! Kept in its own test binary: it mutates process environment variables,
//! and a single test function keeps those mutations serialized.

use tornado_simulation::app::AppConfig;

#[test]
fn test_env_layer_overrides_profile_file() {
    unsafe {
        std::env::set_var("APP_PROFILE", "debug");
        std::env::set_var("APP_WINDOW__WIDTH", "1024");
    }

    let result = AppConfig::load_from_env();

    unsafe {
        std::env::remove_var("APP_PROFILE");
        std::env::remove_var("APP_WINDOW__WIDTH");
    }

    let config = result.unwrap();
    assert_eq!(config.profile, "debug");
    // config/debug.toml sets width = 640.0; the variable wins
    assert_eq!(config.window.width, 1024.0);
    assert_eq!(config.window.height, 480.0);
    assert_eq!(config.window.title, "Tornado Simulation (debug)");

    let config = AppConfig::load_from_env().unwrap();
    assert_eq!(config.profile, "release");
    assert_eq!(config.window.width, 640.0);
}
