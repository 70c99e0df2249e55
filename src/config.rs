//! Runtime configuration for feeds, canvas geometry and outbound links.
//!
//! Every field has a default matching the reference behaviour, so an absent
//! config file is the normal case. On native builds a `config.toml` in the
//! platform config directory and `SPACECREW__*` environment variables can
//! override any value.

use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    #[default]
    Live,
    Simulated,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub mode: FeedMode,
    pub astros_url: String,
    pub position_url: String,
    pub proxy_prefix: String,
    pub tracked_craft: String,
    pub roster_interval_secs: f64,
    pub position_interval_secs: f64,
    pub simulated_interval_ms: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            mode: FeedMode::Live,
            astros_url: "http://api.open-notify.org/astros.json".to_string(),
            position_url: "http://api.open-notify.org/iss-now.json".to_string(),
            proxy_prefix: "https://corsproxy.io/?".to_string(),
            tracked_craft: "ISS".to_string(),
            roster_interval_secs: 30.0,
            position_interval_secs: 5.0,
            simulated_interval_ms: 100.0,
        }
    }
}

impl FeedConfig {
    /// Seconds between position updates for the active mode.
    pub fn position_period(&self) -> f64 {
        match self.mode {
            FeedMode::Live => self.position_interval_secs,
            FeedMode::Simulated => self.simulated_interval_ms / 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub canvas_size: f32,
    pub earth_radius: f64,
    pub orbit_altitude: f64,
    pub rotation_step: f64,
    pub drag_scale: f64,
    pub hit_radius: f64,
    pub star_count: usize,
    pub star_seed: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_size: 600.0,
            earth_radius: 150.0,
            orbit_altitude: 60.0,
            rotation_step: 0.002,
            drag_scale: 0.01,
            hit_radius: 20.0,
            star_count: 100,
            star_seed: 0x5EED_57A2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub encyclopedia_base: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { encyclopedia_base: "https://en.wikipedia.org/wiki/".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub view: ViewConfig,
    pub links: LinkConfig,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = directories::ProjectDirs::from("org", "spacecrew", "spacecrew-viz")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPACECREW").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_or_default() -> AppConfig {
    match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            AppConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_or_default() -> AppConfig {
    AppConfig::default()
}
