use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::environment::Environment;
use crate::application::services::ResolutionLimits;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub voxelization: VoxelizationSettings,
    pub jobs: JobSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_*` variables,
    /// e.g. `APP_SERVER__PORT=8080` or `APP_JOBS__RETENTION_SECS=3600`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoxelizationSettings {
    pub default_resolution: u32,
    pub max_resolution: u32,
}

impl Default for VoxelizationSettings {
    fn default() -> Self {
        let limits = ResolutionLimits::default();
        Self {
            default_resolution: limits.default_resolution,
            max_resolution: limits.max_resolution,
        }
    }
}

impl VoxelizationSettings {
    pub fn limits(&self) -> ResolutionLimits {
        ResolutionLimits {
            default_resolution: self.default_resolution,
            max_resolution: self.max_resolution,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    pub queue_capacity: usize,
    /// Terminal jobs older than this are evicted; unset keeps them forever.
    pub retention_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            retention_secs: None,
            sweep_interval_secs: 60,
        }
    }
}

impl JobSettings {
    pub fn retention(&self) -> Option<Duration> {
        self.retention_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub upload_dir: String,
    pub delete_after_processing: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            upload_dir: "uploads".to_string(),
            delete_after_processing: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub enable_json: bool,
}
