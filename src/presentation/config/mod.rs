mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    JobSettings, LoggingSettings, ServerSettings, Settings, StorageProviderSetting,
    StorageSettings, VoxelizationSettings,
};
