pub mod cleaner_config;
pub mod loader;

pub use cleaner_config::{
    CleanerConfig, ListGranularity, ProtectedSourceConfig, StorageType, UNMERGED_MARKER,
};
pub use loader::{load_config, parse_config_content};
