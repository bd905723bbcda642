use std::env;
use std::path::PathBuf;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
    /// Public URL prefix the stored files are served from.
    pub base_url: String,
    pub max_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("storage/uploads"),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.base_dir),
            base_url: env::var("STORAGE_BASE_URL").unwrap_or(defaults.base_url),
            max_bytes: env_or("STORAGE_MAX_BYTES", defaults.max_bytes),
        }
    }
}
