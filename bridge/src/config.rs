//! Bridge configuration.

use std::path::PathBuf;

/// Runtime configuration for the bridge binary.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory the local store resolves `doc://` tokens against.
    pub root: PathBuf,
    /// Path of the persisted grant registry.
    pub grants_path: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            grants_path: config_dir().join("grants.json"),
        }
    }
}

/// Platform config directory for the bridge.
fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("mapstore-bridge");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("mapstore-bridge");
    }
    PathBuf::from(".mapstore-bridge")
}
