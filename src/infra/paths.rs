// src/infra/paths.rs — Config path resolution
//
// LUCIDRA_HOME overrides everything. Otherwise config lives in ~/.lucidra/.

use std::path::PathBuf;

/// Returns the LUCIDRA_HOME override, if set.
fn lucidra_home() -> Option<PathBuf> {
    std::env::var_os("LUCIDRA_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $LUCIDRA_HOME/ or ~/.lucidra/
pub fn config_dir() -> PathBuf {
    if let Some(home) = lucidra_home() {
        return home;
    }
    dirs_home().join(".lucidra")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
