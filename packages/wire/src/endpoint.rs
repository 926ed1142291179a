//! Where the control channel endpoint lives by default.
//!
//! Shared by the daemon, which creates the endpoint, and by clients, which
//! only need its path.

use std::path::{Path, PathBuf};

pub const DEFAULT_CLASS: &str = "fsinfo";
pub const DEFAULT_NAME: &str = "fs_info";

pub const RUNTIME_DIR_VAR: &str = "FSINFO_RUNTIME_DIR";
pub const CLASS_VAR: &str = "FSINFO_CLASS";
pub const NAME_VAR: &str = "FSINFO_NAME";

/// The user's runtime directory, or `/run` when there is none.
pub fn default_runtime_dir() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(|| PathBuf::from("/run"))
}

/// `<runtime_dir>/<class>/<name>`
pub fn endpoint_path(runtime_dir: &Path, class: &str, name: &str) -> PathBuf {
    runtime_dir.join(class).join(name)
}

/// The endpoint path after applying `FSINFO_RUNTIME_DIR`, `FSINFO_CLASS` and
/// `FSINFO_NAME` to the defaults.
pub fn endpoint_from_env() -> PathBuf {
    let runtime_dir = std::env::var_os(RUNTIME_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(default_runtime_dir);
    let class = std::env::var(CLASS_VAR).unwrap_or_else(|_| DEFAULT_CLASS.to_string());
    let name = std::env::var(NAME_VAR).unwrap_or_else(|_| DEFAULT_NAME.to_string());
    endpoint_path(&runtime_dir, &class, &name)
}
