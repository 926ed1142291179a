//! Where the endpoint lives.

use std::path::{Path, PathBuf};

use fsinfo_wire::endpoint::{self, CLASS_VAR, NAME_VAR, RUNTIME_DIR_VAR};
pub use fsinfo_wire::endpoint::{DEFAULT_CLASS, DEFAULT_NAME};

/// Location and identity of the control channel endpoint.
///
/// The visible endpoint is `<runtime_dir>/<class>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub runtime_dir: PathBuf,
    pub class: String,
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            runtime_dir: endpoint::default_runtime_dir(),
            class: DEFAULT_CLASS.to_string(),
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults, overridden by `FSINFO_RUNTIME_DIR`, `FSINFO_CLASS` and
    /// `FSINFO_NAME` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(RUNTIME_DIR_VAR) {
            config.runtime_dir = PathBuf::from(dir);
        }
        if let Ok(class) = std::env::var(CLASS_VAR) {
            config.class = class;
        }
        if let Ok(name) = std::env::var(NAME_VAR) {
            config.name = name;
        }
        config
    }

    pub fn with_runtime_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runtime_dir = dir.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn class_dir(&self) -> PathBuf {
        self.runtime_dir.join(&self.class)
    }

    /// The path callers connect to.
    pub fn endpoint_path(&self) -> PathBuf {
        endpoint::endpoint_path(&self.runtime_dir, &self.class, &self.name)
    }

    /// Where the socket is bound before it becomes visible.
    pub fn staging_path(&self) -> PathBuf {
        self.runtime_dir
            .join(format!(".{}.{}.{}.sock", self.class, self.name, std::process::id()))
    }

    /// `class` and `name` must each be a single, ordinary path component.
    pub fn validate(&self) -> std::io::Result<()> {
        for (what, value) in [("class", &self.class), ("name", &self.name)] {
            if !is_plain_component(value) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid endpoint {}: {:?}", what, value),
                ));
            }
        }
        Ok(())
    }
}

fn is_plain_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    ) && !value.contains('/')
}
