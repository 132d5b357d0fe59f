//! Configuration file lookup.
//!
//! Priority order:
//!
//! 1. `--config` flag (or `$KUBE_API_LINT_CONFIG`)
//! 2. `kube-api-lint.toml`, then `.kube-api-lint.toml`, next to the snapshot
//! 3. `config.toml` in `$KUBE_API_LINT_CONFIG_DIR`, else `~/.kube-api-lint/`
//! 4. built-in defaults

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// The configuration file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the global fallback.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "explicit config {}", p.display()),
            Self::Project(p) => write!(f, "project config {}", p.display()),
            Self::Global(p) => write!(f, "global config {}", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["kube-api-lint.toml", ".kube-api-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "KUBE_API_LINT_CONFIG_DIR";

/// Looks up configuration for one project directory.
#[derive(Debug, Clone)]
struct Locator {
    project_dir: PathBuf,
    global_dir: Option<PathBuf>,
}

impl Locator {
    fn locate(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(p) = explicit {
            return ConfigSource::Explicit(p.to_path_buf());
        }

        let project = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(path) = project {
            return ConfigSource::Project(path);
        }

        self.global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|candidate| candidate.is_file())
            .map_or(ConfigSource::Default, ConfigSource::Global)
    }
}

/// Resolves the configuration source for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let locator = Locator {
        project_dir: project_dir.to_path_buf(),
        global_dir: global_config_dir(),
    };
    let source = locator.locate(explicit);
    tracing::debug!("Configuration: {source}");
    source
}

/// The global config directory: `$KUBE_API_LINT_CONFIG_DIR`, else `~/.kube-api-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".kube-api-lint")))
}
