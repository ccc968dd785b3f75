//! Launcher configuration.
//!
//! Settings are layered with `figment`, lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. `webgpu-launch.toml` (or the file passed with `--config-file`),
//! 3. `WEBGPU_LAUNCH_*` environment variables,
//! 4. command-line flags that were actually given.
//!
//! The backend stays a raw string until [`LaunchSettings::build_config`]
//! so that every layer goes through the same lenient resolution.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::ConfigError;
use crate::layout::DEFAULT_EXECUTABLE;

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "webgpu-launch.toml";

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "WEBGPU_LAUNCH_";

/// The per-invocation build choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Backend passed to the configure step.
    pub backend: Backend,
    /// Remove the build directory before configuring.
    pub clean: bool,
}

/// Fully layered settings for one launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Backend name as written by the user.
    pub backend: String,
    /// Remove the build directory first.
    pub clean: bool,
    /// Directory holding the top-level `CMakeLists.txt`.
    pub project_root: PathBuf,
    /// CMake program to invoke.
    pub cmake: String,
    /// Executable name produced by the project, without extension.
    pub executable: String,
    /// Continue after a failed configure or build step.
    pub keep_going: bool,
    /// Launch the executable after building.
    pub run: bool,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default().as_str().to_owned(),
            clean: false,
            project_root: PathBuf::from("."),
            cmake: "cmake".to_owned(),
            executable: DEFAULT_EXECUTABLE.to_owned(),
            keep_going: false,
            run: true,
        }
    }
}

/// Values supplied on the command line. `None` leaves lower layers intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsOverrides {
    /// `--backend`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// `--clean`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    /// `--project-root`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    /// `--cmake`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake: Option<String>,
    /// `--executable`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    /// `--keep-going`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_going: Option<bool>,
    /// `--no-run`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<bool>,
}

impl LaunchSettings {
    /// Builds the provider stack without extracting it.
    #[must_use]
    pub fn figment(overrides: &SettingsOverrides, config_file: Option<&Path>) -> Figment {
        let file = config_file.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Loads and validates settings from every layer.
    ///
    /// A missing configuration file is skipped.
    ///
    /// # Errors
    /// Returns [`ConfigError::Extract`] when a layer holds a value of the
    /// wrong type, or [`ConfigError::Invalid`] for empty program names.
    pub fn load(
        overrides: &SettingsOverrides,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(overrides, config_file).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings that would produce an unusable command line.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cmake.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cmake",
                reason: "program name must not be empty",
            });
        }
        if self.executable.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "executable",
                reason: "executable name must not be empty",
            });
        }
        Ok(())
    }

    /// Resolves the backend and clean flag for this launch.
    ///
    /// Logs a warning when the backend name is not recognised.
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            backend: Backend::resolve(&self.backend),
            clean: self.clean,
        }
    }
}
