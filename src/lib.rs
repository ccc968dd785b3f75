//! Configure, build and launch the LearnWebGPU app against a chosen WebGPU
//! backend.
//!
//! The library drives CMake as an external process: an optional clean of
//! `build-<backend>`, a configure step carrying `WEBGPU_BACKEND`, a build
//! step, then the produced executable. The `webgpu-launch` binary wraps
//! [`launch`] with command-line parsing and layered settings.
pub mod backend;
pub mod config;
pub mod error;
pub mod launcher;
pub mod layout;
pub mod logging;
pub mod process;

pub use backend::{Backend, BACKEND_VARIABLE};
pub use config::{BuildConfig, LaunchSettings, SettingsOverrides, CONFIG_FILE, ENV_PREFIX};
pub use error::{ConfigError, LaunchError};
pub use launcher::{clean_build_dir, launch, launch_with, LaunchReport, Step};
pub use layout::{BuildLayout, TargetPlatform, DEFAULT_EXECUTABLE};
pub use logging::init as init_logging;
pub use process::{CommandRunner, Invocation, StepStatus, SystemRunner};
