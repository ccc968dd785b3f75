//! Where the build directory lives and where CMake leaves the executable.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::Backend;

/// Executable name produced by the native project.
pub const DEFAULT_EXECUTABLE: &str = "LearnWebGPU";

/// Configuration subfolder used by multi-config generators on Windows.
const WINDOWS_CONFIG_DIR: &str = "Debug";

/// Operating system family that decides the executable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    /// Visual Studio generators nest output under a configuration folder.
    Windows,
    /// Single-config generators put the binary directly in the build folder.
    Unix,
}

impl TargetPlatform {
    /// Platform this launcher was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("Windows"),
            Self::Unix => f.write_str(unix_system_name(std::env::consts::OS)),
        }
    }
}

/// Kernel name as `uname -s` reports it for the common Unix targets.
fn unix_system_name(os: &str) -> &str {
    match os {
        "linux" | "android" => "Linux",
        "macos" | "ios" => "Darwin",
        "freebsd" => "FreeBSD",
        "netbsd" => "NetBSD",
        "openbsd" => "OpenBSD",
        other => other,
    }
}

/// Derived paths for one backend inside one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    project_root: PathBuf,
    backend: Backend,
    platform: TargetPlatform,
    executable: String,
}

impl BuildLayout {
    /// Creates a layout for `backend` rooted at `project_root`.
    pub fn new(
        project_root: impl Into<PathBuf>,
        backend: Backend,
        platform: TargetPlatform,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            backend,
            platform,
            executable: executable.into(),
        }
    }

    /// Directory CMake runs from.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Backend the layout was derived from.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Build directory relative to the project root: `build-<backend>`.
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        PathBuf::from(format!("build-{}", self.backend))
    }

    /// Build directory joined onto the project root.
    #[must_use]
    pub fn build_path(&self) -> PathBuf {
        self.project_root.join(self.build_dir())
    }

    /// Executable path relative to the project root.
    ///
    /// `build-<backend>/Debug/<name>.exe` on Windows and
    /// `build-<backend>/<name>` elsewhere.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        match self.platform {
            TargetPlatform::Windows => self
                .build_dir()
                .join(WINDOWS_CONFIG_DIR)
                .join(format!("{}.exe", self.executable)),
            TargetPlatform::Unix => self.build_dir().join(&self.executable),
        }
    }
}
