//! Temporary project roots for launcher tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use webgpu_launch::{LaunchSettings, DEFAULT_EXECUTABLE};

/// A throwaway directory standing in for the native project root.
///
/// Cloning shares the same directory; it is removed when the last clone
/// drops.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    dir: Arc<TempDir>,
}

impl ProjectFixture {
    /// Creates an empty project root.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
        Self { dir: Arc::new(dir) }
    }

    /// Project root path.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// `<root>/build-<backend>`.
    pub fn build_dir(&self, backend: &str) -> PathBuf {
        self.root().join(format!("build-{backend}"))
    }

    /// Where a Unix build leaves the executable.
    pub fn unix_executable(&self, backend: &str) -> PathBuf {
        self.build_dir(backend).join(DEFAULT_EXECUTABLE)
    }

    /// Settings rooted in this project for `backend`, other fields default.
    pub fn settings(&self, backend: &str) -> LaunchSettings {
        LaunchSettings {
            backend: backend.to_owned(),
            project_root: self.root().to_path_buf(),
            ..LaunchSettings::default()
        }
    }

    /// Creates a populated build directory as a previous run would leave it.
    ///
    /// # Panics
    /// Panics if the directory or its files cannot be written.
    pub fn seed_build_dir(&self, backend: &str) -> PathBuf {
        let dir = self.build_dir(backend);
        let nested = dir.join("CMakeFiles");
        fs::create_dir_all(&nested).unwrap_or_else(|e| panic!("failed to seed build dir: {e}"));
        fs::write(dir.join("CMakeCache.txt"), b"WEBGPU_BACKEND:STRING=STALE\n")
            .unwrap_or_else(|e| panic!("failed to seed cache: {e}"));
        dir
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
