//! WebGPU backend identifiers understood by the native project.
//!
//! The CMake project selects its WebGPU implementation through the
//! `WEBGPU_BACKEND` cache variable. Only two values are recognised; anything
//! else is coerced to the default with a warning rather than rejected.

use std::fmt;

use log::warn;

/// Name of the CMake cache variable carrying the backend choice.
pub const BACKEND_VARIABLE: &str = "WEBGPU_BACKEND";

/// WebGPU implementation the app is built against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// `wgpu-native`, the Rust implementation.
    #[default]
    Wgpu,
    /// Google's Dawn.
    Dawn,
}

impl Backend {
    /// Every recognised backend, default first.
    pub const ALL: [Self; 2] = [Self::Wgpu, Self::Dawn];

    /// Lower-case identifier used on the command line and in folder names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgpu => "wgpu",
            Self::Dawn => "dawn",
        }
    }

    /// Value assigned to [`BACKEND_VARIABLE`] at configure time.
    #[must_use]
    pub const fn cmake_value(self) -> &'static str {
        match self {
            Self::Wgpu => "WGPU",
            Self::Dawn => "DAWN",
        }
    }

    /// Looks up an identifier exactly as written. Matching is case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|backend| backend.as_str() == name)
    }

    /// Resolves user input to a backend, falling back to the default.
    ///
    /// Unknown names (including the empty string) log a warning and yield
    /// [`Backend::Wgpu`]. This never fails.
    ///
    /// # Examples
    /// ```rust
    /// use webgpu_launch::Backend;
    ///
    /// assert_eq!(Backend::resolve("dawn"), Backend::Dawn);
    /// assert_eq!(Backend::resolve("opengl"), Backend::Wgpu);
    /// ```
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!("invalid backend option \"{name}\"; defaulting to {fallback}");
            fallback
        })
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
