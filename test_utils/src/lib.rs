//! Utility helpers for tests.
//!
//! [`RecordingRunner`] stands in for CMake and the built app, and
//! [`ProjectFixture`] owns a throwaway project root. [`capture_logs`]
//! collects the log records a closure emits.

pub mod logs;
pub mod project;
pub mod runner;

pub use logs::{at_level, capture_logs, CapturedRecord};
pub use project::ProjectFixture;
pub use runner::{RecordedCall, RecordingRunner};

/// Assert that all strings in `keys` are present in `text`.
///
/// # Panics
/// Panics with a helpful message if any key is missing.
pub fn assert_all_present(text: &str, keys: &[&str]) {
    for key in keys {
        assert!(text.contains(key), "{key} not found in `{text}`");
    }
}

/// Assert that all strings in `keys` are absent from `text`.
///
/// # Panics
/// Panics with a helpful message if any key is found.
pub fn assert_all_absent(text: &str, keys: &[&str]) {
    for key in keys {
        assert!(!text.contains(key), "{key} should not be present in `{text}`");
    }
}
