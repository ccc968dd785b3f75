//! Captures `log` records emitted on the current thread.
//!
//! The capturing logger is installed as the process-wide logger on first
//! use, so a test binary using it must not install another one. Records
//! are buffered per thread, which keeps parallel tests apart.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Severity.
    pub level: Level,
    /// Rendered message.
    pub message: String,
}

thread_local! {
    static RECORDS: RefCell<Vec<CapturedRecord>> = const { RefCell::new(Vec::new()) };
}

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS.with(|records| {
            records.borrow_mut().push(CapturedRecord {
                level: record.level(),
                message: record.args().to_string(),
            });
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INSTALL: Once = Once::new();

/// Runs `f` and returns its result with the records it logged.
///
/// # Panics
/// Panics if a different logger was installed first.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedRecord>) {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER)
            .unwrap_or_else(|e| panic!("another logger is already installed: {e}"));
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
    let result = f();
    let captured = RECORDS.with(|records| records.borrow_mut().drain(..).collect());
    (result, captured)
}

/// Captured records at exactly `level`.
pub fn at_level(records: &[CapturedRecord], level: Level) -> Vec<&CapturedRecord> {
    records.iter().filter(|r| r.level == level).collect()
}
