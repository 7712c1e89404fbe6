//! Stderr logger for native hosts
//!
//! The core only emits through the `log` facade. Native runners call
//! [`init_stderr`] once; WASM hosts install their own backend.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[NES Core] {:<5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger at `level`. Later calls only change the level.
pub fn init_stderr(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
