//! Console output for the widget.
//!
//! Every module owns a named [`Logger`]. Filtering uses one process-wide threshold, which the
//! browser entry point takes from the `loglevel` attribute of the script tag.

use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{SecondsFormat, Utc};

static THRESHOLD: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Silent = 4,
}

impl LogLevel {
    /// Accepts `debug`, `info`, `warn`/`warning`, `error` and `silent`, in any case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "silent" => Some(LogLevel::Silent),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

pub fn set_log_level(level: LogLevel) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

pub fn log_level() -> LogLevel {
    LogLevel::from_u8(THRESHOLD.load(Ordering::Relaxed))
}

/// A message source, e.g. `@ga-embed/charts`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Logger {
    name: &'static str,
}

impl Logger {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Debug, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Error, message.as_ref());
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Silent || level < log_level() {
            return;
        }
        let line = format!(
            "[{}]  {}: {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.name,
            message
        );
        #[cfg(test)]
        capture::record(level, &line);
        write_line(level, &line);
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn write_line(level: LogLevel, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        LogLevel::Error => web_sys::console::error_1(&value),
        LogLevel::Warn => web_sys::console::warn_1(&value),
        LogLevel::Debug => web_sys::console::debug_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm-web")))]
fn write_line(level: LogLevel, line: &str) {
    if level >= LogLevel::Warn {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}
