use log::{Level, LevelFilter, Log, Metadata, Record};

/// Sends `log` records to the browser console, tagged with the record target.
pub struct Logger;

static LOGGER: Logger = Logger;

impl Logger {
    /// Installs the console logger. Later calls are ignored.
    pub fn init() {
        let level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

fn line(record: &Record) -> String {
    format!("[{}] {}", record.target(), record.args())
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = line(record);
        match record.level() {
            Level::Error => gloo::console::error!(message),
            Level::Warn => gloo::console::warn!(message),
            Level::Info => gloo::console::info!(message),
            Level::Debug | Level::Trace => gloo::console::debug!(message),
        }
    }

    fn flush(&self) {}
}
