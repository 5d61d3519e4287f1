use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stderr logger with a verbosity threshold that counts warnings
#[derive(Clone)]
pub struct CliLogger {
    level: LevelFilter,
    warnings: Arc<AtomicUsize>,
}

impl CliLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            warnings: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Pick the threshold from the `-v` / `-q` flags
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        let level = match (verbose, quiet) {
            (_, true) => LevelFilter::Error,
            (true, false) => LevelFilter::Debug,
            (false, false) => LevelFilter::Info,
        };
        Self::new(level)
    }

    /// Install as the global logger.
    ///
    /// The global filter never drops warnings, so they reach the counter
    /// even when `-q` hides them from stderr.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level.max(LevelFilter::Warn));
        Ok(())
    }

    /// Warnings logged so far, including ones below the display threshold
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    fn format(record: &Record) -> String {
        format!(
            "{} {:<5} {}",
            Local::now().format("%H:%M:%S"),
            record.level(),
            record.args()
        )
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_flags_pick_level() {
        assert_eq!(CliLogger::from_flags(false, false).level, LevelFilter::Info);
        assert_eq!(CliLogger::from_flags(true, false).level, LevelFilter::Debug);
        assert_eq!(CliLogger::from_flags(true, true).level, LevelFilter::Error);
    }

    // The global logger can only be installed once per test binary, so this
    // is the only test that calls `init`
    #[test]
    fn test_quiet_logger_counts_warnings() {
        let logger = CliLogger::from_flags(false, true);
        let counter = logger.clone();
        logger.init().unwrap();

        log::warn!("EXIF read failed");
        log::info!("Loaded 3 photos");

        assert_eq!(counter.warning_count(), 1);
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(!counter.enabled(&Metadata::builder().level(Level::Warn).build()));
    }
}
