use {
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        io::Write,
        time::{SystemTime, UNIX_EPOCH},
    },
};

/// Logger that prints every enabled record to stdout.
pub struct StdoutLogger {
    level: LevelFilter,
}

impl StdoutLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    pub fn format(record: &Record) -> String {
        format!(
            "{} [{}] [thread:{:?}] {} - {}",
            format_timestamp(),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", Self::format(record));
        }
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

/// Install `StdoutLogger` as the global logger.
///
/// Only the first call in a process takes effect, later calls are ignored.
pub fn init_stdout_logger(level: LevelFilter) {
    let logger: &'static StdoutLogger = Box::leak(Box::new(StdoutLogger::new(level)));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Current UTC time as YYYY-MM-DDTHH:MM:SS
pub fn format_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

// Howard Hinnant's days-to-civil algorithm
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_year() {
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_format_timestamp_structure() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[16..17], ":");
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = StdoutLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(log::Level::Debug).build();
        let warn = Metadata::builder().level(log::Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn test_format_contains_target_and_message() {
        let line = StdoutLogger::format(
            &Record::builder()
                .level(log::Level::Info)
                .target("dataset::loader")
                .args(format_args!("loaded 2 videos"))
                .build(),
        );
        assert!(line.contains("[INFO]"));
        assert!(line.contains("dataset::loader - loaded 2 videos"));
    }
}
