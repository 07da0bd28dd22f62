//! Logging setup: env_logger behind the `log` facade, routed through
//! indicatif when progress bars are on screen.

use std::io::Write;

use indicatif::MultiProgress;

/// Dependencies whose debug output drowns the pipeline's own messages.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "native_tls"];

/// Padded label and ANSI color for a log level.
fn level_style(level: log::Level) -> (&'static str, &'static str) {
    match level {
        log::Level::Error => ("ERROR", "\x1b[31m"),
        log::Level::Warn => ("WARN ", "\x1b[33m"),
        log::Level::Info => ("INFO ", "\x1b[32m"),
        log::Level::Debug => ("DEBUG", "\x1b[36m"),
        log::Level::Trace => ("TRACE", "\x1b[35m"),
    }
}

/// Logger that prints through `MultiProgress::suspend` so lines never tear a bar.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.matches(record) {
            return;
        }
        let (label, ansi) = level_style(record.level());
        let line = format!("[{ansi}{label}\x1b[0m] {}", record.args());
        self.multi.suspend(|| eprintln!("{line}"));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn builder(debug: bool, quiet: bool) -> env_logger::Builder {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if std::env::var_os("RUST_LOG").is_none() {
        for target in NOISY_TARGETS {
            builder.filter_module(target, log::LevelFilter::Warn);
        }
    }
    builder
}

/// Initialize logging.
///
/// With `multi`, records go through the progress bars (TTY mode). Without it,
/// lines are plain `[LEVEL] message` for log files and CI output.
/// Calling this twice is harmless: the second logger is ignored.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    let mut builder = builder(debug, quiet);

    if let Some(multi) = multi {
        let logger = builder.format_timestamp_millis().build();
        let max_level = logger.filter();
        if log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone()))).is_ok() {
            log::set_max_level(max_level);
        }
    } else {
        let _ = builder
            .format(|buf, record| {
                let (label, _) = level_style(record.level());
                writeln!(buf, "[{label}] {}", record.args())
            })
            .try_init();
    }
}
