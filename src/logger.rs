use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Runtime switches shared by the `log` backend and the tracing writer
#[derive(Default)]
struct LoggerState {
    enabled: bool,
    to_stderr: bool,
    verbose: bool,
    file: Option<std::fs::File>,
}

static STATE: std::sync::LazyLock<Mutex<LoggerState>> =
    std::sync::LazyLock::new(|| Mutex::new(LoggerState::default()));

struct MuseLogger;

static LOGGER: MuseLogger = MuseLogger;

/// Targets that flood the output with connection-level detail
const NOISY_TARGETS: &[&str] = &["reqwest", "hyper", "h2", "rustls", "want", "mio", "tower"];

fn write_line(state: &mut LoggerState, line: &[u8]) {
    if let Some(file) = state.file.as_mut() {
        let _ = file.write_all(line);
        let _ = file.flush();
    }
    if state.to_stderr {
        let _ = io::stderr().write_all(line);
    }
}

/// Writer for tracing events, sharing the destinations of the `log` backend
#[derive(Clone)]
struct SharedWriter;

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = STATE.lock();
        if state.enabled {
            write_line(&mut state, buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = STATE.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriter
    }
}

impl log::Log for MuseLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let state = STATE.lock();
        if !state.enabled {
            return false;
        }

        let target = metadata.target();
        if target.starts_with("project_muse") {
            return metadata.level() <= Level::Debug;
        }

        // Rig logs show tool calls and model turns
        if target.starts_with("rig") {
            return metadata.level() <= Level::Info;
        }

        if !state.verbose && NOISY_TARGETS.iter().any(|t| target.starts_with(t)) {
            return false;
        }

        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!(
            "{} {} [{}] - {}\n",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        );
        write_line(&mut STATE.lock(), line.as_bytes());
    }

    fn flush(&self) {}
}

/// Initialize the unified `log` + `tracing` logging system.
///
/// Safe to call more than once; only the first call installs the backends.
/// Logging starts disabled until [`enable_logging`] is called.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::{Once, OnceLock};
    static INIT: Once = Once::new();
    static INIT_RESULT: OnceLock<Result<(), String>> = OnceLock::new();

    INIT.call_once(|| {
        let verbose_from_env = std::env::var("PROJECT_MUSE_VERBOSE").is_ok()
            || std::env::var("RUST_LOG").is_ok_and(|v| v.contains("debug") || v.contains("trace"));
        set_verbose_logging(verbose_from_env);

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "project_muse=debug,rig=info,tower_http=info,warn".into());

        let fmt_layer = fmt::Layer::new()
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(SharedWriter);

        let tracing_result = Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();

        let log_result = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug));

        let result = match (tracing_result, log_result) {
            (Ok(()), _) | (Err(_), Ok(())) => Ok(()),
            (Err(tracing_err), Err(log_err)) => Err(format!(
                "Failed to initialize logging: tracing={tracing_err}, log={log_err}"
            )),
        };

        let _ = INIT_RESULT.set(result);
    });

    match INIT_RESULT.get() {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(e.clone().into()),
        None => Err("Initialization failed unexpectedly".into()),
    }
}

pub fn enable_logging() {
    STATE.lock().enabled = true;
}

pub fn disable_logging() {
    STATE.lock().enabled = false;
}

pub fn is_logging_enabled() -> bool {
    STATE.lock().enabled
}

/// Include HTTP client internals in the log output
pub fn set_verbose_logging(enabled: bool) {
    STATE.lock().verbose = enabled;
}

pub fn set_log_file(file_path: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;

    STATE.lock().file = Some(file);
    Ok(())
}

/// Echo log lines to stderr, used by the server where there is no terminal UI to protect
pub fn set_log_to_stderr(enabled: bool) {
    STATE.lock().to_stderr = enabled;
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}
