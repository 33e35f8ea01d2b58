//! File-backed logger behind the `log` facade.
//!
//! All records go to `/tmp/neogrid_debug.log` on Unix/macOS, or
//! `%TEMP%\neogrid_debug.log` on Windows, so log output never mixes with the
//! editor's own terminal output. When `RUST_LOG` is set, records are also
//! mirrored to stderr.
//!
//! Level precedence: the `--log-level` flag, then `RUST_LOG`, then the config
//! file's `log_level` (applied after the config loads).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use neogrid_config::LogLevel;
use parking_lot::Mutex;

struct DebugLogger {
    file: Option<File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(mirror_stderr: bool) -> Self {
        let path = log_path();
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
            .ok();
        let mut logger = DebugLogger {
            file,
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "{}\nneogrid debug session started at {}\n{}\n",
            "=".repeat(80),
            timestamp(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();
static BRIDGE: LogBridge = LogBridge;
/// Set when the flag or `RUST_LOG` chose the level; the config may not override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(logger) = LOGGER.get() else {
            return;
        };
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let mut logger = logger.lock();
        if logger.mirror_stderr {
            eprint!("{line}");
        }
        logger.write_raw(&line);
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get()
            && let Some(ref mut file) = logger.lock().file
        {
            let _ = file.flush();
        }
    }
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::temp_dir().join("neogrid_debug.log")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp/neogrid_debug.log")
    }
}

/// Install the logger. `level_override` comes from the command line.
pub fn init_log_bridge(level_override: Option<LevelFilter>) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok());
    let mirror_stderr = std::env::var_os("RUST_LOG").is_some();

    let level = match (level_override, env_level) {
        (Some(level), _) | (None, Some(level)) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            level
        }
        (None, None) => LevelFilter::Info,
    };

    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new(mirror_stderr)));
    if log::set_logger(&BRIDGE).is_ok() {
        log::set_max_level(level);
    }
}

/// Apply the config file's level unless the flag or `RUST_LOG` chose one.
pub fn apply_config_level(level: LogLevel) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level.to_level_filter());
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}
