//! Log output for thermoconv.
//! The TUI owns the terminal, so records go to a file instead of stderr.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Opens (and truncates) the log file, creating parent directories as needed
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

/// Formats a record the way it is written to the log file
fn format_line(level: log::Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{timestamp} {level} {target}] {args}")
}

/// Routes `log` records to `path`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(record.level(), record.target(), record.args())
            )
        })
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}
