use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;
use std::path::Path;
use std::time::{Instant, SystemTime};

const RESET: &str = "\x1B[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1B[31m", // Red
        Level::Warn => "\x1B[33m",  // Yellow
        Level::Info => "\x1B[32m",  // Green
        Level::Debug => "\x1B[36m", // Cyan
        Level::Trace => "\x1B[35m", // Magenta
    }
}

/// Installs the global logger. `RUST_LOG` overrides the default `info` level.
pub fn setup_logging() {
    let colored = atty::is(atty::Stream::Stderr);

    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .format(move |buf, record| {
            let level = record.level();
            let timestamp = humantime::format_rfc3339_millis(SystemTime::now());
            let (open, close) = if colored {
                (level_color(level), RESET)
            } else {
                ("", "")
            };

            // Source location only for debug/trace
            if level >= Level::Debug {
                writeln!(
                    buf,
                    "{}{:>5}{} [{}] {} - {}:{}",
                    open,
                    level,
                    close,
                    timestamp,
                    record.args(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )
            } else {
                writeln!(
                    buf,
                    "{}{:>5}{} [{}] {}",
                    open,
                    level,
                    close,
                    timestamp,
                    record.args()
                )
            }
        })
        .init();
}

#[macro_export]
macro_rules! log_request {
    ($request_line:expr) => {{
        let mut parts = $request_line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(method), Some(target)) => log::info!("→ {} {}", method, target),
            _ => log::info!("→ Malformed request line: {}", $request_line.trim()),
        }
    }};
}

#[macro_export]
macro_rules! log_response {
    ($status:expr, $duration:expr, $size:expr) => {
        log::info!("← {} ({:?}) - {} bytes", $status, $duration, $size)
    };
}

#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        log::error!("❌ {} - {}", $context, $error)
    };
}

/// Human-readable subject for log lines.
pub trait Loggable {
    fn log_description(&self) -> String;
}

impl Loggable for str {
    fn log_description(&self) -> String {
        self.to_string()
    }
}

impl Loggable for Path {
    fn log_description(&self) -> String {
        self.display().to_string()
    }
}

pub trait LoggingExt: Loggable {
    /// Runs `f`, logging its start and elapsed time at debug and any
    /// failure at error.
    fn log_operation<F, T, E>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display;
}

impl<S: ?Sized + Loggable> LoggingExt for S {
    fn log_operation<F, T, E>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        log::debug!("Starting {} on {}", operation, self.log_description());
        let result = f();
        match &result {
            Ok(_) => log::debug!(
                "Completed {} on {} in {:?}",
                operation,
                self.log_description(),
                started.elapsed()
            ),
            Err(e) => log::error!(
                "Failed {} on {}: {}",
                operation,
                self.log_description(),
                e
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn log_operation_passes_results_through() {
        let ok: Result<u32, io::Error> = Path::new("a.png").log_operation("read", || Ok(7));
        assert_eq!(ok.unwrap(), 7);

        let err: Result<(), io::Error> = "GET /".log_operation("serve", || {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        });
        assert_eq!(err.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn path_description_uses_display() {
        assert_eq!(Path::new("docs/index.html").log_description(), "docs/index.html");
    }
}
