//! Logger setup
//!
//! The library logs through the `log` facade; the binary picks where the
//! records go. The TUI owns the terminal, so while it runs records go to a
//! file or nowhere. `RUST_LOG` overrides the default `info` filter.

use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

/// Destination for log records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Truncated on start
    File(PathBuf),
    Off,
}

/// Install the global logger. Calling it twice keeps the first logger.
pub fn init(target: LogTarget) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?;
            builder.target(Target::Pipe(Box::new(file)));
            builder.write_style(env_logger::WriteStyle::Never);
        }
    }
    if builder.try_init().is_err() {
        log::debug!("logger already installed");
    }
    Ok(())
}
