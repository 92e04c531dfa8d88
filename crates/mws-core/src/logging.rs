//! Tracing setup for applications embedding the client: a log file under the
//! XDG state dir, or stderr when that is not writable.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Default directive: chunk sends and throttle decisions at debug, the rest at info.
pub const DEFAULT_FILTER: &str = "info,mws_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Open `<state_home>/mws/mws.log` for appending, creating the directory.
fn open_log_file(state_home: &Path) -> Result<(PathBuf, fs::File)> {
    let log_dir = state_home.join("mws");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log dir {}", log_dir.display()))?;
    let path = log_dir.join("mws.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok((path, file))
}

/// Log to `~/.local/state/mws/mws.log` (appending). `RUST_LOG` overrides
/// [`DEFAULT_FILTER`]. Errors if the file cannot be opened so the caller can
/// fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mws")?;
    let (path, file) = open_log_file(&xdg_dirs.get_state_home())?;

    // Events write through `&File`, so one handle serves every thread.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(Arc::new(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "mws logging initialized");

    Ok(path)
}

/// Log to stderr. A subscriber installed earlier is left in place.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn log_file_lands_under_state_home_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let (path, file) = open_log_file(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("mws").join("mws.log"));

        let writer = Arc::new(file);
        writer.make_writer().write_all(b"first\n").unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        let (_, again) = open_log_file(dir.path()).unwrap();
        Arc::new(again).make_writer().write_all(b"third\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\nthird\n");
    }

    #[test]
    fn unwritable_state_home_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        assert!(open_log_file(&blocker).is_err());
    }

    #[test]
    fn stderr_init_is_idempotent() {
        init_logging_stderr();
        init_logging_stderr();
        tracing::debug!(operation = "GetMyPriceForSKU", "after init");
    }
}
