use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::state_dir;

const LOG_FILE: &str = "betmaster.log";
const DEFAULT_FILTER: &str = "info,betmaster_terminal=debug";

struct FileMakeWriter(File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = Box<dyn io::Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        }
    }
}

/// Returns the log path on success so the caller can mention it.
pub fn init_logging() -> Result<PathBuf> {
    let dir = state_dir().context("no state dir for log file")?;
    fs::create_dir_all(&dir).context("create log dir")?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(FileMakeWriter(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install subscriber: {err}"))?;

    tracing::info!("logging to {}", path.display());
    Ok(path)
}
