use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const KEY_FILE: &str = "football_api_key";

/// The API-Football credential, stored as plain text exactly as typed.
pub trait KeyStore: Send {
    fn get(&self) -> Option<String>;
    fn set(&mut self, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(KEY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        non_blank(&raw)
    }

    fn set(&mut self, value: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("create key store dir")?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, value).context("write key store")?;
        fs::rename(&tmp, &self.path).context("swap key store")?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    value: Option<String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self) -> Option<String> {
        self.value.as_deref().and_then(non_blank)
    }

    fn set(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// Opens the file store under the config dir, or an in-memory one when no
/// config dir can be resolved.
pub fn open_default(config_dir: Option<&Path>) -> Box<dyn KeyStore> {
    match config_dir {
        Some(dir) => Box::new(FileKeyStore::in_dir(dir)),
        None => {
            tracing::warn!("no config dir available, football key will not persist");
            Box::new(MemoryKeyStore::new())
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
