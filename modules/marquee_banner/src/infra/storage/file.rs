//! JSON file settings repository
//!
//! Each write goes to its own uniquely named temporary file in the target's
//! directory, which is then renamed over the target. Readers never observe a
//! half-written document and concurrent writers never share a temp file.

use crate::domain::repository::BannerSettingsRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct JsonFileSettingsRepository {
    path: PathBuf,
}

impl JsonFileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    temp.write_all(bytes)
        .with_context(|| format!("writing {}", temp.path().display()))?;
    temp.as_file().sync_all().context("flushing settings")?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl BannerSettingsRepository for JsonFileSettingsRepository {
    async fn load(&self) -> Result<Option<Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let document = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(document))
    }

    async fn store(&self, settings: Value) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&settings)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .context("settings writer task failed")?
    }
}
