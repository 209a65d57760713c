//! Per-user save files

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::SaveState;
use crate::auth::Identity;

/// Save and load errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no save found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("save file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `content` to `path` through a temp file and rename, so readers see
/// either the old file or the new one.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.sync_all()?;
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    Ok(())
}

/// Directory of save files, one per identity
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save file location for a user
    pub fn path_for(&self, identity: &Identity) -> PathBuf {
        self.dir.join(format!("{}_save.json", identity.save_key()))
    }

    pub fn exists(&self, identity: &Identity) -> bool {
        self.path_for(identity).is_file()
    }

    /// Write a save, replacing any previous one
    pub fn save(&self, identity: &Identity, state: &SaveState) -> Result<PathBuf, SaveError> {
        let path = self.path_for(identity);
        let content = serde_json::to_string_pretty(state)?;
        write_atomic(&path, &content)?;
        info!("Saved game for {} to {}", identity.username, path.display());
        Ok(path)
    }

    /// Read a save as raw JSON; interpretation is left to `restore`
    pub fn load(&self, identity: &Identity) -> Result<Value, SaveError> {
        let path = self.path_for(identity);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SaveError::NotFound(path));
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(serde_json::from_str(&content)?)
    }
}
