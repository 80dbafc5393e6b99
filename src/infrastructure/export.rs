//! JSON session export writer.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::models::{Session, SessionExport};

/// Writes finished sessions as pretty JSON documents.
#[derive(Debug, Clone)]
pub struct SessionExporter {
    dir: PathBuf,
}

impl SessionExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target file for a session: `<dir>/session-<id>.json`.
    pub fn path_for(&self, session: &Session) -> PathBuf {
        self.dir.join(format!("session-{}.json", session.id))
    }

    /// Serialise `session` and write it, creating the directory if needed.
    pub async fn export(&self, session: &Session) -> Result<PathBuf> {
        let document = SessionExport::from_session(session);
        let json = serde_json::to_string_pretty(&document).context("Failed to serialize session export")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create export directory {}", self.dir.display()))?;

        let path = self.path_for(session);
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(session_id = %session.id, path = %path.display(), "Session exported");
        Ok(path)
    }
}
