//! Best-effort file holding the latest flight search
//!
//! The file is overwritten on every save and truncated when the server
//! starts. Write failures are logged and otherwise ignored.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: Option<PathBuf>,
}

impl ResultsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that never touches the filesystem
    #[must_use]
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the file empty, discarding results from a previous run
    pub async fn reset(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match tokio::fs::write(path, b"{}").await {
            Ok(()) => debug!("Reset results file {}", path.display()),
            Err(e) => warn!("Failed to reset results file {}: {}", path.display(), e),
        }
    }

    /// Replace the file contents with `payload` as pretty JSON
    pub async fn save<T: Serialize>(&self, payload: &T) {
        let Some(path) = &self.path else {
            return;
        };

        let json = match serde_json::to_vec_pretty(payload) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize results for {}: {}", path.display(), e);
                return;
            }
        };

        if let Err(e) = tokio::fs::write(path, json).await {
            warn!("Failed to write results file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(dir.path().join("flight_results.json"));

        store.save(&json!({"offers": [1, 2, 3], "origin": "JFK"})).await;
        store.save(&json!({"offers": []})).await;

        let written = std::fs::read_to_string(store.path().unwrap()).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, json!({"offers": []}));
    }

    #[tokio::test]
    async fn test_reset_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight_results.json");
        std::fs::write(&path, "stale results").unwrap();

        ResultsStore::new(&path).reset().await;
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_ignored() {
        let store = ResultsStore::new("/definitely/not/here/results.json");
        store.save(&json!({"ok": true})).await;
        store.reset().await;
        ResultsStore::disabled().save(&json!({})).await;
    }
}
