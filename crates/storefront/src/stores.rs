//! Per-store JSON configuration read from disk.
//!
//! Each `*.json` file in the stores directory describes one store. Files
//! are read on every request; nothing is cached.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// File served by `/api/store-config`.
pub const DEFAULT_STORE_FILE: &str = "config.json";

/// Errors that can occur when loading store configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid store file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store file {} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Read-only view of the stores directory.
#[derive(Debug, Clone)]
pub struct StoreDirectory {
    dir: PathBuf,
}

impl StoreDirectory {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The default store's configuration, returned as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.json` is missing or not valid JSON.
    pub async fn load_config(&self) -> Result<Value, StoreError> {
        read_json(&self.dir.join(DEFAULT_STORE_FILE)).await
    }

    /// Every valid store object, in file name order.
    ///
    /// Each object gets a `storeId` equal to its file stem unless it already
    /// carries a non-empty one. Unreadable, malformed and non-object files
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be listed.
    pub async fn load_all(&self) -> Result<Vec<Value>, StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut stores = Vec::with_capacity(files.len());
        for path in files {
            match load_store(&path).await {
                Ok(store) => stores.push(Value::Object(store)),
                Err(e) => tracing::warn!(error = %e, "Skipping store file"),
            }
        }
        Ok(stores)
    }
}

async fn load_store(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let Value::Object(mut store) = read_json(path).await? else {
        return Err(StoreError::NotAnObject(path.to_path_buf()));
    };

    let has_id = match store.get("storeId") {
        None | Some(Value::Null) => false,
        Some(Value::String(id)) => !id.is_empty(),
        Some(_) => true,
    };
    if !has_id {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        store.insert("storeId".to_string(), Value::String(stem));
    }

    Ok(store)
}

async fn read_json(path: &Path) -> Result<Value, StoreError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config.json", r#"{"name": "DonutMarket", "currency": "USD"}"#);

        let stores = StoreDirectory::new(dir.path());
        let config = stores.load_config().await.unwrap();
        assert_eq!(config, json!({"name": "DonutMarket", "currency": "USD"}));
    }

    #[tokio::test]
    async fn test_load_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreDirectory::new(dir.path()).load_config().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_all_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "alpha.json", r#"{"name": "Alpha"}"#);
        write(dir.path(), "beta.json", r#"{"name": "Beta", "storeId": "beta-store"}"#);
        write(dir.path(), "broken.json", "{not json");
        write(dir.path(), "list.json", "[1, 2]");
        write(dir.path(), "readme.txt", "ignored");

        let stores = StoreDirectory::new(dir.path()).load_all().await.unwrap();
        assert_eq!(
            stores,
            vec![
                json!({"name": "Alpha", "storeId": "alpha"}),
                json!({"name": "Beta", "storeId": "beta-store"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_store_id_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gamma.json", r#"{"storeId": ""}"#);
        write(dir.path(), "delta.json", r#"{"storeId": null}"#);

        let stores = StoreDirectory::new(dir.path()).load_all().await.unwrap();
        assert_eq!(stores[0]["storeId"], "delta");
        assert_eq!(stores[1]["storeId"], "gamma");
    }

    #[tokio::test]
    async fn test_load_all_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = StoreDirectory::new(dir.path().join("absent")).load_all().await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
