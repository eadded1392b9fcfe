//! Directory-backed ticket queue.
//!
//! The storefront is the only producer; the companion bot (or `dm-cli
//! tickets drain`) consumes. Each write goes to its own hidden
//! `.ticket_<id>.<uuid>.tmp` file and is renamed into place, so a consumer
//! listing `ticket_*.json` never sees a half-written ticket and concurrent
//! writes for one id never share a temp file.

use std::path::{Path, PathBuf};

use donut_market_core::{Ticket, TransactionId};
use serde_json::{Value, json};
use uuid::Uuid;

use super::RelayError;

const FILE_PREFIX: &str = "ticket_";
const FILE_SUFFIX: &str = ".json";

/// A directory of pending `ticket_<transactionId>.json` files.
#[derive(Debug, Clone)]
pub struct FileDropQueue {
    dir: PathBuf,
}

impl FileDropQueue {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the ticket for `id` lands.
    #[must_use]
    pub fn ticket_path(&self, id: &TransactionId) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }

    /// Write the ticket, creating the directory if needed.
    ///
    /// A ticket with the same transaction id replaces the earlier file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UnusableId`] if the transaction id cannot name a
    /// file, or an I/O error if the directory or file cannot be written.
    pub async fn enqueue(&self, ticket: &Ticket) -> Result<Value, RelayError> {
        let id = ticket.file_id()?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| RelayError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.ticket_path(&id);
        let tmp_path = self.dir.join(format!(".{FILE_PREFIX}{id}.{}.tmp", Uuid::new_v4()));

        let body = serde_json::to_vec_pretty(ticket).map_err(|source| RelayError::Json {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&tmp_path, body)
            .await
            .map_err(|source| RelayError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        if let Err(source) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(RelayError::Io { path, source });
        }

        tracing::info!(
            transaction_id = %id,
            path = %path.display(),
            "Ticket file written"
        );

        Ok(json!({
            "success": true,
            "ticket_id": ticket.transaction_id,
        }))
    }

    /// Pending ticket files in name order. A missing directory is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed.
    pub async fn pending(&self) -> Result<Vec<PathBuf>, RelayError> {
        let io_err = |source: std::io::Error| RelayError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Parse one ticket file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a ticket.
    pub async fn read(&self, path: &Path) -> Result<Ticket, RelayError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RelayError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| RelayError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove a handled ticket file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub async fn acknowledge(&self, path: &Path) -> Result<(), RelayError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|source| RelayError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "Ticket file acknowledged");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ticket(id: &str) -> Ticket {
        Ticket {
            buyer: json!("Steve"),
            discord: json!("steve#0001"),
            transaction_id: json!(id),
            total_amount: json!("16.20"),
            items: json!([{"name": "DonutSMP Coins", "amount": "100M"}]),
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_enqueue_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(root.path().join("tickets"));

        let receipt = queue.enqueue(&ticket("TXN1")).await.unwrap();
        assert_eq!(receipt, json!({"success": true, "ticket_id": "TXN1"}));

        let path = root.path().join("tickets/ticket_TXN1.json");
        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["buyer"], "Steve");
        assert_eq!(written["transactionId"], "TXN1");
        assert_eq!(written["items"][0]["amount"], "100M");
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());
        queue.enqueue(&ticket("TXN1")).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("ticket_TXN1.json")).unwrap();
        assert!(text.contains("\n  \"buyer\": \"Steve\""));
    }

    #[tokio::test]
    async fn test_numeric_id_keeps_its_type() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());
        let mut numeric = ticket("unused");
        numeric.transaction_id = json!(1_700_000_000_000_u64);

        let receipt = queue.enqueue(&numeric).await.unwrap();
        assert_eq!(receipt["ticket_id"], 1_700_000_000_000_u64);

        let path = dir.path().join("ticket_1700000000000.json");
        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["transactionId"], 1_700_000_000_000_u64);
    }

    #[tokio::test]
    async fn test_unusable_id_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(root.path().join("tickets"));

        for id in ["../escape", "ORDER #42", ".hidden"] {
            let err = queue.enqueue(&ticket(id)).await.unwrap_err();
            assert!(matches!(err, RelayError::UnusableId(_)), "{id}");
        }
        assert!(!root.path().join("tickets").exists());
        assert!(!root.path().join("escape").exists());
    }

    #[tokio::test]
    async fn test_same_id_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());

        queue.enqueue(&ticket("TXN1")).await.unwrap();
        let mut second = ticket("TXN1");
        second.buyer = json!("Alex");
        queue.enqueue(&second).await.unwrap();

        let pending = queue.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(queue.read(&pending[0]).await.unwrap().buyer, "Alex");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_id_writes_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());

        let writes: Vec<_> = (0..16)
            .map(|n| {
                let queue = queue.clone();
                let mut ticket = ticket("TXN1");
                ticket.buyer = json!(format!("buyer-{n}"));
                tokio::spawn(async move { queue.enqueue(&ticket).await })
            })
            .collect();

        for write in writes {
            let receipt = write.await.unwrap().unwrap();
            assert_eq!(receipt["ticket_id"], "TXN1");
        }

        assert_eq!(file_names(dir.path()), ["ticket_TXN1.json"]);
        let survivor = queue.read(&dir.path().join("ticket_TXN1.json")).await.unwrap();
        assert!(survivor.buyer.as_str().unwrap().starts_with("buyer-"));
    }

    #[tokio::test]
    async fn test_pending_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());

        queue.enqueue(&ticket("B2")).await.unwrap();
        queue.enqueue(&ticket("A1")).await.unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();
        std::fs::write(dir.path().join(".ticket_C3.0f1e.tmp"), "{").unwrap();

        let names: Vec<_> = queue
            .pending()
            .await
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["ticket_A1.json", "ticket_B2.json"]);
    }

    #[tokio::test]
    async fn test_pending_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path().join("absent"));
        assert!(queue.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_invalid_file_is_left_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());
        let path = dir.path().join("ticket_bad.json");
        std::fs::write(&path, "not json").unwrap();

        let err = queue.read(&path).await.unwrap_err();
        assert!(matches!(err, RelayError::Json { .. }));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_acknowledge_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileDropQueue::new(dir.path());
        queue.enqueue(&ticket("TXN1")).await.unwrap();

        let pending = queue.pending().await.unwrap();
        queue.acknowledge(&pending[0]).await.unwrap();
        assert!(queue.pending().await.unwrap().is_empty());
        assert!(queue.acknowledge(&pending[0]).await.is_err());
    }
}
