use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::subscriber::Subscriber;

/// JSON document holding every subscriber, in insertion order.
///
/// `list` never fails: a missing, unreadable or corrupt document is an empty list. Writes rewrite
/// the whole document, so they go through `write_lock` to keep concurrent requests from
/// overwriting each other's records. A write refuses to run on top of a document it could not
/// read.
pub struct SubscriberStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, PartialEq)]
pub enum StoreInsert {
    Inserted,
    AlreadyPresent,
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create the data directory {path}.")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read the subscribers from {path}.")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize the subscribers.")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write the subscribers to {path}.")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = std::error::Error::source(self) {
            write!(f, "\nCaused by:\n\t{}", source)?;
        }
        Ok(())
    }
}

enum Document {
    Missing,
    Parsed(Vec<Subscriber>),
    Corrupt,
    Unreadable(std::io::Error),
}

impl SubscriberStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        SubscriberStore {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[tracing::instrument(name = "Reading the subscribers", skip(self), fields(path = %self.path.display()))]
    pub async fn list(&self) -> Vec<Subscriber> {
        match self.read().await {
            Document::Parsed(subscribers) => subscribers,
            Document::Missing | Document::Corrupt | Document::Unreadable(_) => Vec::new(),
        }
    }

    /// Adds the record at the end of the document, even when its email is already stored.
    #[tracing::instrument(
        name = "Appending a subscriber",
        skip(self, subscriber),
        fields(subscriber_email = %subscriber.email)
    )]
    pub async fn append(&self, subscriber: Subscriber) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.read_for_update().await?;

        subscribers.push(subscriber);
        self.write(&subscribers).await
    }

    /// Duplicate check and append as one step. Emails are compared exactly.
    #[tracing::instrument(
        name = "Inserting a subscriber if absent",
        skip(self, subscriber),
        fields(subscriber_email = %subscriber.email)
    )]
    pub async fn insert_if_absent(&self, subscriber: Subscriber) -> Result<StoreInsert, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut subscribers = self.read_for_update().await?;

        if subscribers.iter().any(|stored| stored.email == subscriber.email) {
            return Ok(StoreInsert::AlreadyPresent);
        }

        subscribers.push(subscriber);
        self.write(&subscribers).await?;

        Ok(StoreInsert::Inserted)
    }

    async fn read(&self) -> Document {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Document::Missing,
            Err(err) => {
                tracing::warn!("Failed to read {}: {:?}", self.path.display(), err);
                return Document::Unreadable(err);
            }
        };

        match serde_json::from_str(&content) {
            Ok(subscribers) => Document::Parsed(subscribers),
            Err(err) => {
                tracing::warn!("{} is not a valid subscribers document: {:?}", self.path.display(), err);
                Document::Corrupt
            }
        }
    }

    // A corrupt document is moved aside before the rewrite so its content is never lost. An
    // unreadable one is left alone: its content may be perfectly valid.
    async fn read_for_update(&self) -> Result<Vec<Subscriber>, StoreError> {
        match self.read().await {
            Document::Parsed(subscribers) => Ok(subscribers),
            Document::Missing => Ok(Vec::new()),
            Document::Unreadable(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
            Document::Corrupt => {
                let backup = self.sibling(&format!("corrupt-{}", Utc::now().timestamp()));

                tracing::warn!("Moving unreadable subscribers document to {}", backup.display());

                tokio::fs::rename(&self.path, &backup)
                    .await
                    .map_err(|source| StoreError::Write { path: backup, source })?;

                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, subscribers: &[Subscriber]) -> Result<(), StoreError> {
        if let Some(directory) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(directory)
                .await
                .map_err(|source| StoreError::CreateDirectory {
                    path: directory.to_path_buf(),
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(subscribers)?;
        let temporary = self.sibling(&format!("{}.tmp", Uuid::new_v4()));

        tokio::fs::write(&temporary, content)
            .await
            .map_err(|source| StoreError::Write {
                path: temporary.clone(),
                source,
            })?;

        if let Err(source) = tokio::fs::rename(&temporary, &self.path).await {
            let _ = tokio::fs::remove_file(&temporary).await;
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".");
        file_name.push(suffix);

        self.path.with_file_name(file_name)
    }
}
