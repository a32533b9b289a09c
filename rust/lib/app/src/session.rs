//! Session persistence — keeps the JWT across restarts.
//!
//! Login and register save the token, logout clears it, startup reads
//! it back and feeds `app/load`. Handlers treat persistence failures
//! as non-fatal: the in-memory session is already live.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the JWT lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The persisted token, if any.
    async fn load(&self) -> Result<Option<String>, SessionError>;
    /// Persist a fresh token.
    async fn save(&self, token: &str) -> Result<(), SessionError>;
    /// Forget the token.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Token file on disk. A missing file means no session.
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSession {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session for tests and the demo binary.
#[derive(Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.read().unwrap().clone())
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().unwrap() = None;
        Ok(())
    }
}
