//! Session store — the single slot holding the credential token.
//!
//! `SessionStore` is the storage seam (file on disk in production, memory in
//! tests). `Session` is the cheap-to-clone handle injected into the exchanger,
//! the guard and the gateway; it adds the validity check on top of storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::token;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to write session file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove session file {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Storage for the raw token string. Absent slot means unauthenticated.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Removing an absent token is a no-op.
    fn clear(&self) -> Result<(), SessionError>;
}

// ============================================================================
// FileSessionStore
// ============================================================================

/// Persists the token in a single file. The file lives until `clear` is called
/// or it is deleted externally; expiry is not enforced here.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.display_path(), error = %e, "Could not read session file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let write_err = |source: std::io::Error| SessionError::Write {
            path: self.display_path(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(&self.path, token).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.display_path(),
                source,
            }),
        }
    }
}

// ============================================================================
// MemorySessionStore
// ============================================================================

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
        Ok(())
    }
}

// ============================================================================
// Session handle
// ============================================================================

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.current_token().is_some())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn save(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(token)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }

    pub fn current_token(&self) -> Option<String> {
        self.store.get()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// False when no token is stored, the token does not decode, or its expiry
    /// is not strictly after `now`. Never fails.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.current_token() {
            Some(token) => token::is_unexpired(&token, now),
            None => false,
        }
    }

    /// Expiry of the stored token, if there is one and it decodes.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.current_token()
            .and_then(|t| token::decode_expiry(&t).ok())
    }
}
