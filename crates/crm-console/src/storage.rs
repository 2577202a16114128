//! File-backed session storage for the CLI

use crm_core::{CoreError, SessionStorage};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Session persisted as JSON in one file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/crm-console/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("crm-console").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read session file");
                None
            }
        }
    }

    fn store(&self, raw: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        // Atomic replace via a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .map_err(|e| CoreError::storage(format!("cannot write {}: {e}", tmp.display())))?;
        restrict_permissions(&tmp);
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| CoreError::storage(format!("cannot replace {}: {e}", self.path.display())))
    }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Cannot remove session file"),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), error = %e, "Cannot restrict session file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::models::{Credentials, Identity};
    use crm_core::{Session, SessionStore};
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(
            "ACME",
            Identity {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
            },
            Credentials::ApiKey {
                key: "k".to_string(),
                secret: "s".to_string(),
            },
        )
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert!(storage.load().is_none());
        storage.remove();
    }

    #[test]
    fn test_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("nested")
            .join("crm-console")
            .join("session.json");
        let storage = FileStorage::new(&path);

        storage.store("{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_session_store_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path().join("session.json")));
        let store = SessionStore::new(storage.clone());

        let session = session();
        store.set(&session).unwrap();
        let reopened = SessionStore::new(Arc::new(FileStorage::new(storage.path())));
        assert_eq!(reopened.get(), Some(session));
        assert_eq!(
            reopened.authorization_header().as_deref(),
            Some("token k:s")
        );

        assert!(reopened.clear());
        assert!(!storage.path().exists());
        assert!(!store.is_valid());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.store("{}").unwrap();

        let mode = std::fs::metadata(storage.path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
