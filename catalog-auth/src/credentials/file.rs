//! Credential store persisted as a small JSON document on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::encryption::Cipher;
use super::{CredentialPair, Store, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::{credential_error, CredentialErrorKind, Error};

/// Credential store that survives process restarts.
///
/// The document is a flat JSON object holding the two fixed keys. Writes go to
/// a sibling temporary file that is then renamed over the original, so a
/// crash mid-write leaves the previous pair intact. A document holding only
/// one of the two keys is treated as signed out.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cipher: Option<Cipher>,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store at `path` with values kept in plaintext.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cipher: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `path` with both values sealed by `cipher`.
    pub fn encrypted(path: impl Into<PathBuf>, cipher: Cipher) -> Self {
        Self {
            path: path.into(),
            cipher: Some(cipher),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Option<(SecretString, SecretString)>, Error> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries: BTreeMap<String, String> = serde_json::from_slice(&raw).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::error::ErrorKind::Credential(CredentialErrorKind::Storage),
        })?;

        match (entries.get(ACCESS_TOKEN_KEY), entries.get(REFRESH_TOKEN_KEY)) {
            (Some(access), Some(refresh)) => Ok(Some((
                SecretString::from(self.unseal(access)?),
                SecretString::from(self.unseal(refresh)?),
            ))),
            (None, None) => Ok(None),
            _ => {
                warn!(
                    "Ignoring partial credential document at {}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn seal(&self, value: &str) -> Result<String, Error> {
        match &self.cipher {
            Some(cipher) => cipher.seal(value),
            None => Ok(value.to_string()),
        }
    }

    fn unseal(&self, value: &str) -> Result<String, Error> {
        match &self.cipher {
            Some(cipher) => cipher.open(value),
            None => Ok(value.to_string()),
        }
    }

    async fn write_document(&self, entries: &BTreeMap<&str, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let document = serde_json::to_vec_pretty(entries).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::error::ErrorKind::Credential(CredentialErrorKind::Storage),
        })?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let mut file = open_private(&staging).await?;
        file.write_all(&document).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

/// Opens `path` for writing, readable by the owner only on Unix.
async fn open_private(path: &Path) -> std::io::Result<tokio::fs::File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let file = options.open(path).await?;
    // A staging file left behind by an earlier crash keeps its old mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    Ok(file)
}

#[async_trait]
impl Store for FileStore {
    async fn access_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.read_entries().await?.map(|(access, _)| access))
    }

    async fn refresh_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.read_entries().await?.map(|(_, refresh)| refresh))
    }

    async fn replace(&self, pair: CredentialPair) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        let mut entries = BTreeMap::new();
        entries.insert(ACCESS_TOKEN_KEY, self.seal(pair.access_token.expose_secret())?);
        entries.insert(
            REFRESH_TOKEN_KEY,
            self.seal(pair.refresh_token.expose_secret())?,
        );

        self.write_document(&entries).await?;
        debug!("Stored credentials at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Cleared credentials at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(credential_error(
                CredentialErrorKind::Storage,
                &format!("Failed to remove {}: {}", self.path.display(), e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn pair(access: &str, refresh: &str) -> CredentialPair {
        CredentialPair::new(
            SecretString::from(access.to_string()),
            SecretString::from(refresh.to_string()),
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_credentials_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::new(&path);

        store.replace(pair("a1", "r1")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_missing_file_means_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        assert!(store.access_token().await.unwrap().is_none());
        assert!(store.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_persists_under_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");
        let store = FileStore::new(&path);

        store.replace(pair("a1", "r1")).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[ACCESS_TOKEN_KEY], "a1");
        assert_eq!(entries[REFRESH_TOKEN_KEY], "r1");

        // A second handle on the same file sees the pair.
        let reopened = FileStore::new(&path);
        let access = reopened.access_token().await.unwrap().unwrap();
        assert_eq!(access.expose_secret(), "a1");
    }

    #[tokio::test]
    async fn test_clear_removes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::new(&path);

        store.replace(pair("a1", "r1")).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!path.exists());
        assert!(store.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_document_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, format!(r#"{{"{}":"a1"}}"#, ACCESS_TOKEN_KEY)).unwrap();

        let store = FileStore::new(&path);
        assert!(store.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_encrypted_store_never_writes_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::encrypted(&path, Cipher::from_hex(TEST_KEY).unwrap());

        store.replace(pair("access-secret", "refresh-secret")).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("access-secret"));
        assert!(!raw.contains("refresh-secret"));

        let refresh = store.refresh_token().await.unwrap().unwrap();
        assert_eq!(refresh.expose_secret(), "refresh-secret");
    }

    #[tokio::test]
    async fn test_encrypted_store_rejects_wrong_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileStore::encrypted(&path, Cipher::from_hex(TEST_KEY).unwrap())
            .replace(pair("a1", "r1"))
            .await
            .unwrap();

        let other_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let store = FileStore::encrypted(&path, Cipher::from_hex(other_key).unwrap());
        let result = store.access_token().await;

        assert!(matches!(
            result,
            Err(Error {
                error_kind: crate::error::ErrorKind::Credential(
                    CredentialErrorKind::DecryptionFailed
                ),
                ..
            })
        ));
    }
}
