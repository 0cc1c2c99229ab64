//! Blob storage for uploaded gallery images.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob key: {0}")]
    InvalidKey(String),
    #[error("blob store I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Object store addressed by slash-separated keys such as
/// `galleries/{slug}/{object}`.
pub trait BlobStore {
    /// Copies the file at `source` into the store under `key`.
    fn put_file(&self, key: &str, source: &Path) -> Result<(), BlobError>;
    /// Removes one object. Missing objects are not an error.
    fn delete(&self, key: &str) -> Result<(), BlobError>;
    /// Removes every object whose key starts with `prefix/`.
    fn delete_prefix(&self, prefix: &str) -> Result<(), BlobError>;
    /// Public URL of an object.
    fn url(&self, key: &str) -> String;
}

fn checked_key(key: &str) -> Result<&Path, BlobError> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(path)
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

/// Blob store kept in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    /// Stores objects under `root`; URLs are `{public_prefix}/{key}`.
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        Ok(self.root.join(checked_key(key)?))
    }
}

impl BlobStore for LocalBlobStore {
    fn put_file(&self, key: &str, source: &Path) -> Result<(), BlobError> {
        let target = self.path_for(key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &target)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), BlobError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn delete_prefix(&self, prefix: &str) -> Result<(), BlobError> {
        match fs::remove_dir_all(self.path_for(prefix)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_prefix)
    }
}

#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory blob store used by service tests.
    #[derive(Default)]
    pub struct MemoryBlobStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
    }

    impl MemoryBlobStore {
        pub fn keys(&self) -> Vec<String> {
            self.objects.lock().unwrap().keys().cloned().collect()
        }
    }

    impl BlobStore for MemoryBlobStore {
        fn put_file(&self, key: &str, source: &Path) -> Result<(), BlobError> {
            checked_key(key)?;
            let bytes = fs::read(source)?;
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), BlobError> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        fn delete_prefix(&self, prefix: &str) -> Result<(), BlobError> {
            let prefix = format!("{prefix}/");
            self.objects
                .lock()
                .unwrap()
                .retain(|key, _| !key.starts_with(&prefix));
            Ok(())
        }

        fn url(&self, key: &str) -> String {
            format!("/media/{key}")
        }
    }
}
