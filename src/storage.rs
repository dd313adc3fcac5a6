//
// storage.rs
// Ohif-Viewer-Input-rs
//
// Keeps rendered viewer documents on disk, one file per transaction, with path sanitization and hashing.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::StoreError;

#[derive(Clone, Debug)]
pub struct DocumentStore {
    root: PathBuf,
}

/// A document as it sits in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub file_name: String,
    pub path: PathBuf,
    /// Hex SHA-256 of the JSON text.
    pub digest: String,
    pub contents: String,
}

impl DocumentStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn save(&self, transaction_id: &str, json: &str) -> Result<StoredDocument, StoreError> {
        let file_name = file_name_for(transaction_id);
        let path = self.root.join(&file_name);
        // Stage next to the target and rename, so readers never see a half-written file.
        let mut staging = NamedTempFile::new_in(&self.root)?;
        staging.write_all(json.as_bytes())?;
        staging.persist(&path).map_err(|err| err.error)?;
        tracing::debug!("Stored viewer document {:?}", path);
        Ok(StoredDocument {
            file_name,
            path,
            digest: digest(json),
            contents: json.to_string(),
        })
    }

    pub fn load(&self, transaction_id: &str) -> Result<StoredDocument, StoreError> {
        let file_name = file_name_for(transaction_id);
        let path = self
            .resolve(&file_name)
            .map_err(|err| match err {
                StoreError::Io(_) => StoreError::NotFound(transaction_id.to_string()),
                other => other,
            })?;
        let contents = fs::read_to_string(&path)?;
        Ok(StoredDocument {
            file_name,
            path,
            digest: digest(&contents),
            contents,
        })
    }

    pub fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let candidate = self.root.join(name);
        let canonical_root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());
        let canonical = candidate.canonicalize()?;
        // Guard against path traversal by enforcing the canonical root prefix.
        if !canonical.starts_with(&canonical_root) {
            return Err(StoreError::OutsideRoot);
        }
        Ok(canonical)
    }
}

pub fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn file_name_for(transaction_id: &str) -> String {
    // Ids that sanitize to the same stem stay apart through the hash suffix.
    let hash = &digest(transaction_id)[..12];
    let stem = sanitize_filename(transaction_id);
    if stem.is_empty() {
        format!("viewer-{}.json", hash)
    } else {
        format!("{}-{}.json", stem, hash)
    }
}

fn sanitize_filename(input: &str) -> String {
    // Keep only ASCII word characters and a few safe separators to avoid filesystem surprises.
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitize_strips_dangerous_characters() {
        assert_eq!(sanitize_filename("../XNAT E0007/1.json"), "XNATE000071json");
        assert!(file_name_for("XNAT_E00007").starts_with("XNAT_E00007-"));
        assert!(file_name_for("XNAT_E00007").ends_with(".json"));
        assert!(file_name_for("../..").starts_with("viewer-"));
    }

    #[test]
    fn save_then_load_returns_same_digest() {
        let dir = tempdir().expect("tmpdir");
        let store = DocumentStore::new(dir.path().join("docs")).expect("store");

        let saved = store.save("TX-1", "{\"transactionId\":\"TX-1\"}").expect("save");
        let loaded = store.load("TX-1").expect("load");
        assert_eq!(saved.digest, loaded.digest);
        assert_eq!(loaded.contents, "{\"transactionId\":\"TX-1\"}");
        assert_eq!(saved.digest.len(), 64);
    }

    #[test]
    fn ids_with_the_same_sanitized_stem_do_not_collide() {
        let dir = tempdir().expect("tmpdir");
        let store = DocumentStore::new(dir.path()).expect("store");

        let dotted = store.save("XNAT.E1", "{\"transactionId\":\"XNAT.E1\"}").expect("save");
        let plain = store.save("XNATE1", "{\"transactionId\":\"XNATE1\"}").expect("save");
        assert_ne!(dotted.file_name, plain.file_name);

        assert_eq!(
            store.load("XNAT.E1").expect("load").contents,
            "{\"transactionId\":\"XNAT.E1\"}"
        );
        assert_eq!(
            store.load("XNATE1").expect("load").contents,
            "{\"transactionId\":\"XNATE1\"}"
        );
        assert!(matches!(store.load("XNAT E1"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn resave_replaces_document_without_leaving_staging_files() {
        let dir = tempdir().expect("tmpdir");
        let store = DocumentStore::new(dir.path()).expect("store");

        store.save("TX-2", "{\"v\":1}").expect("first save");
        let saved = store.save("TX-2", "{\"v\":2}").expect("second save");
        assert_eq!(store.load("TX-2").expect("load").contents, "{\"v\":2}");

        let names: Vec<String> = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![saved.file_name]);
    }

    #[test]
    fn load_of_unknown_transaction_is_not_found() {
        let dir = tempdir().expect("tmpdir");
        let store = DocumentStore::new(dir.path()).expect("store");
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn resolve_rejects_paths_outside_root() {
        let root = tempdir().expect("tmpdir");
        let store_root = root.path().join("safe-area");
        let store = DocumentStore::new(&store_root).expect("store");

        let outside = root.path().join("escape.json");
        fs::write(&outside, b"{}").expect("write outside file");

        assert!(matches!(
            store.resolve("../escape.json"),
            Err(StoreError::OutsideRoot)
        ));
    }
}
