use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::ResolverError;
use crate::models::ScanId;

/// Lookup from series instance UID to the external scan id.
pub trait ScanIdResolver {
    fn scan_id(&self, series_uid: &str) -> Option<&str>;

    fn resolve(&self, series_uid: &str) -> ScanId {
        self.scan_id(series_uid)
            .map_or(ScanId::Unresolved, |id| ScanId::Resolved(id.to_string()))
    }
}

impl ScanIdResolver for HashMap<String, String> {
    fn scan_id(&self, series_uid: &str) -> Option<&str> {
        self.get(series_uid).map(String::as_str)
    }
}

impl ScanIdResolver for BTreeMap<String, String> {
    fn scan_id(&self, series_uid: &str) -> Option<&str> {
        self.get(series_uid).map(String::as_str)
    }
}

impl<R: ScanIdResolver + ?Sized> ScanIdResolver for &R {
    fn scan_id(&self, series_uid: &str) -> Option<&str> {
        (**self).scan_id(series_uid)
    }
}

/// Precomputed series → scan table, usually loaded from a JSON object such as
/// `{"1.2.826.0.1...": "3"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanIdMap {
    entries: BTreeMap<String, String>,
}

impl ScanIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ResolverError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ResolverError> {
        let text = fs::read_to_string(path)?;
        let map = Self::from_json_str(&text)?;
        tracing::debug!("Loaded {} scan id mapping(s) from {:?}", map.len(), path);
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScanIdResolver for ScanIdMap {
    fn scan_id(&self, series_uid: &str) -> Option<&str> {
        self.entries.get(series_uid).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScanIdMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
