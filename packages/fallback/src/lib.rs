#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static fallback snapshots for the Vitibrasil statistics API.
//!
//! When the portal is unreachable, reports are served from a JSON snapshot
//! of earlier extractions, nested by category, sub-category and year:
//!
//! ```json
//! {
//!   "producao": { "2023": [ { "tipo_produto": "...", ... } ] },
//!   "processamento": { "viniferas": { "2023": [ ... ] } }
//! }
//! ```
//!
//! The snapshot is read once at startup and never written by the server.

use std::path::Path;

use serde::Deserialize as _;
use serde::de::DeserializeOwned;
use vitibrasil_report_models::{Report, ReportCategory, ReportRequest};

/// Default location of the snapshot file, relative to the working
/// directory.
pub const DEFAULT_FALLBACK_PATH: &str = "data/fallback_data.json";

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    /// The snapshot file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An in-memory snapshot of report records.
#[derive(Debug, Clone, Default)]
pub struct FallbackStore {
    root: serde_json::Value,
}

impl FallbackStore {
    /// Wraps an already-parsed snapshot.
    #[must_use]
    pub const fn from_value(root: serde_json::Value) -> Self {
        Self { root }
    }

    /// Reads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, FallbackError> {
        let contents = std::fs::read_to_string(path)?;
        let root = serde_json::from_str(&contents)?;
        Ok(Self { root })
    }

    /// Reads a snapshot file, falling back to an empty snapshot (every
    /// lookup yields no records) if it is missing or unreadable.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => {
                log::info!("Loaded fallback snapshot from {}", path.display());
                store
            }
            Err(e) => {
                log::error!(
                    "Failed to load fallback snapshot from {}: {e}; fallback responses will be empty",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Returns the raw snapshot node at `key_path`, if present.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, key_path: &[S]) -> Option<&serde_json::Value> {
        key_path
            .iter()
            .try_fold(&self.root, |node, key| node.get(key.as_ref()))
    }

    /// Returns the snapshot records for `request`.
    ///
    /// An absent key, or records that do not match `T`, yield an empty
    /// list.
    #[must_use]
    pub fn records<T: DeserializeOwned>(&self, request: &ReportRequest) -> Vec<T> {
        let key_path = request.key_path();
        let Some(node) = self.get(&key_path) else {
            log::warn!("No fallback data for {request}");
            return Vec::new();
        };

        match Vec::<T>::deserialize(node) {
            Ok(records) => records,
            Err(e) => {
                log::error!("Malformed fallback data for {request}: {e}");
                Vec::new()
            }
        }
    }

    /// Returns the snapshot report for `request`, shaped by its category.
    #[must_use]
    pub fn report(&self, request: &ReportRequest) -> Report {
        match request.category() {
            ReportCategory::Production => Report::Production(self.records(request)),
            ReportCategory::Processing => Report::Processing(self.records(request)),
            ReportCategory::Commercialization => Report::Commercialization(self.records(request)),
            ReportCategory::Import => Report::Import(self.records(request)),
            ReportCategory::Export => Report::Export(self.records(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use vitibrasil_report_models::{ProductionRecord, TradeRecord};

    use super::*;

    fn snapshot() -> FallbackStore {
        FallbackStore::from_value(serde_json::json!({
            "producao": {
                "2022": [
                    {"tipo_produto": "Vinho De Mesa", "produto": "Tinto", "quantidade_litros": 10}
                ]
            },
            "importacao": {
                "espumantes": {
                    "2024": [
                        {"pais": "França", "quantidade_kg": 5, "valor_dolar": 50}
                    ]
                }
            },
            "comercializacao": {
                "2000": [{"unexpected": true}]
            }
        }))
    }

    #[test]
    fn looks_up_by_category_and_year() {
        let request = ReportRequest::from_path(ReportCategory::Production, None, "2022").unwrap();
        let records: Vec<ProductionRecord> = snapshot().records(&request);
        assert_eq!(
            records,
            vec![ProductionRecord {
                product_type: "Vinho De Mesa".to_string(),
                product: "Tinto".to_string(),
                quantity_liters: 10,
            }]
        );
    }

    #[test]
    fn looks_up_by_sub_category() {
        let request =
            ReportRequest::from_path(ReportCategory::Import, Some("espumantes"), "2024").unwrap();
        let records: Vec<TradeRecord> = snapshot().records(&request);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "França");

        let report = snapshot().report(&request);
        assert_eq!(report.category(), ReportCategory::Import);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn absent_key_is_empty() {
        let request = ReportRequest::from_path(ReportCategory::Production, None, "1999").unwrap();
        assert!(snapshot().records::<ProductionRecord>(&request).is_empty());

        let request =
            ReportRequest::from_path(ReportCategory::Export, Some("espumantes"), "2024").unwrap();
        assert!(snapshot().report(&request).is_empty());
    }

    #[test]
    fn malformed_records_are_empty() {
        let request =
            ReportRequest::from_path(ReportCategory::Commercialization, None, "2000").unwrap();
        assert!(snapshot().report(&request).is_empty());
    }

    #[test]
    fn get_walks_nested_keys() {
        let store = snapshot();
        assert!(store.get(&["importacao", "espumantes", "2024"]).is_some());
        assert!(store.get(&["importacao", "vinhos_de_mesa"]).is_none());
        assert!(store.get::<&str>(&[]).is_some());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"exportacao": {{"uvas_frescas": {{"2010": [{{"pais": "Holanda", "quantidade_kg": 1, "valor_dolar": 2}}]}}}}}}"#
        )
        .unwrap();

        let store = FallbackStore::load(file.path()).unwrap();
        let request =
            ReportRequest::from_path(ReportCategory::Export, Some("uvas_frescas"), "2010").unwrap();
        assert_eq!(store.report(&request).len(), 1);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(FallbackStore::load(&path).is_err());

        let store = FallbackStore::load_or_empty(&path);
        let request = ReportRequest::from_path(ReportCategory::Production, None, "2022").unwrap();
        assert!(store.report(&request).is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            FallbackStore::load(file.path()),
            Err(FallbackError::Json(_))
        ));
    }
}
