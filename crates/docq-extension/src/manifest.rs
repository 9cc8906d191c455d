//! Extension manifest loading.
//!
//! The manifest is a JSON object at a fixed deployment-root filename
//! mapping unique extension keys to metadata:
//!
//! ```json
//! {
//!   "ext.audit_trail": {
//!     "name": "Audit trail",
//!     "module_name": "docq_extensions.audit_trail",
//!     "source": "./extensions/audit_trail",
//!     "class_name": "AuditTrailExtension"
//!   }
//! }
//! ```
//!
//! `module_name` and `class_name` select a constructor from the
//! [`catalog`](crate::catalog). `source` records where the extension code
//! lives and is carried as metadata only; compiled-in constructors are
//! the unit of deployment. Entry order in the file is preserved and
//! becomes registration order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use docq_core::{AppError, AppResult};

/// One manifest entry describing an extension to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionManifestEntry {
    /// Display label.
    pub name: String,
    /// Module the extension's constructor lives in.
    pub module_name: String,
    /// Where the extension code is maintained. Metadata only.
    pub source: String,
    /// Constructor to use. When omitted the module must export exactly
    /// one constructor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// A parsed manifest, entries in file order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<(String, ExtensionManifestEntry)>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// An absent file is a [`ManifestMissing`](docq_core::error::ErrorKind::ManifestMissing)
    /// error so the caller can treat it as "no extensions configured".
    /// Any structural problem fails the whole load with
    /// [`ManifestParse`](docq_core::error::ErrorKind::ManifestParse).
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::manifest_missing(format!(
                    "No extension manifest at {}",
                    path.display()
                ))
            } else {
                AppError::with_source(
                    docq_core::error::ErrorKind::ManifestParse,
                    format!("Failed to read extension manifest {}", path.display()),
                    e,
                )
            }
        })?;
        Self::parse(&text)
    }

    /// Parse manifest text.
    pub fn parse(text: &str) -> AppResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
            AppError::with_source(
                docq_core::error::ErrorKind::ManifestParse,
                "Extension manifest is not valid JSON",
                e,
            )
        })?;

        let map = value.as_object().ok_or_else(|| {
            AppError::manifest_parse("Extension manifest must be a JSON object")
        })?;

        let mut entries = Vec::with_capacity(map.len());
        for (key, raw) in map {
            if key.trim().is_empty() {
                return Err(AppError::manifest_parse(
                    "Extension manifest contains an empty key",
                ));
            }
            let entry: ExtensionManifestEntry =
                serde_json::from_value(raw.clone()).map_err(|e| {
                    AppError::with_source(
                        docq_core::error::ErrorKind::ManifestParse,
                        format!("Malformed manifest entry '{key}'"),
                        e,
                    )
                })?;
            entries.push((key.clone(), entry));
        }

        Ok(Self { entries })
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[(String, ExtensionManifestEntry)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists no extensions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docq_core::error::ErrorKind;

    #[test]
    fn test_parse_preserves_file_order() {
        let manifest = Manifest::parse(
            r#"{
                "ext.metrics": {"name": "Metrics", "module_name": "docq_extensions.usage_metrics", "source": "./extensions/usage_metrics"},
                "ext.audit": {"name": "Audit", "module_name": "docq_extensions.audit_trail", "source": "./extensions/audit_trail", "class_name": "AuditTrailExtension"}
            }"#,
        )
        .unwrap();

        let keys: Vec<&str> = manifest.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ext.metrics", "ext.audit"]);
        assert_eq!(
            manifest.entries()[1].1.class_name.as_deref(),
            Some("AuditTrailExtension")
        );
        assert_eq!(manifest.entries()[0].1.class_name, None);
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let manifest = Manifest::parse(
            r#"{
                "ext.a": {"name": "First", "module_name": "m", "source": "s"},
                "ext.a": {"name": "Second", "module_name": "m", "source": "s"}
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].1.name, "Second");
    }

    #[test]
    fn test_missing_file_is_manifest_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(&dir.path().join(".docq-extensions.json")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ManifestMissing);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".docq-extensions.json");
        std::fs::write(
            &path,
            r#"{"ext.a": {"name": "A", "module_name": "m.a", "source": "./a"}}"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].0, "ext.a");
    }

    #[test]
    fn test_invalid_json_is_manifest_parse() {
        let err = Manifest::parse("{not json").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ManifestParse);
    }

    #[test]
    fn test_top_level_array_rejected() {
        let err = Manifest::parse("[]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ManifestParse);
    }

    #[test]
    fn test_entry_missing_required_field_rejected() {
        let err = Manifest::parse(r#"{"ext.a": {"name": "A"}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ManifestParse);
        assert!(err.message.contains("ext.a"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err =
            Manifest::parse(r#"{"": {"name": "A", "module_name": "m", "source": "s"}}"#)
                .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ManifestParse);
    }

    #[test]
    fn test_empty_object_is_empty_manifest() {
        let manifest = Manifest::parse("{}").unwrap();
        assert!(manifest.is_empty());
    }
}
