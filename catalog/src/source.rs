//! Loading catalog items from portal service records.
//!
//! The Setu portal keeps its services in a bilingual `services.json`:
//! every record carries English fields plus optional Nepali variants. A
//! [`CatalogLocale`] picks which variant becomes the embedded text,
//! falling back per field to English when the Nepali variant is missing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::item::{CatalogItem, ServiceId};

/// One service entry as stored by the portal.
///
/// Portal records carry many more fields (hierarchy, eligibility, office
/// links); everything not needed for matching is ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Stable service identifier.
    pub service_id: String,

    /// English name.
    pub name: String,

    /// Nepali name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_nepali: Option<String>,

    /// English description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Nepali description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_nepali: Option<String>,
}

impl ServiceRecord {
    /// The catalog item for this record under `locale`.
    pub fn into_item(self, locale: CatalogLocale) -> CatalogItem {
        let english_description = self.description.unwrap_or_default();
        let (name, description) = match locale {
            CatalogLocale::English => (self.name, english_description),
            CatalogLocale::Nepali => (
                pick(self.name_nepali, self.name),
                pick(self.description_nepali, english_description),
            ),
        };

        CatalogItem {
            id: ServiceId::new(self.service_id),
            name,
            description,
        }
    }
}

/// Which language variant lands in the catalog item text.
///
/// Queries arrive in either language; multilingual-e5 maps both into the
/// same vector space, so the locale is about which passage text is
/// embedded, not about which queries are answerable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogLocale {
    /// English name and description.
    #[default]
    English,

    /// Nepali variants, per-field English fallback.
    Nepali,
}

/// The Nepali variant when present and non-blank, English otherwise.
fn pick(nepali: Option<String>, english: String) -> String {
    match nepali {
        Some(text) if !text.trim().is_empty() => text,
        _ => english,
    }
}

/// Convert portal records into catalog items, preserving record order.
pub fn from_records(records: Vec<ServiceRecord>, locale: CatalogLocale) -> Vec<CatalogItem> {
    records
        .into_iter()
        .map(|record| record.into_item(locale))
        .collect()
}

/// Load catalog items from a `services.json` style file.
pub async fn load_items(path: impl AsRef<Path>, locale: CatalogLocale) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Source(format!("{}: {e}", path.display())))?;

    let records: Vec<ServiceRecord> = serde_json::from_str(&content)?;
    let items = from_records(records, locale);

    info!("Loaded {} services from {}", items.len(), path.display());
    Ok(items)
}
