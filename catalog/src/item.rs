//! Catalog item types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a new service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single government service in the catalog.
///
/// Items are immutable once loaded. Editing the catalog means loading a
/// fresh item list and rebuilding the store that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable identifier carried through to query results.
    pub id: ServiceId,

    /// Service name, in the configured catalog locale.
    pub name: String,

    /// Prose description of the service.
    pub description: String,
}

impl CatalogItem {
    /// Create a new catalog item.
    pub fn new(
        id: impl Into<ServiceId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}
