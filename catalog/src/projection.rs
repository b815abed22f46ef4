//! Item-to-text projection.
//!
//! What part of a service actually gets embedded is a retrieval-quality
//! decision, so it is an explicit configuration instead of a convention
//! buried in call sites. The projection participates in the catalog
//! fingerprint: changing it invalidates cached vectors.

use serde::{Deserialize, Serialize};

use crate::item::CatalogItem;

/// Which fields of a catalog item are embedded as its passage text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProjection {
    /// The service name alone.
    Name,

    /// The prose description alone.
    Description,

    /// Name and description joined into a single passage.
    #[default]
    NameAndDescription,
}

impl TextProjection {
    /// The passage text of `item` under this projection.
    ///
    /// `NameAndDescription` degrades to the name alone when the
    /// description is blank, so sparse catalog entries still embed
    /// something meaningful.
    pub fn project(self, item: &CatalogItem) -> String {
        match self {
            Self::Name => item.name.clone(),
            Self::Description => item.description.clone(),
            Self::NameAndDescription => {
                if item.description.trim().is_empty() {
                    item.name.clone()
                } else {
                    format!("{}. {}", item.name, item.description)
                }
            }
        }
    }
}
