//! On-disk layout of the item table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Current table schema version. Migrations are not supported; any other
/// version is rejected on open.
pub const SCHEMA_VERSION: u32 = 1;

/// Persisted representation of an `Item`, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item {
            id: record.id,
            title: record.title,
            description: record.description,
            image_url: record.image_url,
        }
    }
}

/// The whole table as written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TableFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<ItemRecord>,
}
