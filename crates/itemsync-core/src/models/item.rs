use serde::{Deserialize, Serialize};

/// A single catalog item.
///
/// Immutable value: a changed item is a new value with the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl Item {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }

    /// True when the item has an image worth loading.
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }
}
