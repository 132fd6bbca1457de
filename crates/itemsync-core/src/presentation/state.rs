use serde::Serialize;

use crate::models::Item;

/// What the item list screen shows.
///
/// `error` and a fresh `items` snapshot clear each other: a new snapshot
/// clears `error`, a failure sets it and leaves `items` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UiState {
    pub items: Vec<Item>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl UiState {
    /// Nothing to show yet: no items, no error, not loading.
    pub fn is_blank(&self) -> bool {
        self.items.is_empty() && !self.is_loading && self.error.is_none()
    }
}
