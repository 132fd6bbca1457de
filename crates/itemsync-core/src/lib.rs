//! itemsync core - an offline-first item cache.
//!
//! The local [`cache::ItemStore`] is the single source of truth for the UI.
//! [`sync::OfflineFirstRepository`] refreshes it from the remote
//! [`api::ApiClient`] on demand, and every committed change is pushed to live
//! subscribers. [`presentation::ItemsViewModel`] turns that live view plus
//! refresh outcomes into a [`presentation::UiState`] a front-end can render.
//!
//! Layering, leaf-first:
//! - `models`: the `Item` domain value
//! - `api`: remote source (HTTP GET of the full collection)
//! - `cache`: durable keyed store with a live query
//! - `sync`: refresh orchestration and live-view pass-through
//! - `usecase`: narrow observe / refresh entry points
//! - `presentation`: UI state holder

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod presentation;
pub mod sync;
pub mod usecase;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, NetworkError, RemoteSource};
pub use cache::{ItemStore, ItemStream, LocalStore, StorageError};
pub use config::Config;
pub use models::Item;
pub use presentation::{ItemsViewModel, UiState};
pub use sync::{ItemRepository, OfflineFirstRepository, SyncError};
pub use usecase::{GetItems, RefreshItems};
