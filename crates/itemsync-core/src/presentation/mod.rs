//! UI state for the item list.
//!
//! `ItemsViewModel` owns a [`UiState`] and is its only writer. Front-ends
//! subscribe to it through a `tokio::sync::watch` receiver and render
//! whatever state they are handed.

pub mod state;
pub mod view_model;

pub use state::UiState;
pub use view_model::ItemsViewModel;
