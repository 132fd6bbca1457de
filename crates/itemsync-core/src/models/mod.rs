//! Domain models.
//!
//! `Item` is the only entity. The wire (`api::ItemDto`) and stored
//! (`cache::ItemRecord`) representations live next to the code that decodes
//! them and convert into this type at their boundary.

pub mod item;

pub use item::Item;
