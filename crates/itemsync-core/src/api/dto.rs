//! Wire format for the items endpoint.
//!
//! Decoded independently of the domain and storage types so changes to the
//! wire format stay on this side of the boundary.

use serde::{Deserialize, Serialize};

use crate::models::Item;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        Item {
            id: dto.id,
            title: dto.title,
            description: dto.description,
            image_url: dto.image_url,
        }
    }
}
