//! The store scene's fixed catalog.

use thiserror::Error;

use crate::core::SceneId;

/// Something the store sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreItem {
    pub name: &'static str,
    pub price: u32,
}

pub static STORE_CATALOG: [StoreItem; 4] = [
    StoreItem { name: "Red Hat", price: 5 },
    StoreItem { name: "Blue Cape", price: 10 },
    StoreItem { name: "Green Boots", price: 7 },
    StoreItem { name: "Gold Shield", price: 15 },
];

/// Why a purchase was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("purchases are only possible in the store (currently in {0:?})")]
    NotInStore(SceneId),

    #[error("'{item}' costs {price} coins, only {available} available")]
    InsufficientCoins {
        item: &'static str,
        price: u32,
        available: u32,
    },

    #[error("the store does not sell '{0}'")]
    UnknownItem(String),
}

/// Look an item up by name, ignoring case.
pub fn find_item(name: &str) -> Option<&'static StoreItem> {
    STORE_CATALOG
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(name))
}
