use crate::StatusCondition;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Item {
    // Balls
    Pokeball,
    Greatball,
    Ultraball,
    // Medicine
    Potion,
    SuperPotion,
    HyperPotion,
    FullRestore,
    Antidote,
    ParalyzeHeal,
    Awakening,
    BurnHeal,
    IceHeal,
    Revive,
    // Key items
    Bicycle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Pokeball,
    Medicine,
    Key,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ItemEffect {
    Catch { multiplier: f64 },
    Heal { amount: u16 },
    FullRestore,
    Cure { status: StatusCondition },
    Revive,
}

/// Static record for an item, loaded from `data/items.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemData {
    pub id: Item,
    pub name: String,
    pub category: ItemCategory,
    pub price: u32,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
    #[serde(default)]
    pub description: String,
}

impl ItemData {
    pub fn is_ball(&self) -> bool {
        self.category == ItemCategory::Pokeball
    }

    pub fn sell_price(&self) -> u32 {
        self.price / 2
    }
}
