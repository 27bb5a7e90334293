//! Poké Mart transactions. Both directions are pure: they take the wallet
//! and bag as they are and return what they should become.

use crate::data::GameData;
use crate::errors::ShopError;
use schema::{Item, ItemCategory};
use std::collections::BTreeMap;

/// What the mart counter sells, in display order.
pub fn mart_inventory() -> Vec<Item> {
    vec![
        Item::Pokeball,
        Item::Greatball,
        Item::Ultraball,
        Item::Potion,
        Item::SuperPotion,
        Item::HyperPotion,
        Item::FullRestore,
        Item::Antidote,
        Item::ParalyzeHeal,
        Item::Awakening,
        Item::BurnHeal,
        Item::IceHeal,
        Item::Revive,
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopReceipt {
    pub money: u32,
    pub bag: BTreeMap<Item, u32>,
    /// Total paid or earned.
    pub total: u32,
}

pub fn buy(
    data: &GameData,
    item: Item,
    quantity: u32,
    money: u32,
    bag: &BTreeMap<Item, u32>,
) -> Result<ShopReceipt, ShopError> {
    let price = data.item(item).price;
    if price == 0 {
        return Err(ShopError::ItemNotFound);
    }
    if quantity == 0 {
        return Err(ShopError::InvalidQuantity);
    }
    let total = price
        .checked_mul(quantity)
        .filter(|total| *total <= money)
        .ok_or(ShopError::NotEnoughMoney)?;

    let mut bag = bag.clone();
    *bag.entry(item).or_insert(0) += quantity;
    Ok(ShopReceipt {
        money: money - total,
        bag,
        total,
    })
}

/// Sell at half price, rounded down. Key items never sell.
pub fn sell(
    data: &GameData,
    item: Item,
    quantity: u32,
    money: u32,
    bag: &BTreeMap<Item, u32>,
) -> Result<ShopReceipt, ShopError> {
    let item_data = data.item(item);
    if quantity == 0 {
        return Err(ShopError::InvalidQuantity);
    }
    let owned = bag.get(&item).copied().unwrap_or(0);
    if owned < quantity {
        return Err(ShopError::NotEnoughItems);
    }
    if item_data.category == ItemCategory::Key {
        return Err(ShopError::CannotSellKeyItem);
    }

    let total = item_data.sell_price().saturating_mul(quantity);
    let mut bag = bag.clone();
    if owned == quantity {
        bag.remove(&item);
    } else {
        bag.insert(item, owned - quantity);
    }
    Ok(ShopReceipt {
        money: money.saturating_add(total),
        bag,
        total,
    })
}

pub fn max_buyable(price: u32, money: u32) -> u32 {
    if price == 0 {
        0
    } else {
        money / price
    }
}
