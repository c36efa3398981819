use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::entities::{
    ModifierBuckets, ModifierCategory, ModifierId, ModifierType, ModifierValue, Price,
    PriceModifier, PRICE_DECIMAL_PLACES,
};


/// Modifier types in the order their passes run. `FIXED_QUANTITY` has no pass.
pub const PASS_ORDER: [ModifierType; 4] = [
    ModifierType::Color,
    ModifierType::Percentage,
    ModifierType::Fixed,
    ModifierType::RangePercentage,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedModifier {
    pub id: ModifierId,
    pub name: String,
    pub modifier_type: ModifierType,
    pub value: ModifierValue,
    pub price_before: Price,
    pub price_after: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: Price,
    /// Unrounded running prices, in the order the modifiers were applied.
    pub applied_modifiers: Vec<AppliedModifier>,
    pub total_price: Price,
}

/// Modifiers that can take part in pricing an item of `item_category`: the general and
/// expedition buckets always, the textile and leather buckets when the category name
/// mentions them. Modifiers restricted to other categories are dropped.
pub fn applicable_modifiers<'a>(
    buckets: &'a ModifierBuckets,
    item_category: &str,
) -> Vec<&'a PriceModifier> {
    let mut categories = vec![ModifierCategory::General];

    for category in [ModifierCategory::Textile, ModifierCategory::Leather] {
        if item_category.contains(category.as_str()) {
            categories.push(category);
        }
    }

    categories.push(ModifierCategory::Expedition);

    categories
        .into_iter()
        .flat_map(|category| buckets.bucket(category).iter())
        .filter(|modifier| modifier.applies_to(item_category))
        .collect()
}

pub fn calculate_price_breakdown(
    base_price: Price,
    buckets: &ModifierBuckets,
    item_category: &str,
) -> PriceBreakdown {
    let applied: Vec<&PriceModifier> = applicable_modifiers(buckets, item_category)
        .into_iter()
        .filter(|modifier| modifier.is_applied)
        .collect();

    let mut price = base_price;
    let mut applied_modifiers = Vec::with_capacity(applied.len());

    for pass in PASS_ORDER {
        for modifier in applied
            .iter()
            .filter(|modifier| modifier.modifier_type == pass)
        {
            let price_before = price;
            price = apply_modifier(price, modifier);

            applied_modifiers.push(AppliedModifier {
                id: modifier.id.clone(),
                name: modifier.name.clone(),
                modifier_type: modifier.modifier_type,
                value: modifier.value,
                price_before,
                price_after: price,
            });
        }
    }

    let total_price = round_price(price);

    log::debug!(
        "price for {}: {} -> {} with {} modifiers",
        item_category,
        base_price,
        total_price,
        applied_modifiers.len()
    );

    PriceBreakdown {
        base_price,
        applied_modifiers,
        total_price,
    }
}

pub fn calculate_total_price(
    base_price: Price,
    buckets: &ModifierBuckets,
    item_category: &str,
) -> Price {
    calculate_price_breakdown(base_price, buckets, item_category).total_price
}

/// Two decimal places, midpoints away from zero.
pub fn round_price(price: Price) -> Price {
    price.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Results beyond the `Decimal` range are clamped to its bounds.
fn apply_modifier(price: Price, modifier: &PriceModifier) -> Price {
    let (adjusted, grows_positive) = match modifier.modifier_type {
        ModifierType::Color | ModifierType::Fixed => (
            price.checked_add(modifier.value),
            modifier.value.is_sign_positive(),
        ),
        ModifierType::Percentage | ModifierType::RangePercentage => (
            price
                .checked_mul(modifier.value)
                .and_then(|delta| delta.checked_div(dec!(100)))
                .and_then(|delta| price.checked_add(delta)),
            price.is_sign_positive() == (modifier.value > dec!(-100)),
        ),
        ModifierType::FixedQuantity => (Some(price), price.is_sign_positive()),
    };

    adjusted.unwrap_or_else(|| {
        log::warn!(
            "modifier {} ({} {}) overflows price {}, the price is clamped",
            modifier.id,
            modifier.modifier_type,
            modifier.value,
            price
        );

        if grows_positive {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}
