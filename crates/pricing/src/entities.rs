use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const PRICE_DECIMAL_PLACES: u32 = 2;

pub type Price = Decimal;
pub type ModifierValue = Decimal;
pub type ModifierId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModifierType {
    Percentage,
    Fixed,
    Color,
    FixedQuantity,
    RangePercentage,
}

impl ModifierType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModifierType::Percentage => "PERCENTAGE",
            ModifierType::Fixed => "FIXED",
            ModifierType::Color => "COLOR",
            ModifierType::FixedQuantity => "FIXED_QUANTITY",
            ModifierType::RangePercentage => "RANGE_PERCENTAGE",
        }
    }
}

impl FromStr for ModifierType {
    type Err = CatalogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "PERCENTAGE" => Ok(ModifierType::Percentage),
            "FIXED" => Ok(ModifierType::Fixed),
            "COLOR" => Ok(ModifierType::Color),
            "FIXED_QUANTITY" => Ok(ModifierType::FixedQuantity),
            "RANGE_PERCENTAGE" => Ok(ModifierType::RangePercentage),
            _ => Err(CatalogError::UnknownModifierType(input.to_string())),
        }
    }
}

impl Display for ModifierType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierCategory {
    General,
    Textile,
    Leather,
    Expedition,
}

impl ModifierCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ModifierCategory::General => "general",
            ModifierCategory::Textile => "textile",
            ModifierCategory::Leather => "leather",
            ModifierCategory::Expedition => "expedition",
        }
    }
}

impl FromStr for ModifierCategory {
    type Err = CatalogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "general" => Ok(ModifierCategory::General),
            "textile" => Ok(ModifierCategory::Textile),
            "leather" => Ok(ModifierCategory::Leather),
            "expedition" => Ok(ModifierCategory::Expedition),
            _ => Err(CatalogError::UnknownCategory(input.to_string())),
        }
    }
}

impl Display for ModifierCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pricing adjustment offered for an item. `min_value` and `max_value` are carried
/// with the record but the engine does not clamp by them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModifier {
    pub id: ModifierId,
    pub name: String,
    #[serde(rename = "type")]
    pub modifier_type: ModifierType,
    pub category: ModifierCategory,
    pub value: ModifierValue,
    #[serde(default)]
    pub min_value: Option<ModifierValue>,
    #[serde(default)]
    pub max_value: Option<ModifierValue>,
    pub is_applied: bool,
    #[serde(default)]
    pub applicable_categories: Vec<String>,
}

impl PriceModifier {
    /// Empty `applicable_categories` means the modifier fits every item category.
    pub fn applies_to(&self, item_category: &str) -> bool {
        self.applicable_categories.is_empty()
            || self
                .applicable_categories
                .iter()
                .any(|category| category == item_category)
    }
}

/// Modifiers grouped by the category they were loaded for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBuckets {
    #[serde(default)]
    pub general: Vec<PriceModifier>,
    #[serde(default)]
    pub textile: Vec<PriceModifier>,
    #[serde(default)]
    pub leather: Vec<PriceModifier>,
    #[serde(default)]
    pub expedition: Vec<PriceModifier>,
}

impl ModifierBuckets {
    pub fn bucket(&self, category: ModifierCategory) -> &[PriceModifier] {
        match category {
            ModifierCategory::General => &self.general,
            ModifierCategory::Textile => &self.textile,
            ModifierCategory::Leather => &self.leather,
            ModifierCategory::Expedition => &self.expedition,
        }
    }

    pub fn bucket_mut(&mut self, category: ModifierCategory) -> &mut Vec<PriceModifier> {
        match category {
            ModifierCategory::General => &mut self.general,
            ModifierCategory::Textile => &mut self.textile,
            ModifierCategory::Leather => &mut self.leather,
            ModifierCategory::Expedition => &mut self.expedition,
        }
    }

    /// Files the modifier under its own category.
    pub fn push(&mut self, modifier: PriceModifier) {
        self.bucket_mut(modifier.category).push(modifier);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceModifier> {
        self.general
            .iter()
            .chain(self.textile.iter())
            .chain(self.leather.iter())
            .chain(self.expedition.iter())
    }

    pub fn len(&self) -> usize {
        self.general.len() + self.textile.len() + self.leather.len() + self.expedition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
