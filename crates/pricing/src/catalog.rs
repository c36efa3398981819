use std::fmt::{Display, Formatter};
use std::path::Path;

use anyhow::{Context, Result};
use csv::Reader;
use serde::{Deserialize, Serialize};

use crate::entities::{ModifierBuckets, ModifierValue, Price, PriceModifier};
use crate::error::CatalogError;
use crate::modifier_engine::{calculate_price_breakdown, PriceBreakdown};

pub const APPLICABLE_CATEGORIES_SEPARATOR: char = ';';

/// One row of a modifier catalog file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModifierCsvRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub modifier_type: String,
    pub category: String,
    pub value: String,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub is_applied: bool,
    pub applicable_categories: String,
}

/// Modifiers offered for items, grouped into category buckets. The engine only ever
/// sees a borrowed snapshot of them.
#[derive(Debug, Clone, Default)]
pub struct ModifierCatalog {
    buckets: ModifierBuckets,
}

impl ModifierCatalog {
    pub fn from_csv<P: AsRef<Path>>(path_to_file: P) -> Result<Self> {
        let mut catalog = Self::default();

        let mut reader = Reader::from_path(path_to_file.as_ref()).with_context(|| {
            format!(
                "an error occurred on creating a reader from {}",
                path_to_file.as_ref().display()
            )
        })?;

        for (index, record) in reader.deserialize().enumerate() {
            let record: ModifierCsvRecord = record
                .with_context(|| format!("an error on deserializing modifier row {}", index + 1))?;

            catalog.add_record(record)?;
        }

        log::debug!("{} modifiers loaded", catalog.buckets.len());

        Ok(catalog)
    }

    pub fn from_vec(records: Vec<ModifierCsvRecord>) -> Result<Self> {
        let mut catalog = Self::default();

        for record in records {
            catalog.add_record(record)?;
        }

        Ok(catalog)
    }

    pub fn add_record(&mut self, record: ModifierCsvRecord) -> Result<()> {
        if self.modifier(&record.id).is_some() {
            return Err(CatalogError::DuplicateModifier(record.id).into());
        }

        let modifier = PriceModifier {
            modifier_type: record.modifier_type.trim().parse()?,
            category: record.category.trim().parse()?,
            value: parse_value(&record.value)
                .with_context(|| format!("invalid value of modifier {}", record.id))?,
            min_value: parse_optional_value(record.min_value.as_deref())
                .with_context(|| format!("invalid min value of modifier {}", record.id))?,
            max_value: parse_optional_value(record.max_value.as_deref())
                .with_context(|| format!("invalid max value of modifier {}", record.id))?,
            is_applied: record.is_applied,
            applicable_categories: record
                .applicable_categories
                .split(APPLICABLE_CATEGORIES_SEPARATOR)
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .map(String::from)
                .collect(),
            id: record.id,
            name: record.name,
        };

        self.buckets.push(modifier);

        Ok(())
    }

    pub fn buckets(&self) -> &ModifierBuckets {
        &self.buckets
    }

    pub fn modifier(&self, id: &str) -> Option<&PriceModifier> {
        self.buckets.iter().find(|modifier| modifier.id == id)
    }

    /// Toggles whether the user picked the modifier for the current item.
    pub fn set_applied(&mut self, id: &str, is_applied: bool) -> Result<(), CatalogError> {
        let modifier = self
            .buckets
            .general
            .iter_mut()
            .chain(self.buckets.textile.iter_mut())
            .chain(self.buckets.leather.iter_mut())
            .chain(self.buckets.expedition.iter_mut())
            .find(|modifier| modifier.id == id)
            .ok_or_else(|| CatalogError::UnknownModifier(id.to_string()))?;

        modifier.is_applied = is_applied;

        Ok(())
    }

    pub fn price_for(&self, base_price: Price, item_category: &str) -> Price {
        self.breakdown_for(base_price, item_category).total_price
    }

    pub fn breakdown_for(&self, base_price: Price, item_category: &str) -> PriceBreakdown {
        calculate_price_breakdown(base_price, &self.buckets, item_category)
    }
}

impl Display for ModifierCatalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in self.buckets.iter() {
            writeln!(
                f,
                "{} [{} {}] {}: {}{}",
                modifier.id,
                modifier.category,
                modifier.modifier_type,
                modifier.name,
                modifier.value,
                if modifier.is_applied { " (applied)" } else { "" }
            )?;
        }

        Ok(())
    }
}

fn parse_value(value: &str) -> Result<ModifierValue> {
    value
        .trim()
        .parse::<ModifierValue>()
        .with_context(|| format!("{} is not a decimal", value))
}

fn parse_optional_value(value: Option<&str>) -> Result<Option<ModifierValue>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_value(value).map(Some),
    }
}
