use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    ClientSelection,
    BranchSelection,
    BasicInfo,
    ItemManager,
    OrderParameters,
    OrderConfirmation,

    ItemBasicInfo,
    ItemProperties,
    DefectsStains,
    PriceCalculator,
    PhotoDocumentation,
}

/// Which part of the wizard a step belongs to. Item steps are only reachable while
/// the item sub-wizard is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepLayer {
    Main,
    Item,
}

pub const MAIN_STEPS: [WizardStep; 6] = [
    WizardStep::ClientSelection,
    WizardStep::BranchSelection,
    WizardStep::BasicInfo,
    WizardStep::ItemManager,
    WizardStep::OrderParameters,
    WizardStep::OrderConfirmation,
];

pub const ITEM_STEPS: [WizardStep; 5] = [
    WizardStep::ItemBasicInfo,
    WizardStep::ItemProperties,
    WizardStep::DefectsStains,
    WizardStep::PriceCalculator,
    WizardStep::PhotoDocumentation,
];

pub const REQUIRED_MAIN_STEPS: [WizardStep; 4] = [
    WizardStep::ClientSelection,
    WizardStep::BranchSelection,
    WizardStep::ItemManager,
    WizardStep::OrderConfirmation,
];

pub const REQUIRED_ITEM_STEPS: [WizardStep; 3] = [
    WizardStep::ItemBasicInfo,
    WizardStep::ItemProperties,
    WizardStep::PriceCalculator,
];

impl StepLayer {
    pub fn steps(self) -> &'static [WizardStep] {
        match self {
            StepLayer::Main => &MAIN_STEPS,
            StepLayer::Item => &ITEM_STEPS,
        }
    }
}

impl WizardStep {
    pub fn main_steps() -> &'static [WizardStep] {
        &MAIN_STEPS
    }

    pub fn item_steps() -> &'static [WizardStep] {
        &ITEM_STEPS
    }

    pub fn layer(self) -> StepLayer {
        if self.is_item_step() {
            StepLayer::Item
        } else {
            StepLayer::Main
        }
    }

    pub fn is_item_step(self) -> bool {
        ITEM_STEPS.contains(&self)
    }

    /// The canonical successor of the step. The last step of each layer has none:
    /// the order is confirmed, and a finished item goes back through `finish_item_wizard`.
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::ClientSelection => Some(WizardStep::BranchSelection),
            WizardStep::BranchSelection => Some(WizardStep::BasicInfo),
            WizardStep::BasicInfo => Some(WizardStep::ItemManager),
            WizardStep::ItemManager => Some(WizardStep::OrderParameters),
            WizardStep::OrderParameters => Some(WizardStep::OrderConfirmation),
            WizardStep::OrderConfirmation => None,

            WizardStep::ItemBasicInfo => Some(WizardStep::ItemProperties),
            WizardStep::ItemProperties => Some(WizardStep::DefectsStains),
            WizardStep::DefectsStains => Some(WizardStep::PriceCalculator),
            WizardStep::PriceCalculator => Some(WizardStep::PhotoDocumentation),
            WizardStep::PhotoDocumentation => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        let steps = self.layer().steps();
        let index = steps.iter().position(|step| *step == self)?;

        index.checked_sub(1).map(|previous| steps[previous])
    }

    pub fn is_required(self) -> bool {
        REQUIRED_MAIN_STEPS.contains(&self) || REQUIRED_ITEM_STEPS.contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::ClientSelection => "Client selection",
            WizardStep::BranchSelection => "Branch selection",
            WizardStep::BasicInfo => "Basic order info",
            WizardStep::ItemManager => "Item manager",
            WizardStep::OrderParameters => "Order parameters",
            WizardStep::OrderConfirmation => "Order confirmation",
            WizardStep::ItemBasicInfo => "Item basic info",
            WizardStep::ItemProperties => "Item properties",
            WizardStep::DefectsStains => "Defects and stains",
            WizardStep::PriceCalculator => "Price calculator",
            WizardStep::PhotoDocumentation => "Photo documentation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::ClientSelection => "CLIENT_SELECTION",
            WizardStep::BranchSelection => "BRANCH_SELECTION",
            WizardStep::BasicInfo => "BASIC_INFO",
            WizardStep::ItemManager => "ITEM_MANAGER",
            WizardStep::OrderParameters => "ORDER_PARAMETERS",
            WizardStep::OrderConfirmation => "ORDER_CONFIRMATION",
            WizardStep::ItemBasicInfo => "ITEM_BASIC_INFO",
            WizardStep::ItemProperties => "ITEM_PROPERTIES",
            WizardStep::DefectsStains => "DEFECTS_STAINS",
            WizardStep::PriceCalculator => "PRICE_CALCULATOR",
            WizardStep::PhotoDocumentation => "PHOTO_DOCUMENTATION",
        }
    }
}

impl FromStr for WizardStep {
    type Err = WizardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        MAIN_STEPS
            .iter()
            .chain(ITEM_STEPS.iter())
            .find(|step| step.as_str() == input)
            .copied()
            .ok_or_else(|| WizardError::UnknownStep(input.to_string()))
    }
}

impl Display for WizardStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(non_snake_case)]
    fn next__main_steps__should_follow_branch_inclusive_order() {
        let mut visited = vec![WizardStep::ClientSelection];

        while let Some(next) = visited.last().unwrap().next() {
            visited.push(next);
        }

        assert_eq!(visited, MAIN_STEPS.to_vec());
    }

    #[test]
    #[allow(non_snake_case)]
    fn next__item_steps__should_stay_inside_item_layer_and_end_at_photo_documentation() {
        let mut visited = vec![WizardStep::ItemBasicInfo];

        while let Some(next) = visited.last().unwrap().next() {
            visited.push(next);
        }

        assert_eq!(visited, ITEM_STEPS.to_vec());
        assert!(visited.iter().all(|step| step.layer() == StepLayer::Item));
    }

    #[test]
    #[allow(non_snake_case)]
    fn previous__first_step_of_layer__should_return_none() {
        assert_eq!(WizardStep::ClientSelection.previous(), None);
        assert_eq!(WizardStep::ItemBasicInfo.previous(), None);
        assert_eq!(
            WizardStep::BasicInfo.previous(),
            Some(WizardStep::BranchSelection)
        );
        assert_eq!(
            WizardStep::PhotoDocumentation.previous(),
            Some(WizardStep::PriceCalculator)
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn from_str__known_and_unknown_names__should_parse_or_return_error() {
        assert_eq!(
            WizardStep::from_str("DEFECTS_STAINS").unwrap(),
            WizardStep::DefectsStains
        );
        assert_eq!(
            WizardStep::from_str("defects_stains").unwrap_err(),
            WizardError::UnknownStep(String::from("defects_stains"))
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn serialize__step__should_use_the_same_name_as_display() {
        assert_eq!(
            serde_json::to_string(&WizardStep::OrderParameters).unwrap(),
            format!("\"{}\"", WizardStep::OrderParameters)
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn is_required__optional_steps__should_return_false() {
        assert!(!WizardStep::BasicInfo.is_required());
        assert!(!WizardStep::DefectsStains.is_required());
        assert!(!WizardStep::PhotoDocumentation.is_required());
        assert!(WizardStep::PriceCalculator.is_required());
    }
}
