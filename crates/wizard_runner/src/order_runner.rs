use std::fmt::{Display, Formatter};

use anyhow::{bail, Context, Result};
use base::entities::{SessionId, StoreKey};
use base::operation_result::OperationResult;
use base::settings::Settings;
use base::stores::session_store::SessionStore;
use order_wizard::session::WizardSession;
use order_wizard::steps::WizardStep;
use pricing::catalog::ModifierCatalog;
use pricing::entities::{ModifierId, Price};
use rust_decimal::Decimal;

/// An item entered through the item sub-wizard.
#[derive(Debug, Clone)]
pub struct ScriptedItem {
    pub name: String,
    pub category: String,
    pub base_price: Price,
    pub modifiers: Vec<ModifierId>,
}

#[derive(Debug, Clone)]
pub struct ScriptedOrder {
    pub client_name: String,
    pub branch_name: String,
    pub items: Vec<ScriptedItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub name: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub session_id: SessionId,
    pub store_key: StoreKey,
    pub final_step: WizardStep,
    pub is_wizard_valid: bool,
    pub items: Vec<PricedItem>,
    pub total_price: Price,
}

impl Display for OrderSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Session {} ({})", self.session_id, self.store_key)?;
        writeln!(
            f,
            "Step: {}, valid: {}",
            self.final_step, self.is_wizard_valid
        )?;

        for item in self.items.iter() {
            writeln!(f, "{}: {}", item.name, item.price)?;
        }

        write!(f, "Total: {}", self.total_price)
    }
}

/// Drives one session through the whole wizard the way the UI would: each step is
/// reported valid, every item goes through the sub-wizard and is priced on the price
/// calculator step, and the finished session is saved to `store`.
pub fn run_scripted_order<S>(
    order: &ScriptedOrder,
    catalog: &ModifierCatalog,
    settings: &Settings,
    store: &mut S,
) -> Result<OrderSummary>
where
    S: SessionStore,
{
    let mut session = WizardSession::with_error_policy(settings.error_policy.clone());

    log::info!("session {} started", session.id());

    session.apply_outcome(
        WizardStep::ClientSelection,
        &OperationResult::succeeded(order.client_name.clone()),
    );
    proceed_to(&mut session, WizardStep::BranchSelection)?;

    session.apply_outcome(
        WizardStep::BranchSelection,
        &OperationResult::succeeded(order.branch_name.clone()),
    );
    proceed_to(&mut session, WizardStep::ItemManager)?;

    let mut items = Vec::with_capacity(order.items.len());

    for item in order.items.iter() {
        items.push(run_item_wizard(&mut session, item, catalog)?);
    }

    session.validation_mut().set_step_valid(WizardStep::ItemManager);
    proceed_to(&mut session, WizardStep::OrderConfirmation)?;
    session.mark_valid_and_proceed();

    let store_key = session.save_to(store, settings)?;
    let total_price = items.iter().map(|item| item.price).sum::<Decimal>();

    Ok(OrderSummary {
        session_id: session.id().to_string(),
        store_key,
        final_step: session.current_step(),
        is_wizard_valid: session.validation().is_wizard_valid(),
        items,
        total_price,
    })
}

fn run_item_wizard(
    session: &mut WizardSession,
    item: &ScriptedItem,
    catalog: &ModifierCatalog,
) -> Result<PricedItem> {
    session.start_item_wizard();
    proceed_to(session, WizardStep::PriceCalculator)?;

    let mut item_catalog = catalog.clone();
    for id in item.modifiers.iter() {
        item_catalog
            .set_applied(id, true)
            .with_context(|| format!("can't apply a modifier to {}", item.name))?;
    }

    let price = item_catalog.price_for(item.base_price, &item.category);
    log::info!("{} ({}) priced at {}", item.name, item.category, price);

    proceed_to(session, WizardStep::PhotoDocumentation)?;
    session.mark_valid_and_proceed();

    if !session.can_finish_item() {
        bail!(
            "item {} has unfinished steps: {:?}",
            item.name,
            session.missing_required_item_steps()
        );
    }

    session.finish_item_wizard(true);

    Ok(PricedItem {
        name: item.name.clone(),
        price,
    })
}

/// Marks steps valid until `target` becomes the current step.
fn proceed_to(session: &mut WizardSession, target: WizardStep) -> Result<()> {
    let max_attempts = 2 * (WizardStep::main_steps().len() + WizardStep::item_steps().len());

    for _ in 0..max_attempts {
        if session.current_step() == target {
            return Ok(());
        }

        session.mark_valid_and_proceed();
    }

    bail!(
        "step {} is not reachable, stuck on {}",
        target,
        session.current_step()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_wizard::stores::in_memory_session_store::InMemorySessionStore;
    use pricing::catalog::ModifierCsvRecord;
    use rust_decimal_macros::dec;

    fn catalog() -> ModifierCatalog {
        let record = |id: &str, modifier_type: &str, category: &str, value: &str| {
            ModifierCsvRecord {
                id: id.to_string(),
                name: id.to_string(),
                modifier_type: modifier_type.to_string(),
                category: category.to_string(),
                value: value.to_string(),
                min_value: None,
                max_value: None,
                is_applied: false,
                applicable_categories: String::new(),
            }
        };

        ModifierCatalog::from_vec(vec![
            record("dark-color", "COLOR", "textile", "5"),
            record("manual-cleaning", "PERCENTAGE", "general", "20"),
            record("urgent", "RANGE_PERCENTAGE", "expedition", "50"),
        ])
        .unwrap()
    }

    fn order(modifiers: Vec<&str>) -> ScriptedOrder {
        ScriptedOrder {
            client_name: String::from("Olena Kovalenko"),
            branch_name: String::from("Central"),
            items: vec![
                ScriptedItem {
                    name: String::from("Coat"),
                    category: String::from("textile-coat"),
                    base_price: dec!(100),
                    modifiers: modifiers.into_iter().map(String::from).collect(),
                },
                ScriptedItem {
                    name: String::from("Scarf"),
                    category: String::from("textile-accessory"),
                    base_price: dec!(20),
                    modifiers: vec![],
                },
            ],
        }
    }

    #[test]
    #[allow(non_snake_case)]
    fn run_scripted_order__two_items__should_confirm_order_and_save_session() {
        let settings = Settings::default();
        let mut store = InMemorySessionStore::new();

        let summary = run_scripted_order(
            &order(vec!["dark-color", "manual-cleaning"]),
            &catalog(),
            &settings,
            &mut store,
        )
        .unwrap();

        assert_eq!(summary.final_step, WizardStep::OrderConfirmation);
        assert!(summary.is_wizard_valid);
        assert_eq!(
            summary.items,
            vec![
                PricedItem {
                    name: String::from("Coat"),
                    price: dec!(126),
                },
                PricedItem {
                    name: String::from("Scarf"),
                    price: dec!(20),
                },
            ]
        );
        assert_eq!(summary.total_price, dec!(146));

        let restored = WizardSession::restore_from(&store, &settings, &summary.session_id)
            .unwrap()
            .unwrap();
        assert_eq!(restored.current_step(), WizardStep::OrderConfirmation);
        assert!(!restored.navigation().is_item_wizard_active());
    }

    #[test]
    #[allow(non_snake_case)]
    fn run_scripted_order__unknown_modifier__should_return_error() {
        let mut store = InMemorySessionStore::new();

        let result = run_scripted_order(
            &order(vec!["gold-plating"]),
            &catalog(),
            &Settings::default(),
            &mut store,
        );

        assert!(result.is_err());
        assert!(store.is_empty());
    }
}
