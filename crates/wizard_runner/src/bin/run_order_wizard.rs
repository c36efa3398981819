use anyhow::{Context, Result};
use base::settings::Settings;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use order_wizard::stores::in_memory_session_store::InMemorySessionStore;
use pricing::catalog::ModifierCatalog;
use rust_decimal_macros::dec;
use wizard_runner::order_runner::{run_scripted_order, ScriptedItem, ScriptedOrder};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

fn main() -> Result<()> {
    dotenv::from_filename("wizard.env").ok();

    let settings = Settings::from_env()?;
    init_logging(&settings)?;

    let catalog = ModifierCatalog::from_csv(settings.modifiers_csv_file()?)?;
    log::debug!("modifier catalog:\n{}", catalog);

    let order = ScriptedOrder {
        client_name: String::from("Olena Kovalenko"),
        branch_name: String::from("Central"),
        items: vec![
            ScriptedItem {
                name: String::from("Wedding dress"),
                category: String::from("textile-dress"),
                base_price: dec!(850),
                modifiers: vec![String::from("wedding-dress"), String::from("urgent-48h")],
            },
            ScriptedItem {
                name: String::from("Leather jacket"),
                category: String::from("leather-jacket"),
                base_price: dec!(1200),
                modifiers: vec![String::from("leather-dye"), String::from("kids")],
            },
        ],
    };

    let mut store = InMemorySessionStore::new();
    let summary = run_scripted_order(&order, &catalog, &settings, &mut store)?;

    log::info!("order summary:\n{}", summary);

    Ok(())
}

fn init_logging(settings: &Settings) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(settings.log_level))
        .context("invalid logging config")?;

    log4rs::init_config(config).context("can't initialize logging")?;

    Ok(())
}
