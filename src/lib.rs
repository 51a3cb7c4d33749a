pub mod cli;
pub mod core;
pub mod store;

use crate::cli::enquiry::EnquiryCommand;
use crate::cli::quote::QuoteArgs;
use crate::core::config::AppConfig;
use crate::core::enquiry::{self, EnquiryBook};
use crate::core::store::Store;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Calc(QuoteArgs),
    Compare(QuoteArgs),
    Schedule { quote: QuoteArgs, yearly: bool },
    Models,
    Enquiry(EnquiryCommand),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Caravan finance starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Calc(args) => cli::calc::run(&config, &args),
        AppCommand::Compare(args) => cli::compare::run(&config, &args),
        AppCommand::Schedule { quote, yearly } => cli::schedule::run(&config, &quote, yearly),
        AppCommand::Models => {
            cli::models::run(&config);
            Ok(())
        }
        AppCommand::Enquiry(command) => {
            let data_path = config.default_data_path()?;
            let store = store::KeyValueStore::open(&data_path.join("store"))?;
            run_enquiry(&config, &store, command).await
        }
    }
}

/// Runs an enquiry command against an already opened store.
pub async fn run_enquiry(
    config: &AppConfig,
    store: &dyn Store,
    command: EnquiryCommand,
) -> Result<()> {
    let book = EnquiryBook::new(store.get_collection(enquiry::COLLECTION)?);
    cli::enquiry::run(config, &book, command).await
}
