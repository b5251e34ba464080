//! Process entry point for a scheduled trigger

use crate::config::{Config, ProcessEnv, Settings};
use crate::device::CloudDeviceController;
use crate::error::Result;
use crate::logging::init_logging;
use crate::orchestrator::{Orchestrator, RunOutcome};
use crate::pricing::NordPoolClient;
use tracing::info;

/// Handle one trigger event; the event payload carries no settings
pub async fn handler(event: serde_json::Value) -> Result<RunOutcome> {
    let env = ProcessEnv;
    let settings = Settings::load(&env)?;
    init_logging(&settings.logging)?;
    info!("Nordplug {} starting", env!("APP_VERSION"));

    let config = Config::load_with_settings(&env, settings)?;
    run_with_config(&config, &event).await
}

/// Run once with the production collaborators
pub async fn run_with_config(config: &Config, event: &serde_json::Value) -> Result<RunOutcome> {
    let pricing = NordPoolClient::new(&config.settings.pricing)?;
    let devices = CloudDeviceController::new(&config.settings.cloud, config.credentials.clone())?;

    let orchestrator = Orchestrator::new(config, &pricing, &devices);
    if !event.is_null() {
        orchestrator
            .logger()
            .debug(&format!("Trigger event: {}", event));
    }
    orchestrator.run().await
}
