use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use dropslot::{AppState, Config, SlotManager, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = dropslot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        dropslot::logging::init_console_only(&config.logging);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("dropslot - ephemeral file drop");
    info!(
        chat = %config.chat.host,
        command = %config.chat.command,
        "Serving chat bridge"
    );

    let slots = match SlotManager::from_config(&config.storage) {
        Ok(slots) => slots,
        Err(e) => {
            error!("Failed to open storage at {}: {}", config.storage.path, e);
            return ExitCode::FAILURE;
        }
    };

    // Slots do not survive a restart, so neither do their files.
    if let Err(e) = slots.storage().reset() {
        error!("Failed to reset storage at {}: {}", config.storage.path, e);
        return ExitCode::FAILURE;
    }
    info!(
        path = %config.storage.path,
        max_storage = %dropslot::format_file_size(config.storage.max_storage_bytes),
        max_file = %dropslot::format_file_size(config.storage.max_file_bytes),
        retention_secs = config.storage.retention_secs,
        "Storage ready"
    );

    let app_state = match AppState::from_config(&config, Arc::new(slots)) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to set up application state: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config.web, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
