use tracing::{error, info};

use efs_files::{Config, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config_path =
        std::env::var("EFS_FILES_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = efs_files::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        efs_files::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("efs-files - shared volume file service");
    info!("Uploads directory: {}", config.storage.uploads_dir);

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
