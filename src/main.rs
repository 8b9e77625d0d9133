use restyle::{logger, relay::server, Config, GeminiClient, RelayService};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if env_loaded {
        log::info!(".env file loaded");
    } else {
        log::warn!("No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let model = GeminiClient::new(&config.gemini);
    let service = RelayService::new(config.api_key.clone(), Arc::new(model));

    server::run(&config, service).await?;

    Ok(())
}
