use dotenv::dotenv;

mod application;
mod config;
mod domain;
mod infrastructure;
mod logging;
mod presentation;
#[cfg(test)]
mod test_support;

use config::AppConfig;
use infrastructure::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init(config.log_file.as_deref())?;

    tracing::info!(
        "Starting ragchat on port {} (database {}, vector index {})",
        config.port,
        config.database_url,
        config.vector_store_path.display()
    );

    let container = AppContainer::new(config)?;

    let server = HttpServer::new(
        container.chat_handler.clone(),
        container.document_handler.clone(),
        Some(container.config.port),
        container.config.max_upload_bytes,
    );

    server.run().await
}
