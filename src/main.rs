use dotenv::dotenv;
use tracing::{info, warn};

use agency_crm_backend::app::app::App;
use agency_crm_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Console + rolling file logging; the guards must stay alive for the
    // whole process.
    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("Failed to initialize file logging: {e}");
            tracing_subscriber::fmt().init();
            None
        }
    };

    info!("🚀 Starting Agency CRM Backend");

    // Load environment variables from .env file
    match dotenv() {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
