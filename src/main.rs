use counseling_scheduler::app::app::App;
use counseling_scheduler::util::logger::Logger;
use dotenv::dotenv;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Environment first so RUST_LOG / LOG_DIR from .env reach the logger
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            std::process::exit(1);
        }
    };

    info!("🚀 Starting Counseling Scheduler backend");
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("💥 Startup failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.start().await {
        error!("💥 Server error: {e}");
        std::process::exit(1);
    }
}
