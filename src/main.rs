use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env when present; the platform may
    // provide them directly instead.
    let dotenv = dotenvy::dotenv();

    telemetry::init("info", Level::INFO)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => info!("no .env file; using process environment"),
        Err(e) => warn!(error = %e, "failed to read .env"),
    }

    api::start().await?;

    Ok(())
}
