//! REST server entry point

use log::info;
use std::sync::Arc;
use std::time::Duration;
use svc_geolocation::*;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> anyhow::Result<()> {
    // Will use default config settings if no environment vars are found.
    let config = Config::try_from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration from environment: {}", e))?;

    // Try to load log configuration from the provided log file.
    // Will default to stdout debug logging if the file can not be loaded.
    if let Err(e) = load_logger_config_from_file(config.log_config.as_str()).await {
        log::error!("(main) {}", e);
    }

    info!("(main) Server startup.");

    let service = Arc::new(GeolocationService::from_config(&config)?);

    // Expired entries are skipped on read; the sweeper only frees memory
    let sweeper = tokio::spawn(cache::sweeper::sweep_loop(
        service.store(),
        service.clock(),
        Duration::from_secs(config.cache_sweep_interval_s.max(1)),
    ));

    let result = rest::server::rest_server(config, service, None).await;
    sweeper.abort();

    info!("(main) server shutdown.");

    // Make sure all log message are written/ displayed before shutdown
    log::logger().flush();

    result
}
