#![doc = include_str!("../README.md")]

use tokio::sync::OnceCell;

#[cfg(test)]
#[macro_use]
pub mod test_util;

pub mod clock;
pub mod config;
pub mod error;
#[macro_use]
pub mod router;
#[macro_use]
pub mod cache;
#[macro_use]
pub mod provider;
pub mod service;
#[macro_use]
pub mod rest;

pub use crate::config::Config;
pub use crate::error::GeoError;
pub use crate::service::GeolocationService;

/// Initialized log4rs handle
pub static LOG_HANDLE: OnceCell<Option<log4rs::Handle>> = OnceCell::const_new();
pub(crate) async fn get_log_handle() -> Option<log4rs::Handle> {
    LOG_HANDLE
        .get_or_init(|| async move {
            // Set up basic logger to make sure we can write to stdout
            let stdout = log4rs::append::console::ConsoleAppender::builder()
                .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                    "{d(%Y-%m-%d %H:%M:%S)} | {I} | {h({l}):5.5} | {f}:{L} | {m}{n}",
                )))
                .build();
            match log4rs::config::Config::builder()
                .appender(log4rs::config::Appender::builder().build("stdout", Box::new(stdout)))
                .build(
                    log4rs::config::Root::builder()
                        .appender("stdout")
                        .build(log::LevelFilter::Debug),
                ) {
                Ok(config) => log4rs::init_config(config).ok(),
                Err(_) => None,
            }
        })
        .await
        .to_owned()
}

/// Initialize a log4rs logger with provided configuration file path
pub async fn load_logger_config_from_file(config_file: &str) -> Result<(), String> {
    let log_handle = get_log_handle()
        .await
        .ok_or("(load_logger_config_from_file) Could not get the log handle.")?;
    match log4rs::config::load_config_file(config_file, Default::default()) {
        Ok(config) => {
            log_handle.set_config(config);
            Ok(())
        }
        Err(e) => Err(format!(
            "(logger) Could not parse log config file [{}]: {}.",
            config_file, e,
        )),
    }
}

/// Tokio signal handler that will wait for a user to press CTRL+C.
/// This signal handler can be used with axum's `with_graceful_shutdown`.
///
/// # Examples
///
/// ## axum
/// ```no_run
/// use svc_geolocation::shutdown_signal;
/// pub async fn server() {
///     let app: axum::Router = axum::Router::new();
///     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
///     axum::serve(listener, app)
///         .with_graceful_shutdown(shutdown_signal("rest", None))
///         .await
///         .unwrap();
/// }
/// ```
///
/// ## using a shutdown signal channel
/// ```no_run
/// use svc_geolocation::shutdown_signal;
/// pub async fn server() {
///     let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
///     tokio::spawn(async move {
///         let app: axum::Router = axum::Router::new();
///         let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
///         axum::serve(listener, app)
///             .with_graceful_shutdown(shutdown_signal("rest", Some(shutdown_rx)))
///             .await
///     });
///
///     // Send server the shutdown request
///     shutdown_tx.send(()).expect("Could not stop server.");
/// }
/// ```
pub async fn shutdown_signal(
    server: &str,
    shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
) {
    match shutdown_rx {
        Some(receiver) => {
            if receiver.await.is_err() {
                log::warn!("(shutdown_signal) shutdown sender for [{}] dropped.", server);
            }
        }
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("(shutdown_signal) could not listen for ctrl-c: {}", e);
            }
        }
    }

    log::warn!("(shutdown_signal) server shutdown for [{}].", server);
}
