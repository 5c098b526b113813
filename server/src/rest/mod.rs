//! REST
//! provides the HTTP JSON interface of the service

#[macro_use]
pub mod macros;
pub mod api;
pub mod server;
