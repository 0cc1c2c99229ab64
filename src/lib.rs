//! Core library exports for the Folio service.
//!
//! With the `data` feature only the domain, Diesel models and schema are
//! compiled. The `server` feature adds repositories, services, forms, routes
//! and the category change feed used by the admin web application.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod blob;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod feed;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role required for every admin operation.
pub const SERVICE_ACCESS_ROLE: &str = "folio";
