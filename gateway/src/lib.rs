//! Typed access layer for a Strapi content CMS.
//!
//! [`ContentGateway`] turns typed list, detail and search parameters into
//! the CMS's bracket-path query grammar (see [`query`]), executes the
//! request and returns typed envelopes. It also carries the best-effort
//! telemetry calls: session actions and aggregate stats. [`AuthRelay`]
//! forwards login, registration and password-reset calls verbatim.
//!
//! Configuration is explicit: build a [`GatewayConfig`] once at startup
//! (usually [`GatewayConfig::from_env`]) and hand it to the constructor.

mod auth;
mod config;
mod content;
mod error;
mod http;
pub mod query;
mod telemetry;

pub use auth::AuthRelay;
pub use config::{GatewayConfig, DEFAULT_BASE_URL};
pub use content::ContentGateway;
pub use content_hub_shared as model;
pub use error::{ErrorKind, GatewayError, Result};
pub use query::{CmsQuery, FieldFilter, FilterOperator, ListParams};
