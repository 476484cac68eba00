//! Metalworks Web
//!
//! Server-rendered business front end for a metal-fabrication company:
//! product catalog, quotations, bookings, portfolio and a back-office
//! dashboard, all backed by a REST API.
//!
//! # Architecture
//!
//! - **Server**: Axum router with HTMX-enhanced HTML pages
//! - **Backend client**: typed reqwest client for the REST API
//! - **Sessions**: in-memory visitor sessions holding auth, toasts and the
//!   per-visitor state container
//!
//! # Modules
//!
//! - [`api`]: typed backend client and envelope decoding
//! - [`domain`]: backend resource types
//! - [`store`]: list/record slices and their reducers
//! - [`session`]: visitor sessions and toasts
//! - [`security`]: role guards, rate limiting
//! - [`ui`]: HTML shells and components
//! - [`routes`]: page handlers
//! - [`sitemap`]: `/sitemap.xml`

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_raw_string_hashes)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod forms;
pub mod routes;
pub mod security;
pub mod server;
pub mod session;
pub mod sitemap;
pub mod store;
pub mod ui;

use std::sync::Arc;

use crate::api::{ApiError, BackendClient};
use crate::config::AppConfig;
use crate::security::RateLimiter;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// REST backend client (connection pool).
    pub backend: BackendClient,
    /// Visitor sessions.
    pub sessions: SessionStore,
    /// Global Rate Limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, ApiError> {
        let backend = BackendClient::from_config(&config.backend)?;
        let rate_limiter = Arc::new(RateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));
        Ok(Self {
            config,
            backend,
            sessions: SessionStore::new(),
            rate_limiter,
        })
    }
}
