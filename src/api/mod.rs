//! Typed client for the REST backend.
//!
//! [`BackendClient`] owns the HTTP connection pool and base URLs. Each
//! request goes through a [`Backend`] view that carries the caller's access
//! token (or none), and from there through a resource API:
//!
//! - [`AccountsApi`]: login, registration, profile, addresses, admin users
//! - [`CatalogApi`]: categories, materials, products, reviews
//! - [`OrdersApi`]: quotations and bookings
//! - [`ServicesApi`]: store services
//! - [`PortfolioApi`]: portfolio projects and categories
//! - [`ManagementApi`]: analytics, overview, staff, attendance, projects
//!
//! Responses are unwrapped from the backend's `{status, message, data}`
//! envelope (see [`envelope`]) and decoded into [`crate::domain`] types.

mod accounts;
mod catalog;
mod client;
pub mod envelope;
mod error;
mod management;
mod orders;
mod portfolio;
mod services;

pub use accounts::AccountsApi;
pub use catalog::CatalogApi;
pub use client::{Backend, BackendClient};
pub use error::{ApiError, Result};
pub use management::ManagementApi;
pub use orders::OrdersApi;
pub use portfolio::PortfolioApi;
pub use services::ServicesApi;
