//! Visitor session management.
//!
//! Every browser gets an in-memory session keyed by an `HttpOnly` cookie. A
//! session carries the signed-in user with their backend tokens, the pending
//! toast notifications, and the per-visitor [`Store`](crate::store::Store).
//!
//! # Architecture
//!
//! - [`Session`]: Represents a single visitor session
//! - [`SessionStore`]: Thread-safe store for all active sessions
//! - [`Toast`]: One-shot notification rendered on the next page
//!
//! # Example
//!
//! ```rust
//! use metalworks_web::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.success("Category created");
//!
//! let toasts = session.take_toasts();
//! assert_eq!(toasts.len(), 1);
//! assert!(session.take_toasts().is_empty());
//! ```

mod cookie;
mod store;
mod toast;

pub use cookie::{session_cookie, session_id};
pub use store::{AuthSession, Session, SessionStore};
pub use toast::{Toast, ToastKind};
