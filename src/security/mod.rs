//! Request guards and resilience middleware.
//!
//! - [`middleware`]: session resolution and role guards
//! - [`rate_limit`]: global token-bucket limiter

pub mod middleware;
pub mod rate_limit;

pub use middleware::{require_admin, require_back_office, require_login, session_middleware};
pub use rate_limit::{RateLimiter, rate_limit_middleware};
