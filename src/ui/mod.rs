//! Server-rendered HTML.
//!
//! Pages are composed as `layout → page → form/list → table/card`, each level
//! a plain function returning an HTML string. HTMX boosts links and forms so
//! navigation and POST/redirect/GET round trips swap the body in place.
//!
//! # Structure
//!
//! - [`layout`]: public and dashboard shells with the toast container
//! - [`components`]: buttons, badges, cards, tables, form fields
//! - [`format`]: prices, dates, ratings and display defaults

pub mod components;
pub mod format;
mod html;
pub mod layout;

pub use html::{escape, flag, query_value};
pub use layout::Chrome;
