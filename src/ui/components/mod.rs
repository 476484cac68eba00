//! Reusable HTML components.
//!
//! Each component is a function from typed values to an HTML fragment.
//! Text arguments are escaped; arguments named `body`, `actions` or cells are
//! HTML produced by other components.
//!
//! # Components
//!
//! - [`button`]: buttons, links and one-click POST forms
//! - [`badge`]: status badges
//! - [`card`]: cards, stat tiles, sections, breadcrumbs, empty states
//! - [`input`]: labelled form fields
//! - [`table`]: data tables and pagination

pub mod badge;
pub mod button;
pub mod card;
pub mod input;
pub mod table;

pub use badge::{BadgeVariant, badge};
pub use button::{ButtonSize, ButtonVariant};
pub use card::{breadcrumb, card, empty_state, error_banner, page_header, section, stat_card};
pub use input::Input;
pub use table::{data_table, pagination};
