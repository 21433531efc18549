//! Business logic services for admin.
//!
//! # Services
//!
//! - `browser` - Current page and cursor navigation for a list
//! - `sessions` - Per-session browsers kept in a `moka` cache
//! - `in_flight` - Double-submit guard for record updates

pub mod browser;
pub mod in_flight;
pub mod sessions;

pub use browser::{BrowseError, Listing, PageBrowser};
pub use in_flight::{InFlight, InFlightGuard};
pub use sessions::{BrowserBusy, BrowserRegistry};
