//! Shared client core for the portfolio site.
//!
//! Everything here is free of browser bindings so it runs and tests on the
//! host. The web shell wires these types to the DOM.

pub mod config;
pub mod csrf;
pub mod filter;
pub mod notification;
pub mod scroll;
pub mod search;
pub mod submission;
pub mod theme;
