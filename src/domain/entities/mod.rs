//! Core domain entities.
//!
//! - [`Link`] - A short alias bound to a target URL
//! - [`Click`] - An immutable redirect event
//! - [`AnalyticsSummary`] - Per-alias projection of clicks, never stored
//!
//! Creation inputs live in separate structs (`NewLink`, `NewClick`).

pub mod click;
pub mod link;
pub mod summary;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
pub use summary::{AnalyticsSummary, DAY_KEY_FORMAT};
