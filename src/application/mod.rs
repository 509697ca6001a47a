//! Application layer services implementing business logic.
//!
//! Services consume repository traits and bound every store call with the
//! configured deadline. HTTP handlers and the admin CLI talk to these, never
//! to repositories directly.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and retirement
//! - [`services::click_service::ClickService`] - Click recording with UA classification
//! - [`services::analytics_service::AnalyticsService`] - Per-alias summaries and raw click pages

pub mod services;
