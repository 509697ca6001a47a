//! Helper functions used across the application.
//!
//! - [`alias`] - Alias generation and validation
//! - [`url_normalizer`] - URL validation and normalization
//! - [`user_agent`] - User-agent classification
//! - [`client_ip`] - Client address extraction from requests
//! - [`deadline`] - Timeouts for store operations

pub mod alias;
pub mod client_ip;
pub mod deadline;
pub mod url_normalizer;
pub mod user_agent;
