//! Business logic services for the application layer.

pub mod alias_allocator;
pub mod analytics_service;
pub mod click_service;
pub mod link_service;

pub use alias_allocator::{AliasAllocator, AliasPolicy};
pub use analytics_service::{AnalyticsService, ClickPage};
pub use click_service::ClickService;
pub use link_service::LinkService;

use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Link service over a backend chosen at runtime.
pub type DynLinkService = LinkService<dyn LinkRepository>;
/// Click service over a backend chosen at runtime.
pub type DynClickService = ClickService<dyn LinkRepository, dyn ClickRepository>;
/// Analytics service over a backend chosen at runtime.
pub type DynAnalyticsService = AnalyticsService<dyn LinkRepository, dyn ClickRepository>;
