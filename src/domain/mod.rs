//! Domain layer containing business entities and storage contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Storage trait definitions
//! - [`click_event`] - Click metadata captured at redirect time
//! - [`click_worker`] - Asynchronous click recording
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the alias and answers with `302`
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] records it with retry
//! 4. The click lands in a [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
