//! Session manager for the Jules API.
//!
//! Layers, leaf first:
//!
//! - [`service::JulesService`] is the async seam over the HTTP client.
//! - [`repository`], [`feed`] and [`dispatcher`] are the read and write
//!   operations, each a few sequential round trips.
//! - [`app`] holds view state; [`runtime::ViewController`] runs every user
//!   action as an independent tokio task and hands results back through the
//!   view's pending-event queue.
//! - [`render`] draws views with `jules_view` widgets.
//!
//! There is no cache and no retry anywhere. Every refresh replaces what is
//! shown, and a failed action leaves the previous data in place.

pub mod app;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod feed;
pub mod logging;
pub mod render;
pub mod repository;
pub mod runtime;
pub mod service;
pub mod startup;
pub mod transcript;

pub use error::ActionError;
pub use service::JulesService;
