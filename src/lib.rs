//! jobdash - read-only dashboard for cluster job and node management services
//!
//! The library holds everything but argument parsing: the record models, the
//! HTTP client, the pure presentation layer in [`dashboard`] and the three
//! surfaces that draw it ([`html`], [`display`] and [`tui`]).

pub mod api;
pub mod dashboard;
pub mod display;
pub mod formatting;
pub mod html;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
