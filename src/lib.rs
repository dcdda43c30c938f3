//! Weather-lookup presentation core.
//!
//! Resolves a location (configured position, map tap, or text address),
//! fetches current/hourly/seven-day weather, and exposes it through
//! per-screen view-models: an observable state container for what the
//! screen shows, a one-shot event channel for what the screen should do.
//!
//! The reactive primitives live in [`flow`], the screen view-models in
//! [`presentation`], the use-case seams in [`domain`], and concrete
//! Open-Meteo-backed implementations in [`data`].

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod flow;
pub mod presentation;
