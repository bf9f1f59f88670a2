//! Core types and shared functionality for the delegators dashboard.
//!
//! This crate provides:
//! - Address-to-name resolution cache with a flat-file backend
//! - Delegation event model and summary totals
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod events;

pub use cache::{CacheEntry, Lookup, ResolutionCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use events::{DelegationEvent, EventKind, Totals};
