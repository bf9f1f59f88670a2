//! Client code for the delegators dashboard.
//!
//! This crate provides the subgraph gateway client, the delegation event
//! and avatar queries, and cache-first name resolution.

pub mod avatar;
pub mod delegations;
pub mod ens;
pub mod graph;

pub use ens::{CachedResolver, EnsResolver, NameResolver, NegativeCaching, ResolveStats};
pub use graph::{GraphClient, GraphConfig, GraphError};
