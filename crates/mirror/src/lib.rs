//! Mirror-node REST implementation of the read-only query service.
//!
//! The mirror node is the historical-state side of the network: everything
//! here is a GET against its public REST API, mapped into the core query
//! types. The network-name to base-URL table is injected at construction,
//! never baked in. No retries, no caching; a failed lookup surfaces
//! immediately.

mod client;
mod dto;

pub use client::MirrorClient;
