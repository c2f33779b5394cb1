//! Flutter-facing bindings for the TaskFlow core.
//!
//! `api` holds every function exported through flutter_rust_bridge.

pub mod api;
