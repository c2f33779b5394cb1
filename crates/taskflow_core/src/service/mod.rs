//! Core use-case services.
//!
//! # Responsibility
//! - Own session state (task collection, view settings) behind explicit objects.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod id_alloc;
pub mod task_session;
pub mod task_store;
