//! Storyloom: Session bounded context.
//!
//! Owns the session state machine: status, scene history, the current
//! choices, and the error state. `start`, `advance`, and `restart` are the
//! only mutations, and a failed generation cycle never leaves a partial
//! update behind.

pub mod application;
pub mod domain;
pub mod store;
