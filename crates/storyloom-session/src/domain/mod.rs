//! Domain layer for the Session context.

pub mod aggregates;
pub mod commands;
