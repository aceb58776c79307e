//! Storyloom Core: shared domain abstractions.
//!
//! This crate defines the traits and types every other Storyloom crate
//! depends on: the error taxonomy, the command contract, the clock, and the
//! ports toward the external text and image generation capabilities. It
//! contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod generation;
