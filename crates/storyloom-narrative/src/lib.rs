//! Storyloom: Scene Generation bounded context.
//!
//! Turns a narrative intent (begin with a premise, or continue from prior
//! context and a chosen action) into a finished scene: validated prose and
//! choices from the text capability, then an illustration derived from the
//! narrative's image prompt.

pub mod application;
pub mod domain;
