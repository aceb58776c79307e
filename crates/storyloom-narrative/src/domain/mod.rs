//! Domain layer for the Scene Generation context.

pub mod generation_result;
pub mod prompts;
pub mod scene;
