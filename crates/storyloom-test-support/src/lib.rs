//! Shared test fakes and utilities for the Storyloom narrative engine.

mod clock;
mod image;
mod text;

pub use clock::{FixedClock, fixed_now};
pub use image::{EmptyImageGenerator, FailingImageGenerator, RecordingImageGenerator};
pub use text::{FailingTextGenerator, ScriptedTextGenerator, narrative_json};
