//! Deterministic decay transforms and the decay engine
//!
//! All transform functions here must be pure and deterministic:
//! - Seeded RNG only (see [`crate::seeded_unit`])
//! - Same (input, progress) always gives the same output
//! - No rendering or platform dependencies
//!
//! The engine derives progress from wall-clock elapsed time, never from
//! accumulated per-tick deltas, so frame-rate variance and tab throttling
//! cannot drift it.

pub mod color;
pub mod curve;
pub mod engine;
pub mod image;
pub mod layout;
pub mod text;

pub use color::{ColorDecayStyle, color_decay};
pub use curve::DecayCurve;
pub use engine::{DecayEngine, EngineState, TickOutput};
pub use image::{ImageDecayStyle, image_decay};
pub use layout::{LayoutDecayStyle, layout_decay};
pub use text::{DECAY_CHARS, decay_text};
