//! asciimate library crate.
//!
//! Image and GIF to character-art conversion, procedural still-frame
//! effects, and timed playback.

pub mod ascii;
pub mod config;
pub mod effects;
pub mod pipeline;
pub mod playback;
pub mod source;
