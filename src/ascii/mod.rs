//! Character-grid rendering: glyph ramps, quantization, and frame types.

pub mod frame;
pub mod palette;
pub mod quantize;
pub mod render;

pub use frame::{AsciiFrame, FrameSequence};
pub use quantize::quantize;
pub use render::{render_frame, RenderError, RenderOptions};
