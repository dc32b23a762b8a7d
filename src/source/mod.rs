//! Frame sources: where grayscale rasters come from.

pub mod image_file;

use image::GrayImage;
use thiserror::Error;

pub use image_file::ImageFileSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),
    #[error("frame index {index} out of range for source with {count} frame(s)")]
    SeekOutOfRange { index: usize, count: usize },
}

/// An ordered run of grayscale rasters with optional per-frame timing.
///
/// Implementations hold a cursor over their frames; [`FrameSource::seek`]
/// moves it and [`FrameSource::current_raster`] reads the frame under it.
/// Single-image sources behave as one-frame runs.
pub trait FrameSource {
    /// Total number of frames.
    fn frame_count(&self) -> usize;

    /// Move the cursor to `index`.
    fn seek(&mut self, index: usize) -> Result<(), SourceError>;

    /// The raster under the cursor, if any frame is loaded.
    fn current_raster(&self) -> Option<&GrayImage>;

    /// Display duration in milliseconds recorded for the current frame.
    ///
    /// `None` when the source carries no timing, as for still images.
    fn frame_duration(&self) -> Option<u64>;
}
