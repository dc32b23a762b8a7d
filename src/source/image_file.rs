//! Image and animated-GIF file loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GrayImage};

use super::{FrameSource, SourceError};

/// A decoded image or animated GIF held fully in memory.
///
/// GIF files contribute every frame along with the delay recorded in the
/// file; other formats contribute a single untimed frame. Decoding happens
/// once at load and all rasters are converted to 8-bit luminance up front.
#[derive(Debug)]
pub struct ImageFileSource {
    frames: Vec<SourceFrame>,
    cursor: usize,
}

#[derive(Debug)]
struct SourceFrame {
    raster: GrayImage,
    duration_ms: Option<u64>,
}

impl ImageFileSource {
    /// Load `path`, decoding all frames for `.gif` files.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let is_gif = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
        let frames = if is_gif {
            Self::decode_gif(path)?
        } else {
            Self::decode_still(path)?
        };
        log::debug!("Loaded {} frame(s) from {}", frames.len(), path.display());
        Ok(Self { frames, cursor: 0 })
    }

    fn decode_still(path: &Path) -> Result<Vec<SourceFrame>, SourceError> {
        let raster = image::open(path)?.to_luma8();
        Ok(vec![SourceFrame {
            raster,
            duration_ms: None,
        }])
    }

    fn decode_gif(path: &Path) -> Result<Vec<SourceFrame>, SourceError> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(reader)?;
        let frames = decoder
            .into_frames()
            .collect_frames()?
            .into_iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                let duration_ms = if denom == 0 {
                    None
                } else {
                    Some((numer / denom) as u64)
                };
                let raster = DynamicImage::ImageRgba8(frame.into_buffer()).to_luma8();
                SourceFrame {
                    raster,
                    duration_ms,
                }
            })
            .collect();
        Ok(frames)
    }
}

impl FrameSource for ImageFileSource {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn seek(&mut self, index: usize) -> Result<(), SourceError> {
        if index >= self.frames.len() {
            return Err(SourceError::SeekOutOfRange {
                index,
                count: self.frames.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    fn current_raster(&self) -> Option<&GrayImage> {
        self.frames.get(self.cursor).map(|frame| &frame.raster)
    }

    fn frame_duration(&self) -> Option<u64> {
        self.frames.get(self.cursor).and_then(|frame| frame.duration_ms)
    }
}
