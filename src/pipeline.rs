//! Conversion pipeline: source frames in, rendered sequences out.
//!
//! Conversion is eager and all-or-nothing: a sequence is built in full
//! before the caller sees it, and any frame failure discards the frames
//! rendered so far.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ascii::{render_frame, AsciiFrame, FrameSequence, RenderError, RenderOptions};
use crate::source::{FrameSource, SourceError};

/// Display duration substituted for frames whose source timing is absent
/// or non-positive.
pub const DEFAULT_FRAME_DURATION_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("no source frames to convert")]
    NoSource,
    #[error("failed to render frame {index}: {source}")]
    Frame { index: usize, source: RenderError },
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Render the frame under the source's cursor into a single grid.
pub fn convert_still<S>(source: &S, options: &RenderOptions) -> Result<AsciiFrame, ConvertError>
where
    S: FrameSource,
{
    let raster = source.current_raster().ok_or(ConvertError::NoSource)?;
    render_frame(raster, options).map_err(|err| ConvertError::Frame {
        index: 0,
        source: err,
    })
}

/// Render every frame of the source into a timed sequence.
///
/// `progress` is called with `(completed, total)` after each rendered
/// frame. Source delays of zero are treated like missing ones and replaced
/// with [`DEFAULT_FRAME_DURATION_MS`]. Any frame failure aborts the whole
/// conversion; no partial sequence escapes.
pub fn convert_animation<S, F>(
    source: &mut S,
    options: &RenderOptions,
    mut progress: F,
) -> Result<FrameSequence, ConvertError>
where
    S: FrameSource,
    F: FnMut(usize, usize),
{
    let total = source.frame_count();
    if total == 0 {
        return Err(ConvertError::NoSource);
    }
    log::info!("Converting {} frame(s) at width {}", total, options.width);

    let mut sequence = FrameSequence::new();
    for index in 0..total {
        source.seek(index)?;
        let raster = source.current_raster().ok_or(ConvertError::NoSource)?;
        let frame = render_frame(raster, options)
            .map_err(|err| ConvertError::Frame { index, source: err })?;
        let duration = match source.frame_duration() {
            Some(ms) if ms > 0 => ms,
            Some(_) => {
                log::warn!(
                    "Frame {} declares a zero delay, using {} ms",
                    index,
                    DEFAULT_FRAME_DURATION_MS
                );
                DEFAULT_FRAME_DURATION_MS
            }
            None => DEFAULT_FRAME_DURATION_MS,
        };
        log::debug!("Rendered frame {}/{} ({} ms)", index + 1, total, duration);
        sequence.push(frame, duration);
        progress(index + 1, total);
    }
    Ok(sequence)
}

/// Write each frame of a sequence to `dir` as a numbered text file.
///
/// Files are named `{base_name}_frame_NNN.txt` with one-based, zero-padded
/// numbering. The directory is created if missing. Returns the written
/// paths in frame order.
pub fn export_frames(
    sequence: &FrameSequence,
    dir: &Path,
    base_name: &str,
) -> Result<Vec<PathBuf>, std::io::Error> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(sequence.len());
    for (index, frame) in sequence.frames().iter().enumerate() {
        let path = dir.join(format!("{}_frame_{:03}.txt", base_name, index + 1));
        fs::write(&path, frame.to_text())?;
        paths.push(path);
    }
    log::info!("Exported {} frame(s) to {}", paths.len(), dir.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// In-memory source with scripted rasters and delays.
    struct StubSource {
        frames: Vec<GrayImage>,
        durations: Vec<Option<u64>>,
        cursor: usize,
    }

    impl StubSource {
        fn new(frames: Vec<GrayImage>, durations: Vec<Option<u64>>) -> Self {
            assert_eq!(frames.len(), durations.len());
            Self {
                frames,
                durations,
                cursor: 0,
            }
        }
    }

    impl FrameSource for StubSource {
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
            self.frames.get(self.cursor)
        }

        fn frame_duration(&self) -> Option<u64> {
            self.durations.get(self.cursor).and_then(|d| *d)
        }
    }

    fn gray(luminance: u8) -> GrayImage {
        GrayImage::from_pixel(10, 10, Luma([luminance]))
    }

    fn width(chars: u32) -> RenderOptions {
        RenderOptions {
            width: chars,
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_still() {
        let source = StubSource::new(vec![gray(128)], vec![None]);
        let frame = convert_still(&source, &width(4)).unwrap();
        assert_eq!(frame.to_text(), "++++\n++++");
    }

    #[test]
    fn test_convert_still_without_frames() {
        let source = StubSource::new(Vec::new(), Vec::new());
        assert!(matches!(
            convert_still(&source, &width(4)),
            Err(ConvertError::NoSource)
        ));
    }

    #[test]
    fn test_convert_animation_durations_and_progress() {
        let mut source = StubSource::new(
            vec![gray(0), gray(128), gray(255)],
            vec![Some(200), Some(0), None],
        );
        let mut seen = Vec::new();
        let sequence =
            convert_animation(&mut source, &width(4), |done, total| seen.push((done, total)))
                .unwrap();

        assert_eq!(sequence.len(), 3);
        // Zero and missing delays both fall back to the default.
        assert_eq!(sequence.durations(), &[200, 100, 100]);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_convert_animation_is_all_or_nothing() {
        let mut source = StubSource::new(
            vec![gray(10), gray(20), GrayImage::new(0, 0), gray(40), gray(50)],
            vec![None; 5],
        );
        let mut seen = Vec::new();
        let result =
            convert_animation(&mut source, &width(4), |done, total| seen.push((done, total)));

        match result {
            Err(ConvertError::Frame { index: 2, source }) => {
                assert_eq!(source, RenderError::EmptyRaster);
            }
            other => panic!("expected frame 2 to fail, got {:?}", other),
        }
        // Progress stopped at the failing frame and no sequence escaped.
        assert_eq!(seen, vec![(1, 5), (2, 5)]);
    }

    #[test]
    fn test_convert_animation_without_frames() {
        let mut source = StubSource::new(Vec::new(), Vec::new());
        assert!(matches!(
            convert_animation(&mut source, &width(4), |_, _| {}),
            Err(ConvertError::NoSource)
        ));
    }

    #[test]
    fn test_export_frames_naming_and_content() {
        let mut sequence = FrameSequence::new();
        for text in ["@@", "##", ".."] {
            sequence.push(AsciiFrame::from_lines(vec![text.to_string()]), 100);
        }

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let paths = export_frames(&sequence, &out, "clip").unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].file_name().unwrap(), "clip_frame_001.txt");
        assert_eq!(paths[2].file_name().unwrap(), "clip_frame_003.txt");
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "##");
    }
}
