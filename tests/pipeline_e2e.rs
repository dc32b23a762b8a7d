//! End-to-end tests for the file-to-ASCII conversion pipeline.
//!
//! These tests run against real files on disk:
//! - Still images render at the requested width with terminal aspect
//!   correction applied
//! - Animated GIFs convert frame by frame, keeping their recorded delays
//! - Converted sequences export as numbered text files
//! - Unreadable inputs fail up front without writing anything
//!
//! GIF fixtures use flat-color frames only: flat colors survive the
//! format's palette quantization, so glyph-level expectations stay exact.

use std::fs::{self, File};
use std::path::PathBuf;

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, GrayImage, Luma, Rgba, RgbaImage};
use tempfile::TempDir;

use asciimate::ascii::palette::STANDARD_RAMP;
use asciimate::ascii::quantize::ramp_index;
use asciimate::ascii::{RenderError, RenderOptions};
use asciimate::pipeline::{
    convert_animation, convert_still, export_frames, ConvertError, DEFAULT_FRAME_DURATION_MS,
};
use asciimate::source::{FrameSource, ImageFileSource, SourceError};

/// Save a raster as a lossless PNG and return its path.
fn write_png(dir: &TempDir, name: &str, raster: &GrayImage) -> PathBuf {
    let path = dir.path().join(name);
    raster.save(&path).expect("should save fixture PNG");
    path
}

/// Encode 16x16 flat-color frames as an animated GIF.
///
/// Each entry is `(luminance, delay_ms)`; delays are multiples of 10
/// because the format stores hundredths of a second.
fn write_gif(dir: &TempDir, name: &str, frames: &[(u8, u32)]) -> PathBuf {
    let path = dir.path().join(name);
    let file = File::create(&path).expect("should create fixture GIF");
    let mut encoder = GifEncoder::new(file);
    for &(level, delay_ms) in frames {
        let buffer = RgbaImage::from_pixel(16, 16, Rgba([level, level, level, 255]));
        let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame).expect("should encode GIF frame");
    }
    path
}

/// Horizontal luminance gradient: left dark, right bright.
fn gradient_raster(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _y| {
        Luma([((x as f32 / width as f32) * 255.0) as u8])
    })
}

fn options(width: u32, black_as_space: bool) -> RenderOptions {
    RenderOptions {
        width,
        black_as_space,
    }
}

// ====================
// Still image rendering
// ====================

#[test]
fn test_still_renders_at_requested_width_and_corrected_height() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "gradient.png", &gradient_raster(100, 50));

    let source = ImageFileSource::open(&path).expect("should open PNG");
    let frame = convert_still(&source, &options(60, false)).expect("should render");

    // 100x50 at width 60: height = 60 * (50/100) * 0.5 = 15 rows.
    assert_eq!(frame.width(), 60);
    assert_eq!(frame.height(), 15);

    for line in frame.lines() {
        for c in line.chars() {
            assert!(
                STANDARD_RAMP.contains(&c),
                "glyph '{}' should come from the standard ramp",
                c
            );
        }
    }
}

#[test]
fn test_gradient_runs_dark_to_light() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "gradient.png", &gradient_raster(100, 50));

    let source = ImageFileSource::open(&path).expect("should open PNG");
    let frame = convert_still(&source, &options(60, false)).expect("should render");

    // Middle row: the left edge is denser ink than the right edge.
    let row = &frame.lines()[frame.height() / 2];
    let left = row.chars().next().unwrap();
    let right = row.chars().last().unwrap();
    let left_idx = ramp_index(left).expect("left glyph is on the ramp");
    let right_idx = ramp_index(right).expect("right glyph is on the ramp");
    assert!(
        left_idx < right_idx,
        "dark left '{}' (level {}) should out-ink bright right '{}' (level {})",
        left,
        left_idx,
        right,
        right_idx
    );
}

#[test]
fn test_black_as_space_blanks_dark_regions() {
    // Two flat halves, far enough apart that resampling cannot mix the
    // outer columns: left luminance 5, right luminance 230.
    let raster = GrayImage::from_fn(32, 16, |x, _y| Luma([if x < 16 { 5 } else { 230 }]));
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "halves.png", &raster);
    let source = ImageFileSource::open(&path).expect("should open PNG");

    // Without the flag, near-black renders as the densest glyph.
    let frame = convert_still(&source, &options(8, false)).expect("should render");
    for line in frame.lines() {
        assert_eq!(line.chars().next().unwrap(), '@');
        assert_ne!(line.chars().last().unwrap(), '@');
    }

    // With the flag, the same cells go blank; bright cells keep glyphs.
    let frame = convert_still(&source, &options(8, true)).expect("should render");
    for line in frame.lines() {
        assert_eq!(line.chars().next().unwrap(), ' ');
        assert_ne!(line.chars().last().unwrap(), ' ');
    }
}

#[test]
fn test_small_raster_upscales_to_requested_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "tiny.png", &GrayImage::from_pixel(10, 10, Luma([128])));

    let source = ImageFileSource::open(&path).expect("should open PNG");
    let frame = convert_still(&source, &options(100, false)).expect("should render");
    assert_eq!(frame.width(), 100);
    assert_eq!(frame.height(), 50);
}

// ====================
// Animated GIF conversion
// ====================

#[test]
fn test_gif_converts_with_recorded_delays() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gif(&dir, "anim.gif", &[(60, 200), (120, 50), (180, 0)]);

    let mut source = ImageFileSource::open(&path).expect("should open GIF");
    assert_eq!(source.frame_count(), 3);

    let sequence =
        convert_animation(&mut source, &options(8, false), |_, _| {}).expect("should convert");

    assert_eq!(sequence.len(), 3);
    // Recorded delays survive; the zero delay falls back to the default.
    assert_eq!(
        sequence.durations(),
        &[200, 50, DEFAULT_FRAME_DURATION_MS]
    );

    // Distinct luminance levels produce distinct frames.
    assert_ne!(
        sequence.frame(0).unwrap().to_text(),
        sequence.frame(1).unwrap().to_text()
    );

    // 16x16 at width 8: every frame is a 4-row, 8-column grid.
    for frame in sequence.frames() {
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 4);
    }
}

#[test]
fn test_gif_conversion_reports_progress_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gif(&dir, "anim.gif", &[(60, 100), (120, 100), (180, 100)]);

    let mut source = ImageFileSource::open(&path).expect("should open GIF");
    let mut seen = Vec::new();
    convert_animation(&mut source, &options(8, false), |done, total| {
        seen.push((done, total));
    })
    .expect("should convert");

    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn test_gif_first_frame_matches_still_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gif(&dir, "anim.gif", &[(60, 100), (180, 100)]);

    let mut source = ImageFileSource::open(&path).expect("should open GIF");
    let still = convert_still(&source, &options(8, false)).expect("should render frame 0");
    let sequence =
        convert_animation(&mut source, &options(8, false), |_, _| {}).expect("should convert");

    assert_eq!(still.to_text(), sequence.frame(0).unwrap().to_text());
}

#[test]
fn test_seek_past_the_end_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gif(&dir, "anim.gif", &[(60, 100), (120, 100)]);

    let mut source = ImageFileSource::open(&path).expect("should open GIF");
    let err = source.seek(5).unwrap_err();
    assert!(matches!(
        err,
        SourceError::SeekOutOfRange { index: 5, count: 2 }
    ));
}

// ====================
// Frame export
// ====================

#[test]
fn test_export_writes_numbered_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gif(&dir, "anim.gif", &[(60, 100), (120, 100), (180, 100)]);

    let mut source = ImageFileSource::open(&path).expect("should open GIF");
    let sequence =
        convert_animation(&mut source, &options(8, false), |_, _| {}).expect("should convert");

    // A nested output directory is created on demand.
    let out = dir.path().join("out").join("nested");
    let paths = export_frames(&sequence, &out, "clip").expect("should export");

    assert_eq!(paths.len(), 3);
    assert_eq!(paths[0].file_name().unwrap(), "clip_frame_001.txt");
    assert_eq!(paths[1].file_name().unwrap(), "clip_frame_002.txt");
    assert_eq!(paths[2].file_name().unwrap(), "clip_frame_003.txt");

    for (index, path) in paths.iter().enumerate() {
        let text = fs::read_to_string(path).expect("exported file should read back");
        assert_eq!(text, sequence.frame(index).unwrap().to_text());
        assert!(
            !text.ends_with('\n'),
            "exports carry no trailing newline"
        );
    }
}

// ====================
// Failure modes
// ====================

#[test]
fn test_missing_files_fail_to_open() {
    let dir = tempfile::tempdir().unwrap();

    assert!(ImageFileSource::open(&dir.path().join("nope.png")).is_err());

    let err = ImageFileSource::open(&dir.path().join("nope.gif")).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn test_garbage_bytes_fail_to_decode() {
    let dir = tempfile::tempdir().unwrap();

    let png = dir.path().join("fake.png");
    fs::write(&png, b"this is not image data").unwrap();
    assert!(ImageFileSource::open(&png).is_err());

    let gif = dir.path().join("fake.gif");
    fs::write(&gif, b"this is not image data").unwrap();
    let err = ImageFileSource::open(&gif).unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[test]
fn test_zero_width_is_rejected_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "tiny.png", &GrayImage::from_pixel(10, 10, Luma([128])));

    let source = ImageFileSource::open(&path).expect("should open PNG");
    match convert_still(&source, &options(0, false)) {
        Err(ConvertError::Frame { index: 0, source }) => {
            assert_eq!(source, RenderError::InvalidWidth);
        }
        other => panic!("expected an invalid width error, got {:?}", other),
    }
}
