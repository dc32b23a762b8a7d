//! Rendered frame value types.

use std::fmt;

/// One rendered character grid.
///
/// Lines are rectangular in character count, not bytes, since effect
/// palettes use multi-byte glyphs. Width is the render width; height is
/// derived from the source aspect ratio and never set directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    lines: Vec<String>,
}

impl AsciiFrame {
    /// Create an empty frame (no lines).
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a frame from lines, padding with spaces to a uniform width.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = lines
            .into_iter()
            .map(|mut l| {
                let have = l.chars().count();
                for _ in have..width {
                    l.push(' ');
                }
                l
            })
            .collect();
        Self { lines }
    }

    /// The grid lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Grid width in characters.
    pub fn width(&self) -> usize {
        self.lines.first().map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Grid height in lines.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// True when there is nothing to draw (no lines, or zero-width lines).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.width() == 0
    }

    /// Serialize as plain text: lines joined by newlines.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// An ordered run of rendered frames with per-frame display durations.
///
/// Frames and durations are parallel and equal in length; durations are in
/// milliseconds and strictly positive once a sequence leaves the pipeline.
/// Sequences are rendered eagerly in full before playback may begin.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<AsciiFrame>,
    durations: Vec<u64>,
}

impl FrameSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame with its display duration in milliseconds.
    pub fn push(&mut self, frame: AsciiFrame, duration_ms: u64) {
        self.frames.push(frame);
        self.durations.push(duration_ms);
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if in range.
    pub fn frame(&self, index: usize) -> Option<&AsciiFrame> {
        self.frames.get(index)
    }

    /// Display duration in milliseconds for the frame at `index`.
    pub fn duration_ms(&self, index: usize) -> Option<u64> {
        self.durations.get(index).copied()
    }

    /// All frames in order.
    pub fn frames(&self) -> &[AsciiFrame] {
        &self.frames
    }

    /// All durations in order, parallel to `frames()`.
    pub fn durations(&self) -> &[u64] {
        &self.durations
    }
}
