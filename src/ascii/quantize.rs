//! Luminance to glyph mapping.

use super::palette::{BLACK_CUTOFF, STANDARD_RAMP};

/// Map a luminance sample (0-255) to a glyph from the standard ramp.
///
/// In the standard mode the whole ramp is used linearly: dark samples pick
/// dense glyphs, bright samples pick light ones, 255 picks the space.
///
/// With `black_as_space`, samples below [`BLACK_CUTOFF`] become spaces so
/// near-black reads as transparent background instead of dense ink. The
/// remaining range is respread over the ramp with its densest glyph
/// excluded, so `@` is never produced in this mode.
pub fn quantize(luminance: u8, black_as_space: bool) -> char {
    if black_as_space {
        if luminance < BLACK_CUTOFF {
            return ' ';
        }
        let reduced = &STANDARD_RAMP[1..];
        let span = (255 - BLACK_CUTOFF) as usize;
        let idx = (luminance - BLACK_CUTOFF) as usize * (reduced.len() - 1) / span;
        reduced[idx.min(reduced.len() - 1)]
    } else {
        let levels = STANDARD_RAMP.len();
        let idx = luminance as usize * (levels - 1) / 255;
        STANDARD_RAMP[idx.min(levels - 1)]
    }
}

/// Position of a glyph in the standard ramp, if it is a ramp glyph.
///
/// Lower index means denser ink. Used by tests and by callers that want to
/// compare the visual weight of two cells.
pub fn ramp_index(glyph: char) -> Option<usize> {
    STANDARD_RAMP.iter().position(|&c| c == glyph)
}
