//! Glyph ramp and palette definitions for ASCII rendering.

/// Standard density ramp (10 levels).
/// Characters ordered from densest ink (@) to lightest (space).
/// The trailing space makes bright regions read as background.
pub const STANDARD_RAMP: &[char] = &['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];

/// Luminance below this maps to a space in black-as-space mode.
pub const BLACK_CUTOFF: u8 = 25;

/// Block shade palette (5 glyphs). Also drives the wave effect.
pub const BLOCK_PALETTE: &[char] = &['█', '▓', '▒', '░', '·'];

/// Circle shade palette (6 glyphs).
pub const CIRCLE_PALETTE: &[char] = &['●', '◐', '◑', '◒', '◓', '○'];

/// Card suit palette (5 glyphs).
pub const SUIT_PALETTE: &[char] = &['♠', '♣', '♥', '♦', '·'];

/// Half block palette (5 glyphs).
pub const HALF_BLOCK_PALETTE: &[char] = &['▀', '▄', '█', '░', '·'];

/// Line glyph palette (5 glyphs).
pub const LINE_PALETTE: &[char] = &['≡', '≣', '≢', '≡', '·'];

/// Reference mark palette (5 glyphs).
pub const STAR_PALETTE: &[char] = &['※', '○', '◦', '°', '·'];

/// Alternate palettes used by the procedural effects, in a fixed order.
/// Effects select palettes by index, so the order is load-bearing.
pub const ALT_PALETTES: &[&[char]] = &[
    BLOCK_PALETTE,
    CIRCLE_PALETTE,
    SUIT_PALETTE,
    HALF_BLOCK_PALETTE,
    LINE_PALETTE,
    STAR_PALETTE,
];

/// Symbols the glitch effect corrupts cells with.
pub const GLITCH_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Punctuation glyphs the rain effect drips onto the grid.
pub const RAIN_DRIPS: &[char] = &['.', ',', '\'', ':', ';'];
