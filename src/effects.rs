//! Procedural effects: deriving animation frames from a single still.
//!
//! Every effect is a function of (base frame, intensity, tick). The base
//! frame is the immutable reference for the whole session; each tick
//! recomputes a fresh derived frame and derived frames are never stored.
//! Wave is fully deterministic in its arguments; the other five draw on
//! the thread-local random source per call.
//!
//! All effects preserve the base grid's shape and leave cells that are
//! spaces in the base untouched.

use rand::Rng;

use crate::ascii::palette::{ALT_PALETTES, BLOCK_PALETTE, GLITCH_SYMBOLS, RAIN_DRIPS, STANDARD_RAMP};
use crate::ascii::AsciiFrame;

/// Wave offsets at or below this stay on the original glyph.
const WAVE_THRESHOLD: f32 = 0.3;
/// Flicker replaces each cell with probability `intensity * FLICKER_SCALE`.
const FLICKER_SCALE: f32 = 0.3;
/// Glitch corrupts each cell with probability `intensity * GLITCH_SCALE`.
const GLITCH_SCALE: f32 = 0.2;
/// Fraction of the grid Rain targets per tick at full intensity.
const RAIN_COVERAGE: f32 = 0.1;
/// Rain rows land within this many rows below the tick position.
const RAIN_OFFSET_SPAN: u64 = 20;
/// Morph ramps its corruption probability over this many ticks, then resets.
const MORPH_CYCLE_TICKS: u64 = 100;

/// One of the procedural animation effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Sine ripple over columns, deterministic per tick.
    Wave,
    /// Sparse random substitutions from randomly chosen palettes.
    Flicker,
    /// Substitutions from a single palette that rotates every ten ticks.
    Cycle,
    /// Corruption with symbols or raw ramp glyphs.
    Glitch,
    /// Falling drip characters near the tick row.
    Rain,
    /// Corruption probability that ramps up over a 100-tick cycle.
    Morph,
}

impl EffectKind {
    /// Parse an effect name from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wave" => Some(Self::Wave),
            "flicker" => Some(Self::Flicker),
            "cycle" => Some(Self::Cycle),
            "glitch" => Some(Self::Glitch),
            "rain" => Some(Self::Rain),
            "morph" => Some(Self::Morph),
            _ => None,
        }
    }

    /// Every effect, in display order.
    pub fn all() -> [EffectKind; 6] {
        [
            Self::Wave,
            Self::Flicker,
            Self::Cycle,
            Self::Glitch,
            Self::Rain,
            Self::Morph,
        ]
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wave => write!(f, "wave"),
            Self::Flicker => write!(f, "flicker"),
            Self::Cycle => write!(f, "cycle"),
            Self::Glitch => write!(f, "glitch"),
            Self::Rain => write!(f, "rain"),
            Self::Morph => write!(f, "morph"),
        }
    }
}

/// An effect bound to its base frame and intensity.
///
/// The tick is not part of the session; it is playback position and lives
/// with the scheduler.
#[derive(Debug, Clone)]
pub struct EffectSession {
    base: AsciiFrame,
    effect: EffectKind,
    intensity: f32,
}

impl EffectSession {
    /// Bind `effect` to `base`. `intensity` is clamped into `[0, 1]`.
    pub fn new(base: AsciiFrame, effect: EffectKind, intensity: f32) -> Self {
        Self {
            base,
            effect,
            intensity: intensity.clamp(0.0, 1.0),
        }
    }

    pub fn base(&self) -> &AsciiFrame {
        &self.base
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// The derived frame for time step `tick`.
    pub fn frame_at(&self, tick: u64) -> AsciiFrame {
        apply(&self.base, self.effect, self.intensity, tick)
    }
}

/// Derive the frame for time step `tick` from `base`.
///
/// `intensity` is a fraction and is clamped into `[0, 1]`. An empty base
/// (no lines, or zero-width lines) comes back unchanged.
pub fn apply(base: &AsciiFrame, effect: EffectKind, intensity: f32, tick: u64) -> AsciiFrame {
    apply_with(base, effect, intensity, tick, &mut rand::rng())
}

fn apply_with<R: Rng>(
    base: &AsciiFrame,
    effect: EffectKind,
    intensity: f32,
    tick: u64,
    rng: &mut R,
) -> AsciiFrame {
    if base.is_empty() {
        return base.clone();
    }
    let intensity = intensity.clamp(0.0, 1.0);
    match effect {
        EffectKind::Wave => wave(base, intensity, tick),
        EffectKind::Flicker => flicker(base, intensity, rng),
        EffectKind::Cycle => cycle(base, intensity, tick, rng),
        EffectKind::Glitch => glitch(base, intensity, rng),
        EffectKind::Rain => rain(base, intensity, tick, rng),
        EffectKind::Morph => morph(base, intensity, tick, rng),
    }
}

/// Rebuild the grid cell by cell, leaving base-space cells alone.
fn map_cells<F>(base: &AsciiFrame, mut replace: F) -> AsciiFrame
where
    F: FnMut(usize, usize, char) -> char,
{
    let lines = base
        .lines()
        .iter()
        .enumerate()
        .map(|(y, line)| {
            line.chars()
                .enumerate()
                .map(|(x, ch)| if ch == ' ' { ch } else { replace(x, y, ch) })
                .collect()
        })
        .collect();
    AsciiFrame::from_lines(lines)
}

fn pick<R: Rng>(rng: &mut R, glyphs: &[char]) -> char {
    glyphs[rng.random_range(0..glyphs.len())]
}

fn wave(base: &AsciiFrame, intensity: f32, tick: u64) -> AsciiFrame {
    map_cells(base, |x, _, ch| {
        let offset = ((x as f32 + tick as f32) * 0.2).sin() * intensity;
        if offset > WAVE_THRESHOLD {
            let index = (offset * BLOCK_PALETTE.len() as f32) as usize;
            BLOCK_PALETTE[index.min(BLOCK_PALETTE.len() - 1)]
        } else {
            ch
        }
    })
}

fn flicker<R: Rng>(base: &AsciiFrame, intensity: f32, rng: &mut R) -> AsciiFrame {
    map_cells(base, |_, _, ch| {
        if rng.random::<f32>() < intensity * FLICKER_SCALE {
            let palette = ALT_PALETTES[rng.random_range(0..ALT_PALETTES.len())];
            pick(rng, palette)
        } else {
            ch
        }
    })
}

fn cycle<R: Rng>(base: &AsciiFrame, intensity: f32, tick: u64, rng: &mut R) -> AsciiFrame {
    let palette_index = ((tick / 10) % ALT_PALETTES.len() as u64) as usize;
    let palette = ALT_PALETTES[palette_index];
    map_cells(base, |_, _, ch| {
        if rng.random::<f32>() < intensity {
            pick(rng, palette)
        } else {
            ch
        }
    })
}

fn glitch<R: Rng>(base: &AsciiFrame, intensity: f32, rng: &mut R) -> AsciiFrame {
    map_cells(base, |_, _, ch| {
        if rng.random::<f32>() < intensity * GLITCH_SCALE {
            if rng.random::<bool>() {
                pick(rng, GLITCH_SYMBOLS)
            } else {
                pick(rng, STANDARD_RAMP)
            }
        } else {
            ch
        }
    })
}

fn rain<R: Rng>(base: &AsciiFrame, intensity: f32, tick: u64, rng: &mut R) -> AsciiFrame {
    let width = base.width();
    let height = base.height();
    let mut cells: Vec<Vec<char>> = base.lines().iter().map(|l| l.chars().collect()).collect();

    // Collisions and attempts on space cells both burn a drop.
    let drops = (height as f32 * width as f32 * intensity * RAIN_COVERAGE) as usize;
    for _ in 0..drops {
        let x = rng.random_range(0..width);
        let y = ((tick + rng.random_range(0..RAIN_OFFSET_SPAN)) % height as u64) as usize;
        if cells[y][x] != ' ' {
            cells[y][x] = pick(rng, RAIN_DRIPS);
        }
    }

    AsciiFrame::from_lines(cells.into_iter().map(|l| l.into_iter().collect()).collect())
}

fn morph<R: Rng>(base: &AsciiFrame, intensity: f32, tick: u64, rng: &mut R) -> AsciiFrame {
    let stage = (tick % MORPH_CYCLE_TICKS) as f32 / MORPH_CYCLE_TICKS as f32;
    let palette_index = ((stage * ALT_PALETTES.len() as f32) as usize) % ALT_PALETTES.len();
    let palette = ALT_PALETTES[palette_index];
    map_cells(base, |_, _, ch| {
        if rng.random::<f32>() < intensity * stage {
            pick(rng, palette)
        } else {
            ch
        }
    })
}
