//! Side-on water body whose height tracks the water level (stateful).

use crate::canvas::{Cell, Canvas};
use crate::chars::{HALF_FILL, RIPPLE_CHARS};
use crate::color::{self, Rgb};

/// Time the displayed level takes to reach a new target.
pub const TRANSITION_MS: u64 = 1000;

/// Period of one ripple layer crossing the screen.
const RIPPLE_PERIOD_MS: u64 = 2400;
/// Start offsets of the three ripple layers.
const RIPPLE_DELAYS_MS: [u64; 3] = [0, 300, 600];

/// Fractional row of the water surface for a level in percent.
///
/// Row 0 is the top of the screen; `height` means an empty tank.
pub fn surface_row(height: u16, level: f32) -> f32 {
    height as f32 * (1.0 - level.clamp(0.0, 100.0) / 100.0)
}

/// Eased water level plus the painting of the tank.
#[derive(Debug, Clone, Default)]
pub struct WaterBody {
    displayed: f32,
    from: f32,
    target: f32,
    transition_start_ms: u64,
    initialized: bool,
}

impl WaterBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (eased) level in percent.
    pub fn level(&self) -> f32 {
        self.displayed
    }

    /// Point the level at a new target. The first call snaps.
    pub fn set_target(&mut self, level: f32, now_ms: u64) {
        let level = level.clamp(0.0, 100.0);
        if !self.initialized {
            self.displayed = level;
            self.from = level;
            self.target = level;
            self.initialized = true;
            return;
        }
        if level != self.target {
            self.from = self.displayed;
            self.target = level;
            self.transition_start_ms = now_ms;
        }
    }

    /// Advance the easing to `now_ms`.
    pub fn update(&mut self, now_ms: u64) {
        let progress = now_ms.saturating_sub(self.transition_start_ms) as f32 / TRANSITION_MS as f32;
        if progress >= 1.0 {
            self.displayed = self.target;
        } else {
            self.displayed = self.from + (self.target - self.from) * progress;
        }
    }

    /// Paint sky and water over the whole canvas.
    pub fn paint(&self, canvas: &mut Canvas, now_ms: u64) {
        let width = canvas.width();
        let height = canvas.height();
        let surface = surface_row(height, self.displayed);
        let surface_cell = surface.floor() as i32;
        let half_filled = surface - surface.floor() >= 0.5;
        // First row that is entirely water.
        let top_row = if half_filled { surface_cell + 1 } else { surface_cell };

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let cell = if y < surface_cell {
                    Cell::blank(color::SKY)
                } else if y == surface_cell && half_filled {
                    Cell {
                        ch: HALF_FILL,
                        fg: color::SURFACE_HIGHLIGHT,
                        bg: color::SKY,
                    }
                } else {
                    water_cell(x, y - top_row, y, surface, height, now_ms)
                };
                canvas.set(x, y, cell);
            }
        }
    }
}

/// Gradient fill, surface highlight and ripples for one water cell.
fn water_cell(x: i32, depth_row: i32, y: i32, surface: f32, height: u16, now_ms: u64) -> Cell {
    let column = (height as f32 - surface).max(1.0);
    let t = (y as f32 - surface) / column;
    let mut bg = color::lerp(color::WATER_SHALLOW, color::WATER_DEEP, t);
    if depth_row == 0 {
        bg = color::blend(color::SURFACE_HIGHLIGHT, bg, 0.5);
    }

    match ripple(x, depth_row, now_ms) {
        Some((ch, strength)) => Cell {
            ch,
            fg: color::blend(color::RIPPLE, bg, strength),
            bg,
        },
        None => Cell::blank(bg),
    }
}

/// Ripple glyph for a cell `depth_row` rows under the surface, if any.
fn ripple(x: i32, depth_row: i32, now_ms: u64) -> Option<(char, f32)> {
    let layer = usize::try_from(depth_row).ok()?;
    let delay = *RIPPLE_DELAYS_MS.get(layer)?;

    let local_ms = now_ms.wrapping_add(RIPPLE_PERIOD_MS - delay) % RIPPLE_PERIOD_MS;
    let phase = local_ms as f32 / RIPPLE_PERIOD_MS as f32;
    let wave = (x as f32 * 0.35 + phase * std::f32::consts::TAU + layer as f32 * 2.1).sin();

    if wave < 0.6 {
        return None;
    }
    let ch = if wave > 0.9 {
        RIPPLE_CHARS[1]
    } else {
        RIPPLE_CHARS[0]
    };
    Some((ch, 0.6 - layer as f32 * 0.15))
}

/// Colour of the water just under the surface, used to tint splash glyphs.
pub fn surface_color() -> Rgb {
    color::blend(color::SURFACE_HIGHLIGHT, color::WATER_SHALLOW, 0.5)
}
