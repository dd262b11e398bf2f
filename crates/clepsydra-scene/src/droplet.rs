//! Falling droplets and their splash lifecycle in the flat tank (stateful).
//!
//! A droplet is spawned at the top of the screen, accelerates downward
//! every frame, and splashes when it reaches the water surface. After a
//! linger period the splashed droplet is removed. A droplet splashes at
//! most once.

use std::f32::consts::FRAC_PI_4;

use rand::Rng;
use tracing::debug;

use clepsydra_core::Interval;

use crate::camera::CELL_ASPECT;
use crate::canvas::Canvas;
use crate::chars::{DROP_HEAD, DROP_TRAIL, SPLASH_CENTER_CHARS, SPLASH_PARTICLE_CHARS};
use crate::color::{self, Rgb};
use crate::water;

/// Duration of one animation frame at the 60 Hz reference rate.
pub const FRAME_MS: f32 = 1000.0 / 60.0;

/// Velocity a flat droplet starts with, in percent of screen height per frame.
pub const INITIAL_VELOCITY: f32 = 1.0;
/// Velocity gained per frame.
pub const ACCELERATION: f32 = 0.2;

/// Number of particles thrown by a flat splash.
pub const SPLASH_PARTICLES: usize = 8;
/// Flight time of each splash particle.
const PARTICLE_FLIGHT_MS: u64 = 500;
/// Stagger between consecutive splash particles.
const PARTICLE_STAGGER_MS: u64 = 50;
/// Distance a splash particle travels, in rows.
const PARTICLE_REACH: f32 = 2.5;

/// Lifecycle phase of a droplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPhase {
    Falling,
    Splashed { at_ms: u64 },
}

/// Accelerating fall shared by the flat and depth droplets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fall {
    pub velocity: f32,
    pub acceleration: f32,
}

impl Fall {
    pub fn new(velocity: f32, acceleration: f32) -> Self {
        Self {
            velocity,
            acceleration,
        }
    }

    /// Advance by a (possibly fractional) number of frames and return the
    /// distance covered.
    ///
    /// Matches `frames` single-frame steps (speed up, then move) exactly,
    /// so the result does not depend on how time is sliced.
    pub fn advance(&mut self, frames: f32) -> f32 {
        let a = self.acceleration;
        let distance = frames * self.velocity + a * frames * (frames + 1.0) / 2.0;
        self.velocity += a * frames;
        distance
    }
}

/// A droplet in the flat tank. Positions are percentages of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Droplet {
    pub id: u64,
    /// Horizontal position, `[0, 100)`.
    pub left: f32,
    /// Vertical position from the top, `[0, 100]`.
    pub top: f32,
    fall: Fall,
    phase: DropPhase,
}

impl Droplet {
    pub fn new(id: u64, left: f32) -> Self {
        Self {
            id,
            left,
            top: 0.0,
            fall: Fall::new(INITIAL_VELOCITY, ACCELERATION),
            phase: DropPhase::Falling,
        }
    }

    pub fn phase(&self) -> DropPhase {
        self.phase
    }

    pub fn velocity(&self) -> f32 {
        self.fall.velocity
    }

    pub fn splashed_at(&self) -> Option<u64> {
        match self.phase {
            DropPhase::Splashed { at_ms } => Some(at_ms),
            DropPhase::Falling => None,
        }
    }

    /// Move the droplet `frames` frames toward a surface at `level` percent.
    ///
    /// Returns true on the single call where the droplet reaches the
    /// surface; its position is clamped to the surface at that point.
    pub fn advance(&mut self, frames: f32, level: f32, now_ms: u64) -> bool {
        if self.phase != DropPhase::Falling {
            return false;
        }
        let surface = 100.0 - level.clamp(0.0, 100.0);
        let next = self.top + self.fall.advance(frames);
        if next >= surface {
            self.top = surface;
            self.phase = DropPhase::Splashed { at_ms: now_ms };
            return true;
        }
        self.top = next;
        false
    }
}

/// Spawner and owner of every droplet in the flat tank.
#[derive(Debug, Clone)]
pub struct DropletField {
    droplets: Vec<Droplet>,
    spawn: Interval,
    next_id: u64,
    linger_ms: u64,
}

impl DropletField {
    pub fn new(interval_ms: u64, linger_ms: u64) -> Self {
        Self {
            droplets: Vec::new(),
            spawn: Interval::delayed(interval_ms, 0),
            next_id: 0,
            linger_ms,
        }
    }

    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    /// Add a droplet at `left` percent and return its id.
    pub fn spawn_at(&mut self, left: f32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.droplets.push(Droplet::new(id, left.clamp(0.0, 100.0)));
        debug!(id, left, "spawned droplet");
        id
    }

    /// Spawn on schedule, move droplets, and retire finished splashes.
    pub fn update<R: Rng>(&mut self, now_ms: u64, delta_ms: u64, level: f32, rng: &mut R) {
        if self.spawn.poll(now_ms) {
            self.spawn_at(rng.gen_range(0.0..100.0));
        }

        let frames = delta_ms as f32 / FRAME_MS;
        for droplet in &mut self.droplets {
            if droplet.advance(frames, level, now_ms) {
                debug!(id = droplet.id, top = droplet.top, "droplet splashed");
            }
        }

        let linger_ms = self.linger_ms;
        self.droplets.retain(|d| match d.splashed_at() {
            Some(at_ms) if now_ms.saturating_sub(at_ms) >= linger_ms => {
                debug!(id = d.id, "removed droplet");
                false
            }
            _ => true,
        });
    }

    /// Draw droplets and splashes over an already painted tank.
    pub fn paint(&self, canvas: &mut Canvas, now_ms: u64) {
        for droplet in &self.droplets {
            match droplet.phase {
                DropPhase::Falling => paint_falling(canvas, droplet),
                DropPhase::Splashed { at_ms } => {
                    paint_splash(canvas, droplet, now_ms.saturating_sub(at_ms))
                }
            }
        }
    }
}

/// Canvas cell holding a percentage position.
fn cell_of(canvas: &Canvas, left: f32, top: f32) -> (i32, i32) {
    let width = canvas.width() as f32;
    let height = canvas.height() as f32;
    let x = (left / 100.0 * width).floor().min(width - 1.0);
    let y = (top / 100.0 * height).floor().min(height - 1.0);
    (x as i32, y as i32)
}

fn paint_falling(canvas: &mut Canvas, droplet: &Droplet) {
    let (x, y) = cell_of(canvas, droplet.left, droplet.top);
    let Some(under) = canvas.get(x, y).map(|c| c.bg) else {
        return;
    };
    canvas.put(x, y, DROP_HEAD, color::blend(color::DROPLET, under, 0.9));

    // Streak once the droplet moves more than a row per frame.
    let rows_per_frame = droplet.velocity() / 100.0 * canvas.height() as f32;
    if rows_per_frame > 1.0 {
        if let Some(above) = canvas.get(x, y - 1).map(|c| c.bg) {
            canvas.put(x, y - 1, DROP_TRAIL, color::blend(color::DROPLET, above, 0.5));
        }
    }
}

/// Progress `[0, 1]` of splash particle `index` after `age_ms`, or `None`
/// before it starts or after it lands.
fn particle_progress(index: usize, age_ms: u64) -> Option<f32> {
    let start = index as u64 * PARTICLE_STAGGER_MS;
    if age_ms < start {
        return None;
    }
    let t = (age_ms - start) as f32 / PARTICLE_FLIGHT_MS as f32;
    (t < 1.0).then_some(t)
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

fn paint_splash(canvas: &mut Canvas, droplet: &Droplet, age_ms: u64) {
    let (cx, cy) = cell_of(canvas, droplet.left, droplet.top);
    let tint: Rgb = water::surface_color();
    let splash = color::lerp(tint, color::RIPPLE, 0.5);

    // Centre blob grows then fades over the first flight.
    let center_t = age_ms as f32 / PARTICLE_FLIGHT_MS as f32;
    if center_t < 1.0 {
        let idx = ((center_t * SPLASH_CENTER_CHARS.len() as f32) as usize)
            .min(SPLASH_CENTER_CHARS.len() - 1);
        if let Some(under) = canvas.get(cx, cy).map(|c| c.bg) {
            let fg = color::blend(splash, under, 0.8 * (1.0 - center_t * 0.5));
            canvas.put(cx, cy, SPLASH_CENTER_CHARS[idx], fg);
        }
    }

    for i in 0..SPLASH_PARTICLES {
        let Some(t) = particle_progress(i, age_ms) else {
            continue;
        };
        let angle = i as f32 * FRAC_PI_4;
        let reach = ease_out(t) * PARTICLE_REACH;
        let x = cx + (angle.cos() * reach * CELL_ASPECT).round() as i32;
        let y = cy - (angle.sin() * reach).round() as i32;
        let Some(under) = canvas.get(x, y).map(|c| c.bg) else {
            continue;
        };
        let idx = ((t * SPLASH_PARTICLE_CHARS.len() as f32) as usize)
            .min(SPLASH_PARTICLE_CHARS.len() - 1);
        let fg = color::blend(splash, under, 0.8 * (1.0 - t));
        canvas.put(x, y, SPLASH_PARTICLE_CHARS[idx], fg);
    }
}
