//! Perspective pool scene: a rising water plane, falling droplets and
//! particle splashes, projected into terminal cells (stateful).

use glam::Vec3;
use rand::Rng;
use tracing::{debug, trace};

use clepsydra_core::Interval;

use crate::camera::OrbitCamera;
use crate::canvas::{Canvas, Cell};
use crate::chars::{DEPTH_DROP_FAR, DEPTH_DROP_NEAR, DEPTH_PARTICLE_CHARS, RIPPLE_CHARS};
use crate::color::{self, Rgb};
use crate::droplet::{DropPhase, FRAME_MS, Fall};
use crate::particle::{DEFAULT_PARTICLES, SplashBurst};

/// Height at which droplets appear.
pub const SPAWN_HEIGHT: f32 = 10.0;
/// Droplets appear within `[-SPAWN_HALF_SPREAD, SPAWN_HALF_SPREAD)` on x and z.
pub const SPAWN_HALF_SPREAD: f32 = 5.0;
/// Half the side of the square pool.
pub const POOL_HALF_SIZE: f32 = 7.5;

/// Droplet speed at spawn, in scene units per frame.
const INITIAL_VELOCITY: f32 = 0.05;
/// Speed gained per frame.
const ACCELERATION: f32 = 0.01;

/// Surface animation runs at half of wall time.
const SURFACE_TIME_SCALE: f32 = 0.5;
const SURFACE_OPACITY: f32 = 0.65;
const FOG_NEAR: f32 = 15.0;
const FOG_FAR: f32 = 25.0;
/// Droplets nearer than this draw with the large glyph.
const NEAR_DROP_DEPTH: f32 = 9.0;

/// Height of the pool surface for a day fraction in `[0, 1)`.
pub fn surface_height(fraction: f32) -> f32 {
    -5.0 + fraction.clamp(0.0, 1.0) * 10.0
}

/// A droplet falling toward the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthDrop {
    pub id: u64,
    pub position: Vec3,
    fall: Fall,
    phase: DropPhase,
}

impl DepthDrop {
    fn new(id: u64, position: Vec3) -> Self {
        Self {
            id,
            position,
            fall: Fall::new(INITIAL_VELOCITY, ACCELERATION),
            phase: DropPhase::Falling,
        }
    }

    pub fn phase(&self) -> DropPhase {
        self.phase
    }

    /// Fall toward `surface`; returns true on the call that hits it.
    fn advance(&mut self, frames: f32, surface: f32, now_ms: u64) -> bool {
        if self.phase != DropPhase::Falling {
            return false;
        }
        self.position.y -= self.fall.advance(frames);
        if self.position.y <= surface {
            self.position.y = surface;
            self.phase = DropPhase::Splashed { at_ms: now_ms };
            return true;
        }
        false
    }
}

/// Timing for the depth scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthSettings {
    pub drop_interval_ms: u64,
    pub splash_linger_ms: u64,
    pub particles_per_splash: usize,
}

impl Default for DepthSettings {
    fn default() -> Self {
        Self {
            drop_interval_ms: 3000,
            splash_linger_ms: 3000,
            particles_per_splash: DEFAULT_PARTICLES,
        }
    }
}

/// Everything living in the pool scene.
#[derive(Debug, Clone)]
pub struct DepthScene {
    drops: Vec<DepthDrop>,
    bursts: Vec<SplashBurst>,
    spawn: Interval,
    next_id: u64,
    settings: DepthSettings,
    camera: OrbitCamera,
    /// Clock of the surface ripple animation, in seconds.
    surface_time: f32,
}

impl DepthScene {
    pub fn new(settings: DepthSettings) -> Self {
        Self {
            drops: Vec::new(),
            bursts: Vec::new(),
            spawn: Interval::delayed(settings.drop_interval_ms, 0),
            next_id: 0,
            settings,
            camera: OrbitCamera::new(),
            surface_time: 0.0,
        }
    }

    pub fn drops(&self) -> &[DepthDrop] {
        &self.drops
    }

    pub fn bursts(&self) -> &[SplashBurst] {
        &self.bursts
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Add a droplet at the given horizontal position and return its id.
    pub fn spawn_at(&mut self, x: f32, z: f32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.drops
            .push(DepthDrop::new(id, Vec3::new(x, SPAWN_HEIGHT, z)));
        debug!(id, x, z, "spawned depth droplet");
        id
    }

    /// Advance spawning, falling, splashing and particles to `now_ms`.
    pub fn update<R: Rng>(&mut self, now_ms: u64, delta_ms: u64, fraction: f32, rng: &mut R) {
        let dt = delta_ms as f32 / 1000.0;
        self.surface_time += dt * SURFACE_TIME_SCALE;
        let surface = surface_height(fraction);

        // Bursts born this frame start ageing on the next one.
        for burst in &mut self.bursts {
            burst.update(dt);
        }
        self.bursts.retain(|b| {
            let done = b.is_complete();
            if done {
                trace!(drop_id = b.drop_id, "splash completed");
            }
            !done
        });

        if self.spawn.poll(now_ms) {
            let x = rng.gen_range(-SPAWN_HALF_SPREAD..SPAWN_HALF_SPREAD);
            let z = rng.gen_range(-SPAWN_HALF_SPREAD..SPAWN_HALF_SPREAD);
            self.spawn_at(x, z);
        }

        let frames = delta_ms as f32 / FRAME_MS;
        for drop in &mut self.drops {
            if drop.advance(frames, surface, now_ms) {
                debug!(id = drop.id, y = drop.position.y, "depth droplet splashed");
                self.bursts.push(SplashBurst::new(
                    drop.id,
                    drop.position,
                    self.settings.particles_per_splash,
                    rng,
                ));
            }
        }

        let linger_ms = self.settings.splash_linger_ms;
        self.drops.retain(|d| match d.phase {
            DropPhase::Splashed { at_ms } if now_ms.saturating_sub(at_ms) >= linger_ms => {
                debug!(id = d.id, "removed depth droplet");
                false
            }
            _ => true,
        });
    }

    /// Render the pool, droplets and particles onto the canvas.
    pub fn paint(&self, canvas: &mut Canvas, fraction: f32) {
        let width = canvas.width();
        let height = canvas.height();
        let surface = surface_height(fraction);
        let eye = self.camera.position();

        // Distance to the water along each cell's ray, for occlusion.
        let mut water_depth = vec![f32::INFINITY; width as usize * height as usize];

        for row in 0..height {
            for col in 0..width {
                let dir = self.camera.ray(col, row, width, height);
                let cell = match intersect_pool(eye, dir, surface) {
                    Some((hit, distance)) => {
                        water_depth[row as usize * width as usize + col as usize] = distance;
                        self.shade_water(hit, distance)
                    }
                    None => Cell::blank(color::DEPTH_BACKGROUND),
                };
                canvas.set(col as i32, row as i32, cell);
            }
        }

        let occluded = |x: i32, y: i32, distance: f32| {
            let idx = y as usize * width as usize + x as usize;
            water_depth.get(idx).is_some_and(|&d| d < distance)
        };

        for drop in self.drops.iter().filter(|d| d.phase == DropPhase::Falling) {
            let Some(p) = self.camera.project(drop.position, width, height) else {
                continue;
            };
            let (x, y) = (p.x.floor() as i32, p.y.floor() as i32);
            let Some(under) = canvas.get(x, y).map(|c| c.bg) else {
                continue;
            };
            if occluded(x, y, p.distance) {
                continue;
            }
            let ch = if p.depth < NEAR_DROP_DEPTH {
                DEPTH_DROP_NEAR
            } else {
                DEPTH_DROP_FAR
            };
            let fg = color::fog(
                color::blend(color::PARTICLE, under, 0.9),
                p.distance,
                FOG_NEAR,
                FOG_FAR,
            );
            canvas.put(x, y, ch, fg);
        }

        // Far particles first so near ones win shared cells.
        let mut particles: Vec<_> = self
            .bursts
            .iter()
            .flat_map(|b| b.particles())
            .filter(|p| p.is_alive())
            .filter_map(|p| {
                self.camera
                    .project(p.position, width, height)
                    .map(|proj| (proj, p))
            })
            .collect();
        particles.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

        let particle_tint = color::lerp(color::PARTICLE, color::PARTICLE_GLOW, 0.25);
        for (proj, particle) in particles {
            let (x, y) = (proj.x.floor() as i32, proj.y.floor() as i32);
            let Some(under) = canvas.get(x, y).map(|c| c.bg) else {
                continue;
            };
            if occluded(x, y, proj.distance) {
                continue;
            }
            let fg = color::fog(
                color::blend(particle_tint, under, particle.opacity()),
                proj.distance,
                FOG_NEAR,
                FOG_FAR,
            );
            canvas.put(x, y, particle_glyph(particle.size()), fg);
        }
    }

    /// Colour and glyph of the water surface at `hit`.
    fn shade_water(&self, hit: Vec3, distance: f32) -> Cell {
        let sparkle = ripple_field(hit.x, hit.z, self.surface_time);
        let body = color::lerp(color::DEPTH_SUN, color::DEPTH_WATER, 0.5 + 0.5 * sparkle);
        let bg = color::fog(
            color::blend(body, color::DEPTH_BACKGROUND, SURFACE_OPACITY),
            distance,
            FOG_NEAR,
            FOG_FAR,
        );

        let ch = if sparkle > 0.8 {
            RIPPLE_CHARS[1]
        } else if sparkle > 0.45 {
            RIPPLE_CHARS[0]
        } else {
            return Cell::blank(bg);
        };
        let crest: Rgb = color::lerp(bg, color::RIPPLE, 0.35 * sparkle);
        Cell { ch, fg: crest, bg }
    }
}

/// Ray/pool intersection: the hit point and its distance along `dir`.
fn intersect_pool(origin: Vec3, dir: Vec3, surface: f32) -> Option<(Vec3, f32)> {
    if dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (surface - origin.y) / dir.y;
    if t <= 0.0 {
        return None;
    }
    let hit = origin + dir * t;
    (hit.x.abs() <= POOL_HALF_SIZE && hit.z.abs() <= POOL_HALF_SIZE).then_some((hit, t))
}

/// Layered sine ripples in roughly `[-1, 1]`.
fn ripple_field(x: f32, z: f32, time: f32) -> f32 {
    let a = (x * 0.9 + time * 2.0).sin();
    let b = (z * 1.1 - time * 1.7).sin();
    let c = ((x + z) * 0.6 + time * 1.3).sin();
    a * 0.45 + b * 0.35 + c * 0.2
}

fn particle_glyph(size: f32) -> char {
    let idx = match size {
        s if s > 0.11 => 3,
        s if s > 0.07 => 2,
        s if s > 0.035 => 1,
        _ => 0,
    };
    DEPTH_PARTICLE_CHARS[idx]
}
