//! Splash particle bursts for the depth scene (stateful).

use glam::Vec3;
use rand::Rng;

/// Particles per splash unless configured otherwise.
pub const DEFAULT_PARTICLES: usize = 20;

/// Scale from seconds to travelled distance.
const VELOCITY_SCALE: f32 = 5.0;
/// Downward velocity lost per second.
const GRAVITY: f32 = 3.0;
/// Opacity of a freshly spawned particle.
const PEAK_OPACITY: f32 = 0.9;

/// A single particle thrown up by a splash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplashParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub scale: f32,
    /// Seconds the particle lives.
    pub lifetime: f32,
    /// Seconds since the splash.
    pub age: f32,
}

impl SplashParticle {
    fn random<R: Rng>(origin: Vec3, rng: &mut R) -> Self {
        Self {
            position: origin,
            velocity: Vec3::new(
                (rng.gen_range(0.0..1.0) - 0.5) * 0.5,
                rng.gen_range(0.0..1.0) * 0.8,
                (rng.gen_range(0.0..1.0) - 0.5) * 0.5,
            ),
            scale: rng.gen_range(0.0..1.0) * 0.1 + 0.05,
            lifetime: rng.gen_range(0.0..1.0) * 1.0 + 1.0,
            age: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Remaining life as a fraction, 1 at spawn and 0 once expired.
    pub fn life_left(&self) -> f32 {
        (1.0 - self.age / self.lifetime).max(0.0)
    }

    /// Rendered size in scene units.
    pub fn size(&self) -> f32 {
        self.scale * self.life_left()
    }

    pub fn opacity(&self) -> f32 {
        PEAK_OPACITY * self.life_left()
    }

    fn step(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        let age = self.age + dt;
        if age >= self.lifetime {
            self.age = self.lifetime;
            return;
        }
        self.age = age;
        self.position += self.velocity * dt * VELOCITY_SCALE;
        self.velocity.y -= dt * GRAVITY;
    }
}

/// The batch of particles created by one droplet impact.
#[derive(Debug, Clone, PartialEq)]
pub struct SplashBurst {
    /// Id of the droplet that caused the splash.
    pub drop_id: u64,
    particles: Vec<SplashParticle>,
}

impl SplashBurst {
    pub fn new<R: Rng>(drop_id: u64, origin: Vec3, count: usize, rng: &mut R) -> Self {
        Self {
            drop_id,
            particles: (0..count)
                .map(|_| SplashParticle::random(origin, rng))
                .collect(),
        }
    }

    pub fn particles(&self) -> &[SplashParticle] {
        &self.particles
    }

    /// Advance every live particle by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.step(dt);
        }
    }

    /// True once every particle has outlived its lifetime.
    pub fn is_complete(&self) -> bool {
        self.particles.iter().all(|p| !p.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn burst(count: usize) -> SplashBurst {
        let mut rng = StdRng::seed_from_u64(42);
        SplashBurst::new(9, Vec3::new(1.0, -2.0, 3.0), count, &mut rng)
    }

    #[test]
    fn test_burst_initial_ranges() {
        let burst = burst(DEFAULT_PARTICLES);
        assert_eq!(burst.particles().len(), DEFAULT_PARTICLES);
        for p in burst.particles() {
            assert_eq!(p.position, Vec3::new(1.0, -2.0, 3.0));
            assert!(p.velocity.x.abs() <= 0.25);
            assert!(p.velocity.z.abs() <= 0.25);
            assert!((0.0..0.8).contains(&p.velocity.y));
            assert!((0.05..0.15).contains(&p.scale));
            assert!((1.0..2.0).contains(&p.lifetime));
            assert_eq!(p.age, 0.0);
            assert!((p.opacity() - 0.9).abs() < 1e-6);
        }
    }

    #[test]
    fn test_update_applies_velocity_and_gravity() {
        let mut p = SplashParticle {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.2, 0.4, 0.0),
            scale: 0.1,
            lifetime: 1.5,
            age: 0.0,
        };
        p.step(0.1);
        assert!((p.position.x - 0.1).abs() < 1e-6);
        assert!((p.position.y - 0.2).abs() < 1e-6);
        assert!((p.velocity.y - 0.1).abs() < 1e-6);
        assert!((p.age - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_expired_particles_are_frozen() {
        let mut p = SplashParticle {
            position: Vec3::ZERO,
            velocity: Vec3::Y,
            scale: 0.1,
            lifetime: 1.0,
            age: 0.0,
        };
        p.step(2.0);
        assert!(!p.is_alive());
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.size(), 0.0);
        assert_eq!(p.opacity(), 0.0);

        p.step(1.0);
        assert_eq!(p.position, Vec3::ZERO);
    }

    #[test]
    fn test_burst_completes_after_longest_lifetime() {
        let mut burst = burst(DEFAULT_PARTICLES);
        let mut seconds = 0.0;
        while !burst.is_complete() {
            burst.update(1.0 / 60.0);
            seconds += 1.0 / 60.0;
            assert!(seconds < 2.1, "burst outlived the maximum lifetime");
        }
        assert!(seconds >= 1.0);
    }

    #[test]
    fn test_fading_is_monotonic() {
        let mut burst = burst(1);
        let mut last = burst.particles()[0].opacity();
        for _ in 0..200 {
            burst.update(0.02);
            let now = burst.particles()[0].opacity();
            assert!(now <= last);
            last = now;
        }
    }

    #[test]
    fn test_empty_burst_is_complete() {
        assert!(burst(0).is_complete());
    }
}
