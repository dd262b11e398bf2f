//! Animated scene rendering for the clepsydra water clock.
//!
//! Two views share one water level: a side-on tank (`SceneMode::Flat`)
//! with falling droplets and radial splashes, and a perspective pool
//! (`SceneMode::Depth`) seen through an orbit camera, where droplets burst
//! into short-lived particles. Both are composed on an off-screen cell grid
//! and handed to ratatui as a single paragraph.

mod camera;
mod canvas;
mod chars;
mod color;
mod depth;
mod droplet;
mod particle;
mod state;
mod water;

pub use camera::{MAX_PITCH, MIN_PITCH, OrbitCamera};
pub use depth::{DepthDrop, DepthScene, DepthSettings, surface_height};
pub use droplet::{DropPhase, Droplet, DropletField};
pub use particle::{SplashBurst, SplashParticle};
pub use state::{SceneSettings, SceneState};
pub use water::WaterBody;
