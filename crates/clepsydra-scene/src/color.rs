//! Colour palette and blending helpers.

use ratatui::style::Color;

/// An 8-bit RGB triple. Blending happens here before conversion to [`Color`].
pub type Rgb = (u8, u8, u8);

/// Night sky behind the flat tank (sky-950).
pub const SKY: Rgb = (8, 47, 73);
/// Water colour at the bottom of the tank (blue-500).
pub const WATER_DEEP: Rgb = (59, 130, 246);
/// Water colour just under the surface (blue-400).
pub const WATER_SHALLOW: Rgb = (96, 165, 250);
/// Surface highlight (blue-300).
pub const SURFACE_HIGHLIGHT: Rgb = (147, 197, 253);
/// Ripple crests (blue-200).
pub const RIPPLE: Rgb = (191, 219, 254);
/// Falling droplet body (blue-400 at 80 %, pre-blended over the sky).
pub const DROPLET: Rgb = (78, 141, 215);

/// Clear colour and fog colour of the depth scene.
pub const DEPTH_BACKGROUND: Rgb = (0, 16, 32);
/// Body colour of the pool surface.
pub const DEPTH_WATER: Rgb = (0, 153, 204);
/// Specular tint of the pool surface.
pub const DEPTH_SUN: Rgb = (0, 68, 119);
/// Splash particle base colour.
pub const PARTICLE: Rgb = (136, 204, 255);
/// Splash particle glow.
pub const PARTICLE_GLOW: Rgb = (68, 136, 255);

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Composite `over` with the given opacity on top of `under`.
pub fn blend(over: Rgb, under: Rgb, alpha: f32) -> Rgb {
    lerp(under, over, alpha)
}

/// Linear fog between `near` and `far` scene units.
pub fn fog(c: Rgb, distance: f32, near: f32, far: f32) -> Rgb {
    let t = (distance - near) / (far - near);
    lerp(c, DEPTH_BACKGROUND, t)
}
