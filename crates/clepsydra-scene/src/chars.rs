//! Character constants for the scene.

/// Head of a falling droplet.
pub const DROP_HEAD: char = '●';
/// Streak drawn above a fast droplet.
pub const DROP_TRAIL: char = '╵';

/// Ripple crests, weakest first.
pub const RIPPLE_CHARS: &[char] = &['~', '≈'];

/// Lower half block used when the surface sits mid-cell.
pub const HALF_FILL: char = '▄';

/// Centre blob of a flat splash as it grows.
pub const SPLASH_CENTER_CHARS: &[char] = &['•', 'o', 'O', '◯'];
/// Flat splash particles, largest first.
pub const SPLASH_PARTICLE_CHARS: &[char] = &['•', '∙', '·'];

/// Depth splash particles, smallest first.
pub const DEPTH_PARTICLE_CHARS: &[char] = &['·', '∙', '•', '●'];
/// Falling droplet in the depth scene, near and far.
pub const DEPTH_DROP_NEAR: char = '●';
pub const DEPTH_DROP_FAR: char = '•';
