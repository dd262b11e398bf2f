//! Block glyph font for the clepsydra clock overlay.
//!
//! Glyphs are five rows tall and drawn with half blocks so they read as
//! rounded, droplet-like shapes at small terminal sizes.

use clepsydra_core::{ClockSample, TimeFormat, format_time};

/// Number of terminal rows every glyph occupies.
pub const GLYPH_HEIGHT: usize = 5;

/// Width of digit and letter glyphs.
pub const GLYPH_WIDTH: usize = 5;

/// Columns between adjacent glyphs.
const SPACING: &str = " ";

type Glyph = [&'static str; GLYPH_HEIGHT];

const DIGITS: [Glyph; 10] = [
    ["▄▀▀▀▄", "█   █", "█   █", "█   █", "▀▄▄▄▀"],
    [" ▄█  ", "  █  ", "  █  ", "  █  ", " ▄█▄ "],
    ["▄▀▀▀▄", "    █", "  ▄▀ ", "▄▀   ", "█▄▄▄▄"],
    ["▄▀▀▀▄", "    █", "  ▀▀▄", "    █", "▀▄▄▄▀"],
    ["█   █", "█   █", "▀▀▀▀█", "    █", "    █"],
    ["█▀▀▀▀", "█    ", "▀▀▀▀▄", "    █", "▀▄▄▄▀"],
    ["▄▀▀▀ ", "█    ", "█▀▀▀▄", "█   █", "▀▄▄▄▀"],
    ["▀▀▀▀█", "   ▄▀", "  █  ", "  █  ", "  █  "],
    ["▄▀▀▀▄", "█   █", "▄▀▀▀▄", "█   █", "▀▄▄▄▀"],
    ["▄▀▀▀▄", "█   █", "▀▄▄▄█", "    █", " ▄▄▄▀"],
];

const COLON: Glyph = [" ", "█", " ", "█", " "];
const SPACE: Glyph = ["  ", "  ", "  ", "  ", "  "];
const LETTER_A: Glyph = ["▄▀▀▀▄", "█   █", "█▀▀▀█", "█   █", "█   █"];
const LETTER_P: Glyph = ["█▀▀▀▄", "█   █", "█▀▀▀ ", "█    ", "█    "];
const LETTER_M: Glyph = ["█▄ ▄█", "█ ▀ █", "█   █", "█   █", "█   █"];
const BLANK: Glyph = ["     ", "     ", "     ", "     ", "     "];

fn glyph(c: char) -> &'static Glyph {
    match c {
        '0'..='9' => &DIGITS[c as usize - '0' as usize],
        ':' => &COLON,
        ' ' => &SPACE,
        'A' => &LETTER_A,
        'P' => &LETTER_P,
        'M' => &LETTER_M,
        _ => &BLANK,
    }
}

/// Render `text` as big glyphs.
///
/// Always returns [`GLYPH_HEIGHT`] lines, all of the same display width.
/// Characters outside the font render as blank cells of glyph width.
pub fn render_big(text: &str) -> Vec<String> {
    (0..GLYPH_HEIGHT)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(SPACING)
        })
        .collect()
}

/// Render a clock sample in the requested format.
pub fn render_time(sample: &ClockSample, format: TimeFormat) -> Vec<String> {
    render_big(&format_time(sample, format))
}

/// Display width of `render_big(text)` without rendering it.
pub fn rendered_width(text: &str) -> usize {
    let glyphs: usize = text.chars().map(|c| glyph(c)[0].chars().count()).sum();
    let gaps = text.chars().count().saturating_sub(1) * SPACING.len();
    glyphs + gaps
}
