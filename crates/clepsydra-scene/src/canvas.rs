//! Off-screen cell grid the scene is composed on before it reaches the frame.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::color::{Rgb, rgb};

/// One terminal cell: a glyph over a background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

/// Row-major grid of cells sized to the frame area.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, bg: Rgb) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(bg); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Replace a whole cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Draw a glyph, keeping the cell's background.
    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].ch = ch;
            self.cells[i].fg = fg;
        }
    }

    /// Convert to styled lines, merging runs of equal style into one span.
    pub fn into_lines(self) -> Vec<Line<'static>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut style: Option<(Rgb, Rgb)> = None;
                for cell in row {
                    let cell_style = (cell.fg, cell.bg);
                    if style.is_some_and(|s| s != cell_style) {
                        spans.push(styled(std::mem::take(&mut run), style));
                    }
                    style = Some(cell_style);
                    run.push(cell.ch);
                }
                if !run.is_empty() {
                    spans.push(styled(run, style));
                }
                Line::from(spans)
            })
            .collect()
    }
}

fn styled(text: String, style: Option<(Rgb, Rgb)>) -> Span<'static> {
    match style {
        Some((fg, bg)) => Span::styled(text, Style::new().fg(rgb(fg)).bg(rgb(bg))),
        None => Span::raw(text),
    }
}
