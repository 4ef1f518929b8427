/// Terminal cell canvas: framebuffer blitting plus line and point overlays
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

use polyview_core::{Color, FrameBuffer};

/// Cell used for z-buffer filled pixels.
const FILL_CHAR: char = '█';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: TermColor,
}

/// A width × height grid of optional colored characters. Unset cells render
/// as background, matching the frame buffer's sentinel-free model.
pub struct TermCanvas {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl TermCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, TermColor)> {
        self.cells[y * self.width + x].map(|c| (c.ch, c.color))
    }

    /// Set one cell; coordinates outside the canvas are dropped.
    pub fn plot(&mut self, x: i32, y: i32, ch: char, color: TermColor) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.cells[y as usize * self.width + x as usize] = Some(Cell { ch, color });
        }
    }

    /// Bresenham line between two cells, clipped to the canvas.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ch: char, color: TermColor) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot(x, y, ch, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Copy every written framebuffer pixel into the grid. Background cells
    /// are left untouched so overlays drawn earlier show through.
    pub fn blit(&mut self, frame: &FrameBuffer) {
        for (x, y, color) in frame.written_pixels() {
            if x < self.width && y < self.height {
                self.cells[y * self.width + x] = Some(Cell {
                    ch: FILL_CHAR,
                    color: to_term_color(color),
                });
            }
        }
    }

    /// Queue the whole grid as styled terminal output.
    pub fn present<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(cell) => {
                        writer.queue(SetForegroundColor(cell.color))?;
                        writer.queue(Print(cell.ch))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
