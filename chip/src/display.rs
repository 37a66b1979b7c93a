//! The monochrome framebuffer and the sprite drawing algorithm.
use std::fmt;

use crate::definitions::display::{HEIGHT, SPRITE_WIDTH, WIDTH};

/// A single row of the display.
pub type Row = [bool; WIDTH];

/// The graphics of the Chip 8 are black and white and the screen has a total
/// of `2048` pixels `(64 x 32)`, stored row major.
///
/// The buffer is only ever changed by clearing it or by XOR-ing sprites into
/// it. Renderers get a shared reference and can not change it.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [Row; HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
    }

    /// Will XOR the sprite into the buffer with its top left corner at
    /// `(x, y)`.
    ///
    /// Each byte of `sprite` is a row of eight pixels, the most significant
    /// bit being the leftmost. The origin is taken modulo the display size
    /// and the sprite wraps around both edges instead of being clipped.
    ///
    /// Returns true if any pixel was switched from on to off.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let origin_x = x % WIDTH;
        let origin_y = y % HEIGHT;
        let mut collision = false;

        for (i, line) in sprite.iter().enumerate() {
            let row = &mut self.pixels[(origin_y + i) % HEIGHT];

            for j in 0..SPRITE_WIDTH {
                let mask = 0x80 >> j;
                if line & mask == 0 {
                    continue;
                }

                let pixel = &mut row[(origin_x + j) % WIDTH];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }

        collision
    }

    /// Will return the state of the pixel, coordinates wrap like the sprites do.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % HEIGHT][x % WIDTH]
    }

    /// Will return all rows, top to bottom.
    pub fn rows(&self) -> &[Row; HEIGHT] {
        &self.pixels
    }

    /// True when no pixel is set.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|row| row.iter().all(|pixel| !pixel))
    }

    /// Will count the pixels that are currently on.
    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .map(|row| row.iter().filter(|pixel| **pixel).count())
            .sum()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("lit", &self.lit())
            .finish()
    }
}

/// Renders the buffer as `#` for set and `.` for unset pixels, a line per row.
impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.pixels.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for pixel in row.iter() {
                write!(f, "{}", if *pixel { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPH_ZERO: [u8; 5] = [0xF0, 0x90, 0x90, 0x90, 0xF0];

    #[test]
    fn test_draw_sets_bits_msb_first() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(0, 0, &[0b1000_0001]));

        assert!(fb.get(0, 0));
        assert!(!fb.get(1, 0));
        assert!(fb.get(7, 0));
        assert_eq!(fb.lit(), 2);
    }

    #[test]
    fn test_draw_twice_is_self_inverse() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(10, 5, &GLYPH_ZERO));
        assert_eq!(fb.lit(), 14);

        assert!(fb.draw(10, 5, &GLYPH_ZERO));
        assert!(fb.is_blank());
    }

    #[test]
    fn test_draw_wraps_on_both_axis() {
        let mut fb = FrameBuffer::new();
        fb.draw(62, 31, &[0xFF, 0xFF]);

        // right and bottom edge
        assert!(fb.get(62, 31));
        assert!(fb.get(63, 31));
        // wrapped horizontally
        assert!(fb.get(0, 31));
        assert!(fb.get(5, 31));
        assert!(!fb.get(6, 31));
        // wrapped vertically
        assert!(fb.get(62, 0));
        assert!(fb.get(5, 0));
        assert_eq!(fb.lit(), 16);
    }

    #[test]
    fn test_origin_taken_modulo() {
        let mut fb = FrameBuffer::new();
        fb.draw(64 + 3, 32 + 2, &[0x80]);
        assert!(fb.rows()[2][3]);
        assert_eq!(fb.lit(), 1);
    }

    #[test]
    fn test_collision_only_when_pixel_turns_off() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &[0xF0]);
        // touches only unset pixels
        assert!(!fb.draw(4, 0, &[0xF0]));
        // turns a single set pixel off
        assert!(fb.draw(7, 0, &[0x80]));
        assert!(!fb.get(7, 0));
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &GLYPH_ZERO);
        assert!(!fb.is_blank());
        fb.clear();
        assert!(fb.is_blank());
        assert_eq!(fb, FrameBuffer::default());
    }

    #[test]
    fn test_display_output() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &[0xC0]);
        let text = format!("{}", fb);
        let mut lines = text.lines();

        let first = lines.next().unwrap();
        assert_eq!(first.len(), WIDTH);
        assert!(first.starts_with("##."));
        assert_eq!(lines.count(), HEIGHT - 1);
    }
}
