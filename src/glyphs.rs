//! Offscreen rendering of a word into an alpha mask, and the stride scan that
//! turns the mask into particle targets.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use glam::Vec2;

/// Cell size of the bitmap font, in font pixels.
const GLYPH_CELL: usize = 8;
/// Horizontal advance per em. The 8x8 cells are square, so one em.
const ADVANCE_RATIO: f32 = 1.0;
const MAX_FONT_SIZE: f32 = 150.0;

/// Single-channel coverage buffer the size of the canvas.
#[derive(Debug, Clone)]
pub struct TextMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl TextMask {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize*height as usize],
        }
    }

    /// Renders `word` centered on a `width` x `height` mask.
    pub fn render(word: &str, width: u32, height: u32) -> Self {
        let mut mask = Self::blank(width, height);
        let glyph_count = word.chars().count();
        if glyph_count == 0 || width == 0 || height == 0 {
            return mask;
        }

        let font_size = font_size_for(width as f32, glyph_count);
        let scale = font_size/GLYPH_CELL as f32;
        let advance = font_size*ADVANCE_RATIO;
        let left = width as f32/2.0-advance*glyph_count as f32/2.0;
        let top = height as f32/2.0-font_size/2.0;

        for (i, ch) in word.chars().enumerate() {
            let Some(rows) = BASIC_FONTS.get(ch) else {
                log::trace!("no glyph for {:?}, leaving a gap", ch);
                continue;
            };
            let origin = Vec2::new(left+advance*i as f32, top);
            mask.blit_glyph(&rows, origin, scale);
        }
        mask
    }

    fn blit_glyph(&mut self, rows: &[u8; GLYPH_CELL], origin: Vec2, scale: f32) {
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_CELL {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = origin.x+col as f32*scale;
                let y0 = origin.y+row as f32*scale;
                self.fill(x0, y0, x0+scale, y0+scale);
            }
        }
    }

    fn fill(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let x_start = x0.round().max(0.0) as usize;
        let y_start = y0.round().max(0.0) as usize;
        let x_end = (x1.round().max(0.0) as usize).min(self.width as usize);
        let y_end = (y1.round().max(0.0) as usize).min(self.height as usize);
        for y in y_start..y_end {
            let row = y*self.width as usize;
            self.alpha[row+x_start.min(x_end)..row+x_end].fill(255);
        }
    }

    /// Samples every `stride`-th pixel of the row-major pixel array and
    /// returns the coordinates of those with non-zero coverage.
    pub fn lit_coordinates(&self, stride: usize) -> Vec<Vec2> {
        let width = self.width as usize;
        self.alpha
            .iter()
            .enumerate()
            .step_by(stride.max(1))
            .filter(|(_, alpha)| **alpha > 0)
            .map(|(index, _)| Vec2::new((index%width) as f32, (index/width) as f32))
            .collect()
    }
}

/// Largest size that fits the word in 90% of the width, bounded by 18% of
/// the width and an absolute cap.
pub fn font_size_for(width: f32, glyph_count: usize) -> f32 {
    let fit = width*0.9/(glyph_count.max(1) as f32*ADVANCE_RATIO);
    (width*0.18).min(fit).min(MAX_FONT_SIZE)
}
