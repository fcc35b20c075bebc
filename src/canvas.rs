use glam::Vec2;

use crate::color::Rgb;

/// CPU-side RGBA8 framebuffer the effects draw into. Contents persist
/// between frames so translucent overlays leave trails.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize*height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizing discards the contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize*self.width as usize+x as usize
    }

    /// Paints a translucent `color` over the whole canvas.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let [r, g, b] = color.to_bytes();
        for pixel in &mut self.pixels {
            blend(pixel, [r, g, b], alpha);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (x0, x1) = self.clip_span(x, x+w, self.width);
        let (y0, y1) = self.clip_span(y, y+h, self.height);
        let [r, g, b] = color.to_bytes();
        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px, py);
                self.pixels[i] = [r, g, b, 255];
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let (x0, x1) = self.clip_span(center.x-radius, center.x+radius, self.width);
        let (y0, y1) = self.clip_span(center.y-radius, center.y+radius, self.height);
        let [r, g, b] = color.to_bytes();
        let radius_sq = radius*radius;
        for py in y0..y1 {
            for px in x0..x1 {
                let cell = Vec2::new(px as f32+0.5, py as f32+0.5);
                if cell.distance_squared(center) <= radius_sq {
                    let i = self.index(px, py);
                    self.pixels[i] = [r, g, b, 255];
                }
            }
        }
    }

    /// Strokes a polyline with source-over blending. Pixels under joints
    /// are only blended once.
    pub fn stroke_polyline(&mut self, points: &[Vec2], line_width: f32, color: Rgb, alpha: f32) {
        if points.len() < 2 {
            return;
        }
        let half = (line_width/2.0).max(0.5);
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let (x0, x1) = self.clip_span(min.x-half, max.x+half, self.width);
        let (y0, y1) = self.clip_span(min.y-half, max.y+half, self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = (x1-x0) as usize;
        let mut covered = vec![false; span*(y1-y0) as usize];
        for segment in points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let (sx0, sx1) = self.clip_span(a.x.min(b.x)-half, a.x.max(b.x)+half, self.width);
            let (sy0, sy1) = self.clip_span(a.y.min(b.y)-half, a.y.max(b.y)+half, self.height);
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let cell = Vec2::new(px as f32+0.5, py as f32+0.5);
                    if distance_to_segment(cell, a, b) <= half {
                        covered[(py-y0) as usize*span+(px-x0) as usize] = true;
                    }
                }
            }
        }

        let rgb = color.to_bytes();
        let alpha = alpha.clamp(0.0, 1.0);
        for (offset, _) in covered.iter().enumerate().filter(|(_, hit)| **hit) {
            let px = x0+(offset%span) as u32;
            let py = y0+(offset/span) as u32;
            let i = self.index(px, py);
            blend(&mut self.pixels[i], rgb, alpha);
        }
    }

    fn clip_span(&self, from: f32, to: f32, limit: u32) -> (u32, u32) {
        let start = from.floor().clamp(0.0, limit as f32) as u32;
        let end = to.ceil().clamp(0.0, limit as f32) as u32;
        (start, end.max(start))
    }
}

fn blend(pixel: &mut [u8; 4], rgb: [u8; 3], alpha: f32) {
    for (dst, src) in pixel.iter_mut().zip(rgb) {
        let mixed = *dst as f32+(src as f32-*dst as f32)*alpha;
        *dst = mixed.round() as u8;
    }
    pixel[3] = 255;
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b-a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p-a).dot(ab)/len_sq).clamp(0.0, 1.0);
    p.distance(a+ab*t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_opaque_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.as_bytes().len(), 4*3*4);
        assert_eq!(canvas.pixel(3, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn fade_moves_toward_overlay() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, Rgb::WHITE);
        canvas.fade(Rgb::BLACK, 0.25);
        assert_eq!(canvas.pixel(0, 0), Some([191, 191, 191, 255]));
    }

    #[test]
    fn fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(3.0, -1.0, 2.0, 2.0, Rgb::WHITE);
        assert_eq!(canvas.pixel(3, 0), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(2, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn fill_circle_covers_center_not_corners() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Rgb::WHITE);
        assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn stroke_blends_joints_once() {
        let mut canvas = Canvas::new(20, 20);
        let points = [Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, 20.0)];
        canvas.stroke_polyline(&points, 2.0, Rgb::WHITE, 0.5);
        assert_eq!(canvas.pixel(10, 10), Some([128, 128, 128, 255]));
        assert_eq!(canvas.pixel(10, 3), Some([128, 128, 128, 255]));
        assert_eq!(canvas.pixel(15, 10), Some([0, 0, 0, 255]));
    }

    #[test]
    fn resize_clears() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, Rgb::WHITE);
        canvas.resize(3, 1);
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.pixel(2, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn pixel_outside_is_none() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.pixel(2, 1), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 0), None);
        assert_eq!(canvas.pixel(0, 2), None);
    }
}
