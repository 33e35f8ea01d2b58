//! 8-bit coverage canvas used to compose glyph images.

use super::GlyphImage;

/// A single-channel coverage buffer.
///
/// Every write is clipped to the canvas and combined with `max`, so
/// overlapping strokes never exceed full coverage.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }

    /// Raise coverage at `(x, y)` to at least `value`.
    pub fn plot(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.alpha[idx] = self.alpha[idx].max(value);
    }

    /// Fill the half-open rectangle `[x0, x1) × [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: u8) {
        let x0 = x0.clamp(0, self.width as i32);
        let x1 = x1.clamp(0, self.width as i32);
        let y0 = y0.clamp(0, self.height as i32);
        let y1 = y1.clamp(0, self.height as i32);
        for y in y0..y1 {
            let row = (y as u32 * self.width) as usize;
            for x in x0..x1 {
                let idx = row + x as usize;
                self.alpha[idx] = self.alpha[idx].max(value);
            }
        }
    }

    /// Fill an entire row.
    pub fn hline(&mut self, y: u32) {
        self.fill_rect(0, y as i32, self.width as i32, y as i32 + 1, 255);
    }

    /// Copy a rasterized mask with its top-left corner at `(left, top)`.
    pub fn blit_mask(&mut self, left: i32, top: i32, width: u32, height: u32, mask: &[u8]) {
        for row in 0..height {
            for col in 0..width {
                let value = mask.get((row * width + col) as usize).copied().unwrap_or(0);
                if value > 0 {
                    self.plot(left + col as i32, top + row as i32, value);
                }
            }
        }
    }

    /// Synthetic bold: smear every row one pixel to the right.
    pub fn embolden(&mut self) {
        for y in 0..self.height {
            let row = (y * self.width) as usize;
            for x in (1..self.width as usize).rev() {
                let left = self.alpha[row + x - 1];
                let here = &mut self.alpha[row + x];
                *here = (*here).max(left);
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0)
    }

    pub fn into_image(self) -> GlyphImage {
        GlyphImage::from_alpha(self.width, self.height, &self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(-2, -2, 2, 2, 255);
        assert_eq!(canvas.get(0, 0), 255);
        assert_eq!(canvas.get(1, 1), 255);
        assert_eq!(canvas.get(2, 2), 0);

        canvas.fill_rect(3, 3, 10, 10, 128);
        assert_eq!(canvas.get(3, 3), 128);
    }

    #[test]
    fn test_plot_keeps_max() {
        let mut canvas = Canvas::new(2, 2);
        canvas.plot(0, 0, 200);
        canvas.plot(0, 0, 100);
        assert_eq!(canvas.get(0, 0), 200);
        canvas.plot(-1, 5, 255);
    }

    #[test]
    fn test_embolden_smears_right() {
        let mut canvas = Canvas::new(4, 1);
        canvas.plot(1, 0, 255);
        canvas.embolden();
        assert_eq!(canvas.get(0, 0), 0);
        assert_eq!(canvas.get(1, 0), 255);
        assert_eq!(canvas.get(2, 0), 255);
        assert_eq!(canvas.get(3, 0), 0);
    }

    #[test]
    fn test_blit_mask_offsets() {
        let mut canvas = Canvas::new(4, 4);
        canvas.blit_mask(1, 2, 2, 1, &[10, 20]);
        assert_eq!(canvas.get(1, 2), 10);
        assert_eq!(canvas.get(2, 2), 20);
        assert!(!canvas.is_blank());
    }
}
