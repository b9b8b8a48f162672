use image::{Rgba, RgbaImage};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Off-screen RGBA canvas backing one overlay quad.
///
/// `dirty` is set whenever the content changes and cleared by whoever
/// uploads it as a texture.
pub struct RasterSurface {
    image: RgbaImage,
    dirty: bool,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), TRANSPARENT),
            dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the image if it changed since the last call.
    pub fn take_dirty(&mut self) -> Option<&RgbaImage> {
        if self.dirty {
            self.dirty = false;
            Some(&self.image)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        for py in y..y + height as i32 {
            for px in x..x + width as i32 {
                self.blend(px, py, color, 255);
            }
        }
    }

    /// Source-over blend of `color` scaled by `coverage` (0-255) at `(x, y)`.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>, coverage: u8) {
        if x < 0 || y < 0 || x >= self.image.width() as i32 || y >= self.image.height() as i32 {
            return;
        }

        let src_a = (color[3] as f32 / 255.0) * (coverage as f32 / 255.0);
        if src_a <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        for i in 0..3 {
            let src_c = color[i] as f32 / 255.0;
            let dst_c = dst[i] as f32 / 255.0;
            let out_c = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
            dst[i] = (out_c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    /// Number of pixels with any opacity, handy for checking that something was drawn.
    #[cfg(test)]
    pub fn opaque_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }
}
