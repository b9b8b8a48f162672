use fontdue::{Font, FontSettings};
use image::Rgba;
use std::path::Path;

use crate::overlay::surface::RasterSurface;

/// Font from egui's bundled set used when no overlay font is configured.
const FALLBACK_FONT: &str = "Ubuntu-Light";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba<u8>,
    /// Color and radius in pixels of a stroke drawn beneath the fill.
    pub outline: Option<(Rgba<u8>, i32)>,
}

/// Rasterizes single lines of text onto a [`RasterSurface`].
pub struct TextPainter {
    font: Font,
}

impl TextPainter {
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font: {}", e))?;
        Ok(Self { font })
    }

    /// Loads the configured font, falling back to the bundled one if it is missing or broken.
    pub fn load(font_path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = font_path {
            match std::fs::read(path) {
                Ok(bytes) => match Self::from_bytes(&bytes) {
                    Ok(painter) => {
                        log::info!("Loaded overlay font from {}", path.display());
                        return Ok(painter);
                    }
                    Err(e) => log::error!("Error loading overlay font {}: {}", path.display(), e),
                },
                Err(e) => log::error!("Error loading overlay font {}: {}", path.display(), e),
            }
            log::warn!("Falling back to bundled overlay font");
        }
        Self::bundled()
    }

    pub fn bundled() -> anyhow::Result<Self> {
        let definitions = egui::FontDefinitions::default();
        let data = definitions
            .font_data
            .get(FALLBACK_FONT)
            .ok_or_else(|| anyhow::anyhow!("Bundled font {} is not available", FALLBACK_FONT))?;
        Self::from_bytes(&data.font)
    }

    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, size).advance_width)
            .sum()
    }

    pub fn line_height(&self, size: f32) -> f32 {
        self.font
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * 1.2)
    }

    /// Baseline that vertically centers a line of `size` on `center_y`.
    pub fn middle_baseline(&self, center_y: f32, size: f32) -> f32 {
        match self.font.horizontal_line_metrics(size) {
            Some(m) => center_y + (m.ascent + m.descent) / 2.0,
            None => center_y + size * 0.35,
        }
    }

    /// Draws one line with its baseline at `baseline`, aligned horizontally on `x`.
    pub fn draw_line(
        &self,
        surface: &mut RasterSurface,
        text: &str,
        x: f32,
        baseline: f32,
        align: HAlign,
        style: &TextStyle,
    ) {
        let width = self.measure(text, style.size);
        let start_x = match align {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };

        if let Some((color, radius)) = style.outline {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if (dx == 0 && dy == 0) || dx * dx + dy * dy > radius * radius {
                        continue;
                    }
                    self.draw_glyphs(surface, text, start_x + dx as f32, baseline + dy as f32, style.size, color);
                }
            }
        }
        self.draw_glyphs(surface, text, start_x, baseline, style.size, style.color);
    }

    fn draw_glyphs(&self, surface: &mut RasterSurface, text: &str, x: f32, baseline: f32, size: f32, color: Rgba<u8>) {
        let mut cursor = x;
        let baseline = baseline.round() as i32;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size);
            let glyph_x = cursor.round() as i32 + metrics.xmin;
            let glyph_y = baseline - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    surface.blend(glyph_x + gx as i32, glyph_y + gy as i32, color, coverage);
                }
            }
            cursor += metrics.advance_width;
        }
    }
}
