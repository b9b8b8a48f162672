use serde::{Deserialize, Serialize};

pub const PICTURE_MIN: f32 = 0.0;
pub const PICTURE_MAX: f32 = 2.0;
pub const PICTURE_DEFAULT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PictureKind {
    Brightness,
    Contrast,
    Saturation,
}

impl PictureKind {
    pub const ALL: [PictureKind; 3] = [
        PictureKind::Brightness,
        PictureKind::Contrast,
        PictureKind::Saturation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PictureKind::Brightness => "BRIGHTNESS",
            PictureKind::Contrast => "CONTRAST",
            PictureKind::Saturation => "SATURATION",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PictureKind::Brightness => "Brightness",
            PictureKind::Contrast => "Contrast",
            PictureKind::Saturation => "Saturation",
        }
    }
}

/// How a picture control changes its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PictureChange {
    Delta(f32),
    Absolute(f32),
    Reset,
}

/// Brightness, contrast and saturation applied to every video frame.
///
/// Lives for the whole process and is never written to disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PictureSettings {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for PictureSettings {
    fn default() -> Self {
        Self {
            brightness: PICTURE_DEFAULT,
            contrast: PICTURE_DEFAULT,
            saturation: PICTURE_DEFAULT,
        }
    }
}

impl PictureSettings {
    pub fn get(&self, kind: PictureKind) -> f32 {
        match kind {
            PictureKind::Brightness => self.brightness,
            PictureKind::Contrast => self.contrast,
            PictureKind::Saturation => self.saturation,
        }
    }

    /// Applies `change` and returns the new clamped value.
    pub fn apply(&mut self, kind: PictureKind, change: PictureChange) -> f32 {
        let current = self.get(kind);
        let next = match change {
            PictureChange::Delta(delta) => current + delta,
            PictureChange::Absolute(value) => value,
            PictureChange::Reset => PICTURE_DEFAULT,
        };
        // Snap to 0.01 so repeated 0.1 steps land on round values
        let next = (next.clamp(PICTURE_MIN, PICTURE_MAX) * 100.0).round() / 100.0;
        let next = if next.is_finite() { next } else { PICTURE_DEFAULT };

        match kind {
            PictureKind::Brightness => self.brightness = next,
            PictureKind::Contrast => self.contrast = next,
            PictureKind::Saturation => self.saturation = next,
        }
        next
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Adjusts an RGBA8 buffer in place: brightness, then contrast, then saturation.
    pub fn apply_to_rgba(&self, pixels: &mut [u8]) {
        if self.is_identity() {
            return;
        }

        for px in pixels.chunks_exact_mut(4) {
            let mut rgb = [
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
            ];

            for c in rgb.iter_mut() {
                *c *= self.brightness;
                *c = 0.5 + self.contrast * (*c - 0.5);
            }

            let grey = 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2];
            for (i, c) in rgb.iter().enumerate() {
                let mixed = grey + (c - grey) * self.saturation;
                px[i] = (mixed.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
    }
}
