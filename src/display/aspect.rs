use serde::{Deserialize, Serialize};

/// Aspect ratio assumed until the media reports its real size.
pub const DEFAULT_NATIVE_ASPECT: f32 = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Normal,
    Stretch,
    Zoom,
    Wide,
    Cinema,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::Normal,
        DisplayMode::Stretch,
        DisplayMode::Zoom,
        DisplayMode::Wide,
        DisplayMode::Cinema,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Normal => "Normal",
            DisplayMode::Stretch => "Stretch",
            DisplayMode::Zoom => "Zoom",
            DisplayMode::Wide => "Wide",
            DisplayMode::Cinema => "Cinema",
        }
    }

    /// Nominal `(x, y)` scale. `Normal` is replaced by a fit derived from the media.
    pub fn nominal_scale(self) -> (f32, f32) {
        match self {
            DisplayMode::Normal => (1.0, 1.0),
            DisplayMode::Stretch => (1.33, 1.0),
            DisplayMode::Zoom => (1.05, 1.05),
            DisplayMode::Wide => (1.15, 1.0),
            DisplayMode::Cinema => (1.25, 1.0),
        }
    }

    /// Next mode in declaration order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Scale to apply to the screen quad so the picture stays inside the bounds.
///
/// `(1, 1)` fills the bounds exactly; neither axis ever ends up above 1.
pub fn compute_scale(native_aspect: f32, mode: DisplayMode, bounds_aspect: f32) -> (f32, f32) {
    let native_aspect = if native_aspect.is_finite() && native_aspect > 0.0 {
        native_aspect
    } else {
        DEFAULT_NATIVE_ASPECT
    };

    let (mut scale_x, mut scale_y) = if mode == DisplayMode::Normal {
        if native_aspect > bounds_aspect {
            (1.0, bounds_aspect / native_aspect)
        } else {
            (native_aspect / bounds_aspect, 1.0)
        }
    } else {
        mode.nominal_scale()
    };

    // In units of the bounds, scaled width is scale_x and scaled height scale_y
    if scale_x > 1.0 || scale_y > 1.0 {
        let fit = (1.0 / scale_x).min(1.0 / scale_y);
        scale_x *= fit;
        scale_y *= fit;
    }

    (scale_x, scale_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;
    const TV_BOUNDS: f32 = 2.3 / 1.3;

    #[test]
    fn test_normal_wide_media_fills_width() {
        let (sx, sy) = compute_scale(16.0 / 9.0, DisplayMode::Normal, TV_BOUNDS);
        assert_eq!(sx, 1.0);
        assert!((sy - TV_BOUNDS * 9.0 / 16.0).abs() < EPS, "sy = {}", sy);
        assert!((sy - 0.995).abs() < 1e-3);
    }

    #[test]
    fn test_normal_tall_media_fills_height() {
        let (sx, sy) = compute_scale(4.0 / 3.0, DisplayMode::Normal, TV_BOUNDS);
        assert_eq!(sy, 1.0);
        assert!((sx - (4.0 / 3.0) / TV_BOUNDS).abs() < EPS);
    }

    #[test]
    fn test_normal_preserves_native_ratio() {
        for native in [0.5f32, 1.0, 4.0 / 3.0, 1.7, 16.0 / 9.0, 2.39, 3.5] {
            let (sx, sy) = compute_scale(native, DisplayMode::Normal, TV_BOUNDS);
            let shown = sx / sy * TV_BOUNDS;
            assert!((shown - native).abs() < 1e-3, "native {} shown {}", native, shown);
        }
    }

    #[test]
    fn test_no_mode_exceeds_bounds() {
        let mut native = 0.1f32;
        while native < 5.0 {
            for mode in DisplayMode::ALL {
                let (sx, sy) = compute_scale(native, mode, TV_BOUNDS);
                assert!(sx > 0.0 && sy > 0.0);
                assert!(sx <= 1.0 + 1e-6, "{:?} at {} gave sx {}", mode, native, sx);
                assert!(sy <= 1.0 + 1e-6, "{:?} at {} gave sy {}", mode, native, sy);
            }
            native += 0.05;
        }
    }

    #[test]
    fn test_overflowing_modes_keep_their_axis_ratio() {
        let (sx, sy) = compute_scale(16.0 / 9.0, DisplayMode::Stretch, TV_BOUNDS);
        assert!((sx - 1.0).abs() < EPS);
        assert!((sx / sy - 1.33).abs() < EPS);

        let (sx, sy) = compute_scale(16.0 / 9.0, DisplayMode::Zoom, TV_BOUNDS);
        assert!((sx - 1.0).abs() < EPS);
        assert!((sy - 1.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_native_aspect_uses_default() {
        assert_eq!(
            compute_scale(0.0, DisplayMode::Normal, TV_BOUNDS),
            compute_scale(DEFAULT_NATIVE_ASPECT, DisplayMode::Normal, TV_BOUNDS)
        );
        assert_eq!(
            compute_scale(f32::NAN, DisplayMode::Normal, TV_BOUNDS),
            compute_scale(DEFAULT_NATIVE_ASPECT, DisplayMode::Normal, TV_BOUNDS)
        );
    }

    #[test]
    fn test_mode_cycle_wraps() {
        let mut mode = DisplayMode::Normal;
        let mut seen = Vec::new();
        for _ in 0..5 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                DisplayMode::Stretch,
                DisplayMode::Zoom,
                DisplayMode::Wide,
                DisplayMode::Cinema,
                DisplayMode::Normal
            ]
        );
    }
}
