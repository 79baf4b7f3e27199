use crate::constants::MAX_PIXEL_RATIO;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
    pub pixel_ratio: f32,
}

/// Camera aspect and render pixel ratio for a window size; `None` for a zero-height window.
pub fn compute_viewport(width: f32, height: f32, device_pixel_ratio: f32) -> Option<Viewport> {
    if height <= 0.0 || width <= 0.0 {
        return None;
    }
    let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };

    Some(Viewport {
        width,
        height,
        aspect: width / height,
        pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1920.0, 1080.0, 1.0, 16.0 / 9.0, 1.0)]
    #[case(390.0, 844.0, 3.0, 390.0 / 844.0, 2.0)]
    #[case(800.0, 800.0, 1.5, 1.0, 1.5)]
    fn test_viewport(
        #[case] width: f32,
        #[case] height: f32,
        #[case] ratio: f32,
        #[case] aspect: f32,
        #[case] pixel_ratio: f32,
    ) {
        let viewport = compute_viewport(width, height, ratio).unwrap();
        assert!((viewport.aspect - aspect).abs() < 1e-6);
        assert_eq!(viewport.pixel_ratio, pixel_ratio);
    }

    #[test]
    fn test_zero_height_is_ignored() {
        assert_eq!(compute_viewport(800.0, 0.0, 1.0), None);
    }
}
