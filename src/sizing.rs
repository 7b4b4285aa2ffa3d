//! Inline-or-thumbnail decision and the sizing arithmetic that goes with it.

use crate::image_info::ImageInfo;

/// Images strictly smaller than this many KiB are embedded as-is.
pub const INLINE_LIMIT_KIB: u64 = 256;

/// Maximum rendered size. A zero on either axis means that axis is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    #[must_use]
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Bounds {
            max_width,
            max_height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeMode {
    /// Embed the original bytes unmodified
    InlineRaw,
    /// Re-encode a downscaled copy
    Thumbnail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeDecision {
    pub mode: SizeMode,
    /// Extra `<img>` attributes, empty or a single `width="…"` / `height="…"`
    pub html_attributes: String,
}

/// Decides how an image gets embedded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeClassifier {
    pub bounds: Bounds,
    /// Whether inline images get a sizing attribute when they overflow the bounds
    pub inline_attributes: bool,
}

impl SizeClassifier {
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        SizeClassifier {
            bounds,
            inline_attributes: false,
        }
    }

    #[must_use]
    pub fn with_inline_attributes(mut self, enabled: bool) -> Self {
        self.inline_attributes = enabled;
        self
    }

    #[must_use]
    pub fn classify(&self, info: &ImageInfo) -> SizeDecision {
        match info.size_bytes {
            Some(size) if size / 1024 < INLINE_LIMIT_KIB => SizeDecision {
                mode: SizeMode::InlineRaw,
                html_attributes: if self.inline_attributes {
                    compute_attributes(info, self.bounds)
                } else {
                    String::new()
                },
            },
            _ => SizeDecision {
                mode: SizeMode::Thumbnail,
                html_attributes: String::new(),
            },
        }
    }
}

/// HTML sizing attribute for an image that overflows `bounds`.
///
/// The axis that overflows by the larger fraction wins; width wins ties.
#[must_use]
pub fn compute_attributes(info: &ImageInfo, bounds: Bounds) -> String {
    let Some((width, height)) = info.dimensions() else {
        return String::new();
    };
    let width_over = overage(width, bounds.max_width);
    let height_over = overage(height, bounds.max_height);

    if width_over > 0.0 && width_over >= height_over {
        format!("width=\"{:.1}\"", f64::from(bounds.max_width))
    } else if height_over > 0.0 {
        format!("height=\"{}\"", bounds.max_height)
    } else {
        String::new()
    }
}

fn overage(actual: u32, max: u32) -> f64 {
    if max > 0 && actual > max {
        f64::from(actual) / f64::from(max) - 1.0
    } else {
        0.0
    }
}

/// Scale `(width, height)` down to fit inside `bounds`, keeping the aspect ratio.
///
/// Never upscales. Each output side is at least one pixel.
// `ratio` is in (0, 1), so each scaled side lies in [0, side] and fits a u32
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn fit_within(width: u32, height: u32, bounds: Bounds) -> (u32, u32) {
    let scale_for = |actual: u32, max: u32| {
        if max > 0 && actual > max {
            f64::from(max) / f64::from(actual)
        } else {
            1.0
        }
    };
    let ratio = scale_for(width, bounds.max_width).min(scale_for(height, bounds.max_height));
    if ratio >= 1.0 {
        return (width, height);
    }

    let scale = |side: u32, max: u32| {
        let scaled = (f64::from(side) * ratio).round() as u32;
        let capped = if max > 0 { scaled.min(max) } else { scaled };
        capped.max(1)
    };
    (
        scale(width, bounds.max_width),
        scale(height, bounds.max_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(size: u64, width: u32, height: u32) -> ImageInfo {
        ImageInfo::new(size, width, height)
    }

    #[test]
    fn inline_threshold_is_256_kib() {
        let classifier = SizeClassifier::new(Bounds::new(500, 1000));
        for size in [0, 1, 1023, 1024, 262_143] {
            assert_eq!(
                classifier.classify(&info(size, 10, 10)).mode,
                SizeMode::InlineRaw,
                "size {size}"
            );
        }
        for size in [262_144, 262_145, 10_000_000] {
            assert_eq!(
                classifier.classify(&info(size, 10, 10)).mode,
                SizeMode::Thumbnail,
                "size {size}"
            );
        }
    }

    #[test]
    fn unknown_size_is_thumbnailed() {
        let classifier = SizeClassifier::new(Bounds::new(500, 1000));
        let mut unknown = ImageInfo::default();
        unknown.set_dimensions((10, 10));
        assert_eq!(classifier.classify(&unknown).mode, SizeMode::Thumbnail);
    }

    #[test]
    fn attributes_follow_the_larger_overage() {
        let bounds = Bounds::new(500, 1000);
        assert_eq!(compute_attributes(&info(0, 1000, 100), bounds), "width=\"500.0\"");
        assert_eq!(compute_attributes(&info(0, 100, 2000), bounds), "height=\"1000\"");
        assert_eq!(compute_attributes(&info(0, 100, 100), bounds), "");
        // width overage 1.0, height overage 2.0
        assert_eq!(compute_attributes(&info(0, 1000, 3000), bounds), "height=\"1000\"");
    }

    #[test]
    fn width_wins_ties() {
        let bounds = Bounds::new(500, 1000);
        assert_eq!(compute_attributes(&info(0, 1000, 2000), bounds), "width=\"500.0\"");
    }

    #[test]
    fn extreme_sides_stay_in_range() {
        assert_eq!(fit_within(u32::MAX, 1, Bounds::new(500, 0)), (500, 1));
        assert_eq!(fit_within(1, u32::MAX, Bounds::new(0, 1000)), (1, 1000));
        assert_eq!(fit_within(u32::MAX, u32::MAX, Bounds::new(500, 1000)), (500, 500));
    }

    #[test]
    fn zero_bound_disables_that_axis() {
        assert_eq!(compute_attributes(&info(0, 5000, 100), Bounds::new(0, 1000)), "");
        assert_eq!(fit_within(5000, 100, Bounds::new(0, 1000)), (5000, 100));
    }

    #[test]
    fn inline_attributes_only_when_enabled() {
        let bounds = Bounds::new(500, 1000);
        let wide = info(1000, 1000, 100);
        assert_eq!(SizeClassifier::new(bounds).classify(&wide).html_attributes, "");
        assert_eq!(
            SizeClassifier::new(bounds)
                .with_inline_attributes(true)
                .classify(&wide)
                .html_attributes,
            "width=\"500.0\""
        );
    }

    #[test]
    fn thumbnail_fits_and_keeps_aspect() {
        let bounds = Bounds::new(500, 1000);
        for (w, h) in [(1000, 100), (100, 2000), (4000, 3000), (501, 1001), (7, 9000), (9000, 7)] {
            let (nw, nh) = fit_within(w, h, bounds);
            assert!(nw <= 500 && nh <= 1000, "{w}x{h} -> {nw}x{nh}");
            assert!(nw >= 1 && nh >= 1);
            let expected_h = f64::from(h) * f64::from(nw) / f64::from(w);
            let expected_w = f64::from(w) * f64::from(nh) / f64::from(h);
            assert!(
                (f64::from(nh) - expected_h).abs() <= 1.0 || (f64::from(nw) - expected_w).abs() <= 1.0,
                "{w}x{h} -> {nw}x{nh}"
            );
        }
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(fit_within(20, 30, Bounds::new(500, 1000)), (20, 30));
    }
}
