//! Physical page units: millimeters, pixels, DPI, paper presets.
//!
//! All layout math runs in pixels; the config speaks millimeters. The
//! conversion is `round(mm / 25.4 * dpi)`, and the inverse round-trips
//! within ±1 px due to rounding — that tolerance is part of the contract
//! and pinned by the tests below.

use serde::{Deserialize, Serialize};

pub const MM_PER_INCH: f64 = 25.4;

/// Print resolution used when the config doesn't override it.
pub const DEFAULT_DPI: u32 = 300;

/// Convert millimeters to pixels at a given resolution.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    let px = (mm / MM_PER_INCH * f64::from(dpi)).round();
    if px > 0.0 { px as u32 } else { 0 }
}

/// Convert pixels back to millimeters. Inverse of [`mm_to_px`] within the
/// ±1 px rounding tolerance.
pub fn px_to_mm(px: u32, dpi: u32) -> f64 {
    f64::from(px) * MM_PER_INCH / f64::from(dpi)
}

/// A standard paper size, or caller-supplied dimensions in millimeters.
///
/// Presets are portrait-first; [`Orientation::Landscape`] swaps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f64, height: f64 },
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl PageSize {
    /// Portrait dimensions in millimeters as `(width, height)`.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

/// Page orientation. Landscape swaps the preset's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page dimensions in pixels for a size, orientation and resolution.
pub fn page_px(size: PageSize, orientation: Orientation, dpi: u32) -> (u32, u32) {
    let (w, h) = size.dimensions_mm();
    let (w, h) = match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    };
    (mm_to_px(w, dpi), mm_to_px(h, dpi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_at_300_dpi() {
        assert_eq!(mm_to_px(210.0, 300), 2480);
        assert_eq!(mm_to_px(297.0, 300), 3508);
    }

    #[test]
    fn zero_and_negative_clamp_to_zero_px() {
        assert_eq!(mm_to_px(0.0, 300), 0);
        assert_eq!(mm_to_px(-5.0, 300), 0);
    }

    #[test]
    fn round_trip_stays_within_one_pixel() {
        for dpi in [72, 150, 300, 600] {
            for mm in [1.0, 8.5, 30.0, 210.0, 297.0, 355.6] {
                let px = mm_to_px(mm, dpi);
                let back = mm_to_px(px_to_mm(px, dpi), dpi);
                assert!(
                    px.abs_diff(back) <= 1,
                    "{mm}mm at {dpi}dpi: {px}px → {back}px"
                );
            }
        }
    }

    #[test]
    fn presets_are_portrait_first() {
        for size in [
            PageSize::A3,
            PageSize::A4,
            PageSize::A5,
            PageSize::Letter,
            PageSize::Legal,
        ] {
            let (w, h) = size.dimensions_mm();
            assert!(w < h, "{size:?} should be portrait-first");
        }
    }

    #[test]
    fn landscape_swaps_page_dimensions() {
        let portrait = page_px(PageSize::A4, Orientation::Portrait, 300);
        let landscape = page_px(PageSize::A4, Orientation::Landscape, 300);
        assert_eq!(portrait, (2480, 3508));
        assert_eq!(landscape, (3508, 2480));
    }

    #[test]
    fn custom_size_passes_through() {
        let (w, h) = PageSize::Custom {
            width: 300.0,
            height: 400.0,
        }
        .dimensions_mm();
        assert_eq!((w, h), (300.0, 400.0));
    }

    #[test]
    fn page_size_parses_from_toml_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            size: PageSize,
        }
        let parsed: Wrapper = toml::from_str("size = \"a4\"").unwrap();
        assert_eq!(parsed.size, PageSize::A4);
        let parsed: Wrapper =
            toml::from_str("size = { custom = { width = 300.0, height = 400.0 } }").unwrap();
        assert_eq!(
            parsed.size,
            PageSize::Custom {
                width: 300.0,
                height: 400.0
            }
        );
    }
}
