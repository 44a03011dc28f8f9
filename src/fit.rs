//! Aspect-preserving picture fitting.
//!
//! Given a slot rectangle and a source photo's native dimensions, compute the
//! largest render rectangle with the source aspect ratio that fits the slot,
//! and the offsets that center it. Pure dimension math, no I/O.

use crate::types::{ImageMetadata, PictureSlot, PositionedPicture};

/// Aspect ratio assumed for photos whose native dimensions are unknown.
pub const DEFAULT_ASPECT: (f64, f64) = (4.0, 3.0);

/// A computed render size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDimensions {
    pub width: f64,
    pub height: f64,
}

/// Largest rectangle with the source aspect that fits `max_w`×`max_h`.
///
/// Width-constrained sources (`src_w/src_h > max_w/max_h`) get the full
/// width and a rounded proportional height; otherwise the symmetric case on
/// height. Non-positive source dimensions mean "dimensions unknown" and
/// return the full `max_w`×`max_h` unchanged.
pub fn calculate_fit_dimensions(src_w: f64, src_h: f64, max_w: f64, max_h: f64) -> FitDimensions {
    if src_w <= 0.0 || src_h <= 0.0 {
        return FitDimensions {
            width: max_w,
            height: max_h,
        };
    }

    let src_aspect = src_w / src_h;
    let slot_aspect = max_w / max_h;

    if src_aspect > slot_aspect {
        FitDimensions {
            width: max_w,
            height: (max_w * src_h / src_w).round(),
        }
    } else {
        FitDimensions {
            width: (max_h * src_w / src_h).round(),
            height: max_h,
        }
    }
}

/// Offsets centering a render rectangle in a slot. Both are >= 0 because the
/// render never exceeds the slot.
pub fn centering_offsets(slot_w: f64, slot_h: f64, render_w: f64, render_h: f64) -> (f64, f64) {
    (
        ((slot_w - render_w) / 2.0).round().max(0.0),
        ((slot_h - render_h) / 2.0).round().max(0.0),
    )
}

/// Fit one photo into one slot.
fn position_picture(image: &ImageMetadata, slot: &PictureSlot) -> PositionedPicture {
    let (src_w, src_h) = match (image.width, image.height) {
        (Some(w), Some(h)) => (f64::from(w), f64::from(h)),
        _ => DEFAULT_ASPECT,
    };
    let dims = calculate_fit_dimensions(src_w, src_h, slot.width, slot.height);
    let (offset_x, offset_y) = centering_offsets(slot.width, slot.height, dims.width, dims.height);

    PositionedPicture {
        image: image.clone(),
        slot: slot.clone(),
        render_width: dims.width,
        render_height: dims.height,
        offset_x,
        offset_y,
        center_x: slot.x + offset_x + dims.width / 2.0,
        center_y: slot.y + offset_y + dims.height / 2.0,
        label: None,
    }
}

/// Pair photos with slots in order and fit each one.
///
/// The packer produces exactly one slot per photo, so the pairing is a plain
/// zip; if the lists ever disagree the shorter one wins.
pub fn position_pictures(images: &[ImageMetadata], slots: &[PictureSlot]) -> Vec<PositionedPicture> {
    images
        .iter()
        .zip(slots)
        .map(|(image, slot)| position_picture(image, slot))
        .collect()
}
