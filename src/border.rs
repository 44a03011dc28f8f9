//! Border slot packing.
//!
//! Turns "N pictures on a page of given pixel dimensions" into a list of
//! non-overlapping rectangular slots spread across the four border edges.
//! Pure dimension math, no I/O.
//!
//! Two packing strategies exist because the layout they produce genuinely
//! differs and both are in active use:
//!
//! - [`PackingStrategy::ExactSlot`] distributes pictures as evenly as
//!   possible and divides each edge's usable length exactly, so slots fill
//!   the full border thickness and their size varies per edge.
//! - [`PackingStrategy::AdaptiveSquares`] places uniform squares at a
//!   natural size (the border thickness) and, when demand exceeds capacity,
//!   shrinks the square by `sqrt(capacity/demand)` and re-packs. The square
//!   root is deliberate: halving linear size roughly doubles capacity along
//!   both axes of a 2-D packing, so a linear shrink would over-correct.
//!
//! Degenerate inputs never fail: zero pictures produce an empty slot list,
//! and a page too small for its margins produces zero-size slots.

use crate::types::{BorderEdge, BorderLayout, PictureSlot, Rect};
use serde::{Deserialize, Serialize};

/// Page-level inputs to packing, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSpec {
    pub page_width: f64,
    pub page_height: f64,
    /// Thickness of the picture band on every edge.
    pub border_width: f64,
    /// Gap between adjacent slots and at both ends of each edge run.
    pub picture_spacing: f64,
    /// Blank page margin outside the border band.
    pub margin: f64,
}

/// Which packing algorithm to run. Selected in `config.toml`
/// (`border.packing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PackingStrategy {
    #[default]
    #[serde(rename = "exact")]
    ExactSlot,
    #[serde(rename = "adaptive")]
    AdaptiveSquares,
}

/// Distribute `count` pictures across the four edges as evenly as possible.
///
/// Returns per-edge counts in clockwise order (top, right, bottom, left).
/// Every edge gets `count / 4`; the first `count % 4` edges in clockwise
/// order get one extra. The counts always sum to `count` and never differ
/// by more than one.
pub fn distribute_pictures(count: usize) -> [usize; 4] {
    let base = count / 4;
    let remainder = count % 4;
    let mut counts = [base; 4];
    for slot in counts.iter_mut().take(remainder) {
        *slot += 1;
    }
    counts
}

/// Compute the border layout for `picture_count` pictures.
pub fn pack(spec: &BorderSpec, picture_count: usize, strategy: PackingStrategy) -> BorderLayout {
    let slots = match strategy {
        PackingStrategy::ExactSlot => pack_exact(spec, picture_count),
        PackingStrategy::AdaptiveSquares => pack_adaptive(spec, picture_count),
    };
    BorderLayout {
        page_width: spec.page_width,
        page_height: spec.page_height,
        border_width: spec.border_width,
        inner_area: inner_area(spec),
        slots,
        margin: spec.margin,
        picture_spacing: spec.picture_spacing,
    }
}

/// The page area left for the map once margin and border band are removed.
fn inner_area(spec: &BorderSpec) -> Rect {
    let inset = spec.margin + spec.border_width;
    Rect {
        x: inset,
        y: inset,
        width: (spec.page_width - 2.0 * inset).max(0.0),
        height: (spec.page_height - 2.0 * inset).max(0.0),
    }
}

/// Usable run length along an edge: the page dimension on that axis minus
/// both margins and both perpendicular border thicknesses (the corners
/// belong to no edge).
fn usable_length(spec: &BorderSpec, edge: BorderEdge) -> f64 {
    let along = if edge.is_horizontal() {
        spec.page_width
    } else {
        spec.page_height
    };
    (along - 2.0 * spec.margin - 2.0 * spec.border_width).max(0.0)
}

/// Where the usable run starts along the edge axis.
fn axis_start(spec: &BorderSpec) -> f64 {
    spec.margin + spec.border_width
}

/// Cross-axis origin of an edge's border band.
fn band_origin(spec: &BorderSpec, edge: BorderEdge) -> f64 {
    match edge {
        BorderEdge::Top | BorderEdge::Left => spec.margin,
        BorderEdge::Bottom => spec.page_height - spec.margin - spec.border_width,
        BorderEdge::Right => spec.page_width - spec.margin - spec.border_width,
    }
}

/// Build one slot on `edge` at `edge_index`, given its along-axis offset and
/// its size. `cross_offset` shifts the slot within the border band (zero for
/// full-thickness slots, centering for adaptive squares).
fn make_slot(
    spec: &BorderSpec,
    edge: BorderEdge,
    id: usize,
    edge_index: usize,
    along: f64,
    along_size: f64,
    cross_size: f64,
    cross_offset: f64,
) -> PictureSlot {
    let cross = band_origin(spec, edge) + cross_offset;
    let (x, y, width, height) = if edge.is_horizontal() {
        (along, cross, along_size, cross_size)
    } else {
        (cross, along, cross_size, along_size)
    };
    PictureSlot {
        id,
        edge,
        x,
        y,
        width,
        height,
        edge_index,
    }
}

// ============================================================================
// Exact-slot strategy
// ============================================================================

/// Even distribution, exact division of each edge's usable length.
fn pack_exact(spec: &BorderSpec, picture_count: usize) -> Vec<PictureSlot> {
    let counts = distribute_pictures(picture_count);
    let mut slots = Vec::with_capacity(picture_count);
    let mut next_id = 0;

    for (edge, &count) in BorderEdge::CLOCKWISE.iter().zip(&counts) {
        if count == 0 {
            continue;
        }
        let usable = usable_length(spec, *edge);
        // Leading gap + trailing gap + one gap between each adjacent pair.
        let gaps = (count + 1) as f64 * spec.picture_spacing;
        let slot_size = ((usable - gaps) / count as f64).floor().max(0.0);

        for i in 0..count {
            let along =
                axis_start(spec) + spec.picture_spacing + i as f64 * (slot_size + spec.picture_spacing);
            slots.push(make_slot(
                spec,
                *edge,
                next_id,
                i,
                along,
                slot_size,
                spec.border_width,
                0.0,
            ));
            next_id += 1;
        }
    }
    slots
}

// ============================================================================
// Adaptive-squares strategy
// ============================================================================

/// How many squares of side `size` fit one edge's usable run.
fn edge_capacity(usable: f64, size: f64, spacing: f64) -> usize {
    if size <= 0.0 {
        return 0;
    }
    let n = ((usable - spacing) / (size + spacing)).floor();
    if n > 0.0 { n as usize } else { 0 }
}

/// Uniform squares at the natural size (the border thickness), shrunk when
/// demand exceeds capacity.
fn pack_adaptive(spec: &BorderSpec, picture_count: usize) -> Vec<PictureSlot> {
    if picture_count == 0 {
        return Vec::new();
    }

    let usable: Vec<f64> = BorderEdge::CLOCKWISE
        .iter()
        .map(|&e| usable_length(spec, e))
        .collect();
    let capacities = |size: f64| -> [usize; 4] {
        [
            edge_capacity(usable[0], size, spec.picture_spacing),
            edge_capacity(usable[1], size, spec.picture_spacing),
            edge_capacity(usable[2], size, spec.picture_spacing),
            edge_capacity(usable[3], size, spec.picture_spacing),
        ]
    };

    let mut size = spec.border_width.floor();
    let mut caps = capacities(size);
    let mut total: usize = caps.iter().sum();

    // Shrink until everything fits. One sqrt step is usually enough; repeat
    // because four 1-D edges grow capacity slower than a true 2-D packing.
    while picture_count > total && size > 1.0 {
        let factor = (total as f64 / picture_count as f64).sqrt();
        let shrunk = (size * factor).floor();
        // factor can round to a no-op for small sizes
        size = if shrunk < size { shrunk } else { size - 1.0 };
        caps = capacities(size);
        total = caps.iter().sum();
    }

    if picture_count > total {
        // The square bottomed out and pictures still don't fit. Placement is
        // guaranteed, squareness is not: hand over to exact division.
        return pack_exact(spec, picture_count);
    }

    // Even distribution, then push overflow from full edges to edges with
    // spare capacity (clockwise).
    let mut counts = distribute_pictures(picture_count);
    let mut overflow = 0;
    for (count, &cap) in counts.iter_mut().zip(&caps) {
        if *count > cap {
            overflow += *count - cap;
            *count = cap;
        }
    }
    for (count, &cap) in counts.iter_mut().zip(&caps) {
        while overflow > 0 && *count < cap {
            *count += 1;
            overflow -= 1;
        }
    }

    let mut slots = Vec::with_capacity(picture_count);
    let mut next_id = 0;
    let cross_offset = ((spec.border_width - size) / 2.0).max(0.0);
    for (edge, &count) in BorderEdge::CLOCKWISE.iter().zip(&counts) {
        for i in 0..count {
            let along =
                axis_start(spec) + spec.picture_spacing + i as f64 * (size + spec.picture_spacing);
            slots.push(make_slot(
                spec, *edge, next_id, i, along, size, size, cross_offset,
            ));
            next_id += 1;
        }
    }
    slots
}
