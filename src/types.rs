//! Shared geometry types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → layout → render)
//! and must be identical across all three modules.
//!
//! ## Coordinate frames
//!
//! A [`PixelCoordinate`] is just an `(x, y)` pair — *which* frame it lives in
//! (absolute page pixels, map-viewport-relative pixels, or world pixels at a
//! given zoom) depends on where it came from. Every function producing one
//! documents its frame; mixing frames was a recurring bug source in earlier
//! iterations of this layout engine, so keep the doc comments honest.

use serde::{Deserialize, Serialize};

/// A geographic point in WGS84 degrees.
///
/// Latitude is in `[-90, 90]`, longitude in `[-180, 180]`. Values are
/// schema-validated upstream (config loading, link table parsing); the
/// geometry core does not re-check ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    /// Display name for warnings and marker tooltips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GeoLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }
}

/// An `(x, y)` pair in device pixels. See the module docs on coordinate frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PixelCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geographic bounding box.
///
/// Invariant: `north > south` and `east > west`, assuming the box does not
/// cross the antimeridian (which this engine does not support).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// An axis-aligned rectangle in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> PixelCoordinate {
        PixelCoordinate::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Source photo metadata produced by the scan stage.
///
/// `file_path` is an opaque identifier as far as the geometry core is
/// concerned — only the renderer dereferences it. Dimensions are `None` when
/// probing failed or was skipped; the fitter then falls back to a 4:3 aspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Stable id used by location links (the filename stem).
    pub id: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Display title from the `NNN-name` filename convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Caption from a sidecar `.txt` file. Passed through to the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// One of the four page-border segments that hold picture slots.
///
/// A closed set — adding a variant is a compile error at every `match`,
/// which is the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl BorderEdge {
    /// All edges in clockwise order starting at the top. Distribution
    /// remainders land in this order.
    pub const CLOCKWISE: [BorderEdge; 4] = [
        BorderEdge::Top,
        BorderEdge::Right,
        BorderEdge::Bottom,
        BorderEdge::Left,
    ];

    /// Whether slots on this edge run along the horizontal page axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, BorderEdge::Top | BorderEdge::Bottom)
    }
}

/// A reserved rectangle on a border edge, sized to hold one picture.
///
/// Slots on the same edge are ordered by `edge_index` and never overlap;
/// each slot is fully contained in its edge's border band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureSlot {
    /// Sequential id across the whole layout (clockwise edge order).
    pub id: usize,
    pub edge: BorderEdge,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Position of this slot among its edge's slots, in axis order.
    pub edge_index: usize,
}

/// A photo placed into a slot with its final render geometry.
///
/// Invariants: `render_width <= slot.width`, `render_height <= slot.height`,
/// and the render aspect equals the source aspect (or 4:3 when the source
/// dimensions are unknown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedPicture {
    pub image: ImageMetadata,
    pub slot: PictureSlot,
    pub render_width: f64,
    pub render_height: f64,
    /// Centering offset within the slot, both always >= 0.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Center of the rendered picture in page pixels.
    pub center_x: f64,
    pub center_y: f64,
    /// Optional pre-assigned connector label. Overrides auto-generation but
    /// loses to an explicit label on the link itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A declared association between one picture and one geographic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLocationLink {
    pub image_id: String,
    pub location: GeoLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A link that matched a positioned picture, with connector geometry.
///
/// All coordinates are absolute page pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub link: ImageLocationLink,
    /// Picture-side connector endpoint: the midpoint of the slot edge that
    /// faces the page interior.
    pub anchor: PixelCoordinate,
    /// The map marker this connector points at.
    pub marker: PixelCoordinate,
    /// Map-side connector endpoint. Equals `marker` unless several links
    /// share one location, in which case endpoints are spread on a small
    /// circle around the marker.
    pub end: PixelCoordinate,
    pub label: String,
}

/// Resolver output: the connectors plus informational warnings
/// (never failures).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedLinks {
    pub links: Vec<ResolvedLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// The map viewport: the inner page area the map occupies, with the
/// geographic center and zoom it is rendered at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapViewport {
    /// Top-left corner of the map area in absolute page pixels.
    pub origin: PixelCoordinate,
    pub width: f64,
    pub height: f64,
    pub center: GeoLocation,
    pub zoom: u8,
}

/// Marker glyph drawn at a link's map position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Circle,
    Square,
    Pin,
}

/// Connector stroke style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    Solid,
    Dashed,
    Dotted,
}

/// The complete border geometry: page frame, slot list, inner map area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub border_width: f64,
    /// Page area inside margin + border band, where the map is drawn.
    pub inner_area: Rect,
    /// All slots, ordered clockwise by edge (top, right, bottom, left) and
    /// by `edge_index` within each edge.
    pub slots: Vec<PictureSlot>,
    pub margin: f64,
    pub picture_spacing: f64,
}
