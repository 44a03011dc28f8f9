//! Link resolution and connector routing.
//!
//! Matches photo→location links against positioned border pictures, places a
//! pixel marker for each location inside the map viewport, computes the
//! picture-side connector anchor, spreads the endpoints of connectors that
//! share one location, and assigns labels.
//!
//! ## Silent drops vs. diagnostics
//!
//! A link whose `image_id` has no positioned picture is dropped during
//! resolution without any error. Callers that want to surface the mismatch
//! run [`validate_links`] first — a pre-flight check that reports one
//! diagnostic string per orphaned link and consumes nothing.
//!
//! ## Labels
//!
//! Precedence per link: explicit `link.label`, then the matched picture's
//! own `label`, then an auto-generated letter. The auto counter advances
//! only for links that actually resolve, so auto labels are dense and
//! order-preserving over the *resolved* sequence, not the input list.

use crate::projection;
use crate::types::{
    GeoLocation, ImageLocationLink, MapViewport, PixelCoordinate, PositionedPicture,
    RenderedLinks, ResolvedLink,
};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Radius in pixels of the endpoint spread circle for links sharing one
/// location. Cosmetic only — every spread connector still points at the same
/// marker.
const SPREAD_RADIUS: f64 = 5.0;

/// Generate the auto label for the `index`-th resolved unlabeled link.
///
/// 0–25 map to `A`–`Z`. From 26 on, two letters: the first is
/// `'A' + index/26 - 1`, the second `'A' + index%26`, giving
/// `AA`, `AB`, …, `AZ`, `BA`, … This is the scheme the layout has always
/// used — close to bijective base-26 but not quite — reproduce it, don't
/// improve it.
pub fn generate_label(index: usize) -> String {
    if index < 26 {
        return char::from(b'A' + index as u8).to_string();
    }
    let first = char::from(b'A' + (index / 26 - 1) as u8);
    let second = char::from(b'A' + (index % 26) as u8);
    format!("{first}{second}")
}

/// Picture-side connector endpoint: the midpoint of the slot edge that faces
/// the page interior (always the side closest to the map).
///
/// Returned in absolute page pixels.
pub fn anchor_point(picture: &PositionedPicture) -> PixelCoordinate {
    let slot = &picture.slot;
    use crate::types::BorderEdge::*;
    match slot.edge {
        Top => PixelCoordinate::new(slot.x + slot.width / 2.0, slot.y + slot.height),
        Bottom => PixelCoordinate::new(slot.x + slot.width / 2.0, slot.y),
        Left => PixelCoordinate::new(slot.x + slot.width, slot.y + slot.height / 2.0),
        Right => PixelCoordinate::new(slot.x, slot.y + slot.height / 2.0),
    }
}

/// Links grouped by exactly identical coordinates.
///
/// Keys are the formatted `"lat,lon"` pair — textual equality, no distance
/// tolerance. `members` are indices into the resolved-link list.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup {
    pub location: GeoLocation,
    pub members: Vec<usize>,
}

fn group_key(location: &GeoLocation) -> String {
    format!("{},{}", location.lat, location.lon)
}

/// Group resolved links by exact location, preserving first-seen order.
pub fn group_by_location(links: &[ResolvedLink]) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, resolved) in links.iter().enumerate() {
        let key = group_key(&resolved.link.location);
        match index.get(&key) {
            Some(&g) => groups[g].members.push(i),
            None => {
                index.insert(key, groups.len());
                groups.push(LocationGroup {
                    location: resolved.link.location.clone(),
                    members: vec![i],
                });
            }
        }
    }
    groups
}

/// Resolve links against positioned pictures and route their connectors.
///
/// Markers are placed by projecting each location into the map viewport and
/// offsetting by the viewport's page origin, so all output coordinates are
/// absolute page pixels. Unmatched links are dropped silently; locations
/// shared by several links get their connector endpoints spread on a small
/// circle and one informational warning each.
pub fn resolve_links(
    links: &[ImageLocationLink],
    positions: &[PositionedPicture],
    viewport: &MapViewport,
) -> RenderedLinks {
    // Built once per call: resolution stays O(links + positions).
    let by_id: HashMap<&str, &PositionedPicture> = positions
        .iter()
        .map(|p| (p.image.id.as_str(), p))
        .collect();

    let mut resolved = Vec::with_capacity(links.len());
    let mut auto_index = 0usize;

    for link in links {
        let Some(picture) = by_id.get(link.image_id.as_str()) else {
            continue;
        };

        let label = match (&link.label, &picture.label) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(own)) => own.clone(),
            (None, None) => {
                let label = generate_label(auto_index);
                auto_index += 1;
                label
            }
        };

        let in_viewport = projection::geo_to_viewport_pixel(
            &link.location,
            &viewport.center,
            viewport.zoom,
            viewport.width,
            viewport.height,
        );
        let marker = PixelCoordinate::new(
            in_viewport.x + viewport.origin.x,
            in_viewport.y + viewport.origin.y,
        );

        resolved.push(ResolvedLink {
            link: link.clone(),
            anchor: anchor_point(picture),
            marker,
            end: marker,
            label,
        });
    }

    let mut warnings = Vec::new();
    for group in group_by_location(&resolved) {
        let total = group.members.len();
        if total < 2 {
            continue;
        }
        for (i, &member) in group.members.iter().enumerate() {
            let angle = 2.0 * PI * i as f64 / total as f64;
            let marker = resolved[member].marker;
            resolved[member].end = PixelCoordinate::new(
                marker.x + angle.cos() * SPREAD_RADIUS,
                marker.y + angle.sin() * SPREAD_RADIUS,
            );
        }
        let place = match &group.location.name {
            Some(name) => format!("{name} ({}, {})", group.location.lat, group.location.lon),
            None => format!("({}, {})", group.location.lat, group.location.lon),
        };
        warnings.push(format!("{total} pictures share location {place}"));
    }

    RenderedLinks {
        links: resolved,
        warnings,
    }
}

/// Pre-flight check: one diagnostic per link whose `image_id` has no
/// positioned picture. Resolution itself drops such links silently; run this
/// first when the mismatch should be surfaced.
pub fn validate_links(links: &[ImageLocationLink], positions: &[PositionedPicture]) -> Vec<String> {
    let by_id: HashMap<&str, &PositionedPicture> = positions
        .iter()
        .map(|p| (p.image.id.as_str(), p))
        .collect();
    links
        .iter()
        .filter(|link| !by_id.contains_key(link.image_id.as_str()))
        .map(|link| format!("link references unknown picture: {}", link.image_id))
        .collect()
}
