//! Web-Mercator projection math.
//!
//! All functions here are pure and testable without any I/O. The projection
//! maps latitude/longitude onto a square world of `2^zoom * 256` pixels, the
//! same tiling scheme common online map providers use: longitude maps
//! linearly, latitude through the Mercator transform
//! `y = ln(tan(π/4 + lat/2))`, normalized so latitude 0 sits at the vertical
//! midpoint of the world.
//!
//! ## Known limitations
//!
//! - Near ±90° latitude the Mercator transform diverges and produces huge or
//!   non-finite y values. Accepted; poster subjects at the poles are on
//!   their own.
//! - [`calculate_center`] is the plain arithmetic mean of coordinates and
//!   averages location sets spanning the ±180° antimeridian into the wrong
//!   hemisphere. This matches the original layout contract and stays as is.

use crate::types::{BoundingBox, GeoLocation, PixelCoordinate};
use std::f64::consts::PI;

/// Side length of one map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Zoom used when there are no locations to fit.
pub const FALLBACK_ZOOM: u8 = 10;
/// Close-up zoom used when there is exactly one location.
pub const SINGLE_LOCATION_ZOOM: u8 = 15;
/// Inclusive zoom range accepted by the tiling scheme.
pub const MAX_ZOOM: u8 = 20;

/// Total world size in pixels at a zoom level.
fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << u32::from(zoom.min(MAX_ZOOM)))
}

/// Project a location into world pixels at `zoom`.
///
/// The frame is the full `2^zoom * 256` world: x grows east, y grows south,
/// `(0, 0)` is the north-west corner.
pub fn geo_to_pixel(location: &GeoLocation, zoom: u8) -> PixelCoordinate {
    let world = world_size(zoom);
    let x = (location.lon + 180.0) / 360.0 * world;
    let lat_rad = location.lat.to_radians();
    let merc = (PI / 4.0 + lat_rad / 2.0).tan().ln();
    let y = (0.5 - merc / (2.0 * PI)) * world;
    PixelCoordinate::new(x, y)
}

/// Exact inverse of [`geo_to_pixel`].
///
/// Round-trips within floating-point tolerance for any legal latitude away
/// from the poles.
pub fn pixel_to_geo(pixel: PixelCoordinate, zoom: u8) -> GeoLocation {
    let world = world_size(zoom);
    let lon = pixel.x / world * 360.0 - 180.0;
    let merc = (0.5 - pixel.y / world) * 2.0 * PI;
    let lat = (2.0 * merc.exp().atan() - PI / 2.0).to_degrees();
    GeoLocation::new(lat, lon)
}

/// Geographic bounds visible in a `width`×`height` pixel viewport centered
/// on `center` at `zoom`.
pub fn calculate_bounds(center: &GeoLocation, zoom: u8, width: f64, height: f64) -> BoundingBox {
    let c = geo_to_pixel(center, zoom);
    let north_west = pixel_to_geo(
        PixelCoordinate::new(c.x - width / 2.0, c.y - height / 2.0),
        zoom,
    );
    let south_east = pixel_to_geo(
        PixelCoordinate::new(c.x + width / 2.0, c.y + height / 2.0),
        zoom,
    );
    BoundingBox {
        north: north_west.lat,
        south: south_east.lat,
        east: south_east.lon,
        west: north_west.lon,
    }
}

/// Pixel position of `location` relative to a viewport of the given size
/// centered on `center`.
///
/// The frame is viewport-relative: the viewport center is at
/// `(width / 2, height / 2)`. Callers embedding the viewport in a page must
/// add the viewport's page offset themselves.
pub fn geo_to_viewport_pixel(
    location: &GeoLocation,
    center: &GeoLocation,
    zoom: u8,
    width: f64,
    height: f64,
) -> PixelCoordinate {
    let p = geo_to_pixel(location, zoom);
    let c = geo_to_pixel(center, zoom);
    PixelCoordinate::new(p.x - c.x + width / 2.0, p.y - c.y + height / 2.0)
}

/// Pick the highest zoom at which all `locations` fit a `width`×`height`
/// viewport, with `padding` as a fractional margin around the span
/// (0.1 = 10%).
///
/// Zero locations fall back to [`FALLBACK_ZOOM`], a single location to
/// [`SINGLE_LOCATION_ZOOM`]. With two or more, each axis yields a candidate
/// zoom from the padded degree span, and the floor of the smaller candidate
/// wins so both axes fit. The result is clamped to `[0, MAX_ZOOM]`; a zero
/// span (all locations coincident) clamps to [`MAX_ZOOM`].
pub fn calculate_zoom_to_fit(
    locations: &[GeoLocation],
    width: f64,
    height: f64,
    padding: f64,
) -> u8 {
    match locations.len() {
        0 => return FALLBACK_ZOOM,
        1 => return SINGLE_LOCATION_ZOOM,
        _ => {}
    }

    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for loc in locations {
        min_lat = min_lat.min(loc.lat);
        max_lat = max_lat.max(loc.lat);
        min_lon = min_lon.min(loc.lon);
        max_lon = max_lon.max(loc.lon);
    }

    let lat_span = (max_lat - min_lat) * (1.0 + padding);
    let lon_span = (max_lon - min_lon) * (1.0 + padding);

    // At zoom z one degree is 2^z * 256 / degrees-per-axis pixels, so the
    // axis fits when 2^z <= viewport * degrees-per-axis / (span * 256).
    let zoom_for_lon = (width * 360.0 / (lon_span * TILE_SIZE)).log2();
    let zoom_for_lat = (height * 180.0 / (lat_span * TILE_SIZE)).log2();

    let candidate = zoom_for_lon.min(zoom_for_lat).floor();
    if candidate.is_nan() {
        return 0;
    }
    candidate.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

/// Coordinate-wise arithmetic mean of the locations; `(0, 0)` when empty.
///
/// Not antimeridian-safe — see the module docs.
pub fn calculate_center(locations: &[GeoLocation]) -> GeoLocation {
    if locations.is_empty() {
        return GeoLocation::new(0.0, 0.0);
    }
    let n = locations.len() as f64;
    let lat = locations.iter().map(|l| l.lat).sum::<f64>() / n;
    let lon = locations.iter().map(|l| l.lon).sum::<f64>() / n;
    GeoLocation::new(lat, lon)
}
