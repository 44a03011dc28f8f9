//! Poster composition.
//!
//! Stage 2 of the mapframe pipeline: turns a [`PhotoManifest`] and a
//! [`PosterConfig`] into complete poster geometry — border layout, fitted
//! pictures, map viewport, and routed connectors. Pure computation over
//! immutable inputs; all millimeter values are converted to pixels here,
//! once, and everything downstream speaks pixels.
//!
//! Zoom and center come from the config when fixed, otherwise they are
//! auto-fitted to the linked locations: center is their centroid, zoom the
//! highest level at which all of them fit the inner map area with 10%
//! padding.

use crate::border::{self, BorderSpec};
use crate::config::PosterConfig;
use crate::fit;
use crate::links;
use crate::projection;
use crate::scan::PhotoManifest;
use crate::types::{
    BorderLayout, GeoLocation, MapViewport, PixelCoordinate, PositionedPicture, RenderedLinks,
};
use crate::units;
use serde::{Deserialize, Serialize};

/// Fractional padding around the location span when auto-fitting zoom.
const ZOOM_FIT_PADDING: f64 = 0.1;

/// Complete poster geometry, serialized as `layout.json` between the layout
/// and render stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poster {
    pub layout: BorderLayout,
    pub pictures: Vec<PositionedPicture>,
    pub viewport: MapViewport,
    pub links: RenderedLinks,
}

/// Compose the full poster geometry.
///
/// Total over its inputs: zero photos produce an empty border, links
/// without pictures are dropped by resolution, and shared locations only
/// add warnings.
pub fn compose(config: &PosterConfig, manifest: &PhotoManifest) -> Poster {
    let (page_w, page_h) = units::page_px(
        config.page.size,
        config.page.orientation,
        config.page.dpi,
    );
    let spec = BorderSpec {
        page_width: f64::from(page_w),
        page_height: f64::from(page_h),
        border_width: f64::from(units::mm_to_px(config.border.width, config.page.dpi)),
        picture_spacing: f64::from(units::mm_to_px(config.border.spacing, config.page.dpi)),
        margin: f64::from(units::mm_to_px(config.border.margin, config.page.dpi)),
    };

    let layout = border::pack(&spec, manifest.images.len(), config.border.packing);
    let pictures = fit::position_pictures(&manifest.images, &layout.slots);

    let locations: Vec<GeoLocation> = manifest
        .links
        .iter()
        .map(|l| l.location.clone())
        .collect();
    let inner = layout.inner_area;
    let center = config
        .map
        .center
        .clone()
        .unwrap_or_else(|| projection::calculate_center(&locations));
    let zoom = config.map.zoom.unwrap_or_else(|| {
        projection::calculate_zoom_to_fit(&locations, inner.width, inner.height, ZOOM_FIT_PADDING)
    });

    let viewport = MapViewport {
        origin: PixelCoordinate::new(inner.x, inner.y),
        width: inner.width,
        height: inner.height,
        center,
        zoom,
    };

    let links = links::resolve_links(&manifest.links, &pictures, &viewport);

    Poster {
        layout,
        pictures,
        viewport,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoLocation, ImageLocationLink, ImageMetadata};

    fn image(id: &str, dims: Option<(u32, u32)>) -> ImageMetadata {
        ImageMetadata {
            id: id.to_string(),
            file_path: format!("photos/{id}.jpg"),
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
            title: None,
            caption: None,
        }
    }

    fn link(id: &str, lat: f64, lon: f64) -> ImageLocationLink {
        ImageLocationLink {
            image_id: id.to_string(),
            location: GeoLocation::new(lat, lon),
            label: None,
        }
    }

    fn manifest() -> PhotoManifest {
        PhotoManifest {
            images: vec![
                image("001-a", Some((800, 600))),
                image("002-b", Some((600, 800))),
                image("003-c", None),
            ],
            links: vec![
                link("001-a", 48.8566, 2.3522),
                link("002-b", 48.8606, 2.3376),
                link("missing", 48.8530, 2.3499),
            ],
        }
    }

    #[test]
    fn compose_places_every_photo() {
        let poster = compose(&PosterConfig::default(), &manifest());
        assert_eq!(poster.layout.slots.len(), 3);
        assert_eq!(poster.pictures.len(), 3);
    }

    #[test]
    fn compose_resolves_only_matched_links() {
        let poster = compose(&PosterConfig::default(), &manifest());
        assert_eq!(poster.links.links.len(), 2);
        assert!(poster.links.warnings.is_empty());
    }

    #[test]
    fn compose_auto_fits_center_to_link_centroid() {
        let poster = compose(&PosterConfig::default(), &manifest());
        let expected_lat = (48.8566 + 48.8606 + 48.8530) / 3.0;
        assert!((poster.viewport.center.lat - expected_lat).abs() < 1e-9);
    }

    #[test]
    fn compose_honors_fixed_center_and_zoom() {
        let mut config = PosterConfig::default();
        config.map.zoom = Some(7);
        config.map.center = Some(GeoLocation::new(10.0, 20.0));
        let poster = compose(&config, &manifest());
        assert_eq!(poster.viewport.zoom, 7);
        assert_eq!(poster.viewport.center.lat, 10.0);
        assert_eq!(poster.viewport.center.lon, 20.0);
    }

    #[test]
    fn compose_viewport_matches_inner_area() {
        let poster = compose(&PosterConfig::default(), &manifest());
        let inner = poster.layout.inner_area;
        assert_eq!(poster.viewport.origin, PixelCoordinate::new(inner.x, inner.y));
        assert_eq!(poster.viewport.width, inner.width);
        assert_eq!(poster.viewport.height, inner.height);
    }

    #[test]
    fn compose_with_no_photos_and_no_links() {
        let empty = PhotoManifest {
            images: vec![],
            links: vec![],
        };
        let poster = compose(&PosterConfig::default(), &empty);
        assert!(poster.layout.slots.is_empty());
        assert!(poster.pictures.is_empty());
        assert!(poster.links.links.is_empty());
        // No locations to fit: the documented fallback zoom
        assert_eq!(poster.viewport.zoom, 10);
    }

    #[test]
    fn compose_collects_shared_location_warnings() {
        let mut m = manifest();
        m.links = vec![link("001-a", 5.0, 5.0), link("002-b", 5.0, 5.0)];
        let poster = compose(&PosterConfig::default(), &m);
        assert_eq!(poster.links.warnings.len(), 1);
        assert!(poster.links.warnings[0].contains("2 pictures"));
    }

    #[test]
    fn poster_survives_a_json_round_trip() {
        let poster = compose(&PosterConfig::default(), &manifest());
        let json = serde_json::to_string(&poster).unwrap();
        let back: Poster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pictures.len(), poster.pictures.len());
        assert_eq!(back.links.links.len(), poster.links.links.len());
        assert_eq!(back.viewport.zoom, poster.viewport.zoom);
    }
}
