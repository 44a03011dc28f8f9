//! SVG poster rendering.
//!
//! Stage 3 of the mapframe pipeline. Takes the composed [`Poster`] geometry
//! and serializes it into a single SVG document: page background, border
//! band, the photos in their slots, a procedural map surface (graticule
//! lines derived from the projection bounds — no tiles are fetched),
//! markers, connector lines, label badges, and the optional scale bar and
//! attribution line.
//!
//! ## Markup Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time markup. Templates
//! are type-safe Rust code with automatic escaping; geometry arrives
//! pre-computed and this module only formats it.

use crate::config::PosterConfig;
use crate::layout::Poster;
use crate::projection;
use crate::types::{LinkStyle, MarkerShape, PixelCoordinate};
use maud::{Markup, html};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Graticule steps in degrees, coarse to fine. The renderer picks the first
/// one that yields at least three lines across the narrower span.
const GRATICULE_STEPS: [f64; 13] = [
    45.0, 30.0, 20.0, 15.0, 10.0, 5.0, 2.0, 1.0, 0.5, 0.25, 0.1, 0.05, 0.01,
];

/// Meters per pixel at the equator for zoom 0 with 256px tiles.
const EQUATOR_METERS_PER_PIXEL: f64 = 156_543.033_92;

/// Render the poster to an SVG string.
pub fn render_svg(poster: &Poster, config: &PosterConfig) -> String {
    let w = poster.layout.page_width;
    let h = poster.layout.page_height;
    let colors = &config.colors;

    let markup: Markup = html! {
        svg xmlns="http://www.w3.org/2000/svg"
            width=(w) height=(h)
            viewBox=(format!("0 0 {w} {h}")) {
            rect x="0" y="0" width=(w) height=(h) fill=(colors.background) {}
            (border_band(poster, config))
            (map_surface(poster, config))
            (pictures(poster))
            (connectors(poster, config))
            (markers(poster, config))
            (labels(poster, config))
            @if config.map.show_scale { (scale_bar(poster, config)) }
            @if config.map.show_attribution { (attribution(poster, config)) }
        }
    };
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", markup.into_string())
}

/// Render the poster into a file.
pub fn render_to_file(path: &Path, poster: &Poster, config: &PosterConfig) -> Result<(), RenderError> {
    std::fs::write(path, render_svg(poster, config))?;
    Ok(())
}

/// The four border-band rectangles between margin and inner area.
fn border_band(poster: &Poster, config: &PosterConfig) -> Markup {
    let l = &poster.layout;
    let fill = config.colors.border.as_str();
    let band_w = l.page_width - 2.0 * l.margin;
    let band_h = l.page_height - 2.0 * l.margin;
    html! {
        g class="border-band" {
            rect x=(l.margin) y=(l.margin) width=(band_w) height=(l.border_width) fill=(fill) {}
            rect x=(l.margin) y=(l.page_height - l.margin - l.border_width) width=(band_w) height=(l.border_width) fill=(fill) {}
            rect x=(l.margin) y=(l.margin) width=(l.border_width) height=(band_h) fill=(fill) {}
            rect x=(l.page_width - l.margin - l.border_width) y=(l.margin) width=(l.border_width) height=(band_h) fill=(fill) {}
        }
    }
}

/// Procedural map decoration: a frame plus graticule lines at nice degree
/// steps, positioned with the real projection so they line up with the
/// markers.
fn map_surface(poster: &Poster, config: &PosterConfig) -> Markup {
    let vp = &poster.viewport;
    let bounds = projection::calculate_bounds(&vp.center, vp.zoom, vp.width, vp.height);
    let connector = config.colors.connector.as_str();

    let lat_span = bounds.north - bounds.south;
    let lon_span = bounds.east - bounds.west;
    let narrow = lat_span.min(lon_span);
    let step = GRATICULE_STEPS
        .iter()
        .copied()
        .find(|s| narrow / s >= 3.0)
        .unwrap_or(0.01);

    let lat_lines = grid_values(bounds.south, bounds.north, step);
    let lon_lines = grid_values(bounds.west, bounds.east, step);

    html! {
        g class="map" {
            rect x=(vp.origin.x) y=(vp.origin.y) width=(vp.width) height=(vp.height)
                fill="none" stroke=(connector) stroke-width="1" {}
            g class="graticule" stroke=(connector) stroke-width="0.5" opacity="0.25" {
                @for lat in &lat_lines {
                    @let p = page_pixel(poster, *lat, vp.center.lon);
                    line x1=(vp.origin.x) y1=(p.y) x2=(vp.origin.x + vp.width) y2=(p.y) {}
                }
                @for lon in &lon_lines {
                    @let p = page_pixel(poster, vp.center.lat, *lon);
                    line x1=(p.x) y1=(vp.origin.y) x2=(p.x) y2=(vp.origin.y + vp.height) {}
                }
            }
        }
    }
}

/// Multiples of `step` inside `[low, high]`.
fn grid_values(low: f64, high: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut v = (low / step).ceil() * step;
    while v <= high {
        values.push(v);
        v += step;
    }
    values
}

/// Project a location into absolute page pixels through the poster viewport.
fn page_pixel(poster: &Poster, lat: f64, lon: f64) -> PixelCoordinate {
    let vp = &poster.viewport;
    let p = projection::geo_to_viewport_pixel(
        &crate::types::GeoLocation::new(lat, lon),
        &vp.center,
        vp.zoom,
        vp.width,
        vp.height,
    );
    PixelCoordinate::new(p.x + vp.origin.x, p.y + vp.origin.y)
}

fn pictures(poster: &Poster) -> Markup {
    html! {
        g class="pictures" {
            @for p in &poster.pictures {
                image class="picture"
                    x=(p.slot.x + p.offset_x) y=(p.slot.y + p.offset_y)
                    width=(p.render_width) height=(p.render_height)
                    href=(p.image.file_path)
                    preserveAspectRatio="xMidYMid meet" {}
            }
        }
    }
}

fn connectors(poster: &Poster, config: &PosterConfig) -> Markup {
    let stroke = config.colors.connector.as_str();
    let dash = match config.map.link_style {
        LinkStyle::Solid => None,
        LinkStyle::Dashed => Some("8,6"),
        LinkStyle::Dotted => Some("2,4"),
    };
    html! {
        g class="connectors" stroke=(stroke) stroke-width="1.5" fill="none" {
            @for link in &poster.links.links {
                line class="connector"
                    x1=(link.anchor.x) y1=(link.anchor.y)
                    x2=(link.end.x) y2=(link.end.y)
                    stroke-dasharray=[dash] {}
            }
        }
    }
}

fn markers(poster: &Poster, config: &PosterConfig) -> Markup {
    let fill = config.colors.marker.as_str();
    let r = 6.0;
    html! {
        g class="markers" fill=(fill) {
            @for link in &poster.links.links {
                @let m = link.marker;
                @match config.map.marker {
                    MarkerShape::Circle => {
                        circle class="marker" cx=(m.x) cy=(m.y) r=(r) {}
                    }
                    MarkerShape::Square => {
                        rect class="marker" x=(m.x - r) y=(m.y - r) width=(2.0 * r) height=(2.0 * r) {}
                    }
                    MarkerShape::Pin => {
                        path class="marker"
                            d=(format!(
                                "M {} {} C {} {} {} {} {} {} C {} {} {} {} {} {} Z",
                                m.x, m.y,
                                m.x - 1.8 * r, m.y - 1.4 * r,
                                m.x - r, m.y - 2.6 * r,
                                m.x, m.y - 2.6 * r,
                                m.x + r, m.y - 2.6 * r,
                                m.x + 1.8 * r, m.y - 1.4 * r,
                                m.x, m.y
                            )) {}
                    }
                }
            }
        }
    }
}

fn labels(poster: &Poster, config: &PosterConfig) -> Markup {
    let badge = config.colors.label_background.as_str();
    let text_fill = config.colors.label_text.as_str();
    // Badge size tracks the border thickness so labels stay legible at
    // print resolutions.
    let r = (poster.layout.border_width * 0.06).clamp(8.0, 22.0);
    html! {
        g class="labels" {
            @for link in &poster.links.links {
                @let a = link.anchor;
                circle cx=(a.x) cy=(a.y) r=(r) fill=(badge) {}
                text class="label"
                    x=(a.x) y=(a.y)
                    fill=(text_fill)
                    font-family="Helvetica, Arial, sans-serif"
                    font-size=(r * 1.1)
                    text-anchor="middle" dominant-baseline="central" {
                    (link.label)
                }
            }
        }
    }
}

/// A scale bar sized to a round distance near one fifth of the map width.
fn scale_bar(poster: &Poster, config: &PosterConfig) -> Markup {
    let vp = &poster.viewport;
    let meters_per_px = EQUATOR_METERS_PER_PIXEL * vp.center.lat.to_radians().cos()
        / f64::from(1u32 << u32::from(vp.zoom));
    let target_m = meters_per_px * vp.width / 5.0;
    let nice_m = nice_distance(target_m);
    let bar_px = nice_m / meters_per_px;

    let x = vp.origin.x + 20.0;
    let y = vp.origin.y + vp.height - 20.0;
    let label = if nice_m >= 1000.0 {
        format!("{} km", nice_m / 1000.0)
    } else {
        format!("{nice_m} m")
    };
    let stroke = config.colors.connector.as_str();
    html! {
        g class="scale-bar" stroke=(stroke) {
            line x1=(x) y1=(y) x2=(x + bar_px) y2=(y) stroke-width="2" {}
            line x1=(x) y1=(y - 5.0) x2=(x) y2=(y + 5.0) stroke-width="2" {}
            line x1=(x + bar_px) y1=(y - 5.0) x2=(x + bar_px) y2=(y + 5.0) stroke-width="2" {}
            text x=(x + bar_px / 2.0) y=(y - 8.0)
                fill=(stroke) stroke="none"
                font-family="Helvetica, Arial, sans-serif" font-size="12"
                text-anchor="middle" {
                (label)
            }
        }
    }
}

/// Round a distance down to the nearest 1/2/5 × 10^k meters.
fn nice_distance(meters: f64) -> f64 {
    if meters <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(meters.log10().floor());
    let normalized = meters / magnitude;
    let nice = if normalized >= 5.0 {
        5.0
    } else if normalized >= 2.0 {
        2.0
    } else {
        1.0
    };
    nice * magnitude
}

fn attribution(poster: &Poster, config: &PosterConfig) -> Markup {
    let vp = &poster.viewport;
    html! {
        text class="attribution"
            x=(vp.origin.x + vp.width - 8.0) y=(vp.origin.y + vp.height - 8.0)
            fill=(config.colors.connector)
            font-family="Helvetica, Arial, sans-serif" font-size="10"
            text-anchor="end" {
            (config.map.provider.attribution())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compose;
    use crate::scan::PhotoManifest;
    use crate::types::{GeoLocation, ImageLocationLink, ImageMetadata};

    fn fixture() -> (Poster, PosterConfig) {
        let manifest = PhotoManifest {
            images: vec![
                ImageMetadata {
                    id: "001-a".into(),
                    file_path: "photos/001-a.jpg".into(),
                    width: Some(800),
                    height: Some(600),
                    title: None,
                    caption: None,
                },
                ImageMetadata {
                    id: "002-b".into(),
                    file_path: "photos/002-b.jpg".into(),
                    width: Some(600),
                    height: Some(800),
                    title: None,
                    caption: None,
                },
            ],
            links: vec![
                ImageLocationLink {
                    image_id: "001-a".into(),
                    location: GeoLocation::new(48.8566, 2.3522),
                    label: None,
                },
                ImageLocationLink {
                    image_id: "002-b".into(),
                    location: GeoLocation::new(48.8606, 2.3376),
                    label: None,
                },
            ],
        };
        let config = PosterConfig::default();
        (compose(&config, &manifest), config)
    }

    #[test]
    fn svg_document_has_page_dimensions() {
        let (poster, config) = fixture();
        let svg = render_svg(&poster, &config);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("viewBox=\"0 0 2480 3508\""));
    }

    #[test]
    fn svg_embeds_every_picture() {
        let (poster, config) = fixture();
        let svg = render_svg(&poster, &config);
        assert_eq!(svg.matches("class=\"picture\"").count(), 2);
        assert!(svg.contains("photos/001-a.jpg"));
        assert!(svg.contains("photos/002-b.jpg"));
    }

    #[test]
    fn svg_draws_connector_and_marker_per_resolved_link() {
        let (poster, config) = fixture();
        let svg = render_svg(&poster, &config);
        assert_eq!(svg.matches("class=\"connector\"").count(), 2);
        assert_eq!(svg.matches("class=\"marker\"").count(), 2);
        assert_eq!(svg.matches("class=\"label\"").count(), 2);
    }

    #[test]
    fn svg_contains_auto_labels() {
        let (poster, config) = fixture();
        let svg = render_svg(&poster, &config);
        assert!(svg.contains(">A</text>"));
        assert!(svg.contains(">B</text>"));
    }

    #[test]
    fn marker_shape_follows_config() {
        let (poster, mut config) = fixture();
        config.map.marker = crate::types::MarkerShape::Square;
        let svg = render_svg(&poster, &config);
        assert!(svg.contains("<rect class=\"marker\""));
        assert!(!svg.contains("<circle class=\"marker\""));
    }

    #[test]
    fn dashed_link_style_sets_dasharray() {
        let (poster, mut config) = fixture();
        config.map.link_style = crate::types::LinkStyle::Dashed;
        let svg = render_svg(&poster, &config);
        assert!(svg.contains("stroke-dasharray=\"8,6\""));

        config.map.link_style = crate::types::LinkStyle::Solid;
        let svg = render_svg(&poster, &config);
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn scale_and_attribution_follow_flags() {
        let (poster, mut config) = fixture();
        let svg = render_svg(&poster, &config);
        assert!(svg.contains("class=\"scale-bar\""));
        assert!(svg.contains("OpenStreetMap contributors"));

        config.map.show_scale = false;
        config.map.show_attribution = false;
        let svg = render_svg(&poster, &config);
        assert!(!svg.contains("class=\"scale-bar\""));
        assert!(!svg.contains("OpenStreetMap contributors"));
    }

    #[test]
    fn graticule_lines_are_drawn() {
        let (poster, config) = fixture();
        let svg = render_svg(&poster, &config);
        assert!(svg.contains("class=\"graticule\""));
        assert!(svg.matches("<line").count() > 3);
    }

    #[test]
    fn nice_distances_round_to_one_two_five() {
        assert_eq!(nice_distance(1.0), 1.0);
        assert_eq!(nice_distance(3.7), 2.0);
        assert_eq!(nice_distance(8.2), 5.0);
        assert_eq!(nice_distance(730.0), 500.0);
        assert_eq!(nice_distance(1800.0), 1000.0);
        assert_eq!(nice_distance(0.0), 1.0);
    }
}
