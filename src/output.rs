//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric: the primary display for every entity is
//! its semantic identity — title, label, position — with file paths shown
//! as secondary context on indented `Source:` lines.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! Photos
//! 001 tokyo tower (64x48)
//!     Source: 001-tokyo-tower.jpg
//!     Caption: Night view from the pier
//!
//! Links
//! 001 001-tokyo-tower → 35.6586, 139.7454 (Tokyo Tower)
//! ```

use crate::layout::Poster;
use crate::scan::PhotoManifest;
use crate::types::BorderEdge;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Filename relative to the photo directory, falling back to the full path.
fn source_name<'a>(file_path: &'a str, photo_dir: &Path) -> &'a str {
    Path::new(file_path)
        .strip_prefix(photo_dir)
        .ok()
        .and_then(|p| p.to_str())
        .unwrap_or(file_path)
}

// ============================================================================
// Scan stage
// ============================================================================

pub fn format_scan_output(manifest: &PhotoManifest, photo_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Photos".to_string());
    for (i, image) in manifest.images.iter().enumerate() {
        let dims = match (image.width, image.height) {
            (Some(w), Some(h)) => format!(" ({w}x{h})"),
            _ => " (dimensions unknown)".to_string(),
        };
        let title = image.title.as_deref().unwrap_or(&image.id);
        lines.push(format!("{} {title}{dims}", format_index(i + 1)));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            source_name(&image.file_path, photo_dir)
        ));
        if let Some(caption) = &image.caption {
            lines.push(format!("{}Caption: {caption}", indent(1)));
        }
    }

    if !manifest.links.is_empty() {
        lines.push(String::new());
        lines.push("Links".to_string());
        for (i, link) in manifest.links.iter().enumerate() {
            let place = match &link.location.name {
                Some(name) => format!(
                    "{}, {} ({name})",
                    link.location.lat, link.location.lon
                ),
                None => format!("{}, {}", link.location.lat, link.location.lon),
            };
            lines.push(format!(
                "{} {} → {place}",
                format_index(i + 1),
                link.image_id
            ));
        }
    }

    lines
}

pub fn print_scan_output(manifest: &PhotoManifest, photo_dir: &Path) {
    for line in format_scan_output(manifest, photo_dir) {
        println!("{line}");
    }
}

// ============================================================================
// Layout stage
// ============================================================================

pub fn format_layout_output(poster: &Poster) -> Vec<String> {
    let mut lines = Vec::new();
    let layout = &poster.layout;

    lines.push(format!(
        "Page {}x{} px, border {} px",
        layout.page_width, layout.page_height, layout.border_width
    ));

    lines.push("Border".to_string());
    for edge in BorderEdge::CLOCKWISE {
        let on_edge: Vec<_> = layout.slots.iter().filter(|s| s.edge == edge).collect();
        let name = match edge {
            BorderEdge::Top => "top",
            BorderEdge::Right => "right",
            BorderEdge::Bottom => "bottom",
            BorderEdge::Left => "left",
        };
        match on_edge.first() {
            Some(first) => lines.push(format!(
                "{}{name}: {} slots ({}x{})",
                indent(1),
                on_edge.len(),
                first.width,
                first.height
            )),
            None => lines.push(format!("{}{name}: empty", indent(1))),
        }
    }

    lines.push("Map".to_string());
    lines.push(format!(
        "{}center {}, {}  zoom {}",
        indent(1),
        poster.viewport.center.lat,
        poster.viewport.center.lon,
        poster.viewport.zoom
    ));

    if !poster.links.links.is_empty() {
        lines.push("Connectors".to_string());
        for link in &poster.links.links {
            lines.push(format!(
                "{}{} → {} ({}, {})",
                indent(1),
                link.label,
                link.link.image_id,
                link.link.location.lat,
                link.link.location.lon
            ));
        }
    }

    for warning in &poster.links.warnings {
        lines.push(format!("Warning: {warning}"));
    }

    lines
}

pub fn print_layout_output(poster: &Poster) {
    for line in format_layout_output(poster) {
        println!("{line}");
    }
}

// ============================================================================
// Check (pre-flight validation)
// ============================================================================

pub fn format_check_output(diagnostics: &[String]) -> Vec<String> {
    if diagnostics.is_empty() {
        return vec!["All links match a photo".to_string()];
    }
    let mut lines = vec![format!("{} problem(s) found", diagnostics.len())];
    for diagnostic in diagnostics {
        lines.push(format!("{}{diagnostic}", indent(1)));
    }
    lines
}

pub fn print_check_output(diagnostics: &[String]) {
    for line in format_check_output(diagnostics) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PosterConfig;
    use crate::layout::compose;
    use crate::types::{GeoLocation, ImageLocationLink, ImageMetadata};

    fn manifest() -> PhotoManifest {
        PhotoManifest {
            images: vec![
                ImageMetadata {
                    id: "001-dawn".into(),
                    file_path: "photos/001-dawn.jpg".into(),
                    width: Some(640),
                    height: Some(480),
                    title: Some("dawn".into()),
                    caption: Some("First light".into()),
                },
                ImageMetadata {
                    id: "002-dusk".into(),
                    file_path: "photos/002-dusk.jpg".into(),
                    width: None,
                    height: None,
                    title: Some("dusk".into()),
                    caption: None,
                },
            ],
            links: vec![ImageLocationLink {
                image_id: "001-dawn".into(),
                location: GeoLocation {
                    lat: 45.0,
                    lon: 7.0,
                    name: Some("Alps".into()),
                },
                label: None,
            }],
        }
    }

    #[test]
    fn scan_output_lists_photos_with_dimensions_and_captions() {
        let lines = format_scan_output(&manifest(), Path::new("photos"));
        assert_eq!(lines[0], "Photos");
        assert_eq!(lines[1], "001 dawn (640x480)");
        assert_eq!(lines[2], "    Source: 001-dawn.jpg");
        assert_eq!(lines[3], "    Caption: First light");
        assert!(lines.contains(&"002 dusk (dimensions unknown)".to_string()));
    }

    #[test]
    fn scan_output_lists_links_with_place_names() {
        let lines = format_scan_output(&manifest(), Path::new("photos"));
        assert!(lines.contains(&"Links".to_string()));
        assert!(lines.contains(&"001 001-dawn → 45, 7 (Alps)".to_string()));
    }

    #[test]
    fn layout_output_summarizes_edges_and_connectors() {
        let poster = compose(&PosterConfig::default(), &manifest());
        let lines = format_layout_output(&poster);
        assert!(lines[0].starts_with("Page 2480x3508 px"));
        assert!(lines.iter().any(|l| l.contains("top: 1 slots")));
        assert!(lines.iter().any(|l| l.contains("left: empty")));
        assert!(lines.iter().any(|l| l.contains("A → 001-dawn")));
    }

    #[test]
    fn check_output_reports_problems_or_all_clear() {
        assert_eq!(format_check_output(&[]), vec!["All links match a photo"]);
        let lines = format_check_output(&["link references unknown picture: x".to_string()]);
        assert_eq!(lines[0], "1 problem(s) found");
        assert!(lines[1].contains("unknown picture"));
    }
}
