//! Photo discovery and manifest generation.
//!
//! Stage 1 of the mapframe pipeline. Scans the photo directory, probes image
//! dimensions, and loads the photo→location link table, producing a
//! [`PhotoManifest`] the layout stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! photos/                      # Photo directory
//! ├── config.toml              # Poster configuration (optional)
//! ├── locations.toml           # Photo→location link table (optional)
//! ├── 001-tokyo-tower.jpg      # Pictures, ordered by numeric prefix
//! ├── 001-tokyo-tower.txt      # Sidecar caption (optional)
//! ├── 002-shibuya.jpg
//! └── harbour.jpg              # Unnumbered = ordered after numbered ones
//! ```
//!
//! ## Naming Convention
//!
//! Pictures follow the `NNN-name` convention: an optional numeric prefix
//! fixes the border order (clockwise from the top edge), and the name part
//! with dashes converted to spaces becomes the display title. The full file
//! stem is the picture's id — the link table references it.
//!
//! ## Link Table
//!
//! `locations.toml` declares where each photo was taken:
//!
//! ```toml
//! [[link]]
//! image = "001-tokyo-tower"
//! lat = 35.6586
//! lon = 139.7454
//! name = "Tokyo Tower"   # optional, used in warnings and tooltips
//! label = "T"            # optional, overrides the auto letter
//! ```
//!
//! Coordinates are range-checked here, once — downstream geometry assumes
//! validated input.
//!
//! ## Dimension Probing
//!
//! Native dimensions are read headers-only via `image::image_dimensions`,
//! in parallel with rayon. A photo whose header cannot be read keeps
//! `None` dimensions and later falls back to the 4:3 default aspect —
//! probing problems never fail the scan.

use crate::types::{GeoLocation, ImageLocationLink, ImageMetadata};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("TOML parse error in locations.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate picture id {0:?} (same stem, different extension?)")]
    DuplicateId(String),
    #[error("Link for {image:?} has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinate { image: String, lat: f64, lon: f64 },
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoManifest {
    pub images: Vec<ImageMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ImageLocationLink>,
}

/// File extensions recognized as photos, matching the formats the dimension
/// probe can read.
const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tiff", "webp"];

/// Scan a photo directory into a manifest.
pub fn scan(photo_dir: &Path) -> Result<PhotoManifest, ScanError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(photo_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_photo = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| PHOTO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_photo {
            paths.push(path);
        }
    }

    // Numbered photos first in prefix order, then unnumbered alphabetically.
    paths.sort_by_cached_key(|p| {
        let stem = file_stem(p);
        let (number, _) = parse_stem(&stem);
        (number.unwrap_or(u32::MAX), stem)
    });

    let mut seen = HashSet::new();
    for path in &paths {
        if !seen.insert(file_stem(path)) {
            return Err(ScanError::DuplicateId(file_stem(path)));
        }
    }

    let images: Vec<ImageMetadata> = paths
        .par_iter()
        .map(|path| {
            let stem = file_stem(path);
            let (_, title) = parse_stem(&stem);
            let dims = image::image_dimensions(path).ok();
            ImageMetadata {
                id: stem,
                file_path: path.to_string_lossy().into_owned(),
                width: dims.map(|d| d.0),
                height: dims.map(|d| d.1),
                title,
                caption: read_sidecar(path),
            }
        })
        .collect();

    let links = load_link_table(&photo_dir.join("locations.toml"))?;

    Ok(PhotoManifest { images, links })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a file stem following the `NNN-name` convention.
///
/// Returns the numeric prefix (if any) and the display title (name part
/// with dashes converted to spaces, `None` when empty).
///
/// - `"020-tokyo-tower"` → `(Some(20), Some("tokyo tower"))`
/// - `"007"` → `(Some(7), None)`
/// - `"harbour"` → `(None, Some("harbour"))`
pub fn parse_stem(stem: &str) -> (Option<u32>, Option<String>) {
    let (number, name) = match stem.split_once('-') {
        Some((prefix, rest)) if prefix.parse::<u32>().is_ok() => {
            (prefix.parse().ok(), rest)
        }
        _ => match stem.parse::<u32>() {
            Ok(n) => (Some(n), ""),
            Err(_) => (None, stem),
        },
    };
    let title = name.replace('-', " ");
    let title = title.trim().to_string();
    (number, if title.is_empty() { None } else { Some(title) })
}

/// Read a sidecar `.txt` caption for a photo.
///
/// Given `photos/001-tokyo.jpg`, looks for `photos/001-tokyo.txt` and
/// returns its trimmed contents; `None` if absent or empty.
fn read_sidecar(photo_path: &Path) -> Option<String> {
    let sidecar = photo_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// One `[[link]]` entry in `locations.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkEntry {
    image: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkTable {
    #[serde(default, rename = "link")]
    links: Vec<LinkEntry>,
}

/// Load and range-check the link table. A missing file means no links.
fn load_link_table(path: &Path) -> Result<Vec<ImageLocationLink>, ScanError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let table: LinkTable = toml::from_str(&content)?;
    table
        .links
        .into_iter()
        .map(|entry| {
            if !(-90.0..=90.0).contains(&entry.lat) || !(-180.0..=180.0).contains(&entry.lon) {
                return Err(ScanError::InvalidCoordinate {
                    image: entry.image,
                    lat: entry.lat,
                    lon: entry.lon,
                });
            }
            Ok(ImageLocationLink {
                image_id: entry.image,
                location: GeoLocation {
                    lat: entry.lat,
                    lon: entry.lon,
                    name: entry.name,
                },
                label: entry.label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_photo_dir, write_photo};
    use std::fs;

    // =========================================================================
    // parse_stem
    // =========================================================================

    #[test]
    fn stem_numbered_multi_word() {
        assert_eq!(
            parse_stem("020-tokyo-tower"),
            (Some(20), Some("tokyo tower".to_string()))
        );
    }

    #[test]
    fn stem_number_only() {
        assert_eq!(parse_stem("007"), (Some(7), None));
        assert_eq!(parse_stem("007-"), (Some(7), None));
    }

    #[test]
    fn stem_unnumbered() {
        assert_eq!(parse_stem("harbour"), (None, Some("harbour".to_string())));
        assert_eq!(
            parse_stem("old-harbour"),
            (None, Some("old harbour".to_string()))
        );
    }

    // =========================================================================
    // scan
    // =========================================================================

    #[test]
    fn scan_orders_by_prefix_then_name() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        let ids: Vec<&str> = manifest.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["001-tokyo-tower", "002-shibuya", "010-fuji", "harbour"]);
    }

    #[test]
    fn scan_probes_dimensions() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        let tokyo = &manifest.images[0];
        assert_eq!((tokyo.width, tokyo.height), (Some(64), Some(48)));
    }

    #[test]
    fn scan_keeps_unreadable_dimensions_as_none() {
        let dir = setup_photo_dir();
        fs::write(dir.path().join("099-broken.jpg"), b"not a real jpeg").unwrap();
        let manifest = scan(dir.path()).unwrap();
        let broken = manifest
            .images
            .iter()
            .find(|i| i.id == "099-broken")
            .unwrap();
        assert_eq!(broken.width, None);
        assert_eq!(broken.height, None);
    }

    #[test]
    fn scan_reads_sidecar_captions() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        let tokyo = &manifest.images[0];
        assert_eq!(tokyo.caption.as_deref(), Some("Night view from the pier"));
        let shibuya = &manifest.images[1];
        assert_eq!(shibuya.caption, None);
    }

    #[test]
    fn scan_derives_titles_from_stems() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        assert_eq!(manifest.images[0].title.as_deref(), Some("tokyo tower"));
        assert_eq!(manifest.images[3].title.as_deref(), Some("harbour"));
    }

    #[test]
    fn scan_ignores_non_photo_files() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        assert!(manifest.images.iter().all(|i| i.id != "locations"));
        assert!(manifest.images.iter().all(|i| i.id != "config"));
    }

    #[test]
    fn scan_rejects_duplicate_stems() {
        let dir = setup_photo_dir();
        write_photo(&dir.path().join("001-tokyo-tower.png"), 10, 10);
        let err = scan(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::DuplicateId(id) if id == "001-tokyo-tower"));
    }

    #[test]
    fn scan_empty_directory_is_valid() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = scan(dir.path()).unwrap();
        assert!(manifest.images.is_empty());
        assert!(manifest.links.is_empty());
    }

    // =========================================================================
    // link table
    // =========================================================================

    #[test]
    fn scan_loads_link_table() {
        let dir = setup_photo_dir();
        let manifest = scan(dir.path()).unwrap();
        assert_eq!(manifest.links.len(), 3);
        let first = &manifest.links[0];
        assert_eq!(first.image_id, "001-tokyo-tower");
        assert_eq!(first.location.name.as_deref(), Some("Tokyo Tower"));
        assert_eq!(first.label, None);
    }

    #[test]
    fn missing_link_table_means_no_links() {
        let dir = setup_photo_dir();
        fs::remove_file(dir.path().join("locations.toml")).unwrap();
        let manifest = scan(dir.path()).unwrap();
        assert!(manifest.links.is_empty());
    }

    #[test]
    fn out_of_range_coordinates_fail_the_scan() {
        let dir = setup_photo_dir();
        fs::write(
            dir.path().join("locations.toml"),
            "[[link]]\nimage = \"001-tokyo-tower\"\nlat = 95.0\nlon = 0.0\n",
        )
        .unwrap();
        let err = scan(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidCoordinate { .. }));
    }

    #[test]
    fn unknown_link_keys_are_rejected() {
        let dir = setup_photo_dir();
        fs::write(
            dir.path().join("locations.toml"),
            "[[link]]\nimage = \"x\"\nlat = 1.0\nlon = 2.0\nlongitude = 3.0\n",
        )
        .unwrap();
        assert!(matches!(scan(dir.path()), Err(ScanError::Toml(_))));
    }
}
