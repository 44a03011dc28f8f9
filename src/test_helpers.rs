//! Shared test utilities for the mapframe test suite.
//!
//! Builds a small photo-directory fixture on the fly — real encoded images,
//! sidecar captions, and a link table — so scan and pipeline tests exercise
//! the same shapes users produce.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a real encoded photo of the given dimensions. The extension picks
/// the format.
pub fn write_photo(path: &Path, width: u32, height: u32) {
    let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]));
    pixels.save(path).unwrap();
}

/// Build a photo directory with four pictures, one sidecar caption, and a
/// three-entry link table:
///
/// ```text
/// 001-tokyo-tower.jpg   64x48, caption, linked (named "Tokyo Tower")
/// 002-shibuya.jpg       32x32, linked
/// 010-fuji.png          40x30, linked
/// harbour.jpg           48x64, unnumbered, unlinked
/// ```
pub fn setup_photo_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    write_photo(&dir.join("001-tokyo-tower.jpg"), 64, 48);
    write_photo(&dir.join("002-shibuya.jpg"), 32, 32);
    write_photo(&dir.join("010-fuji.png"), 40, 30);
    write_photo(&dir.join("harbour.jpg"), 48, 64);

    fs::write(
        dir.join("001-tokyo-tower.txt"),
        "Night view from the pier\n",
    )
    .unwrap();

    fs::write(
        dir.join("locations.toml"),
        concat!(
            "[[link]]\n",
            "image = \"001-tokyo-tower\"\n",
            "lat = 35.6586\n",
            "lon = 139.7454\n",
            "name = \"Tokyo Tower\"\n",
            "\n",
            "[[link]]\n",
            "image = \"002-shibuya\"\n",
            "lat = 35.6595\n",
            "lon = 139.7005\n",
            "\n",
            "[[link]]\n",
            "image = \"010-fuji\"\n",
            "lat = 35.3606\n",
            "lon = 138.7274\n",
        ),
    )
    .unwrap();

    tmp
}
