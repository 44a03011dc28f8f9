//! Poster configuration.
//!
//! Handles loading and validating `config.toml`. The file lives in the photo
//! directory next to the images and the link table; every option has a stock
//! default, so the file itself is optional and sparse — override just the
//! values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [page]
//! size = "a4"              # a3 | a4 | a5 | letter | legal
//! # size = { custom = { width = 300.0, height = 400.0 } }   # millimeters
//! orientation = "portrait" # portrait | landscape
//! dpi = 300
//!
//! [border]
//! width = 30.0             # picture band thickness (mm)
//! spacing = 4.0            # gap between pictures and at edge ends (mm)
//! margin = 8.0             # blank page margin outside the band (mm)
//! packing = "exact"        # exact | adaptive
//!
//! [map]
//! provider = "openstreetmap"  # openstreetmap | cartolight | opentopo
//! # zoom = 12              # omit to auto-fit the linked locations
//! # center = { lat = 48.8566, lon = 2.3522 }  # omit to use their centroid
//! show_scale = true
//! show_attribution = true
//! marker = "circle"        # circle | square | pin
//! link_style = "solid"     # solid | dashed | dotted
//!
//! [colors]
//! background = "#ffffff"
//! border = "#f4f1ea"
//! connector = "#44484d"
//! marker = "#c0392b"
//! label_text = "#ffffff"
//! label_background = "#2c3e50"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Validation happens here,
//! once, before any geometry runs — the layout core assumes pre-validated
//! numbers and never re-checks ranges.

use crate::border::PackingStrategy;
use crate::color::{Color, ColorError};
use crate::types::{GeoLocation, LinkStyle, MarkerShape};
use crate::units::{DEFAULT_DPI, Orientation, PageSize};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

impl From<ColorError> for ConfigError {
    fn from(e: ColorError) -> Self {
        ConfigError::Validation(e.to_string())
    }
}

/// Poster configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterConfig {
    /// Paper size, orientation and print resolution.
    pub page: PageConfig,
    /// Picture band geometry and packing strategy.
    pub border: BorderConfig,
    /// Map style, zoom/center overrides and decoration flags.
    pub map: MapConfig,
    /// Colors for every drawn element.
    pub colors: ColorsConfig,
}

impl PosterConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(72..=1200).contains(&self.page.dpi) {
            return Err(ConfigError::Validation("page.dpi must be 72-1200".into()));
        }
        if let PageSize::Custom { width, height } = self.page.size {
            if width <= 0.0 || height <= 0.0 {
                return Err(ConfigError::Validation(
                    "custom page dimensions must be positive".into(),
                ));
            }
        }
        if self.border.width <= 0.0 {
            return Err(ConfigError::Validation("border.width must be positive".into()));
        }
        if self.border.spacing < 0.0 || self.border.margin < 0.0 {
            return Err(ConfigError::Validation(
                "border.spacing and border.margin must not be negative".into(),
            ));
        }
        if let Some(zoom) = self.map.zoom {
            if zoom > 20 {
                return Err(ConfigError::Validation("map.zoom must be 0-20".into()));
            }
        }
        if let Some(center) = &self.map.center {
            if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lon) {
                return Err(ConfigError::Validation(
                    "map.center must be within lat [-90,90], lon [-180,180]".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Paper size, orientation and print resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub size: PageSize,
    pub orientation: Orientation,
    /// Print resolution used for every mm→px conversion.
    pub dpi: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::default(),
            orientation: Orientation::default(),
            dpi: DEFAULT_DPI,
        }
    }
}

/// Picture band geometry, all in millimeters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    /// Band thickness on every edge.
    pub width: f64,
    /// Gap between adjacent pictures and at both ends of each edge run.
    pub spacing: f64,
    /// Blank page margin outside the band.
    pub margin: f64,
    pub packing: PackingStrategy,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            spacing: 4.0,
            margin: 8.0,
            packing: PackingStrategy::default(),
        }
    }
}

/// Tile-style provider tag. Only decoration and the attribution line depend
/// on it — no tiles are ever fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    #[default]
    OpenStreetMap,
    CartoLight,
    OpenTopo,
}

impl MapProvider {
    /// Attribution line drawn when `show_attribution` is on.
    pub fn attribution(self) -> &'static str {
        match self {
            MapProvider::OpenStreetMap => "© OpenStreetMap contributors",
            MapProvider::CartoLight => "© CARTO, © OpenStreetMap contributors",
            MapProvider::OpenTopo => "© OpenTopoMap (CC-BY-SA)",
        }
    }
}

/// Map style and view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub provider: MapProvider,
    /// Fixed zoom level. When absent the zoom is auto-fitted to the linked
    /// locations.
    pub zoom: Option<u8>,
    /// Fixed map center. When absent the centroid of the linked locations
    /// is used.
    pub center: Option<GeoLocation>,
    pub show_scale: bool,
    pub show_attribution: bool,
    pub marker: MarkerShape,
    pub link_style: LinkStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            provider: MapProvider::default(),
            zoom: None,
            center: None,
            show_scale: true,
            show_attribution: true,
            marker: MarkerShape::Circle,
            link_style: LinkStyle::Solid,
        }
    }
}

/// Colors for every drawn element. Parsed through [`Color`], so invalid
/// values fail at load time, not at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub background: Color,
    pub border: Color,
    pub connector: Color,
    pub marker: Color,
    pub label_text: Color,
    pub label_background: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        // The stock palette is valid by construction; parse failures here
        // would be a bug in the defaults themselves.
        Self {
            background: "#ffffff".parse().unwrap(),
            border: "#f4f1ea".parse().unwrap(),
            connector: "#44484d".parse().unwrap(),
            marker: "#c0392b".parse().unwrap(),
            label_text: "#ffffff".parse().unwrap(),
            label_background: "#2c3e50".parse().unwrap(),
        }
    }
}

/// Load and validate a `config.toml`.
pub fn load(path: &Path) -> Result<PosterConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: PosterConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the photo directory, or fall back to the stock
/// defaults when no file exists.
pub fn load_or_default(photo_dir: &Path) -> Result<PosterConfig, ConfigError> {
    let path = photo_dir.join("config.toml");
    if path.exists() {
        load(&path)
    } else {
        Ok(PosterConfig::default())
    }
}

/// A fully documented stock `config.toml`, printed by `mapframe gen-config`.
pub fn stock_config_toml() -> String {
    concat!(
        "# mapframe configuration - all options optional, defaults shown\n",
        "\n",
        "[page]\n",
        "size = \"a4\"              # a3 | a4 | a5 | letter | legal\n",
        "# size = { custom = { width = 300.0, height = 400.0 } }  # millimeters\n",
        "orientation = \"portrait\" # portrait | landscape\n",
        "dpi = 300\n",
        "\n",
        "[border]\n",
        "width = 30.0             # picture band thickness (mm)\n",
        "spacing = 4.0            # gap between pictures and at edge ends (mm)\n",
        "margin = 8.0             # blank page margin outside the band (mm)\n",
        "packing = \"exact\"        # exact | adaptive\n",
        "\n",
        "[map]\n",
        "provider = \"openstreetmap\"  # openstreetmap | cartolight | opentopo\n",
        "# zoom = 12              # omit to auto-fit the linked locations\n",
        "# center = { lat = 48.8566, lon = 2.3522 }  # omit to use their centroid\n",
        "show_scale = true\n",
        "show_attribution = true\n",
        "marker = \"circle\"        # circle | square | pin\n",
        "link_style = \"solid\"     # solid | dashed | dotted\n",
        "\n",
        "[colors]\n",
        "background = \"#ffffff\"\n",
        "border = \"#f4f1ea\"\n",
        "connector = \"#44484d\"\n",
        "marker = \"#c0392b\"\n",
        "label_text = \"#ffffff\"\n",
        "label_background = \"#2c3e50\"\n",
    )
    .to_string()
}
