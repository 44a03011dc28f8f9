//! # mapframe
//!
//! Printable map posters framed with your photographs. Your filesystem is
//! the data source: a directory of photos becomes the poster border, a
//! `locations.toml` table ties each photo to the place it was taken, and
//! connector lines run from every border photo to its marker on the map.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! mapframe builds a poster in three independent stages, each producing a
//! JSON manifest the next stage consumes:
//!
//! ```text
//! 1. Scan     photos/  →  manifest.json   (filesystem → structured data)
//! 2. Layout   manifest →  layout.json     (pure geometry: slots, markers, connectors)
//! 3. Render   layout   →  poster.svg      (maud markup serialization)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each manifest is human-readable JSON you can inspect.
//! - **Testability**: the layout stage is a pure function from manifest to
//!   geometry, so every packing and routing decision is unit-testable
//!   without touching the filesystem.
//! - **Reproducibility**: the same manifest always yields the same poster —
//!   no hidden state, no caches.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — photo discovery, dimension probing, link table loading |
//! | [`layout`] | Stage 2 — orchestrates packing, fitting and link routing into a [`layout::Poster`] |
//! | [`render`] | Stage 3 — serializes poster geometry to SVG with Maud |
//! | [`projection`] | Web-Mercator geo↔pixel math, bounds, centroid, zoom-fit |
//! | [`border`] | Slot packing across the four border edges, two strategies |
//! | [`fit`] | Aspect-preserving picture fitting inside slots |
//! | [`links`] | Link resolution, marker placement, connector routing, labels |
//! | [`config`] | `config.toml` loading, validation, stock config generation |
//! | [`color`] | The one validated color type and its grammar parser |
//! | [`units`] | mm↔px conversion, DPI, paper-size presets |
//! | [`types`] | Shared geometry types serialized between stages |
//! | [`output`] | CLI output formatting — information-first display of results |
//!
//! # Design Decisions
//!
//! ## Pure Geometry Core
//!
//! The four geometry modules ([`projection`], [`border`], [`fit`],
//! [`links`]) are side-effect-free functions over immutable inputs — no
//! I/O, no caches, no instance state. Every render request computes from
//! scratch; at the tens-to-hundreds of photos a poster can hold, a full
//! recompute is sub-millisecond and statelessness buys free thread safety.
//!
//! ## Two Packing Strategies, Deliberately
//!
//! The border packer ships both a fixed-capacity exact-slot algorithm and
//! an adaptive square-with-shrink algorithm because they produce genuinely
//! different posters (full-band rectangles vs. uniform squares). Neither is
//! "the" correct one — the choice is a visual preference surfaced in
//! `config.toml` rather than resolved in code.
//!
//! ## Procedural Map Surface
//!
//! No tiles are fetched. The map area is decorated with a graticule drawn
//! through the real projection, so markers, connectors and grid lines are
//! always mutually consistent — and the output is fully reproducible
//! offline. The provider tag in the config picks an attribution line, not
//! a tile source.
//!
//! ## SVG Over a Paged Format
//!
//! The renderer emits a single SVG document with Maud's compile-time
//! markup macro.
//! SVG keeps the output inspectable and diff-able; converting it to PDF for
//! print is one `resvg`/`svg2pdf` invocation away and deliberately outside
//! this crate.

pub mod border;
pub mod color;
pub mod config;
pub mod fit;
pub mod layout;
pub mod links;
pub mod output;
pub mod projection;
pub mod render;
pub mod scan;
pub mod types;
pub mod units;

#[cfg(test)]
pub(crate) mod test_helpers;
