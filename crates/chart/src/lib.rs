//! `gdpmap-chart`: SVG world-map chart rendering.
//!
//! Turns a [`gdpmap_engine::GdpMapping`] into a single SVG document with
//! three labeled series: plotted GDP values, countries missing from the
//! GDP source, and countries with no usable figure for the year. Also
//! owns the built-in world country set that defines which countries a
//! chart can show.

pub mod countries;
pub mod svg;

pub use countries::world_countries;
pub use svg::render_world_map;
