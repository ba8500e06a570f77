//! `gdpmap-engine`: country-code reconciliation and GDP mapping engine.
//!
//! Pure engine crate: loads delimited tables, joins plot-library country
//! codes to dataset codes, and classifies every plot country into a value,
//! missing, or no-data bucket. No chart or CLI dependencies.

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod resolve;
pub mod summary;
pub mod table;

pub use config::{CodeInfo, GdpInfo, MapConfig};
pub use engine::run;
pub use error::MapError;
pub use model::{
    CodeConverter, GdpMapping, GdpTable, MapMeta, MapResult, MapSummary, PlotCountries, Record,
    Reconciliation,
};
