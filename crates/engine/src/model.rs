use std::collections::{BTreeMap, BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

/// One parsed row: header field name to field value, as read.
pub type Record = HashMap<String, String>;

/// GDP rows keyed by dataset country code, in file order.
///
/// A repeated key keeps the last row's record (replaced in place, so the
/// key's original position survives).
pub type GdpTable = IndexMap<String, Record>;

/// Plot-code to dataset-code, original casing, in file order.
pub type CodeConverter = IndexMap<String, String>;

/// The plot library's country codes and display names. Read-only input;
/// its casing is canonical for everything the pipeline emits.
pub type PlotCountries = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Case-insensitive join of plot codes against the GDP table's keys.
///
/// Every plot code lands in exactly one of the two collections. Matched
/// values carry the GDP table's own casing, not the converter's.
#[derive(Debug, PartialEq)]
pub struct Reconciliation {
    pub matched: BTreeMap<String, String>,
    pub unmatched: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The three disjoint buckets for one year.
///
/// The key sets partition the plot-country set exactly: every plot code
/// appears in one collection, never two, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GdpMapping {
    /// Plot code to log base 10 of the year's GDP value.
    pub values: BTreeMap<String, f64>,
    /// Plot codes with no counterpart in the GDP table.
    pub missing: BTreeSet<String>,
    /// Plot codes whose GDP entry has no usable value for the year.
    pub no_data: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub plot_countries: usize,
    pub plotted: usize,
    pub missing: usize,
    pub no_data: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapResult {
    pub meta: MapMeta,
    pub summary: MapSummary,
    pub mapping: GdpMapping,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapMeta {
    pub year: String,
    pub gdp_file: String,
    pub code_file: String,
    pub engine_version: String,
    pub run_at: String,
}
