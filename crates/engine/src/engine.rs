use std::path::Path;

use crate::config::MapConfig;
use crate::error::MapError;
use crate::model::{MapMeta, MapResult, PlotCountries};
use crate::resolve::resolve;
use crate::summary::compute_summary;
use crate::table::load_keyed_records;

/// Run the pipeline for one year.
///
/// Both source files are re-read on every call; nothing is cached between
/// runs, so repeated calls observe file changes.
pub fn run(
    config: &MapConfig,
    plot_countries: &PlotCountries,
    year: &str,
) -> Result<MapResult, MapError> {
    let gdp_table = load_keyed_records(
        Path::new(&config.gdp.file),
        &config.gdp.country_code,
        config.gdp.separator,
        config.gdp.quote,
    )?;

    let mapping = resolve(&gdp_table, &config.codes, plot_countries, year)?;
    let summary = compute_summary(plot_countries, &mapping);

    Ok(MapResult {
        meta: MapMeta {
            year: year.to_string(),
            gdp_file: config.gdp.file.clone(),
            code_file: config.codes.file.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        mapping,
    })
}
