use std::collections::{BTreeMap, BTreeSet};

use crate::config::CodeInfo;
use crate::convert::build_converter;
use crate::error::MapError;
use crate::model::{CodeConverter, GdpMapping, GdpTable, PlotCountries};
use crate::reconcile::reconcile;

/// Classify every plot country for one year.
///
/// `year` is the GDP table field to read. Builds the converter from
/// `codeinfo`, reconciles, then routes each plot code into exactly one of
/// the three output buckets.
pub fn resolve(
    gdp_table: &GdpTable,
    codeinfo: &CodeInfo,
    plot_countries: &PlotCountries,
    year: &str,
) -> Result<GdpMapping, MapError> {
    let converter = build_converter(codeinfo)?;
    Ok(resolve_with_converter(gdp_table, &converter, plot_countries, year))
}

/// Classification core over an already-built converter. Pure.
pub fn resolve_with_converter(
    gdp_table: &GdpTable,
    converter: &CodeConverter,
    plot_countries: &PlotCountries,
    year: &str,
) -> GdpMapping {
    let recon = reconcile(converter, plot_countries, gdp_table);

    let mut values: BTreeMap<String, f64> = BTreeMap::new();
    let mut missing: BTreeSet<String> = recon.unmatched;
    let mut no_data: BTreeSet<String> = BTreeSet::new();

    for (plot_code, data_code) in &recon.matched {
        let record = match gdp_table.get(data_code) {
            Some(record) => record,
            None => {
                // Matched dataset codes come from the table's own keys, so
                // this cannot fire; route to missing rather than panic.
                missing.insert(plot_code.clone());
                continue;
            }
        };

        let raw = record.get(year).map(String::as_str).unwrap_or("").trim();
        match raw.parse::<f64>() {
            // Zero and negative GDP have no logarithm; NaN fails the
            // comparison and falls through with everything unparseable.
            Ok(value) if value > 0.0 => {
                values.insert(plot_code.clone(), value.log10());
            }
            _ => {
                no_data.insert(plot_code.clone());
            }
        }
    }

    GdpMapping { values, missing, no_data }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn codes_file(dir: &Path, body: &str) -> CodeInfo {
        let path = dir.join("codes.csv");
        fs::write(&path, body).unwrap();
        CodeInfo {
            file: path.display().to_string(),
            separator: ',',
            quote: '"',
            plot_codes: "Alpha2".into(),
            data_codes: "Alpha3".into(),
        }
    }

    fn gdp_row(code: &str, year: &str, value: &str) -> (String, Record) {
        let mut record = Record::new();
        record.insert("Country Code".into(), code.into());
        record.insert(year.into(), value.into());
        (code.to_string(), record)
    }

    fn plots(codes: &[&str]) -> PlotCountries {
        codes
            .iter()
            .map(|code| (code.to_string(), format!("Country {code}")))
            .collect()
    }

    #[test]
    fn positive_value_becomes_log10() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\n");
        let gdp: GdpTable = [gdp_row("USA", "2010", "1000")].into_iter().collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["us"]), "2010").unwrap();
        assert_eq!(mapping.values["us"], 3.0);
        assert!(mapping.missing.is_empty());
        assert!(mapping.no_data.is_empty());
    }

    #[test]
    fn non_positive_and_unparseable_values_go_to_no_data() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\na,AAA\nb,BBB\nc,CCC\n");
        let gdp: GdpTable = [
            gdp_row("AAA", "2010", "-5"),
            gdp_row("BBB", "2010", "abc"),
            gdp_row("CCC", "2010", "0"),
        ]
        .into_iter()
        .collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["a", "b", "c"]), "2010").unwrap();
        assert!(mapping.values.is_empty());
        assert!(mapping.missing.is_empty());
        assert_eq!(mapping.no_data.len(), 3);
    }

    #[test]
    fn empty_and_whitespace_values_go_to_no_data() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\na,AAA\nb,BBB\n");
        let gdp: GdpTable = [gdp_row("AAA", "2010", ""), gdp_row("BBB", "2010", "   ")]
            .into_iter()
            .collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["a", "b"]), "2010").unwrap();
        assert_eq!(mapping.no_data.len(), 2);
    }

    #[test]
    fn padded_numeric_value_still_parses() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\na,AAA\n");
        let gdp: GdpTable = [gdp_row("AAA", "2010", " 100 ")].into_iter().collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["a"]), "2010").unwrap();
        assert_eq!(mapping.values["a"], 2.0);
    }

    #[test]
    fn absent_year_column_routes_matches_to_no_data() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\n");
        let gdp: GdpTable = [gdp_row("USA", "2010", "1000")].into_iter().collect();

        // The table has no "1875" field anywhere; that is not an error,
        // every matched country just has no data for it.
        let mapping = resolve(&gdp, &codeinfo, &plots(&["us"]), "1875").unwrap();
        assert!(mapping.values.is_empty());
        assert!(mapping.no_data.contains("us"));
    }

    #[test]
    fn unmatched_plot_codes_form_the_missing_set() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\n");
        let gdp: GdpTable = [gdp_row("USA", "2010", "1000")].into_iter().collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["us", "zz"]), "2010").unwrap();
        assert!(mapping.values.contains_key("us"));
        assert!(mapping.missing.contains("zz"));
    }

    #[test]
    fn buckets_partition_the_plot_countries() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\nno,NOR\nad,AND\n");
        let gdp: GdpTable = [
            gdp_row("USA", "2010", "1000"),
            gdp_row("NOR", "2010", ""),
        ]
        .into_iter()
        .collect();

        let plot_countries = plots(&["ad", "no", "us", "zz"]);
        let mapping = resolve(&gdp, &codeinfo, &plot_countries, "2010").unwrap();

        let mut seen: Vec<&String> = Vec::new();
        seen.extend(mapping.values.keys());
        seen.extend(mapping.missing.iter());
        seen.extend(mapping.no_data.iter());
        seen.sort();

        let expected: Vec<&String> = plot_countries.keys().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn missing_matches_reconciler_unmatched_on_well_formed_input() {
        // The fallback for a matched-but-absent dataset code must never
        // fire when the table and converter come from real loads.
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\nno,NOR\nkp,PRK\n");
        let gdp: GdpTable = [
            gdp_row("USA", "2010", "1000"),
            gdp_row("NOR", "2010", "10"),
        ]
        .into_iter()
        .collect();
        let plot_countries = plots(&["us", "no", "kp", "zz"]);

        let converter = build_converter(&codeinfo).unwrap();
        let recon = reconcile(&converter, &plot_countries, &gdp);
        let mapping = resolve(&gdp, &codeinfo, &plot_countries, "2010").unwrap();

        assert_eq!(mapping.missing, recon.unmatched);
    }

    #[test]
    fn end_to_end_usa_2010() {
        let dir = tempdir().unwrap();
        let codeinfo = codes_file(dir.path(), "Alpha2,Alpha3\nus,USA\n");
        let gdp: GdpTable = [gdp_row("USA", "2010", "1000")].into_iter().collect();

        let mapping = resolve(&gdp, &codeinfo, &plots(&["us"]), "2010").unwrap();
        assert_eq!(mapping.values.len(), 1);
        assert_eq!(mapping.values["us"], 3.0);
        assert!(mapping.missing.is_empty());
        assert!(mapping.no_data.is_empty());
    }
}
