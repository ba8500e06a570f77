use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{CodeConverter, GdpTable, PlotCountries, Reconciliation};

/// Join plot codes to GDP table keys through the converter, ignoring case.
///
/// Output keys keep the plot set's casing; matched values keep the GDP
/// table's casing. Both lowercase indexes are built once up front. When
/// keys collide after lowercasing, the later entry wins, which is
/// deterministic because both input tables iterate in insertion order.
pub fn reconcile(
    converter: &CodeConverter,
    plot_countries: &PlotCountries,
    gdp_table: &GdpTable,
) -> Reconciliation {
    let mut converter_index: HashMap<String, &str> = HashMap::new();
    for (plot_code, data_code) in converter {
        converter_index.insert(plot_code.to_lowercase(), data_code.as_str());
    }

    let mut gdp_index: HashMap<String, &str> = HashMap::new();
    for data_code in gdp_table.keys() {
        gdp_index.insert(data_code.to_lowercase(), data_code.as_str());
    }

    let mut matched = BTreeMap::new();
    let mut unmatched = BTreeSet::new();

    for plot_code in plot_countries.keys() {
        let data_code = match converter_index.get(&plot_code.to_lowercase()) {
            // An empty dataset code never matches.
            Some(code) if !code.is_empty() => *code,
            _ => {
                unmatched.insert(plot_code.clone());
                continue;
            }
        };

        match gdp_index.get(&data_code.to_lowercase()) {
            Some(original) => {
                matched.insert(plot_code.clone(), (*original).to_string());
            }
            None => {
                unmatched.insert(plot_code.clone());
            }
        }
    }

    Reconciliation { matched, unmatched }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
