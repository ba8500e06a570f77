use crate::model::{GdpMapping, MapSummary, PlotCountries};

/// Bucket counts for reporting.
pub fn compute_summary(plot_countries: &PlotCountries, mapping: &GdpMapping) -> MapSummary {
    MapSummary {
        plot_countries: plot_countries.len(),
        plotted: mapping.values.len(),
        missing: mapping.missing.len(),
        no_data: mapping.no_data.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn summary_counts() {
        let plot_countries: PlotCountries = [("ad", "Andorra"), ("no", "Norway"), ("us", "United States"), ("zz", "Nowhere")]
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();

        let mapping = GdpMapping {
            values: BTreeMap::from([("us".to_string(), 13.0), ("no".to_string(), 11.0)]),
            missing: BTreeSet::from(["zz".to_string()]),
            no_data: BTreeSet::from(["ad".to_string()]),
        };

        let summary = compute_summary(&plot_countries, &mapping);
        assert_eq!(summary.plot_countries, 4);
        assert_eq!(summary.plotted, 2);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.no_data, 1);
        assert_eq!(
            summary.plotted + summary.missing + summary.no_data,
            summary.plot_countries
        );
    }
}
