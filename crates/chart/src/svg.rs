//! One-shot SVG rendering of a classified GDP mapping.
//!
//! The document has a title, a three-entry legend, a ranked bar section
//! for plotted log-scale values, and code-chip sections for the two
//! unplottable buckets. Everything is drawn in pixel coordinates on a
//! single drawing area; the height is computed from the content first.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

use gdpmap_engine::{GdpMapping, PlotCountries};
use plotters::coord::Shift;
use plotters::prelude::*;

const WIDTH: i32 = 1080;
const MARGIN: i32 = 24;
const SECTION_HEADER: i32 = 26;

const BAR_ROW: i32 = 20;
const BAR_HEIGHT: i32 = 12;
const NAME_COLUMN: i32 = 250;

const CHIP_W: i32 = 40;
const CHIP_H: i32 = 20;
const CHIP_GAP: i32 = 6;

const VALUE_COLOR: RGBColor = RGBColor(31, 119, 180);
const MISSING_COLOR: RGBColor = RGBColor(158, 158, 158);
const NO_DATA_COLOR: RGBColor = RGBColor(255, 152, 0);

/// Render `mapping` for `year` as one SVG document at `path`.
///
/// Country labels come from `countries`; codes without an entry fall
/// back to the code itself. An existing file at `path` is overwritten.
pub fn render_world_map(
    mapping: &GdpMapping,
    countries: &PlotCountries,
    year: &str,
    path: &Path,
) -> Result<(), String> {
    let mut plotted: Vec<(&str, &str, f64)> = mapping
        .values
        .iter()
        .map(|(code, value)| {
            let name = countries.get(code).map(String::as_str).unwrap_or(code);
            (code.as_str(), name, *value)
        })
        .collect();
    plotted.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    let per_row = (WIDTH - 2 * MARGIN) / (CHIP_W + CHIP_GAP);
    let header_h = 64;
    let bars_h = SECTION_HEADER + plotted.len() as i32 * BAR_ROW + 8;
    let missing_h =
        SECTION_HEADER + chip_rows(mapping.missing.len(), per_row) * (CHIP_H + CHIP_GAP) + 8;
    let no_data_h =
        SECTION_HEADER + chip_rows(mapping.no_data.len(), per_row) * (CHIP_H + CHIP_GAP) + 8;
    let height = (2 * MARGIN + header_h + bars_h + missing_h + no_data_h).max(240);

    let root = SVGBackend::new(path, (WIDTH as u32, height as u32)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut y = MARGIN;
    root.draw(&Text::new(
        format!("GDP by country for {year} (log scale), unified by common country CODE"),
        (MARGIN, y),
        ("sans-serif", 22),
    ))
    .map_err(|e| e.to_string())?;
    y += 34;

    let legend: [(String, RGBColor); 3] = [
        (format!("GDP for {year}"), VALUE_COLOR),
        ("Missing from World Bank Data".to_string(), MISSING_COLOR),
        ("No GDP Data".to_string(), NO_DATA_COLOR),
    ];
    let mut x = MARGIN;
    for (label, color) in &legend {
        root.draw(&Rectangle::new([(x, y), (x + 14, y + 14)], color.filled()))
            .map_err(|e| e.to_string())?;
        root.draw(&Text::new(label.clone(), (x + 20, y + 1), ("sans-serif", 14)))
            .map_err(|e| e.to_string())?;
        x += 20 + approx_text_width(label, 14) + 28;
    }
    y += 30;

    y = draw_bars(&root, y, year, &plotted)?;
    y = draw_chips(
        &root,
        y,
        "Missing from World Bank Data",
        &mapping.missing,
        &MISSING_COLOR,
    )?;
    draw_chips(&root, y, "No GDP Data", &mapping.no_data, &NO_DATA_COLOR)?;

    root.present().map_err(|e| e.to_string())
}

fn draw_section_header(
    root: &DrawingArea<SVGBackend, Shift>,
    y: i32,
    label: &str,
    count: usize,
) -> Result<i32, String> {
    root.draw(&Text::new(
        format!("{label} ({count})"),
        (MARGIN, y),
        ("sans-serif", 16),
    ))
    .map_err(|e| e.to_string())?;
    Ok(y + SECTION_HEADER)
}

/// Ranked horizontal bars, largest value first. Bars are scaled between
/// the floor and ceiling of the observed log values so single-country
/// charts still get a visible bar.
fn draw_bars(
    root: &DrawingArea<SVGBackend, Shift>,
    y: i32,
    year: &str,
    plotted: &[(&str, &str, f64)],
) -> Result<i32, String> {
    let mut y = draw_section_header(root, y, &format!("GDP for {year}"), plotted.len())?;
    if plotted.is_empty() {
        return Ok(y + 8);
    }

    let lo = plotted
        .iter()
        .map(|e| e.2)
        .fold(f64::INFINITY, f64::min)
        .floor();
    let hi = plotted
        .iter()
        .map(|e| e.2)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil();
    let span = if hi > lo { hi - lo } else { 1.0 };
    let bar_x0 = MARGIN + NAME_COLUMN;
    let bar_span = WIDTH - MARGIN - 70 - bar_x0;

    for (code, name, value) in plotted {
        let frac = ((value - lo) / span).clamp(0.0, 1.0);
        let w = ((frac * bar_span as f64) as i32).max(2);
        root.draw(&Text::new(
            format!("{name} ({code})"),
            (MARGIN, y + 2),
            ("sans-serif", 13),
        ))
        .map_err(|e| e.to_string())?;
        root.draw(&Rectangle::new(
            [(bar_x0, y), (bar_x0 + w, y + BAR_HEIGHT)],
            VALUE_COLOR.filled(),
        ))
        .map_err(|e| e.to_string())?;
        root.draw(&Text::new(
            format!("{value:.2}"),
            (bar_x0 + w + 6, y + 1),
            ("sans-serif", 12),
        ))
        .map_err(|e| e.to_string())?;
        y += BAR_ROW;
    }
    Ok(y + 8)
}

/// One colored chip per country code, wrapped into rows.
fn draw_chips(
    root: &DrawingArea<SVGBackend, Shift>,
    y: i32,
    label: &str,
    codes: &BTreeSet<String>,
    color: &RGBColor,
) -> Result<i32, String> {
    let y = draw_section_header(root, y, label, codes.len())?;
    if codes.is_empty() {
        return Ok(y + 8);
    }

    let per_row = (WIDTH - 2 * MARGIN) / (CHIP_W + CHIP_GAP);
    for (i, code) in codes.iter().enumerate() {
        let col = i as i32 % per_row;
        let row = i as i32 / per_row;
        let x = MARGIN + col * (CHIP_W + CHIP_GAP);
        let cy = y + row * (CHIP_H + CHIP_GAP);
        root.draw(&Rectangle::new(
            [(x, cy), (x + CHIP_W, cy + CHIP_H)],
            color.mix(0.25).filled(),
        ))
        .map_err(|e| e.to_string())?;
        root.draw(&Rectangle::new(
            [(x, cy), (x + CHIP_W, cy + CHIP_H)],
            color.stroke_width(1),
        ))
        .map_err(|e| e.to_string())?;
        root.draw(&Text::new(code.clone(), (x + 11, cy + 4), ("sans-serif", 12)))
            .map_err(|e| e.to_string())?;
    }

    let rows = chip_rows(codes.len(), per_row);
    Ok(y + rows * (CHIP_H + CHIP_GAP) + 8)
}

fn chip_rows(count: usize, per_row: i32) -> i32 {
    if count == 0 {
        0
    } else {
        (count as i32 + per_row - 1) / per_row
    }
}

/// Rough width for legend spacing. SVG text is laid out by the viewer,
/// so an estimate is all we can do here.
fn approx_text_width(text: &str, size: i32) -> i32 {
    text.chars().count() as i32 * size * 6 / 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::world_countries;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample_mapping() -> GdpMapping {
        let mut values = BTreeMap::new();
        values.insert("us".to_string(), 13.0);
        values.insert("de".to_string(), 12.5);
        values.insert("no".to_string(), 11.0);
        let mut missing = BTreeSet::new();
        missing.insert("kp".to_string());
        let mut no_data = BTreeSet::new();
        no_data.insert("ad".to_string());
        GdpMapping {
            values,
            missing,
            no_data,
        }
    }

    #[test]
    fn renders_svg_with_three_labeled_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.svg");
        render_world_map(&sample_mapping(), &world_countries(), "2010", &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("GDP by country for 2010 (log scale), unified by common country CODE"));
        assert!(svg.contains("GDP for 2010"));
        assert!(svg.contains("Missing from World Bank Data"));
        assert!(svg.contains("No GDP Data"));
        assert!(svg.contains("United States"));
        assert!(svg.contains("13.00"));
    }

    #[test]
    fn empty_mapping_still_renders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        let mapping = GdpMapping {
            values: BTreeMap::new(),
            missing: BTreeSet::new(),
            no_data: BTreeSet::new(),
        };
        render_world_map(&mapping, &world_countries(), "1900", &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("GDP for 1900"));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.svg");
        std::fs::write(&path, "not an svg").unwrap();
        render_world_map(&sample_mapping(), &world_countries(), "2010", &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("not an svg"));
    }

    #[test]
    fn unknown_code_is_labeled_by_code() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.svg");
        let mut values = BTreeMap::new();
        values.insert("zz".to_string(), 5.0);
        let mapping = GdpMapping {
            values,
            missing: BTreeSet::new(),
            no_data: BTreeSet::new(),
        };
        render_world_map(&mapping, &world_countries(), "2010", &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("zz (zz)"));
    }
}
