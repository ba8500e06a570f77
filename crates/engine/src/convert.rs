use std::path::Path;

use crate::config::CodeInfo;
use crate::error::MapError;
use crate::model::CodeConverter;
use crate::table;

/// Build the plot-code to dataset-code converter from the code table.
///
/// Casing is kept exactly as read. Rows with an empty cell in either code
/// column are skipped. A plot code appearing in several rows keeps the
/// last row's dataset code; the override is silent and intentional.
pub fn build_converter(codeinfo: &CodeInfo) -> Result<CodeConverter, MapError> {
    let rows = table::load_rows(Path::new(&codeinfo.file), codeinfo.separator, codeinfo.quote)?;

    let header = rows
        .first()
        .ok_or_else(|| MapError::Csv(format!("{}: expected a header row", codeinfo.file)))?;

    let idx = |name: &str| -> Result<usize, MapError> {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MapError::MissingField {
                file: codeinfo.file.clone(),
                field: name.to_string(),
            })
    };

    let plot_idx = idx(&codeinfo.plot_codes)?;
    let data_idx = idx(&codeinfo.data_codes)?;

    let mut converter = CodeConverter::new();
    for row in &rows[1..] {
        let plot_code = row.get(plot_idx).map(String::as_str).unwrap_or("");
        let data_code = row.get(data_idx).map(String::as_str).unwrap_or("");
        if plot_code.is_empty() || data_code.is_empty() {
            continue;
        }
        converter.insert(plot_code.to_string(), data_code.to_string());
    }
    Ok(converter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn code_info(path: &Path) -> CodeInfo {
        CodeInfo {
            file: path.display().to_string(),
            separator: ',',
            quote: '"',
            plot_codes: "Alpha2".into(),
            data_codes: "Alpha3".into(),
        }
    }

    #[test]
    fn build_basic_converter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Alpha2,Alpha3\nus,USA\nno,NOR\n").unwrap();

        let converter = build_converter(&code_info(&path)).unwrap();
        assert_eq!(converter.len(), 2);
        assert_eq!(converter["us"], "USA");
        assert_eq!(converter["no"], "NOR");
    }

    #[test]
    fn casing_kept_as_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Alpha2,Alpha3\nAb,xYz\n").unwrap();

        let converter = build_converter(&code_info(&path)).unwrap();
        assert_eq!(converter["Ab"], "xYz");
        assert!(converter.get("ab").is_none());
    }

    #[test]
    fn rows_with_empty_cells_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Alpha2,Alpha3\nus,\n,NOR\nde,DEU\n").unwrap();

        let converter = build_converter(&code_info(&path)).unwrap();
        assert_eq!(converter.len(), 1);
        assert_eq!(converter["de"], "DEU");
    }

    #[test]
    fn later_rows_override_earlier_ones() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Alpha2,Alpha3\naa,AAA\naa,BBB\n").unwrap();

        let converter = build_converter(&code_info(&path)).unwrap();
        assert_eq!(converter.len(), 1);
        assert_eq!(converter["aa"], "BBB");
    }

    #[test]
    fn other_columns_are_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(
            &path,
            "Name,Alpha2,Alpha3,Numeric\nUnited States,us,USA,840\n",
        )
        .unwrap();

        let converter = build_converter(&code_info(&path)).unwrap();
        assert_eq!(converter["us"], "USA");
    }

    #[test]
    fn missing_code_column_is_missing_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Alpha2,Other\nus,x\n").unwrap();

        let err = build_converter(&code_info(&path)).unwrap_err();
        match err {
            MapError::MissingField { field, .. } => assert_eq!(field, "Alpha3"),
            other => panic!("expected MissingField, got {other}"),
        }
    }

    #[test]
    fn empty_file_is_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "").unwrap();

        let err = build_converter(&code_info(&path)).unwrap_err();
        assert!(matches!(err, MapError::Csv(_)), "got: {err}");
    }
}
