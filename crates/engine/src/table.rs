use std::io::Read;
use std::path::Path;

use crate::error::MapError;
use crate::model::{GdpTable, Record};

/// Read a file into memory, decoding as UTF-8 with a Windows-1252 fallback.
pub fn read_file_as_utf8(path: &Path) -> Result<String, MapError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| MapError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| MapError::Io(format!("{}: {e}", path.display())))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    // Excel exports often lead with a BOM; header lookups must not see it.
    match content.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

/// Parse a delimited file into raw rows. Row 0 is the header row.
///
/// Rows whose field count differs from the header's are a parse error, not
/// a recoverable anomaly.
pub fn load_rows(path: &Path, separator: char, quote: char) -> Result<Vec<Vec<String>>, MapError> {
    let content = read_file_as_utf8(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator as u8)
        .quote(quote as u8)
        .has_headers(false)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| MapError::Csv(format!("{}: {e}", path.display())))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Parse a delimited file with a header row and index each data row by its
/// `keyfield` value. A repeated key keeps the last row.
pub fn load_keyed_records(
    path: &Path,
    keyfield: &str,
    separator: char,
    quote: char,
) -> Result<GdpTable, MapError> {
    let content = read_file_as_utf8(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator as u8)
        .quote(quote as u8)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| MapError::Csv(format!("{}: {e}", path.display())))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let key_idx = headers
        .iter()
        .position(|h| h == keyfield)
        .ok_or_else(|| MapError::MissingField {
            file: path.display().to_string(),
            field: keyfield.to_string(),
        })?;

    let mut table = GdpTable::new();
    for result in reader.records() {
        let record = result.map_err(|e| MapError::Csv(format!("{}: {e}", path.display())))?;

        let mut fields = Record::new();
        for (i, header) in headers.iter().enumerate() {
            fields.insert(header.clone(), record.get(i).unwrap_or("").to_string());
        }

        let key = record.get(key_idx).unwrap_or("").to_string();
        table.insert(key, fields);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
