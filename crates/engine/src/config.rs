use serde::Deserialize;

use crate::error::MapError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MapConfig {
    pub gdp: GdpInfo,
    pub codes: CodeInfo,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// GDP table
// ---------------------------------------------------------------------------

/// Where the GDP table lives and which header fields matter.
///
/// `country_code` keys the table; `country_name` is carried for provenance
/// only and never used for joins. `min_year`/`max_year` describe the range
/// of year columns the file is expected to have.
#[derive(Debug, Clone, Deserialize)]
pub struct GdpInfo {
    pub file: String,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    pub country_name: String,
    pub country_code: String,
    #[serde(default)]
    pub min_year: Option<u32>,
    #[serde(default)]
    pub max_year: Option<u32>,
}

// ---------------------------------------------------------------------------
// Code table
// ---------------------------------------------------------------------------

/// Where the country-code table lives and which columns carry the plot
/// library's codes and the dataset's codes.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeInfo {
    pub file: String,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    pub plot_codes: String,
    pub data_codes: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_separator() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MapConfig {
    pub fn from_toml(input: &str) -> Result<Self, MapError> {
        let config: MapConfig =
            toml::from_str(input).map_err(|e| MapError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        validate_table("gdp", &self.gdp.file, self.gdp.separator, self.gdp.quote)?;
        validate_table("codes", &self.codes.file, self.codes.separator, self.codes.quote)?;

        for (section, name, value) in [
            ("gdp", "country_name", &self.gdp.country_name),
            ("gdp", "country_code", &self.gdp.country_code),
            ("codes", "plot_codes", &self.codes.plot_codes),
            ("codes", "data_codes", &self.codes.data_codes),
        ] {
            if value.trim().is_empty() {
                return Err(MapError::ConfigValidation(format!(
                    "[{section}] {name} must not be empty"
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.gdp.min_year, self.gdp.max_year) {
            if min > max {
                return Err(MapError::ConfigValidation(format!(
                    "[gdp] min_year {min} is greater than max_year {max}"
                )));
            }
        }

        Ok(())
    }
}

/// The csv reader takes single-byte delimiters, so separator and quote
/// characters must be ASCII.
fn validate_table(section: &str, file: &str, separator: char, quote: char) -> Result<(), MapError> {
    if file.trim().is_empty() {
        return Err(MapError::ConfigValidation(format!(
            "[{section}] file must not be empty"
        )));
    }
    if !separator.is_ascii() {
        return Err(MapError::ConfigValidation(format!(
            "[{section}] separator must be an ASCII character, got '{separator}'"
        )));
    }
    if !quote.is_ascii() {
        return Err(MapError::ConfigValidation(format!(
            "[{section}] quote must be an ASCII character, got '{quote}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
