use std::fmt;

#[derive(Debug)]
pub enum MapError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty field name, non-ASCII separator, etc.).
    ConfigValidation(String),
    /// A configured field is missing from a file's header row.
    MissingField { file: String, field: String },
    /// Malformed delimited data (ragged rows, bad quoting, no header row).
    Csv(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingField { file, field } => {
                write!(f, "file '{file}': missing field '{field}' in header row")
            }
            Self::Csv(msg) => write!(f, "CSV parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {}
