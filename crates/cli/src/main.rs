// gdpmap CLI - GDP world map rendering from World Bank data files

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gdpmap_chart::{render_world_map, world_countries};
use gdpmap_engine::{run, MapConfig, MapError, MapSummary, PlotCountries};

use exit_codes::{
    engine_exit_code, EXIT_ERROR, EXIT_IO, EXIT_PARTIAL, EXIT_RENDER, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "gdpmap")]
#[command(about = "Render world GDP choropleth charts from World Bank data")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one SVG map per requested year
    #[command(after_help = "\
Examples:
  gdpmap render gdp.toml --year 2010
  gdpmap render gdp.toml --year 2000 --year 2005 --year 2010
  gdpmap render gdp.toml --year 2010 --output world_2010.svg
  gdpmap render gdp.toml --year 2010 --out-dir charts --json")]
    Render {
        /// Path to the TOML job config
        config: PathBuf,

        /// Year to render (repeatable; each year becomes one SVG)
        #[arg(long, required = true)]
        year: Vec<String>,

        /// Output file (single --year only; default: gdp_map_<year>.svg)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Directory for rendered files
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Replace the built-in country set with a CSV file (code,name header)
        #[arg(long)]
        countries: Option<PathBuf>,

        /// Print a JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Quiet mode - suppress stderr summaries and warnings
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Classify countries for a year without rendering anything
    #[command(after_help = "\
Examples:
  gdpmap resolve gdp.toml --year 2010
  gdpmap resolve gdp.toml --year 2010 --json | jq .mapping.values")]
    Resolve {
        /// Path to the TOML job config
        config: PathBuf,

        /// Year to classify
        #[arg(long)]
        year: String,

        /// Replace the built-in country set with a CSV file (code,name header)
        #[arg(long)]
        countries: Option<PathBuf>,

        /// Output the full result as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Check a job config without reading any data files
    #[command(after_help = "\
Examples:
  gdpmap validate gdp.toml")]
    Validate {
        /// Path to the TOML job config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            config,
            year,
            output,
            out_dir,
            countries,
            json,
            quiet,
        } => cmd_render(config, year, output, out_dir, countries, json, quiet),
        Commands::Resolve {
            config,
            year,
            countries,
            json,
        } => cmd_resolve(config, year, countries, json),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    fn render(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_RENDER,
            message: msg.into(),
            hint: None,
        }
    }

    /// Create an error from an engine error with the matching exit code.
    fn engine(err: MapError) -> Self {
        Self {
            code: engine_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Read and validate a job config, rebasing its data file paths onto the
/// config file's directory so jobs run the same from anywhere.
fn load_config(config_path: &Path) -> Result<MapConfig, CliError> {
    let toml = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", config_path.display())))?;
    let mut config = MapConfig::from_toml(&toml).map_err(CliError::engine)?;

    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    config.gdp.file = rebase(base, &config.gdp.file);
    config.codes.file = rebase(base, &config.codes.file);
    if let Some(dir) = config.output.dir.take() {
        config.output.dir = Some(rebase(base, &dir));
    }
    Ok(config)
}

fn rebase(base: &Path, file: &str) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        file.to_string()
    } else {
        base.join(path).display().to_string()
    }
}

/// Load a replacement country set from a CSV file with `code` and `name`
/// header fields. Rows with an empty code are skipped.
fn load_countries(path: &Path) -> Result<PlotCountries, CliError> {
    let rows = gdpmap_engine::table::load_rows(path, ',', '"').map_err(CliError::engine)?;
    let header = rows.first().ok_or_else(|| {
        CliError::engine(MapError::Csv(format!(
            "{}: expected a header row",
            path.display()
        )))
    })?;
    let idx = |field: &str| {
        header.iter().position(|h| h == field).ok_or_else(|| {
            CliError::engine(MapError::MissingField {
                file: path.display().to_string(),
                field: field.to_string(),
            })
        })
    };
    let code_idx = idx("code")?;
    let name_idx = idx("name")?;

    let mut countries = PlotCountries::new();
    for row in &rows[1..] {
        let code = row.get(code_idx).map(String::as_str).unwrap_or("");
        let name = row.get(name_idx).map(String::as_str).unwrap_or("");
        if code.is_empty() {
            continue;
        }
        countries.insert(code.to_string(), name.to_string());
    }
    Ok(countries)
}

/// Years outside the configured range are allowed but almost always a
/// typo, so say something.
fn warn_year_out_of_range(config: &MapConfig, year: &str) {
    let parsed: u32 = match year.parse() {
        Ok(y) => y,
        Err(_) => return,
    };
    let out_of_range = match (config.gdp.min_year, config.gdp.max_year) {
        (Some(min), _) if parsed < min => true,
        (_, Some(max)) if parsed > max => true,
        _ => false,
    };
    if out_of_range {
        eprintln!("warning: year {year} is outside the configured range; expect empty results");
    }
}

// ============================================================================
// render
// ============================================================================

#[derive(serde::Serialize)]
struct RenderReport {
    config: String,
    years: Vec<YearOutcome>,
}

#[derive(serde::Serialize)]
struct YearOutcome {
    year: String,
    status: YearStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<MapSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum YearStatus {
    Ok,
    Error,
}

fn cmd_render(
    config_path: PathBuf,
    years: Vec<String>,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    countries_file: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if output.is_some() && years.len() != 1 {
        return Err(CliError::args("--output requires exactly one --year")
            .with_hint("use --out-dir for multi-year runs"));
    }

    let config = load_config(&config_path)?;
    let countries = match &countries_file {
        Some(path) => load_countries(path)?,
        None => world_countries(),
    };

    let dir = out_dir
        .or_else(|| config.output.dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut outcomes = Vec::with_capacity(years.len());
    let mut first_failure: Option<u8> = None;
    let mut failed = 0usize;

    // Years fail independently; one bad column never blocks the rest.
    for year in &years {
        if !quiet {
            warn_year_out_of_range(&config, year);
        }
        let path = match &output {
            Some(path) => path.clone(),
            None => dir.join(format!("gdp_map_{year}.svg")),
        };
        match render_year(&config, &countries, year, &path) {
            Ok(summary) => {
                if !quiet {
                    eprintln!(
                        "{year}: {} of {} countries plotted, {} missing, {} no data",
                        summary.plotted, summary.plot_countries, summary.missing, summary.no_data,
                    );
                    eprintln!("wrote {}", path.display());
                }
                outcomes.push(YearOutcome {
                    year: year.clone(),
                    status: YearStatus::Ok,
                    output: Some(path.display().to_string()),
                    summary: Some(summary),
                    error: None,
                });
            }
            Err(err) => {
                eprintln!("error: {year}: {}", err.message);
                if first_failure.is_none() {
                    first_failure = Some(err.code);
                }
                failed += 1;
                outcomes.push(YearOutcome {
                    year: year.clone(),
                    status: YearStatus::Error,
                    output: None,
                    summary: None,
                    error: Some(err.message),
                });
            }
        }
    }

    if json {
        let report = RenderReport {
            config: config_path.display().to_string(),
            years: outcomes,
        };
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    }

    match first_failure {
        None => Ok(()),
        // Single year: the failure was already printed with its year prefix
        Some(code) if years.len() == 1 => Err(CliError {
            code,
            message: String::new(),
            hint: None,
        }),
        Some(_) => Err(CliError {
            code: EXIT_PARTIAL,
            message: format!("{failed} of {} years failed", years.len()),
            hint: None,
        }),
    }
}

/// Classify one year and write its SVG. Returns the summary for reporting.
fn render_year(
    config: &MapConfig,
    countries: &PlotCountries,
    year: &str,
    path: &Path,
) -> Result<MapSummary, CliError> {
    let result = run(config, countries, year).map_err(CliError::engine)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
        }
    }
    render_world_map(&result.mapping, countries, year, path).map_err(CliError::render)?;
    Ok(result.summary)
}

// ============================================================================
// resolve
// ============================================================================

fn cmd_resolve(
    config_path: PathBuf,
    year: String,
    countries_file: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let countries = match &countries_file {
        Some(path) => load_countries(path)?,
        None => world_countries(),
    };
    warn_year_out_of_range(&config, &year);

    let result = run(&config, &countries, &year).map_err(CliError::engine)?;

    if json {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
        return Ok(());
    }

    // Human output goes to stderr; stdout is reserved for --json.
    let s = &result.summary;
    eprintln!(
        "{year}: {} of {} countries plotted, {} missing, {} no data",
        s.plotted, s.plot_countries, s.missing, s.no_data,
    );
    if !result.mapping.missing.is_empty() {
        eprintln!("missing: {}", join_codes(&result.mapping.missing));
    }
    if !result.mapping.no_data.is_empty() {
        eprintln!("no data: {}", join_codes(&result.mapping.no_data));
    }
    Ok(())
}

fn join_codes(codes: &std::collections::BTreeSet<String>) -> String {
    codes.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!("config ok: {}", config_path.display());
    eprintln!("gdp file:   {}", config.gdp.file);
    eprintln!("code file:  {}", config.codes.file);
    Ok(())
}

// ============================================================================
// version
// ============================================================================

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
}
