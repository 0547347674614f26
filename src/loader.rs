// 📂 Dataset Loader
// Reads the GDP (wide) and housing (long) CSV sources into memory.
//
// Any failure here is fatal: the dashboard never starts on partial data.

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default GDP source (World Bank export, one column per year)
pub const DEFAULT_GDP_PATH: &str = "All Countries and Economies GDP (US) 1960-2023.csv";

/// Default housing source (one row per country/year)
pub const DEFAULT_HOUSING_PATH: &str = "global_housing_market_extended.csv";

pub const GDP_COUNTRY_COLUMN: &str = "Country Name";
pub const HOUSING_COUNTRY_COLUMN: &str = "Country";
pub const HOUSING_YEAR_COLUMN: &str = "Year";
pub const HOUSING_HPI_COLUMN: &str = "House Price Index";

// ============================================================================
// GDP (WIDE)
// ============================================================================

/// One row of the wide GDP table: a country and its raw cells
#[derive(Debug, Clone, PartialEq)]
pub struct GdpWideRow {
    pub country_name: String,
    /// Cells aligned with `GdpWideTable::headers` (country column included)
    pub cells: Vec<String>,
}

/// Wide GDP table exactly as read: headers plus one row per country
#[derive(Debug, Clone, PartialEq)]
pub struct GdpWideTable {
    pub headers: Vec<String>,
    pub rows: Vec<GdpWideRow>,
}

impl GdpWideTable {
    /// Cell at `column` for `row`, `None` when the row is short
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(column))
            .map(|s| s.as_str())
    }
}

pub fn load_gdp_table(path: &Path) -> Result<GdpWideTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open GDP file: {}", path.display()))?;

    load_gdp_from_reader(file, &display_name(path))
}

/// Parse a wide GDP table from any reader. `source` names it in errors.
pub fn load_gdp_from_reader<R: Read>(reader: R, source: &str) -> Result<GdpWideTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", source))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let country_idx = column_index(&headers, GDP_COUNTRY_COLUMN, source)?;

    let mut rows = Vec::new();
    for (line_num, result) in rdr.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, source)
        })?;

        let country_name = record.get(country_idx).unwrap_or("").to_string();
        let cells = record.iter().map(|c| c.to_string()).collect();

        rows.push(GdpWideRow { country_name, cells });
    }

    tracing::debug!(source, rows = rows.len(), columns = headers.len(), "loaded GDP table");

    Ok(GdpWideTable { headers, rows })
}

// ============================================================================
// HOUSING (LONG)
// ============================================================================

/// One housing observation. Columns other than country/year/index are kept
/// verbatim, in source order, under `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    pub country: String,
    pub year: i32,
    pub house_price_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl HousingRecord {
    pub fn new(country: &str, year: i32, house_price_index: Option<f64>) -> Self {
        HousingRecord {
            country: country.to_string(),
            year,
            house_price_index,
            extra: Vec::new(),
        }
    }

    /// Pass-through field by column name
    pub fn field(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

pub fn load_housing_table(path: &Path) -> Result<Vec<HousingRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open housing file: {}", path.display()))?;

    load_housing_from_reader(file, &display_name(path))
}

pub fn load_housing_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<HousingRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", source))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let country_idx = column_index(&headers, HOUSING_COUNTRY_COLUMN, source)?;
    let year_idx = column_index(&headers, HOUSING_YEAR_COLUMN, source)?;
    let hpi_idx = column_index(&headers, HOUSING_HPI_COLUMN, source)?;

    let mut records = Vec::new();
    for (line_num, result) in rdr.records().enumerate() {
        let line = line_num + 2; // 1-indexed + header row
        let record = result
            .with_context(|| format!("Failed to parse CSV line {} in {}", line, source))?;

        records.push(housing_record(&headers, &record, [country_idx, year_idx, hpi_idx], line, source)?);
    }

    tracing::debug!(source, rows = records.len(), "loaded housing table");

    Ok(records)
}

fn housing_record(
    headers: &[String],
    record: &StringRecord,
    [country_idx, year_idx, hpi_idx]: [usize; 3],
    line: usize,
    source: &str,
) -> Result<HousingRecord> {
    let country = record.get(country_idx).unwrap_or("").to_string();

    let year_raw = record.get(year_idx).unwrap_or("").trim();
    let year = parse_year(year_raw)
        .with_context(|| format!("Invalid year {:?} on line {} in {}", year_raw, line, source))?;

    let house_price_index = parse_optional_f64(record.get(hpi_idx).unwrap_or(""))
        .with_context(|| format!("Invalid {} on line {} in {}", HOUSING_HPI_COLUMN, line, source))?;

    let extra = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| ![country_idx, year_idx, hpi_idx].contains(i))
        .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
        .collect();

    Ok(HousingRecord {
        country,
        year,
        house_price_index,
        extra,
    })
}

// ============================================================================
// CELL PARSING
// ============================================================================

/// Cell spellings read as missing (common spreadsheet and dataframe NA markers)
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Empty cell, NA token or NaN → `None`; otherwise must be a number
pub fn parse_optional_f64(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if NA_TOKENS.contains(&trimmed) {
        return Ok(None);
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_| anyhow!("not a number: {:?}", trimmed))?;

    // "NaN" spellings outside the token set still mean missing
    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Integer year. Accepts a float spelling with no fraction ("2019.0").
fn parse_year(raw: &str) -> Result<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.abs() < i32::MAX as f64 => Ok(value as i32),
        _ => Err(anyhow!("not an integer year")),
    }
}

fn column_index(headers: &[String], column: &str, source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| anyhow!("Missing required column {:?} in {}", column, source))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
        .to_string()
}
