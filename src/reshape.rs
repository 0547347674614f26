// 🔄 Reshaper - wide GDP table → long (country, year, gdp) records

use crate::loader::{parse_optional_f64, GdpWideTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Closed range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// The window every event is analysed over
    pub const ANALYSIS: YearRange = YearRange { start: 2015, end: 2023 };

    pub fn new(start: i32, end: i32) -> Self {
        YearRange { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange::ANALYSIS
    }
}

/// Long-form GDP observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpRecord {
    pub country_name: String,
    pub year: i32,
    pub gdp: Option<f64>,
}

impl GdpRecord {
    pub fn new(country_name: &str, year: i32, gdp: Option<f64>) -> Self {
        GdpRecord {
            country_name: country_name.to_string(),
            year,
            gdp,
        }
    }
}

/// A header qualifies when it is exactly four ASCII digits inside `range`
pub fn year_column(header: &str, range: YearRange) -> Option<i32> {
    if header.len() != 4 || !header.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    header.parse::<i32>().ok().filter(|year| range.contains(*year))
}

/// Melt the wide table into one record per (country, qualifying year).
///
/// Output is column-major: every country for the first qualifying year, then
/// the next year, and so on. Empty cells become records with `gdp: None`.
pub fn melt_gdp(table: &GdpWideTable, range: YearRange) -> Result<Vec<GdpRecord>> {
    let year_columns: Vec<(usize, i32)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| year_column(header, range).map(|year| (idx, year)))
        .collect();

    let mut records = Vec::with_capacity(year_columns.len() * table.rows.len());

    for &(column, year) in &year_columns {
        for (row_idx, row) in table.rows.iter().enumerate() {
            let raw = table.cell(row_idx, column).unwrap_or("");
            let gdp = parse_optional_f64(raw).with_context(|| {
                format!("Invalid GDP value for {} in {}", row.country_name, year)
            })?;

            records.push(GdpRecord {
                country_name: row.country_name.clone(),
                year,
                gdp,
            });
        }
    }

    Ok(records)
}
