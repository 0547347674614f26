// 🗃️ Data Context - the loaded tables, built once and shared read-only

use crate::loader::{load_gdp_table, load_housing_table, HousingRecord, DEFAULT_GDP_PATH, DEFAULT_HOUSING_PATH};
use crate::reshape::{melt_gdp, GdpRecord, YearRange};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where the two source tables live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub gdp: PathBuf,
    pub housing: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            gdp: PathBuf::from(DEFAULT_GDP_PATH),
            housing: PathBuf::from(DEFAULT_HOUSING_PATH),
        }
    }
}

/// Immutable inputs to every dashboard computation.
///
/// GDP is stored already melted to long form and restricted to `year_range`.
/// Housing is stored as loaded; year filtering happens per selection.
#[derive(Debug, Clone)]
pub struct DataContext {
    gdp: Vec<GdpRecord>,
    housing: Vec<HousingRecord>,
    year_range: YearRange,
}

impl DataContext {
    pub fn new(gdp: Vec<GdpRecord>, housing: Vec<HousingRecord>, year_range: YearRange) -> Self {
        DataContext {
            gdp,
            housing,
            year_range,
        }
    }

    /// Load and reshape both sources. Any failure aborts startup.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Self::load_with_range(&paths.gdp, &paths.housing, YearRange::ANALYSIS)
    }

    pub fn load_with_range(gdp_path: &Path, housing_path: &Path, year_range: YearRange) -> Result<Self> {
        let wide = load_gdp_table(gdp_path)?;
        let gdp = melt_gdp(&wide, year_range)
            .with_context(|| format!("Failed to reshape GDP table {}", gdp_path.display()))?;
        let housing = load_housing_table(housing_path)?;

        tracing::info!(
            gdp_countries = wide.rows.len(),
            gdp_records = gdp.len(),
            housing_records = housing.len(),
            start = year_range.start,
            end = year_range.end,
            "datasets loaded"
        );

        Ok(Self::new(gdp, housing, year_range))
    }

    pub fn gdp(&self) -> &[GdpRecord] {
        &self.gdp
    }

    pub fn housing(&self) -> &[HousingRecord] {
        &self.housing
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }
}
