// 🔗 Filter-Join Engine
//
// Narrows both tables to an event's countries, then right-joins housing onto
// GDP by (country, year). Rows without GDP are dropped, so a `JoinedRow`
// always carries a value.

use crate::loader::HousingRecord;
use crate::reshape::{GdpRecord, YearRange};
use serde::Serialize;
use std::collections::HashMap;

/// GDP observation with its matching housing record, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub country_name: String,
    pub year: i32,
    pub gdp: f64,
    pub housing: Option<HousingRecord>,
}

impl JoinedRow {
    pub fn house_price_index(&self) -> Option<f64> {
        self.housing
            .as_ref()
            .and_then(|h| h.house_price_index)
            .filter(|v| !v.is_nan())
    }
}

pub fn filter_gdp<'a>(records: &'a [GdpRecord], countries: &[&str]) -> Vec<&'a GdpRecord> {
    records
        .iter()
        .filter(|r| countries.contains(&r.country_name.as_str()))
        .collect()
}

pub fn filter_housing<'a>(
    records: &'a [HousingRecord],
    countries: &[&str],
    range: YearRange,
) -> Vec<&'a HousingRecord> {
    records
        .iter()
        .filter(|r| countries.contains(&r.country.as_str()) && range.contains(r.year))
        .collect()
}

/// Filter both sides, right-join housing onto GDP, drop rows lacking GDP.
///
/// Every surviving GDP record yields one row per matching housing record, or
/// a single row with `housing: None` when nothing matches. Output follows the
/// GDP side's order. Country keys compare as exact strings.
pub fn filter_join(
    gdp: &[GdpRecord],
    housing: &[HousingRecord],
    countries: &[&str],
    range: YearRange,
) -> Vec<JoinedRow> {
    let gdp_filtered = filter_gdp(gdp, countries);
    let housing_filtered = filter_housing(housing, countries, range);

    let mut by_key: HashMap<(&str, i32), Vec<&HousingRecord>> = HashMap::new();
    for record in housing_filtered {
        by_key
            .entry((record.country.as_str(), record.year))
            .or_default()
            .push(record);
    }

    let mut joined = Vec::with_capacity(gdp_filtered.len());
    for record in gdp_filtered {
        let value = match record.gdp {
            Some(v) if !v.is_nan() => v,
            _ => continue,
        };

        match by_key.get(&(record.country_name.as_str(), record.year)) {
            Some(matches) => {
                for housing in matches {
                    joined.push(JoinedRow {
                        country_name: record.country_name.clone(),
                        year: record.year,
                        gdp: value,
                        housing: Some((*housing).clone()),
                    });
                }
            }
            None => joined.push(JoinedRow {
                country_name: record.country_name.clone(),
                year: record.year,
                gdp: value,
                housing: None,
            }),
        }
    }

    joined
}
