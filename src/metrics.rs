// 📈 Derived metrics - GDP year-over-year percent change

use crate::join::JoinedRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyRow {
    #[serde(flatten)]
    pub row: JoinedRow,
    /// `None` for a country's first year, or when the prior GDP is zero
    pub gdp_yoy_pct: Option<f64>,
}

/// Percent change from `previous` to `current`
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    let pct = (current - previous) / previous * 100.0;
    if pct.is_finite() {
        Some(pct)
    } else {
        None
    }
}

/// Attach GDP YoY % to every joined row.
///
/// Rows are ranked per country by year (stable, so ties keep their input
/// order) and compared with the preceding row of the same country. The whole
/// series is used; narrowing to display years is a separate step. Output
/// keeps the input order.
pub fn compute_yoy(rows: &[JoinedRow]) -> Vec<YoyRow> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        rows[a]
            .country_name
            .cmp(&rows[b].country_name)
            .then(rows[a].year.cmp(&rows[b].year))
    });

    let mut pct = vec![None; rows.len()];
    for pair in order.windows(2) {
        let (prev, cur) = (&rows[pair[0]], &rows[pair[1]]);
        if prev.country_name == cur.country_name {
            pct[pair[1]] = pct_change(prev.gdp, cur.gdp);
        }
    }

    rows.iter()
        .zip(pct)
        .map(|(row, gdp_yoy_pct)| YoyRow {
            row: row.clone(),
            gdp_yoy_pct,
        })
        .collect()
}

/// Keep rows whose year is one of `years`, preserving order
pub fn restrict_to_years(rows: Vec<YoyRow>, years: &[i32]) -> Vec<YoyRow> {
    rows.into_iter()
        .filter(|r| years.contains(&r.row.year))
        .collect()
}
