// 📊 Dashboard Model
//
// Pure function from (loaded data, selected event) to everything the
// presentation layer draws. Renderers (terminal, browser) only read this.

use crate::context::DataContext;
use crate::events::EventProfile;
use crate::join::{filter_join, JoinedRow};
use crate::metrics::{compute_yoy, restrict_to_years, YoyRow};
use serde::Serialize;
use std::collections::BTreeSet;

pub const PAGE_TITLE: &str = "Global Events: GDP & Housing Market Impact (2015–2023)";

// ============================================================================
// CHART TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<Point>,
}

/// Tick placed at `value` but printed as `label`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub heading: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LineSeries>,
    /// Explicit x ticks; empty means the renderer picks its own
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_ticks: Vec<AxisTick>,
}

impl LineChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub country: String,
    /// `None` draws no bar (no prior year to compare with)
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub year: i32,
    pub name: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub heading: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub groups: Vec<BarGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub gdp: Vec<String>,
    pub housing: Vec<String>,
}

/// Everything shown for one event selection, in page order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub event_key: String,
    pub event_label: String,
    pub countries: Vec<String>,
    pub joined_rows: usize,
    pub gdp_chart: LineChart,
    pub yoy_chart: Option<BarChart>,
    pub housing_chart: Option<LineChart>,
    pub narrative: Narrative,
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Recompute the whole dashboard for `event`. Same inputs, same output.
pub fn build_dashboard(ctx: &DataContext, event: &EventProfile) -> Dashboard {
    let joined = filter_join(ctx.gdp(), ctx.housing(), event.countries, ctx.year_range());

    tracing::debug!(event = event.key, rows = joined.len(), "joined event data");

    let gdp_chart = gdp_line_chart(event, &joined);

    let yoy_chart = event.yoy.as_ref().map(|spec| {
        let yoy = restrict_to_years(compute_yoy(&joined), spec.display_years);
        BarChart {
            heading: spec.heading.to_string(),
            title: spec.title.to_string(),
            x_title: "Country".to_string(),
            y_title: "YoY Change (%)".to_string(),
            groups: yoy_groups(&yoy, spec.display_years),
        }
    });

    let housing_chart = event
        .has_housing_chart()
        .then(|| housing_line_chart(event, &joined));

    Dashboard {
        event_key: event.key.to_string(),
        event_label: event.label.to_string(),
        countries: event.countries.iter().map(|c| c.to_string()).collect(),
        joined_rows: joined.len(),
        gdp_chart,
        yoy_chart,
        housing_chart,
        narrative: Narrative {
            gdp: event.narrative_gdp.iter().map(|s| s.to_string()).collect(),
            housing: event.narrative_housing.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn gdp_line_chart(event: &EventProfile, joined: &[JoinedRow]) -> LineChart {
    LineChart {
        heading: format!("GDP Trends During: {}", event.label),
        title: format!("{} - GDP Comparison", event.label),
        x_title: "Year".to_string(),
        y_title: "GDP (USD)".to_string(),
        series: country_series(event.countries, joined, |row| Some(row.gdp)),
        x_ticks: Vec::new(),
    }
}

fn housing_line_chart(event: &EventProfile, joined: &[JoinedRow]) -> LineChart {
    LineChart {
        heading: format!("House Price Index Trends During: {}", event.label),
        title: format!("{} - Housing Price Index Comparison", event.label),
        x_title: "Year".to_string(),
        y_title: "House Price Index".to_string(),
        series: country_series(event.countries, joined, JoinedRow::house_price_index),
        x_ticks: housing_axis_ticks(joined),
    }
}

/// One series per event country, in event order. Rows where `value` yields
/// nothing are skipped; points are sorted by year.
fn country_series<F>(countries: &[&str], joined: &[JoinedRow], value: F) -> Vec<LineSeries>
where
    F: Fn(&JoinedRow) -> Option<f64>,
{
    countries
        .iter()
        .map(|&country| {
            let mut points: Vec<Point> = joined
                .iter()
                .filter(|row| row.country_name == country)
                .filter_map(|row| value(row).map(|y| Point { x: row.year, y }))
                .collect();
            points.sort_by_key(|p| p.x);

            LineSeries {
                name: country.to_string(),
                points,
            }
        })
        .collect()
}

/// Ticks for every distinct joined year, labelled one year later.
///
/// The label shift is display-only: points stay at their real year.
/// Kept as observed pending product confirmation.
pub fn housing_axis_ticks(joined: &[JoinedRow]) -> Vec<AxisTick> {
    let years: BTreeSet<i32> = joined.iter().map(|row| row.year).collect();

    years
        .into_iter()
        .map(|year| AxisTick {
            value: year,
            label: (year + 1).to_string(),
        })
        .collect()
}

fn yoy_groups(yoy: &[YoyRow], display_years: &[i32]) -> Vec<BarGroup> {
    display_years
        .iter()
        .map(|&year| BarGroup {
            year,
            name: year.to_string(),
            bars: yoy
                .iter()
                .filter(|r| r.row.year == year)
                .map(|r| Bar {
                    country: r.row.country_name.clone(),
                    value: r.gdp_yoy_pct,
                })
                .collect(),
        })
        .collect()
}
