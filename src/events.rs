// 🌍 Event Catalog
//
// Each historical event is a profile: which countries it concerns, which
// charts it shows, and the commentary printed beside them. Adding an event
// means adding a profile here, not another branch in the renderers.

use anyhow::{anyhow, Result};
use serde::Serialize;

/// Year-over-year bar chart settings for an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoyChartSpec {
    /// Groups shown, in order. The metric itself is computed over all years.
    pub display_years: &'static [i32],
    pub heading: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventProfile {
    /// URL/CLI friendly identifier
    pub key: &'static str,
    /// Label shown in the selector
    pub label: &'static str,
    pub countries: &'static [&'static str],
    pub yoy: Option<YoyChartSpec>,
    pub housing_chart: bool,
    pub narrative_gdp: &'static [&'static str],
    pub narrative_housing: &'static [&'static str],
}

impl EventProfile {
    pub fn has_yoy_chart(&self) -> bool {
        self.yoy.is_some()
    }

    pub fn has_housing_chart(&self) -> bool {
        self.housing_chart
    }

    pub fn yoy_display_years(&self) -> &'static [i32] {
        self.yoy.as_ref().map(|spec| spec.display_years).unwrap_or(&[])
    }
}

pub const COVID_19: EventProfile = EventProfile {
    key: "covid-19",
    label: "2020 - Global - COVID-19",
    countries: &["USA", "UK", "China", "Russia", "Germany", "France", "Australia"],
    yoy: Some(YoyChartSpec {
        display_years: &[2020, 2021],
        heading: "GDP Year-over-Year Change in 2020 and 2021 (COVID-19 Impact)",
        title: "GDP Change in 2020 and 2021 Due to COVID-19",
    }),
    housing_chart: true,
    narrative_gdp: &[
        "In 2020, most countries experienced GDP declines due to lockdowns and economic disruptions.",
        "The U.S. rebounded strongly in 2021 with large-scale fiscal stimulus.",
        "China returned to positive growth early by controlling the virus and reopening factories.",
        "European nations had delayed recovery due to prolonged restrictions.",
    ],
    narrative_housing: &[
        "Housing prices rose in countries like the U.S., Canada, and Australia, fueled by low interest rates and stimulus.",
        "China saw stabilization or slight decline due to tighter housing market controls.",
    ],
};

pub const US_CHINA_TRADE_WAR: EventProfile = EventProfile {
    key: "us-china-trade-war",
    label: "2018 - US-China Trade War",
    countries: &["USA", "China"],
    yoy: None,
    housing_chart: true,
    narrative_gdp: &[
        "2018–2019: The trade war began with escalating tariffs. China’s GDP growth rate slightly slowed, although absolute GDP kept increasing. The U.S. GDP grew steadily in absolute terms, but growth momentum showed signs of moderation by 2020.",
        "Housing prices remained steady due to domestic policy interventions.",
    ],
    narrative_housing: &[
        "2018–2019: The U.S. housing price index slightly increased, indicating resilience in the domestic housing market despite tariffs. Low interest rates and internal demand likely cushioned impacts.",
        "China saw a noticeable dip in housing price index during and after 2018, reflecting economic caution, consumer uncertainty, and increased regulatory pressure on real estate developers.",
    ],
};

pub const RUSSIA_UKRAINE_WAR: EventProfile = EventProfile {
    key: "russia-ukraine-war",
    label: "2022 - Russia-Ukraine War",
    countries: &["Russia", "Ukraine"],
    yoy: Some(YoyChartSpec {
        display_years: &[2021, 2022, 2023],
        heading: "GDP YoY % Change by Country (2021–2023)",
        title: "GDP YoY % Change for 2021–2023",
    }),
    // Housing coverage for these countries is too sparse to chart
    housing_chart: false,
    narrative_gdp: &[
        "2022: Sanctions and war-related disruptions caused GDP declines in Russia and Ukraine.",
        "Ukraine's GDP plummeted in 2022 (as shown in the figure, it fell nearly 20% year-on-year in 2022), making the growth in 2023 appear \"obvious\".",
        "In 2023, a large amount of EU, US and IMF aid will flow into Ukraine to help it maintain operations.",
    ],
    narrative_housing: &[],
};

/// All events, in selector order. The first is the default selection.
pub static EVENTS: [EventProfile; 3] = [COVID_19, US_CHINA_TRADE_WAR, RUSSIA_UKRAINE_WAR];

pub fn all_events() -> &'static [EventProfile] {
    &EVENTS
}

pub fn default_event() -> &'static EventProfile {
    &EVENTS[0]
}

pub fn find_event(key: &str) -> Option<&'static EventProfile> {
    EVENTS.iter().find(|e| e.key == key)
}

pub fn find_event_by_label(label: &str) -> Option<&'static EventProfile> {
    EVENTS.iter().find(|e| e.label == label)
}

/// Like `find_event`, but an unknown key is an error naming the valid keys
pub fn resolve_event(key: &str) -> Result<&'static EventProfile> {
    find_event(key).ok_or_else(|| {
        let keys: Vec<&str> = EVENTS.iter().map(|e| e.key).collect();
        anyhow!("Unknown event {:?} (expected one of: {})", key, keys.join(", "))
    })
}

/// One `key  label` line per event, in selector order
pub fn event_listing() -> String {
    EVENTS
        .iter()
        .map(|e| format!("{:<20} {}\n", e.key, e.label))
        .collect()
}
