// Event Impact Dashboard - Core Library
// Exposes all modules for use in the terminal UI, API server, and tests

pub mod config;
pub mod context;
pub mod dashboard;
pub mod events;
pub mod join;
pub mod loader;
pub mod metrics;
pub mod reshape;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use config::{init_tracing, DataArgs};
pub use context::{DataContext, DataPaths};
pub use dashboard::{
    build_dashboard, housing_axis_ticks,
    AxisTick, Bar, BarChart, BarGroup, Dashboard, LineChart, LineSeries, Narrative, Point,
    PAGE_TITLE,
};
pub use events::{
    all_events, default_event, event_listing, find_event, find_event_by_label, resolve_event,
    EventProfile, YoyChartSpec,
    COVID_19, RUSSIA_UKRAINE_WAR, US_CHINA_TRADE_WAR,
};
pub use join::{filter_join, JoinedRow};
pub use loader::{
    load_gdp_table, load_housing_table, load_gdp_from_reader, load_housing_from_reader,
    GdpWideRow, GdpWideTable, HousingRecord,
};
pub use metrics::{compute_yoy, pct_change, restrict_to_years, YoyRow};
pub use reshape::{melt_gdp, GdpRecord, YearRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
