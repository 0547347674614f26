use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event_impact::{
    all_events, build_dashboard, BarChart as BarChartModel, Dashboard, DataContext, EventProfile,
    LineChart, PAGE_TITLE,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

const SERIES_COLORS: [Color; 7] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::Blue,
    Color::White,
];

pub struct App<'a> {
    ctx: &'a DataContext,
    pub selected: usize,
    pub dashboard: Dashboard,
    pub narrative_scroll: u16,
}

impl<'a> App<'a> {
    pub fn new(ctx: &'a DataContext) -> Self {
        let dashboard = build_dashboard(ctx, &all_events()[0]);

        Self {
            ctx,
            selected: 0,
            dashboard,
            narrative_scroll: 0,
        }
    }

    pub fn event(&self) -> &'static EventProfile {
        &all_events()[self.selected]
    }

    /// Switch event and recompute everything from the loaded tables
    pub fn select(&mut self, index: usize) {
        if index >= all_events().len() {
            return;
        }

        self.selected = index;
        self.dashboard = build_dashboard(self.ctx, self.event());
        self.narrative_scroll = 0;

        tracing::debug!(event = self.event().key, rows = self.dashboard.joined_rows, "event selected");
    }

    pub fn next_event(&mut self) {
        self.select((self.selected + 1) % all_events().len());
    }

    pub fn previous_event(&mut self) {
        let len = all_events().len();
        self.select((self.selected + len - 1) % len);
    }

    pub fn scroll_down(&mut self) {
        self.narrative_scroll = self.narrative_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.narrative_scroll = self.narrative_scroll.saturating_sub(1);
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => app.previous_event(),
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_event(),
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_event(),
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    app.select(index);
                }
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with event tabs
            Constraint::Min(0),    // Charts and commentary
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_content(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        format!("{}  ", PAGE_TITLE),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (i, event) in all_events().iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if i == app.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{}. {}", i + 1, event.label), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

/// Top row: line charts. Bottom row: YoY bars (if any) and commentary.
fn render_content(f: &mut Frame, area: Rect, app: &App) {
    let dashboard = &app.dashboard;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut line_charts = vec![&dashboard.gdp_chart];
    if let Some(housing) = &dashboard.housing_chart {
        line_charts.push(housing);
    }

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(even_split(line_charts.len()))
        .split(rows[0]);
    for (chart, cell) in line_charts.into_iter().zip(top.iter()) {
        render_line_chart(f, *cell, chart);
    }

    match &dashboard.yoy_chart {
        Some(yoy) => {
            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[1]);
            render_bar_chart(f, bottom[0], yoy);
            render_narrative(f, bottom[1], app);
        }
        None => render_narrative(f, rows[1], app),
    }
}

fn even_split(n: usize) -> Vec<Constraint> {
    let n = n.max(1) as u32;
    (0..n).map(|_| Constraint::Ratio(1, n)).collect()
}

fn render_line_chart(f: &mut Frame, area: Rect, chart: &LineChart) {
    let points: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x as f64, p.y)).collect())
        .collect();

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let all_points = points.iter().flatten();
    let (x_min, x_max, y_min, y_max) = bounds(all_points, chart);

    let x_labels: Vec<Span> = x_axis_labels(chart, x_min, x_max)
        .into_iter()
        .map(Span::raw)
        .collect();

    let y_labels = vec![
        Span::raw(compact(y_min)),
        Span::raw(compact((y_min + y_max) / 2.0)),
        Span::raw(compact(y_max)),
    ];

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", chart.title)),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(widget, area);
}

/// ratatui spreads labels evenly across the bounds, so emit one per year.
/// Years with no explicit tick stay blank when the chart has ticks.
fn x_axis_labels(chart: &LineChart, x_min: f64, x_max: f64) -> Vec<String> {
    (x_min.round() as i32..=x_max.round() as i32)
        .map(|year| {
            if chart.x_ticks.is_empty() {
                return year.to_string();
            }
            chart
                .x_ticks
                .iter()
                .find(|t| t.value == year)
                .map(|t| t.label.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// Axis bounds covering every point (and every explicit tick)
fn bounds<'p>(points: impl Iterator<Item = &'p (f64, f64)>, chart: &LineChart) -> (f64, f64, f64, f64) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    for tick in &chart.x_ticks {
        x_min = x_min.min(tick.value as f64);
        x_max = x_max.max(tick.value as f64);
    }

    if x_min > x_max {
        x_min = 2015.0;
        x_max = 2023.0;
    }
    if y_min > y_max {
        y_min = 0.0;
        y_max = 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_max = y_min + 1.0;
    }

    let pad = (y_max - y_min) * 0.05;
    (x_min, x_max, y_min - pad, y_max + pad)
}

/// Terminal bars cannot go below zero: height is |YoY %|, sign is colour
fn render_bar_chart(f: &mut Frame, area: Rect, chart: &BarChartModel) {
    let mut widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} (height = |YoY %|, red = decline) ", chart.title)),
        )
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3);

    for group in &chart.groups {
        let bars: Vec<Bar> = group
            .bars
            .iter()
            .map(|bar| {
                let (value, text, color) = match bar.value {
                    Some(pct) => (
                        (pct.abs() * 10.0).round() as u64,
                        format!("{:+.1}", pct),
                        if pct < 0.0 { Color::Red } else { Color::Green },
                    ),
                    None => (0, "n/a".to_string(), Color::DarkGray),
                };

                Bar::default()
                    .value(value)
                    .text_value(text)
                    .label(Line::from(truncate(&bar.country, 6)))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        widget = widget.data(
            BarGroup::default()
                .label(Line::from(group.name.clone()))
                .bars(&bars),
        );
    }

    f.render_widget(widget, area);
}

fn render_narrative(f: &mut Frame, area: Rect, app: &App) {
    let narrative = &app.dashboard.narrative;
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("📉 GDP Impact", heading))];
    lines.extend(narrative.gdp.iter().map(|s| Line::from(format!("• {}", s))));

    if !narrative.housing.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("🏠 Housing Price Impact", heading)));
        lines.extend(narrative.housing.iter().map(|s| Line::from(format!("• {}", s))));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((app.narrative_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", app.event().label)),
        );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(
            format!(" Rows: {} ", app.dashboard.joined_rows),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("1-3", Style::default().fg(Color::Yellow)),
        Span::raw(" Event | "),
        Span::styled("Tab/←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Cycle | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll notes | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

/// 21380976000000 → "21.4T"
fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else {
        format!("{:.1}", value)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_impact::{AxisTick, GdpRecord, YearRange};

    fn test_context() -> DataContext {
        let gdp = (2015..=2023)
            .flat_map(|year| {
                vec![
                    GdpRecord::new("USA", year, Some(1e13 + year as f64)),
                    GdpRecord::new("Russia", year, Some(1e12 + year as f64)),
                ]
            })
            .collect();

        DataContext::new(gdp, Vec::new(), YearRange::ANALYSIS)
    }

    #[test]
    fn test_app_starts_on_default_event() {
        let ctx = test_context();
        let app = App::new(&ctx);

        assert_eq!(app.selected, 0);
        assert_eq!(app.dashboard.event_key, "covid-19");
    }

    #[test]
    fn test_cycling_events_recomputes_dashboard() {
        let ctx = test_context();
        let mut app = App::new(&ctx);

        app.next_event();
        assert_eq!(app.dashboard.event_key, "us-china-trade-war");
        assert!(app.dashboard.yoy_chart.is_none());

        app.previous_event();
        app.previous_event();
        assert_eq!(app.dashboard.event_key, "russia-ukraine-war");
        assert!(app.dashboard.housing_chart.is_none());
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let ctx = test_context();
        let mut app = App::new(&ctx);

        app.select(8);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_selection_resets_scroll() {
        let ctx = test_context();
        let mut app = App::new(&ctx);

        app.scroll_down();
        app.scroll_down();
        app.scroll_up();
        assert_eq!(app.narrative_scroll, 1);

        app.select(2);
        assert_eq!(app.narrative_scroll, 0);
    }

    fn chart_with_ticks(ticks: &[(i32, &str)]) -> LineChart {
        LineChart {
            heading: "Housing Market".to_string(),
            title: "Housing".to_string(),
            x_title: "Year".to_string(),
            y_title: "House Price Index".to_string(),
            series: Vec::new(),
            x_ticks: ticks
                .iter()
                .map(|&(value, label)| AxisTick {
                    value,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_x_axis_labels_stay_aligned_across_gaps() {
        // 2017 has no joined row, so no tick
        let chart = chart_with_ticks(&[(2015, "2016"), (2016, "2017"), (2018, "2019")]);

        let labels = x_axis_labels(&chart, 2015.0, 2018.0);

        assert_eq!(labels, vec!["2016", "2017", "", "2019"]);
    }

    #[test]
    fn test_x_axis_labels_default_to_years() {
        let chart = chart_with_ticks(&[]);
        assert_eq!(x_axis_labels(&chart, 2019.0, 2021.0), vec!["2019", "2020", "2021"]);
    }

    #[test]
    fn test_compact_formatting() {
        assert_eq!(compact(21_380_976_000_000.0), "21.4T");
        assert_eq!(compact(153_781_000_000.0), "153.8B");
        assert_eq!(compact(2_500_000.0), "2.5M");
        assert_eq!(compact(118.5), "118.5");
    }
}
