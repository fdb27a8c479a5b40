//! Plain-text rendering of dashboard panels.

use std::fmt::{self, Write};

use weather_core::{
    ArcGeometry, Dashboard,
    dashboard::{AirQualityPanel, ForecastEntry, SunPanel, TimelineEntry},
    solar::compute_arc_position,
};

/// Arc the sun panel is drawn on. Columns are half as wide as rows are tall,
/// so x is doubled when mapped onto the grid.
pub const SUN_ARC: ArcGeometry = ArcGeometry { center_x: 8.0, center_y: 8.0, radius: 8.0 };

const ARC_COLS: usize = 33;
const ARC_ROWS: usize = 9;
const AQI_BAR_WIDTH: usize = 21;

pub fn render_dashboard(dash: &Dashboard) -> String {
    DashboardView(dash).to_string()
}

/// Displays every panel of a dashboard, top to bottom.
pub struct DashboardView<'a>(pub &'a Dashboard);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dashboard(f, self.0)
    }
}

fn write_dashboard(out: &mut impl Write, dash: &Dashboard) -> fmt::Result {
    let current = &dash.current;

    writeln!(out, "{}", current.location)?;
    writeln!(out, "  {}°C  {}", current.temperature, current.description)?;
    let visibility = current.visibility_km.as_deref().unwrap_or("--");
    writeln!(
        out,
        "  Pressure {} hPa · Visibility {visibility} km · Humidity {}%",
        current.pressure_hpa, current.humidity_pct
    )?;
    writeln!(out)?;

    match &dash.air_quality {
        Some(aq) => render_air_quality(out, aq)?,
        None => writeln!(out, "Air quality  unavailable")?,
    }
    writeln!(out)?;

    writeln!(out, "UV  {} {} · {}", dash.uv.index, dash.uv.class.level, dash.uv.class.message)?;
    writeln!(out)?;

    render_sun(out, &dash.sun)?;
    writeln!(out)?;

    render_timeline(out, &dash.timeline)?;
    writeln!(out)?;

    if let Some(tomorrow) = &dash.tomorrow {
        writeln!(
            out,
            "Tomorrow in {}: {}° {}",
            tomorrow.city, tomorrow.max_temp, tomorrow.condition
        )?;
        writeln!(out)?;
    }

    render_forecast(out, &dash.forecast)
}

fn render_air_quality(out: &mut impl Write, aq: &AirQualityPanel) -> fmt::Result {
    writeln!(out, "Air quality  {} {}", aq.aqi, aq.label)?;

    let marker = (aq.bar_percent.clamp(0.0, 100.0) / 100.0 * (AQI_BAR_WIDTH - 1) as f64).round() as usize;
    let bar: String =
        (0..AQI_BAR_WIDTH).map(|i| if i == marker { '●' } else { '─' }).collect();
    writeln!(out, "  Good {bar} Very Poor")
}

fn render_sun(out: &mut impl Write, sun: &SunPanel) -> fmt::Result {
    writeln!(out, "Sun  {} · {}°C", sun.location, sun.temperature)?;
    writeln!(
        out,
        "  sunrise {} · now {} · sunset {}",
        sun.sunrise, sun.current_time, sun.sunset
    )?;

    for line in sun_arc_lines(sun) {
        writeln!(out, "  {}", line.trim_end())?;
    }
    Ok(())
}

/// Grid cell for an arc point, or `None` when it falls outside the grid.
fn arc_cell(x: f64, y: f64) -> Option<(usize, usize)> {
    let col = (x * 2.0).round();
    let row = y.round();
    if col < 0.0 || row < 0.0 {
        return None;
    }
    let (col, row) = (col as usize, row as usize);
    (col < ARC_COLS && row < ARC_ROWS).then_some((row, col))
}

fn sun_arc_lines(sun: &SunPanel) -> Vec<String> {
    let mut grid = vec![vec![' '; ARC_COLS]; ARC_ROWS];

    const STEPS: usize = 64;
    for step in 0..=STEPS {
        let point = compute_arc_position(step as f64 / STEPS as f64, SUN_ARC);
        if let Some((row, col)) = arc_cell(point.x, point.y) {
            grid[row][col] = '·';
        }
    }

    if let Some((row, col)) = sun.position.and_then(|pos| arc_cell(pos.x, pos.y)) {
        grid[row][col] = '☀';
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn render_timeline(out: &mut impl Write, timeline: &[TimelineEntry]) -> fmt::Result {
    writeln!(out, "Today")?;

    if timeline.is_empty() {
        return writeln!(out, "  No data for today");
    }

    let cells: Vec<String> = timeline
        .iter()
        .map(|t| {
            let cell = format!("{} {} {}°C", t.label, t.icon, t.temperature);
            if t.active { format!("[{cell}]") } else { cell }
        })
        .collect();
    writeln!(out, "  {}", cells.join("  "))
}

fn render_forecast(out: &mut impl Write, forecast: &[ForecastEntry]) -> fmt::Result {
    writeln!(out, "Next {} days", forecast.len())?;

    for entry in forecast {
        writeln!(
            out,
            "  {:<12} {} {:<12} {:>3}° / {}°",
            entry.date_label, entry.icon, entry.condition, entry.max_temp, entry.min_temp
        )?;
    }
    Ok(())
}
