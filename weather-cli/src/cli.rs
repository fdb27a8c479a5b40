use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use tracing::debug;
use weather_core::{
    CityReport, Config, DashboardOptions, IconSet, RequestTracker, WeatherProvider,
    build_dashboard, load_city_tracked, provider_from_config,
};

use crate::render::{SUN_ARC, render_dashboard};

/// Window used when the forecast list is expanded.
const FULL_FORECAST_DAYS: usize = 5;
/// Collapsed window when the configured one is already at least the full window.
const COMPACT_FORECAST_DAYS: usize = 3;

/// Forecast window for the interactive toggle. The collapsed window is always
/// shorter than the expanded one.
fn forecast_window(configured_days: usize, expanded: bool) -> usize {
    match (expanded, configured_days < FULL_FORECAST_DAYS) {
        (true, _) => configured_days.max(FULL_FORECAST_DAYS),
        (false, true) => configured_days,
        (false, false) => COMPACT_FORECAST_DAYS,
    }
}

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the dashboard for a city.
    Show {
        /// City name; defaults to the last city shown.
        city: Option<String>,

        /// Number of upcoming days in the forecast list.
        #[arg(long)]
        days: Option<usize>,

        /// Icon set: emoji, lucide or lucide-timeline.
        #[arg(long)]
        icons: Option<IconSet>,

        /// Print the dashboard as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Search cities and toggle the forecast length interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city, days, icons, json } => show(city, days, icons, json).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    cfg.set_api_key(api_key);
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn dashboard_options(cfg: &Config, days: Option<usize>, icons: Option<IconSet>) -> DashboardOptions {
    DashboardOptions {
        window_size: days.unwrap_or(cfg.display.forecast_days),
        slots: cfg.display.slots.clone(),
        icon_set: icons.unwrap_or(cfg.display.icons),
        arc: SUN_ARC,
    }
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

async fn show(
    city: Option<String>,
    days: Option<usize>,
    icons: Option<IconSet>,
    json: bool,
) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let tracker = RequestTracker::new();

    let city = city.unwrap_or_else(|| cfg.startup_city().to_string());
    let Some(report) = load_city_tracked(provider.as_ref(), &tracker, &city)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?
    else {
        return Ok(());
    };

    let options = dashboard_options(&cfg, days, icons);
    let dash = build_dashboard(&report, &options, &today());

    if json {
        println!("{}", serde_json::to_string_pretty(&dash)?);
    } else {
        print!("{}", render_dashboard(&dash));
    }

    cfg.remember_city(&city);
    cfg.save()?;
    Ok(())
}

/// Interactive session: the last good report stays on screen until a newer
/// search succeeds.
struct Session {
    cfg: Config,
    provider: Box<dyn WeatherProvider>,
    tracker: RequestTracker,
    report: Option<CityReport>,
    expanded: bool,
}

impl Session {
    fn redraw(&self) {
        if let Some(report) = &self.report {
            let mut options = dashboard_options(&self.cfg, None, None);
            options.window_size = forecast_window(self.cfg.display.forecast_days, self.expanded);
            print!("\n{}", render_dashboard(&build_dashboard(report, &options, &today())));
        }
    }

    async fn search(&mut self, city: &str) -> anyhow::Result<()> {
        match load_city_tracked(self.provider.as_ref(), &self.tracker, city).await {
            Ok(Some(report)) => {
                self.report = Some(report);
                self.expanded = false;
                self.cfg.remember_city(city);
                self.cfg.save()?;
                self.redraw();
            }
            Ok(None) => debug!(city, "Search superseded"),
            Err(e) => eprintln!("{}", e.user_message()),
        }
        Ok(())
    }

    fn toggle_forecast(&mut self) {
        self.expanded = !self.expanded;
        self.redraw();
    }

    fn toggle_label(&self) -> &'static str {
        if self.expanded { "Show less" } else { "Next 5 days" }
    }
}

async fn interactive() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let startup = cfg.startup_city().to_string();

    let mut session =
        Session { cfg, provider, tracker: RequestTracker::new(), report: None, expanded: false };
    session.search(&startup).await?;

    const SEARCH: &str = "Search city";
    const QUIT: &str = "Quit";

    loop {
        let options = vec![SEARCH, session.toggle_label(), QUIT];
        let choice = match Select::new("What next?", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        match choice {
            SEARCH => {
                let city = match Text::new("City:").prompt() {
                    Ok(city) => city,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(e) => return Err(e).context("Failed to read city"),
                };
                let city = city.trim();
                if !city.is_empty() {
                    session.search(city).await?;
                }
            }
            QUIT => break,
            _ => session.toggle_forecast(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_flags() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris", "--days", "5", "--icons", "lucide"])
            .expect("valid args");

        match cli.command {
            Command::Show { city, days, icons, json } => {
                assert_eq!(city.as_deref(), Some("Paris"));
                assert_eq!(days, Some(5));
                assert_eq!(icons, Some(IconSet::Lucide));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["weather", "show", "--json"]).expect("valid args");
        assert!(matches!(cli.command, Command::Show { city: None, json: true, .. }));
    }

    #[test]
    fn unknown_icon_set_is_rejected() {
        let err = Cli::try_parse_from(["weather", "show", "--icons", "ascii"]).unwrap_err();
        assert!(err.to_string().contains("Unknown icon set"));
    }

    #[test]
    fn options_prefer_flags_over_config() {
        let mut cfg = Config::default();
        cfg.display.forecast_days = 3;

        let opts = dashboard_options(&cfg, Some(5), Some(IconSet::Lucide));
        assert_eq!(opts.window_size, 5);
        assert_eq!(opts.icon_set, IconSet::Lucide);
        assert_eq!(opts.arc, SUN_ARC);

        let opts = dashboard_options(&cfg, None, None);
        assert_eq!(opts.window_size, 3);
        assert_eq!(opts.icon_set, IconSet::Emoji);
    }

    #[test]
    fn forecast_toggle_always_changes_window() {
        assert_eq!((forecast_window(3, false), forecast_window(3, true)), (3, 5));
        assert_eq!((forecast_window(5, false), forecast_window(5, true)), (3, 5));
        assert_eq!((forecast_window(7, false), forecast_window(7, true)), (3, 7));

        for days in 1..=8 {
            assert!(forecast_window(days, false) < forecast_window(days, true), "days = {days}");
        }
    }

    #[test]
    fn today_is_iso_date() {
        let t = today();
        assert_eq!(t.len(), 10);
        assert_eq!(&t[4..5], "-");
    }
}
