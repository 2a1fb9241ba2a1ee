//! Run orchestration: discover resorts, fetch forecasts, analyze, notify

use crate::analyzer::{SnowAnalyzer, SnowEvent};
use crate::config::PowdertimeConfig;
use crate::demo::{DEMO_RESORT_LIMIT, DemoForecasts};
use crate::location_resolver::{LocationInput, LocationResolver};
use crate::models::{Location, Resort, ResortForecast};
use crate::notifier::{AlertReport, ConsoleNotifier, Notifier, build_notifier};
use crate::resorts::ResortCatalog;
use crate::weather::{ForecastSource, WeatherClient};
use anyhow::{Context, Result, bail};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// A resort being watched, with its distance from home when known
#[derive(Debug, Clone)]
pub struct MonitoredResort {
    pub resort: Resort,
    pub distance_miles: Option<f64>,
}

/// Result of resort discovery
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Resolved home location; `None` when resorts were listed explicitly
    pub home: Option<Location>,
    pub resorts: Vec<MonitoredResort>,
}

impl Discovery {
    #[must_use]
    pub fn resort_list(&self) -> Vec<Resort> {
        self.resorts.iter().map(|m| m.resort.clone()).collect()
    }
}

/// Outcome of one check
#[derive(Debug, Default)]
pub struct RunSummary {
    pub resorts_checked: usize,
    pub forecasts_fetched: usize,
    pub events: Vec<SnowEvent>,
    /// Resorts whose forecast could not be fetched or analyzed
    pub skipped: Vec<String>,
}

/// The snow monitor
pub struct Powdertime {
    config: PowdertimeConfig,
    catalog: ResortCatalog,
    client: WeatherClient,
    analyzer: SnowAnalyzer,
}

impl Powdertime {
    pub fn new(config: PowdertimeConfig) -> Result<Self> {
        let catalog = ResortCatalog::load(config.resort_catalog.as_deref())
            .context("Failed to load resort catalog")?;
        let client = WeatherClient::new(&config.weather)?;
        let analyzer = SnowAnalyzer::new(config.snow_threshold.min_inches);

        Ok(Self {
            config,
            catalog,
            client,
            analyzer,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PowdertimeConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &ResortCatalog {
        &self.catalog
    }

    /// Work out which resorts to watch.
    ///
    /// An explicit `resorts` list wins; otherwise the home location is
    /// resolved and the catalog is searched within `search_radius_miles`.
    #[instrument(skip(self))]
    pub fn discover(&self) -> Result<Discovery> {
        if let Some(specs) = self.config.resorts.as_deref().filter(|s| !s.is_empty()) {
            let resorts = self.catalog.resolve_specs(specs)?;
            info!("Monitoring {} configured resorts", resorts.len());
            return Ok(Discovery {
                home: None,
                resorts: resorts
                    .into_iter()
                    .map(|resort| MonitoredResort {
                        resort,
                        distance_miles: None,
                    })
                    .collect(),
            });
        }

        let input = LocationInput::from_config(&self.config.location)?;
        let home = LocationResolver::resolve_location(&self.client, input)
            .context("Could not determine your location")?;
        let radius = self.config.search_radius_miles;

        let resorts: Vec<MonitoredResort> = self
            .catalog
            .nearby(home.latitude, home.longitude, radius)
            .into_iter()
            .map(|(resort, distance)| MonitoredResort {
                resort: resort.clone(),
                distance_miles: Some(distance),
            })
            .collect();

        if resorts.is_empty() {
            bail!(
                "No ski resorts found within {radius} miles of {}",
                home.name
            );
        }

        info!(
            "Found {} resorts within {} miles of {}",
            resorts.len(),
            radius,
            home.name
        );

        Ok(Discovery {
            home: Some(home),
            resorts,
        })
    }

    /// One check against live forecasts
    pub fn check(&self, always_notify: bool) -> Result<RunSummary> {
        let notifier = build_notifier(&self.config.notifications)?;
        let discovery = self.discover()?;
        self.run(
            &discovery,
            &self.client,
            notifier.as_ref(),
            always_notify || self.config.notifications.always_notify,
        )
    }

    /// Check every `check_frequency_hours` until the process is stopped
    pub fn watch(&self, always_notify: bool) -> Result<()> {
        let hours = self.config.check_frequency_hours;
        println!("⏰ Checking every {hours} hours. Press Ctrl+C to stop.");

        loop {
            match self.check(always_notify) {
                Ok(summary) => info!(
                    "Check complete: {} events from {} forecasts",
                    summary.events.len(),
                    summary.forecasts_fetched
                ),
                Err(e) => {
                    error!("Check failed: {:#}", e);
                    println!("⚠️  Check failed: {e:#}");
                }
            }

            println!("\n💤 Next check in {hours} hours...");
            std::thread::sleep(Duration::from_secs(u64::from(hours) * 3600));
        }
    }

    /// Run the pipeline on canned forecasts for the first few resorts
    pub fn demo(&self) -> Result<RunSummary> {
        let mut discovery = self.discover()?;
        discovery.resorts.truncate(DEMO_RESORT_LIMIT);

        println!("🎭 Demo mode: using synthetic forecasts\n");

        let source = DemoForecasts::starting_today(&discovery.resort_list());
        self.run(&discovery, &source, &ConsoleNotifier::new(), false)
    }

    /// Fetch, analyze and notify for the discovered resorts
    pub fn run(
        &self,
        discovery: &Discovery,
        source: &dyn ForecastSource,
        notifier: &dyn Notifier,
        always_notify: bool,
    ) -> Result<RunSummary> {
        let days = self.config.snow_threshold.forecast_days;

        if let Some(home) = &discovery.home {
            println!("📍 Location: {} ({})", home.name, home.format_coordinates());
            println!(
                "🔍 Searching for resorts within {} miles...",
                self.config.search_radius_miles
            );
        }
        println!("✅ Monitoring {} resort(s):", discovery.resorts.len());
        for monitored in &discovery.resorts {
            match monitored.distance_miles {
                Some(distance) => println!("   • {} ({distance:.0} mi)", monitored.resort),
                None => println!("   • {}", monitored.resort),
            }
        }

        println!("\n🌤️  Fetching {days}-day forecasts...");
        let (forecasts, mut skipped) = fetch_all(source, &discovery.resorts, days);
        let forecasts_fetched = forecasts.len();

        println!(
            "\n❄️  Analyzing for snowfall >= {}\"...",
            self.analyzer.threshold_inches()
        );
        let outcome = self.analyzer.find_significant_events(&forecasts);
        for (resort, err) in &outcome.rejected {
            println!("   ⚠️  {resort}: {}", err.user_message());
            skipped.push(resort.clone());
        }

        // rejected data never reaches the forecast summary
        let forecasts: Vec<ResortForecast> = forecasts
            .into_iter()
            .filter(|f| !outcome.rejected.iter().any(|(name, _)| *name == f.resort.name))
            .collect();

        let report = AlertReport::new(&outcome.events, days)
            .with_forecasts(&forecasts)
            .always_notify(always_notify);
        notifier
            .deliver(&report)
            .with_context(|| format!("Failed to send {} notification", notifier.name()))?;

        Ok(RunSummary {
            resorts_checked: discovery.resorts.len(),
            forecasts_fetched,
            events: outcome.events,
            skipped,
        })
    }
}

/// Fetch forecasts one resort at a time; failures are reported and skipped
fn fetch_all(
    source: &dyn ForecastSource,
    resorts: &[MonitoredResort],
    days: u32,
) -> (Vec<ResortForecast>, Vec<String>) {
    let mut forecasts = Vec::with_capacity(resorts.len());
    let mut skipped = Vec::new();

    for MonitoredResort { resort, .. } in resorts {
        match source.daily_forecast(resort, days) {
            Ok(forecast_days) => forecasts.push(ResortForecast::new(resort.clone(), forecast_days)),
            Err(e) => {
                warn!("Skipping {}: {}", resort.name, e);
                println!("   ⚠️  {}: {}", resort.name, e.user_message());
                skipped.push(resort.name.clone());
            }
        }
    }

    (forecasts, skipped)
}
