use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Select};

use cityweather_core::{
    COUNTRY_FILTER_CHOICES, CityListController, CityListSession, ConditionClass, Config,
    DetailState, OpenWeatherSource, OpendatasoftCatalog, UnitSystem, WeatherDetail,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City catalog browser with weather details")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Browse the city catalog with search and country filters.
    Cities {
        /// Case-insensitive substring to match against city names.
        #[arg(long)]
        search: Option<String>,

        /// Country filter label; may be given more than once.
        /// Candidates: Germany, Afghanistan.
        #[arg(long)]
        country: Vec<String>,

        /// Load up to this many pages without the interactive prompt.
        #[arg(long)]
        pages: Option<u32>,
    },

    /// Show current weather for a city.
    Weather {
        /// City name, used verbatim.
        city: String,

        /// "metric" or "imperial"; the configured default when absent.
        #[arg(long)]
        units: Option<String>,

        /// Render once and exit without offering the unit toggle.
        #[arg(long)]
        no_prompt: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Cities { search, country, pages } => cities(search, country, pages).await,
            Command::Weather { city, units, no_prompt } => weather(city, units, no_prompt).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:").without_confirmation().prompt()?;
    config.set_api_key(api_key);

    let choice = Select::new("Default units:", vec!["metric", "imperial"]).prompt()?;
    config.set_default_units(UnitSystem::try_from(choice)?);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn cities(search: Option<String>, countries: Vec<String>, pages: Option<u32>) -> Result<()> {
    let config = Config::load()?;
    let catalog = match config.catalog.base_url.clone() {
        Some(url) => OpendatasoftCatalog::with_base_url(url),
        None => OpendatasoftCatalog::new(),
    };

    let mut session = CityListSession::new(Box::new(catalog));

    if let Some(text) = search {
        session.controller_mut().set_search_text(text);
    }
    for label in &countries {
        if !COUNTRY_FILTER_CHOICES.contains(&label.as_str()) {
            eprintln!(
                "Note: '{label}' is not in the filter menu ({}); applying it anyway.",
                COUNTRY_FILTER_CHOICES.join(", ")
            );
        }
        session.controller_mut().toggle_country(label);
    }

    session.mount().await;

    loop {
        render_list(session.controller());

        if session.controller().is_exhausted() {
            println!("End of catalog.");
            break;
        }

        // The confirmation (or the --pages limit) stands in for the last
        // rendered row scrolling into view.
        let more = match pages {
            Some(limit) => session.controller().page() < u64::from(limit),
            None => Confirm::new("Load more?").with_default(true).prompt()?,
        };
        if !more {
            break;
        }

        session.load_more().await;
    }

    Ok(())
}

fn render_list(controller: &CityListController) {
    let suggestions = controller.suggestions();
    if !suggestions.is_empty() {
        println!("Suggestions:");
        for city in &suggestions {
            println!("  {} - {}", city.name, city.country);
        }
        println!();
    }

    let rows = controller.visible_rows();
    println!(
        "{:<28} {:<24} {:>12}  {:<22} {}",
        "City", "Country", "Population", "Timezone", "Link"
    );
    for city in &rows {
        println!(
            "{:<28} {:<24} {:>12}  {:<22} {}",
            city.name,
            city.country,
            city.population,
            city.timezone,
            CityListController::detail_route(city)
        );
    }
    println!(
        "({} of {} fetched rows visible, page {})",
        rows.len(),
        controller.cities().len(),
        controller.page()
    );
}

async fn weather(city: String, units: Option<String>, no_prompt: bool) -> Result<()> {
    let config = Config::load()?;
    let api_key = config.require_api_key()?;

    let units = match units.as_deref() {
        Some(s) => UnitSystem::try_from(s)?,
        None => config.default_units()?,
    };

    let source = OpenWeatherSource::new(api_key);
    let mut detail = WeatherDetail::new(city, units, Box::new(source));

    detail.refresh().await;

    loop {
        render_detail(&detail);

        if no_prompt || !detail.state().is_ready() {
            break;
        }

        let other = detail.units().toggled();
        let switch =
            Confirm::new(&format!("Switch to {other}?")).with_default(false).prompt()?;
        if !switch {
            break;
        }

        detail.toggle_units().await;
    }

    Ok(())
}

fn render_detail(detail: &WeatherDetail) {
    println!("Weather for {}", detail.city());

    match detail.state() {
        DetailState::Loading => println!("Loading..."),
        DetailState::Error(message) => println!("Error: {message}"),
        DetailState::Ready(snapshot) => {
            let glyph = condition_glyph(ConditionClass::from_condition(&snapshot.condition));
            println!("  {glyph} {} ({})", snapshot.condition, snapshot.description);
            println!(
                "  Temperature: {:.1}{}",
                snapshot.temperature,
                detail.units().temp_symbol()
            );
            println!("  Humidity:    {}%", snapshot.humidity_pct);
            println!("  Wind:        {}", snapshot.wind_speed);
            println!("  Pressure:    {} hPa", snapshot.pressure_hpa);
            println!(
                "  Map marker:  {:.4}, {:.4}",
                snapshot.coordinates.lat, snapshot.coordinates.lon
            );
            println!("  Observed:    {}", format_observed(&snapshot.observation_time));
        }
    }
}

fn condition_glyph(class: ConditionClass) -> &'static str {
    match class {
        ConditionClass::Clear => "☀",
        ConditionClass::Rain => "🌧",
        ConditionClass::Clouds => "☁",
        ConditionClass::Snow => "❄",
        ConditionClass::Haze | ConditionClass::Mist => "🌫",
        ConditionClass::Default => "·",
    }
}

fn format_observed(when: &chrono::DateTime<chrono::Utc>) -> String {
    when.format("%d-%m-%Y %H:%M UTC").to_string()
}
