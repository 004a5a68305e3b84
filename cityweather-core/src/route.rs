/// The application's two routes.
///
/// The detail path segment is carried verbatim in both directions: no
/// trimming, no case folding. Whatever the path says is the city name the
/// weather source is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CityList,
    CityWeather { city: String },
}

const CITY_WEATHER_PREFIX: &str = "/city-weather/";

impl Route {
    pub fn parse(path: &str) -> Option<Route> {
        if path == "/" {
            return Some(Route::CityList);
        }

        let city = path.strip_prefix(CITY_WEATHER_PREFIX)?;
        if city.is_empty() || city.contains('/') {
            return None;
        }

        Some(Route::CityWeather { city: city.to_string() })
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::CityList => "/".to_string(),
            Route::CityWeather { city } => format!("{CITY_WEATHER_PREFIX}{city}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}
