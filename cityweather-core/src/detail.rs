use crate::{
    model::{UnitSystem, WeatherSnapshot},
    weather::WeatherSource,
};

/// What the detail view renders.
#[derive(Debug, Clone)]
pub enum DetailState {
    Loading,
    Error(String),
    Ready(WeatherSnapshot),
}

impl DetailState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DetailState::Ready(_))
    }
}

/// Per-city weather detail presenter.
///
/// Holds the city name exactly as the route delivered it, the requested unit
/// system and the current renderable state. Nothing is cached: every
/// [`WeatherDetail::refresh`] and every unit toggle issues a fresh fetch and
/// passes through `Loading` again.
#[derive(Debug)]
pub struct WeatherDetail {
    city: String,
    units: UnitSystem,
    state: DetailState,
    source: Box<dyn WeatherSource>,
}

impl WeatherDetail {
    pub fn new(city: String, units: UnitSystem, source: Box<dyn WeatherSource>) -> Self {
        Self {
            city,
            units,
            state: DetailState::Loading,
            source,
        }
    }

    /// Fetch a fresh snapshot and land in `Ready` or `Error`.
    pub async fn refresh(&mut self) {
        self.state = DetailState::Loading;
        self.state = match self.source.current(&self.city, self.units).await {
            Ok(snapshot) => DetailState::Ready(snapshot),
            Err(err) => {
                tracing::error!(city = %self.city, error = %err, "weather fetch failed");
                DetailState::Error(err.to_string())
            }
        };
    }

    /// Flip metric/imperial and re-fetch.
    pub async fn toggle_units(&mut self) {
        self.units = self.units.toggled();
        self.refresh().await;
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }
}

/// Coarse class for a condition keyword, used by renderers to pick a
/// backdrop or icon. Unrecognized keywords fall back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionClass {
    Clear,
    Rain,
    Clouds,
    Snow,
    Haze,
    Mist,
    Default,
}

impl ConditionClass {
    pub fn from_condition(condition: &str) -> Self {
        match condition.to_lowercase().as_str() {
            "clear" => ConditionClass::Clear,
            "rain" => ConditionClass::Rain,
            "clouds" => ConditionClass::Clouds,
            "snow" => ConditionClass::Snow,
            "haze" => ConditionClass::Haze,
            "mist" => ConditionClass::Mist,
            _ => ConditionClass::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::Coordinates;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct ScriptedSource {
        responses: Mutex<Vec<Result<WeatherSnapshot, FetchError>>>,
        seen_units: Arc<Mutex<Vec<UnitSystem>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<WeatherSnapshot, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen_units: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for ScriptedSource {
        async fn current(
            &self,
            _city: &str,
            units: UnitSystem,
        ) -> Result<WeatherSnapshot, FetchError> {
            self.seen_units.lock().unwrap().push(units);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn snapshot(temperature: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            humidity_pct: 40,
            wind_speed: 3.1,
            temperature,
            pressure_hpa: 1013,
            coordinates: Coordinates { lat: 52.52, lon: 13.41 },
            observation_time: Utc::now(),
        }
    }

    #[tokio::test]
    async fn refresh_lands_in_ready() {
        let source = ScriptedSource::new(vec![Ok(snapshot(21.0))]);
        let mut detail =
            WeatherDetail::new("Berlin".to_string(), UnitSystem::Metric, Box::new(source));

        assert!(matches!(detail.state(), DetailState::Loading));
        detail.refresh().await;

        match detail.state() {
            DetailState::Ready(s) => assert!((s.temperature - 21.0).abs() < 1e-9),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_lands_in_error_with_message() {
        let source = ScriptedSource::new(vec![Err(FetchError::FetchFailed(
            "status 404 Not Found: city not found".into(),
        ))]);
        let mut detail =
            WeatherDetail::new("London".to_string(), UnitSystem::Metric, Box::new(source));

        detail.refresh().await;

        match detail.state() {
            DetailState::Error(msg) => assert!(msg.contains("city not found")),
            other => panic!("expected Error, got {other:?}"),
        }
        assert!(!detail.state().is_ready());
    }

    #[tokio::test]
    async fn toggle_refetches_in_the_other_units() {
        let source = ScriptedSource::new(vec![Ok(snapshot(21.0)), Ok(snapshot(69.8))]);
        let seen_units = Arc::clone(&source.seen_units);
        let mut detail =
            WeatherDetail::new("Berlin".to_string(), UnitSystem::Metric, Box::new(source));

        detail.refresh().await;
        detail.toggle_units().await;

        assert_eq!(detail.units(), UnitSystem::Imperial);
        match detail.state() {
            DetailState::Ready(s) => assert!((s.temperature - 69.8).abs() < 1e-9),
            other => panic!("expected Ready, got {other:?}"),
        }

        // No caching between toggles: both fetches went out.
        assert_eq!(*seen_units.lock().unwrap(), vec![UnitSystem::Metric, UnitSystem::Imperial]);
    }

    #[test]
    fn condition_classes_cover_the_known_keywords() {
        assert_eq!(ConditionClass::from_condition("Clear"), ConditionClass::Clear);
        assert_eq!(ConditionClass::from_condition("RAIN"), ConditionClass::Rain);
        assert_eq!(ConditionClass::from_condition("Clouds"), ConditionClass::Clouds);
        assert_eq!(ConditionClass::from_condition("snow"), ConditionClass::Snow);
        assert_eq!(ConditionClass::from_condition("Haze"), ConditionClass::Haze);
        assert_eq!(ConditionClass::from_condition("Mist"), ConditionClass::Mist);
        assert_eq!(ConditionClass::from_condition("Tornado"), ConditionClass::Default);
    }
}
