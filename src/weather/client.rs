//! OpenWeatherMap client.

use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Errors that can occur during a weather lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider does not recognize the city (HTTP 404).
    #[error("City not recognized by the weather provider")]
    NotFound,

    /// Any other provider failure: non-200 status, network error, or a
    /// malformed payload.
    #[error("Weather provider request failed: {0}")]
    Unavailable(String),
}

/// Current weather conditions for a resolved city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City name as resolved by the provider.
    pub city: String,

    /// Temperature in °C.
    pub temp: f64,

    /// "Feels like" temperature in °C.
    pub feels_like: f64,

    /// Localized condition description, first letter capitalized.
    pub description: String,

    /// Wind speed in m/s.
    pub wind_speed: f64,
}

impl WeatherReport {
    /// Renders the report as the user-facing reply text.
    #[must_use]
    pub fn to_text(&self) -> String {
        format!(
            "Місто: {}\n\
             Температура: {}°C\n\
             Відчувається як: {}°C\n\
             Погода: {}\n\
             Вітер: {} м/с",
            self.city, self.temp, self.feels_like, self.description, self.wind_speed
        )
    }
}

/// Seam between the conversation controller and the weather provider.
pub trait WeatherProvider {
    /// Fetches current weather for the given city name.
    fn fetch(&self, city: &str) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send;
}

/// Provider payload for the current-weather endpoint.
#[derive(Debug, Deserialize)]
struct ProviderPayload {
    name: String,
    main: MainSection,
    #[serde(default)]
    weather: Vec<ConditionSection>,
    wind: WindSection,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionSection {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindSection {
    speed: f64,
}

impl From<ProviderPayload> for WeatherReport {
    fn from(payload: ProviderPayload) -> Self {
        let description = payload
            .weather
            .first()
            .map(|c| capitalize(&c.description))
            .unwrap_or_default();
        Self {
            city: payload.name,
            temp: payload.main.temp,
            feels_like: payload.main.feels_like,
            description,
            wind_speed: payload.wind.speed,
        }
    }
}

/// OpenWeatherMap HTTP client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: String,
}

impl OpenWeatherClient {
    /// Creates a client with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    /// Requests current weather for a city, in metric units with
    /// Ukrainian condition text.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::NotFound`] for an unknown city and
    /// [`WeatherError::Unavailable`] for any other failure.
    pub async fn current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        debug!("Requesting weather for \"{}\"", city);

        let response = self
            .http
            .get(BASE_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "ua"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let payload: ProviderPayload = response
                    .json()
                    .await
                    .map_err(|e| WeatherError::Unavailable(e.to_string()))?;
                Ok(payload.into())
            }
            StatusCode::NOT_FOUND => Err(WeatherError::NotFound),
            status => Err(WeatherError::Unavailable(format!(
                "provider returned status {status}"
            ))),
        }
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn fetch(&self, city: &str) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send {
        self.current(city)
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
