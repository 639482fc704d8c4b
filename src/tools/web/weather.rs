//! Current weather via `OpenWeatherMap`

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Error, Result};

/// Current conditions for a city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City name as the provider spells it
    pub city: String,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Short description, e.g. "light rain"
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u8,
}

/// Weather collaborator
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions in `city`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown city, other errors if the
    /// provider cannot be reached
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

/// `OpenWeatherMap` current weather API client
pub struct OpenWeatherMap {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl OpenWeatherMap {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: &str, base_url: impl Into<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("OpenWeatherMap API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.to_string()),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("weather for {city}")));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Collaborator(format!(
                "OpenWeatherMap error {status}: {body}"
            )));
        }

        let data: OwmResponse = response.json().await?;
        let description = data
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_default();

        tracing::debug!(city = %data.name, temp = data.main.temp, "weather fetched");

        Ok(WeatherReport {
            city: data.name,
            temperature_c: data.main.temp,
            description,
            humidity: data.main.humidity,
        })
    }
}
