//! `get_weather`：按经纬度查询当前天气（Open-Meteo forecast 接口）

use crate::config::WeatherConfig;
use crate::error::{AssistantError, Result, ToolError, WeatherError};
use crate::tools::{Tool, ToolParameters, ToolResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// 一次查询得到的当前天气
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: f64,
    pub wind_speed_unit: String,
}

impl CurrentWeather {
    /// 适合直接朗读的一句话
    pub fn sentence(&self) -> String {
        format!(
            "The current temperature is {}{} with wind speeds of {} {}.",
            self.temperature, self.temperature_unit, self.wind_speed, self.wind_speed_unit
        )
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<Map<String, Value>>,
    #[serde(default)]
    current_units: HashMap<String, String>,
}

/// 天气服务 HTTP 客户端
pub struct WeatherClient {
    http: Arc<Client>,
    base_url: String,
    timeout: Duration,
}

impl WeatherClient {
    pub fn new(http: Arc<Client>, config: &WeatherConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<CurrentWeather, WeatherError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m,wind_speed_10m".to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::MalformedPayload(e.to_string()))?;

        let current = body
            .current
            .ok_or_else(|| WeatherError::MalformedPayload("missing `current`".to_string()))?;
        let temperature = current
            .get("temperature_2m")
            .and_then(Value::as_f64)
            .ok_or(WeatherError::MissingTemperature)?;
        let wind_speed = current
            .get("wind_speed_10m")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                WeatherError::MalformedPayload("missing numeric `wind_speed_10m`".to_string())
            })?;

        let unit = |key: &str, fallback: &str| {
            body.current_units
                .get(key)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        Ok(CurrentWeather {
            temperature,
            temperature_unit: unit("temperature_2m", "°C"),
            wind_speed,
            wind_speed_unit: unit("wind_speed_10m", "km/h"),
        })
    }
}

pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

fn coordinate(parameters: &ToolParameters, name: &str, bound: f64) -> Result<f64> {
    let value = parameters
        .get(name)
        .ok_or_else(|| ToolError::MissingParameter(name.to_string()))?
        .as_f64()
        .ok_or_else(|| ToolError::InvalidParameter {
            name: name.to_string(),
            message: "expected a number".to_string(),
        })?;
    if !(-bound..=bound).contains(&value) {
        return Err(ToolError::InvalidParameter {
            name: name.to_string(),
            message: format!("must be between -{bound} and {bound}"),
        }
        .into());
    }
    Ok(value)
}

#[async_trait::async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current temperature and wind speed for the given coordinates."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {"type": "number", "description": "Latitude in decimal degrees"},
                "longitude": {"type": "number", "description": "Longitude in decimal degrees"}
            },
            "required": ["latitude", "longitude"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult> {
        let latitude = coordinate(&parameters, "latitude", 90.0)?;
        let longitude = coordinate(&parameters, "longitude", 180.0)?;

        debug!(latitude, longitude, "🌤️ 查询天气");
        let weather = self.client.current(latitude, longitude).await?;
        info!(
            latitude,
            longitude,
            temperature = weather.temperature,
            "🌤️ 天气查询成功"
        );
        Ok(ToolResult::success(weather.sentence()))
    }

    fn failure_message(&self, err: &AssistantError) -> String {
        match err {
            AssistantError::Weather(e) => format!("Error fetching weather: {e}"),
            other => format!("Error fetching weather: {other}"),
        }
    }
}
