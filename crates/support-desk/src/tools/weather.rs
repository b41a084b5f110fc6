//! Weather Tool (mock)
//!
//! Stand-in for a real weather API: derives readings from a fixed city
//! table with bounded jitter. Randomness is locally owned and seedable so
//! tests reproduce identical readings.

use std::sync::{Mutex, PoisonError};

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

use dispatch_core::ToolDefinition;

use crate::error::{DeskError, Result};

const CONDITIONS: [&str; 5] = ["晴朗", "多云", "阴天", "小雨", "中雨"];

/// Mock weather lookup tool
pub struct Weather {
    rng: Mutex<StdRng>,
}

/// Temperature unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    city: String,

    #[serde(default)]
    unit: Unit,
}

#[derive(Debug, Serialize)]
struct WeatherResponse {
    city: String,
    temperature: f64,
    unit: Unit,
    condition: &'static str,
    humidity: u32,
    wind_speed: f64,
    timestamp: String,
}

impl Default for Weather {
    fn default() -> Self {
        Self::new()
    }
}

impl Weather {
    pub const NAME: &'static str = "get_weather";
    pub const DESCRIPTION: &'static str = "获取指定城市的天气信息";

    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic readings for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::function(
            Self::NAME,
            Self::DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "城市名称，如：北京、上海、广州"
                    },
                    "unit": {
                        "type": "string",
                        "description": "温度单位，celsius(摄氏度)或fahrenheit(华氏度)",
                        "enum": ["celsius", "fahrenheit"],
                        "default": "celsius"
                    }
                },
                "required": ["city"]
            }),
        )
    }

    pub fn run(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let req: WeatherRequest = serde_json::from_value(args)
            .map_err(|e| DeskError::InvalidArgument(format!("invalid weather request: {e}")))?;

        if req.city.is_empty() {
            return Err(DeskError::InvalidArgument("city is required".into()));
        }

        Ok(serde_json::to_value(self.reading(&req.city, req.unit))?)
    }

    fn base_temperature(city: &str) -> f64 {
        match city {
            "北京" => 15.0,
            "上海" => 18.0,
            "广州" => 25.0,
            "深圳" => 26.0,
            "杭州" => 17.0,
            "成都" => 16.0,
            _ => 20.0,
        }
    }

    fn reading(&self, city: &str, unit: Unit) -> WeatherResponse {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let mut temp = Self::base_temperature(city);
        // Bounded jitter of ±5 units around the base.
        temp += rng.gen_range(-5.0..5.0);

        if unit == Unit::Fahrenheit {
            temp = temp * 9.0 / 5.0 + 32.0;
        }

        WeatherResponse {
            city: city.to_string(),
            temperature: (temp * 10.0).trunc() / 10.0,
            unit,
            condition: CONDITIONS[rng.gen_range(0..CONDITIONS.len())],
            humidity: rng.gen_range(40..80),
            wind_speed: f64::from(rng.gen_range(1u32..21)),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
