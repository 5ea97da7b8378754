use serde::{Deserialize, Serialize};

/// Temperature unit selected by the unit toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// Map the state of the unit toggle: checked means Fahrenheit.
    pub fn from_toggle(use_fahrenheit: bool) -> Self {
        if use_fahrenheit { Unit::Fahrenheit } else { Unit::Celsius }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }
}

/// Body of a successful `current.json` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCurrent {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub condition: ApiCondition,
    #[serde(default)]
    pub last_updated_epoch: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCondition {
    pub text: String,
    /// Scheme-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/116.png`.
    pub icon: String,
}

/// Error payload the API returns in place of `location`/`current`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
}
