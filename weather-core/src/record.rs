use chrono::{DateTime, Utc};

use crate::{
    bootstrap::ModuleReadiness,
    format::{self, Formatter, NativeFormatter},
    model::{CurrentResponse, Unit},
};

/// Normalized snapshot of one `current.json` response.
///
/// Every field comes from the same response. A new search builds a new
/// record; existing records are never updated.
#[derive(Debug)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub temperature_f: f64,
    pub feels_like_c: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub condition_text: String,
    pub condition_icon: String,
    pub observed_at: Option<DateTime<Utc>>,
    formatter: Box<dyn Formatter>,
}

impl WeatherRecord {
    /// Build a record and, if the formatting module is ready, attach a delegate.
    pub fn new(response: &CurrentResponse, readiness: &ModuleReadiness) -> Self {
        let current = &response.current;

        let mut record = Self {
            city: response.location.name.clone(),
            country: response.location.country.clone(),
            temperature_c: current.temp_c,
            temperature_f: current.temp_f,
            feels_like_c: current.feelslike_c,
            feels_like_f: current.feelslike_f,
            humidity_pct: current.humidity,
            wind_kph: current.wind_kph,
            condition_text: current.condition.text.clone(),
            condition_icon: current.condition.icon.clone(),
            observed_at: current.last_updated_epoch.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            formatter: Box::new(NativeFormatter),
        };

        record.formatter = format::attach(&record, readiness);
        record
    }

    pub fn temperature_display(&self, unit: Unit) -> String {
        self.formatter.temperature(self, unit)
    }

    pub fn feels_like_display(&self, unit: Unit) -> String {
        self.formatter.feels_like(self, unit)
    }

    pub fn location_display(&self) -> String {
        self.formatter.location(self)
    }

    pub fn description_display(&self) -> String {
        self.formatter.description(self)
    }

    pub fn humidity_display(&self) -> String {
        format!("{} %", self.humidity_pct)
    }

    pub fn wind_display(&self) -> String {
        format!("{} km/h", self.wind_kph)
    }

    /// Icon URL with a scheme. The API sends `//cdn...` links.
    pub fn icon_url(&self) -> String {
        if self.condition_icon.starts_with("//") {
            format!("https:{}", self.condition_icon)
        } else {
            self.condition_icon.clone()
        }
    }

    /// Whether display strings come from the formatting module.
    pub fn is_delegated(&self) -> bool {
        self.formatter.is_delegated()
    }
}
