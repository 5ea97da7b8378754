use std::sync::Arc;

use crate::{
    bootstrap::{ModuleFactory, ModuleFuture},
    error::WeatherError,
};

use super::{FormatDelegate, FormatModule};

/// Built-in formatting module.
///
/// Works from Celsius only and derives Fahrenheit itself. Numbers are rounded
/// to one decimal place and printed without a trailing `.0`, the same way
/// native formatting prints the API's values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecisionModule;

impl PrecisionModule {
    /// Factory handed to [`crate::bootstrap::bootstrap`].
    pub fn factory() -> ModuleFactory {
        Box::new(|| -> ModuleFuture {
            Box::pin(async {
                let module: Arc<dyn FormatModule> = Arc::new(PrecisionModule);
                Ok::<_, WeatherError>(module)
            })
        })
    }
}

impl FormatModule for PrecisionModule {
    fn construct(&self) -> Result<Box<dyn FormatDelegate>, WeatherError> {
        Ok(Box::new(PrecisionDelegate::default()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrecisionDelegate {
    city: String,
    country: String,
    temp_c: f64,
    feels_c: f64,
    humidity: u8,
    wind_kph: f64,
    description: String,
}

impl FormatDelegate for PrecisionDelegate {
    fn set_data(
        &mut self,
        city: &str,
        country: &str,
        temp_c: f64,
        feels_c: f64,
        humidity: u8,
        wind_kph: f64,
        description: &str,
    ) -> Result<(), WeatherError> {
        if !temp_c.is_finite() || !feels_c.is_finite() {
            return Err(WeatherError::DelegateUnavailable(format!(
                "non-finite temperature ({temp_c}, feels like {feels_c})"
            )));
        }
        if humidity > 100 {
            return Err(WeatherError::DelegateUnavailable(format!(
                "humidity {humidity} out of range"
            )));
        }
        if wind_kph.is_nan() || wind_kph < 0.0 {
            return Err(WeatherError::DelegateUnavailable(format!(
                "wind speed {wind_kph} out of range"
            )));
        }

        self.city = city.to_owned();
        self.country = country.to_owned();
        self.temp_c = temp_c;
        self.feels_c = feels_c;
        self.humidity = humidity;
        self.wind_kph = wind_kph;
        self.description = description.to_owned();
        Ok(())
    }

    fn temperature_celsius_string(&self) -> String {
        format!("{} °C", one_decimal(self.temp_c))
    }

    fn temperature_fahrenheit_string(&self) -> String {
        format!("{} °F", one_decimal(celsius_to_fahrenheit(self.temp_c)))
    }

    fn feels_like_celsius_string(&self) -> String {
        format!("{} °C", one_decimal(self.feels_c))
    }

    fn feels_like_fahrenheit_string(&self) -> String {
        format!("{} °F", one_decimal(celsius_to_fahrenheit(self.feels_c)))
    }

    fn location_string(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    fn description_string(&self) -> String {
        self.description.clone()
    }
}

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Adding zero turns a rounded `-0.0` into `0.0`.
fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}
