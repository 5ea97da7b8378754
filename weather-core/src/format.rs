//! Display-string formatting for a [`WeatherRecord`].
//!
//! A record formats itself natively unless an optional formatting module is
//! loaded, in which case a [`FormatDelegate`] instance produced by that module
//! supplies the strings instead.

use std::fmt::Debug;

use tracing::{debug, warn};

use crate::{
    bootstrap::ModuleReadiness,
    error::WeatherError,
    model::Unit,
    record::WeatherRecord,
};

pub mod precision;

/// A loaded formatting module. Produces fresh delegate instances.
pub trait FormatModule: Send + Sync + Debug {
    fn construct(&self) -> Result<Box<dyn FormatDelegate>, WeatherError>;
}

/// One formatting instance, populated once with the display fields of a record.
pub trait FormatDelegate: Send + Sync + Debug {
    #[allow(clippy::too_many_arguments)]
    fn set_data(
        &mut self,
        city: &str,
        country: &str,
        temp_c: f64,
        feels_c: f64,
        humidity: u8,
        wind_kph: f64,
        description: &str,
    ) -> Result<(), WeatherError>;

    fn temperature_celsius_string(&self) -> String;
    fn temperature_fahrenheit_string(&self) -> String;
    fn feels_like_celsius_string(&self) -> String;
    fn feels_like_fahrenheit_string(&self) -> String;
    fn location_string(&self) -> String;
    fn description_string(&self) -> String;
}

pub(crate) trait Formatter: Send + Sync + Debug {
    fn temperature(&self, record: &WeatherRecord, unit: Unit) -> String;
    fn feels_like(&self, record: &WeatherRecord, unit: Unit) -> String;
    fn location(&self, record: &WeatherRecord) -> String;
    fn description(&self, record: &WeatherRecord) -> String;

    fn is_delegated(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NativeFormatter;

impl Formatter for NativeFormatter {
    fn temperature(&self, record: &WeatherRecord, unit: Unit) -> String {
        let value = match unit {
            Unit::Celsius => record.temperature_c,
            Unit::Fahrenheit => record.temperature_f,
        };
        format!("{value} {}", unit.symbol())
    }

    fn feels_like(&self, record: &WeatherRecord, unit: Unit) -> String {
        let value = match unit {
            Unit::Celsius => record.feels_like_c,
            Unit::Fahrenheit => record.feels_like_f,
        };
        format!("{value} {}", unit.symbol())
    }

    fn location(&self, record: &WeatherRecord) -> String {
        format!("{}, {}", record.city, record.country)
    }

    fn description(&self, record: &WeatherRecord) -> String {
        record.condition_text.clone()
    }
}

/// Holds a populated delegate; ignores the record because the delegate kept its own copy.
#[derive(Debug)]
pub(crate) struct DelegatedFormatter {
    delegate: Box<dyn FormatDelegate>,
}

impl Formatter for DelegatedFormatter {
    fn temperature(&self, _record: &WeatherRecord, unit: Unit) -> String {
        match unit {
            Unit::Celsius => self.delegate.temperature_celsius_string(),
            Unit::Fahrenheit => self.delegate.temperature_fahrenheit_string(),
        }
    }

    fn feels_like(&self, _record: &WeatherRecord, unit: Unit) -> String {
        match unit {
            Unit::Celsius => self.delegate.feels_like_celsius_string(),
            Unit::Fahrenheit => self.delegate.feels_like_fahrenheit_string(),
        }
    }

    fn location(&self, _record: &WeatherRecord) -> String {
        self.delegate.location_string()
    }

    fn description(&self, _record: &WeatherRecord) -> String {
        self.delegate.description_string()
    }

    fn is_delegated(&self) -> bool {
        true
    }
}

/// Pick the formatter for a freshly built record.
///
/// Readiness is checked once, here. Any failure while constructing or
/// populating the delegate is logged and the record falls back to native
/// formatting for the rest of its life.
pub(crate) fn attach(record: &WeatherRecord, readiness: &ModuleReadiness) -> Box<dyn Formatter> {
    let Some(module) = readiness.module() else {
        debug!(readiness = ?readiness, "Formatting module not ready, using native formatting");
        return Box::new(NativeFormatter);
    };

    match populate(module.as_ref(), record) {
        Ok(delegate) => Box::new(DelegatedFormatter { delegate }),
        Err(err) => {
            warn!(error = %err, city = %record.city, "Failed to create formatting delegate");
            Box::new(NativeFormatter)
        }
    }
}

fn populate(
    module: &dyn FormatModule,
    record: &WeatherRecord,
) -> Result<Box<dyn FormatDelegate>, WeatherError> {
    let mut delegate = module.construct()?;
    delegate.set_data(
        &record.city,
        &record.country,
        record.temperature_c,
        record.feels_like_c,
        record.humidity_pct,
        record.wind_kph,
        &record.condition_text,
    )?;
    Ok(delegate)
}
