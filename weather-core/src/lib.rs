//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client and its response models
//! - Weather records and their display formatting, with an optional formatting module
//! - The UI controller, written against an abstract [`View`]
//!
//! It is used by `weather-cli`, but any front end that implements [`View`] can drive it.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod model;
pub mod record;
pub mod view;

pub use bootstrap::{Bootstrap, ModuleFactory, ModuleReadiness, bootstrap};
pub use client::{WeatherClient, WeatherSource};
pub use config::Config;
pub use controller::{Controller, ERROR_MARKER, Key, UiEvent};
pub use error::WeatherError;
pub use format::{FormatDelegate, FormatModule, precision::PrecisionModule};
pub use model::{CurrentResponse, Unit};
pub use record::WeatherRecord;
pub use view::{Node, Panel, View};
