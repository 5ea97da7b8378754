//! Event handling and view synchronization.
//!
//! The controller owns the current [`WeatherRecord`] and moves the view
//! between idle, loading and result-or-error. Nothing orders overlapping
//! searches: whichever response is applied last becomes the current record.

use std::ops::{Deref, DerefMut};

use tracing::{info, warn};

use crate::{
    bootstrap::ModuleReadiness,
    client::WeatherSource,
    error::WeatherError,
    model::Unit,
    record::WeatherRecord,
    view::{Node, Panel, View},
};

/// Prefix for fetch failures shown in the error panel.
pub const ERROR_MARKER: &str = "⚠️";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Search button pressed.
    SearchClicked,
    /// Key pressed in the city input.
    KeyDown(Key),
    /// Unit toggle flipped; re-render only.
    UnitToggleChanged,
}

#[derive(Debug)]
pub struct Controller<S, V> {
    source: S,
    view: V,
    readiness: ModuleReadiness,
    weather: Option<WeatherRecord>,
}

impl<S, V> Controller<S, V>
where
    S: WeatherSource,
    V: View,
{
    pub fn new(source: S, view: V, readiness: ModuleReadiness) -> Self {
        Self { source, view, readiness, weather: None }
    }

    /// Dispatch one UI event. Returns the search error, if the event ran a failed search.
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), WeatherError> {
        match event {
            UiEvent::SearchClicked | UiEvent::KeyDown(Key::Enter) => self.search().await,
            UiEvent::KeyDown(_) => Ok(()),
            UiEvent::UnitToggleChanged => {
                self.render();
                Ok(())
            }
        }
    }

    /// Look up the city in the input and render the outcome.
    ///
    /// The error is also returned so non-interactive callers can pick an exit status.
    pub async fn search(&mut self) -> Result<(), WeatherError> {
        let city = self.view.city_input().trim().to_string();
        if city.is_empty() {
            show_error(&mut self.view, &WeatherError::EmptyInput.to_string());
            return Err(WeatherError::EmptyInput);
        }

        hide_error(&mut self.view);
        let mut view = LoaderGuard::show(&mut self.view);

        match self.source.fetch_current(&city).await {
            Ok(response) => {
                let record = WeatherRecord::new(&response, &self.readiness);
                info!(city = %record.city, delegated = record.is_delegated(), "Weather updated");
                self.weather = Some(record);
                render_into(&mut *view, self.weather.as_ref());
                Ok(())
            }
            Err(err) => {
                if err.is_api_reported() {
                    info!(city = %city, error = %err, "Search rejected by API");
                } else {
                    warn!(city = %city, error = %err, "Search failed");
                }
                show_error(&mut *view, &format!("{ERROR_MARKER} {err}"));
                Err(err)
            }
        }
    }

    /// Write the current record into the view. Does nothing before the first successful search.
    pub fn render(&mut self) {
        render_into(&mut self.view, self.weather.as_ref());
    }

    pub fn show_error(&mut self, message: &str) {
        show_error(&mut self.view, message);
    }

    pub fn hide_error(&mut self) {
        hide_error(&mut self.view);
    }

    pub fn toggle_loader(&mut self, show: bool) {
        self.view.set_hidden(Panel::Loader, !show);
    }

    pub fn weather(&self) -> Option<&WeatherRecord> {
        self.weather.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

fn render_into<V: View>(view: &mut V, weather: Option<&WeatherRecord>) {
    let Some(weather) = weather else {
        return;
    };
    let unit = Unit::from_toggle(view.unit_toggle_checked());

    view.set_text(Node::Icon, &weather.icon_url());
    view.set_text(Node::Location, &weather.location_display());
    view.set_text(Node::Description, &weather.description_display());
    view.set_text(Node::Temperature, &weather.temperature_display(unit));
    view.set_text(Node::FeelsLike, &weather.feels_like_display(unit));
    view.set_text(Node::Humidity, &weather.humidity_display());
    view.set_text(Node::Wind, &weather.wind_display());

    view.set_hidden(Panel::Result, false);
}

fn show_error<V: View>(view: &mut V, message: &str) {
    view.set_error_text(message);
    view.set_hidden(Panel::Error, false);
    view.set_hidden(Panel::Result, true);
}

fn hide_error<V: View>(view: &mut V) {
    view.set_hidden(Panel::Error, true);
}

/// Shows the loader while alive and hides it on drop, whatever the exit path.
struct LoaderGuard<'a, V: View> {
    view: &'a mut V,
}

impl<'a, V: View> LoaderGuard<'a, V> {
    fn show(view: &'a mut V) -> Self {
        view.set_hidden(Panel::Loader, false);
        Self { view }
    }
}

impl<V: View> Deref for LoaderGuard<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.view
    }
}

impl<V: View> DerefMut for LoaderGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.view
    }
}

impl<V: View> Drop for LoaderGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_hidden(Panel::Loader, true);
    }
}
