use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{
    Config, Controller, Key, ModuleFactory, PrecisionModule, UiEvent, WeatherClient,
    WeatherError, WeatherRecord, bootstrap,
};

use crate::view::TerminalView;

type App = Controller<WeatherClient, TerminalView>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Skip the formatting module and format numbers natively.
    #[arg(long, global = true)]
    pub native_format: bool,

    /// WeatherAPI key for this run; overrides the configured key.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and display defaults.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Show temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Look up cities one after another in a prompt loop.
    Interactive {
        /// Start with temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => {
                configure(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, fahrenheit } => {
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }
                let mut app = build_app(&config, self.native_format, fahrenheit);

                let outcome = show(&mut app, city).await;
                if outcome.is_ok() {
                    print_observed_at(app.weather());
                }

                Ok(exit_code(&outcome))
            }
            Command::Interactive { fahrenheit } => {
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }
                let mut app = build_app(&config, self.native_format, fahrenheit);

                interactive(&mut app).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Wire client, view and module readiness. A missing key is not an error
/// here; the controller reports it only when a search goes out.
fn build_app(config: &Config, native_format: bool, fahrenheit: bool) -> App {
    let client = WeatherClient::from_config(config);
    let boot = bootstrap(module_factory(config, native_format));

    let view = TerminalView::new(fahrenheit || config.fahrenheit);
    Controller::new(client, view, boot.readiness())
}

fn module_factory(config: &Config, native_format: bool) -> Option<ModuleFactory> {
    if native_format || !config.format_module {
        None
    } else {
        Some(PrecisionModule::factory())
    }
}

async fn show(app: &mut App, city: String) -> Result<(), WeatherError> {
    app.view_mut().set_input(city);
    app.handle(UiEvent::SearchClicked).await
}

fn exit_code(outcome: &Result<(), WeatherError>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn interactive(app: &mut App) -> anyhow::Result<()> {
    println!("Type a city and press Enter. `:u` switches °C/°F, `:q` quits.");

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        match line.trim() {
            ":q" => break,
            ":u" => {
                let fahrenheit = app.view_mut().flip_unit_toggle();
                println!("Units: {}", if fahrenheit { "°F" } else { "°C" });
                dispatch(app, UiEvent::UnitToggleChanged).await;
            }
            _ => {
                app.view_mut().set_input(line);
                if dispatch(app, UiEvent::KeyDown(Key::Enter)).await {
                    print_observed_at(app.weather());
                }
            }
        }
    }

    Ok(())
}

/// Run one event; the view has already shown any error, so it is only logged here.
async fn dispatch(app: &mut App, event: UiEvent) -> bool {
    match app.handle(event).await {
        Ok(()) => true,
        Err(err) => {
            debug!(?event, error = %err, "Event ended in error state");
            false
        }
    }
}

fn print_observed_at(weather: Option<&WeatherRecord>) {
    if let Some(at) = weather.and_then(|w| w.observed_at) {
        println!("  Updated:     {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    }
    println!();
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI key (leave empty to keep the current one):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let base_url = Text::new("Current-weather endpoint:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read endpoint")?;

    let fahrenheit = Confirm::new("Show Fahrenheit by default?")
        .with_default(config.fahrenheit)
        .prompt()
        .context("Failed to read unit preference")?;

    let format_module = Confirm::new("Load the formatting module at startup?")
        .with_default(config.format_module)
        .prompt()
        .context("Failed to read formatting preference")?;

    config.base_url = base_url.trim().to_string();
    config.fahrenheit = fahrenheit;
    config.format_module = format_module;

    // Surface a missing key now rather than on the first search.
    config.api_key()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
