use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the weather client, the formatting module and the controller.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The city input was empty or whitespace only. No request is made.
    #[error("Please enter a city name.")]
    EmptyInput,

    /// The HTTP layer reported a non-success status.
    #[error("City not found or API error.")]
    NotFoundOrApiError(StatusCode),

    /// The API answered successfully but the body carried an error payload.
    #[error("{0}")]
    ApiDomainError(String),

    /// The formatting module could not be constructed or populated.
    #[error("formatting module unavailable: {0}")]
    DelegateUnavailable(String),

    /// A request was attempted without a configured key.
    #[error("No WeatherAPI key configured. Run `weather configure` and enter your API key.")]
    MissingApiKey,

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    /// Whether the error was reported by the API rather than by the transport or decoder.
    pub fn is_api_reported(&self) -> bool {
        matches!(self, WeatherError::NotFoundOrApiError(_) | WeatherError::ApiDomainError(_))
    }
}
