use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Config,
    error::WeatherError,
    model::{ApiErrorDetail, CurrentResponse},
};

/// Anything that can look up current conditions for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentResponse, WeatherError>;
}

/// WeatherAPI.com `current.json` client. One request per call: no retry, no cache.
///
/// The key may be absent; that is only reported when a request is attempted.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), base_url: base_url.into(), http: Client::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key().ok().map(str::to_owned),
            base_url: config.base_url.clone(),
            http: Client::new(),
        }
    }

    /// `{base}?key={key}&q={city}&aqi=no`, with the city form-encoded.
    pub fn request_url(&self, city: &str) -> Result<Url, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        Url::parse_with_params(&self.base_url, &[("key", api_key), ("q", city), ("aqi", "no")])
            .map_err(|_| WeatherError::InvalidBaseUrl(self.base_url.clone()))
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentResponse, WeatherError> {
        let url = self.request_url(city)?;
        debug!(base_url = %self.base_url, city, "Requesting current weather");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "WeatherAPI request failed");
            return Err(WeatherError::NotFoundOrApiError(status));
        }

        parse_body(&body)
    }
}

/// An `error` object wins over everything else in a successful response.
fn parse_body(body: &str) -> Result<CurrentResponse, WeatherError> {
    let mut value: Value = serde_json::from_str(body)?;

    if let Some(error) = value.get_mut("error") {
        let error = ApiErrorDetail::deserialize(error.take())?;
        debug!(code = ?error.code, message = %error.message, "WeatherAPI reported an error");
        return Err(WeatherError::ApiDomainError(error.message));
    }

    Ok(CurrentResponse::deserialize(value)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const LONDON: &str = r#"{
        "location": {"name": "London", "country": "United Kingdom"},
        "current": {
            "temp_c": 18, "temp_f": 64.4, "feelslike_c": 17, "feelslike_f": 62.6,
            "humidity": 72, "wind_kph": 11.2,
            "condition": {"text": "Partly cloudy", "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png"}
        }
    }"#;

    fn client_for(server: &Server) -> WeatherClient {
        WeatherClient::new("KEY", format!("{}/v1/current.json", server.url()))
    }

    #[test]
    fn request_url_embeds_key_city_and_aqi() {
        let client = WeatherClient::new("KEY", "https://api.weatherapi.com/v1/current.json");
        let url = client.request_url("New York").expect("valid url");

        assert_eq!(
            url.as_str(),
            "https://api.weatherapi.com/v1/current.json?key=KEY&q=New+York&aqi=no"
        );
    }

    #[test]
    fn request_url_escapes_city() {
        let client = WeatherClient::new("KEY", "https://api.weatherapi.com/v1/current.json");
        let url = client.request_url("São Paulo&x=1").expect("valid url");

        let q: Vec<_> = url.query_pairs().filter(|(k, _)| k == "q").collect();
        assert_eq!(q.len(), 1);
        assert_eq!(q[0].1, "São Paulo&x=1");
        assert!(!url.query_pairs().any(|(k, _)| k == "x"));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let client = WeatherClient::new("KEY", "not a url");
        let err = client.request_url("London").unwrap_err();
        assert!(matches!(err, WeatherError::InvalidBaseUrl(_)));
    }

    #[tokio::test]
    async fn fetches_and_parses_current_weather() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/current.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "KEY".into()),
                Matcher::UrlEncoded("q".into(), "London".into()),
                Matcher::UrlEncoded("aqi".into(), "no".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LONDON)
            .create_async()
            .await;

        let current = client_for(&server).fetch_current("London").await.expect("success");

        mock.assert_async().await;
        assert_eq!(current.location.name, "London");
        assert_eq!(current.current.temp_c, 18.0);
        assert_eq!(current.current.temp_f, 64.4);
    }

    #[tokio::test]
    async fn non_success_status_is_not_found_or_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/current.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = client_for(&server).fetch_current("Atlantis").await.unwrap_err();

        assert!(matches!(err, WeatherError::NotFoundOrApiError(s) if s.as_u16() == 404));
        assert_eq!(err.to_string(), "City not found or API error.");
    }

    #[tokio::test]
    async fn error_payload_with_ok_status_is_domain_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/current.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 1006, "message": "No matching location found."}}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_current("Nowhere").await.unwrap_err();

        match err {
            WeatherError::ApiDomainError(msg) => assert_eq!(msg, "No matching location found."),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/current.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"location": {"name": "London"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
        assert!(err.to_string().contains("missing field `country`"), "got: {err}");
    }

    #[test]
    fn error_payload_without_message_is_decode_error() {
        let err = parse_body(r#"{"error": {"code": 1006}}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `message`"), "got: {err}");
    }

    #[test]
    fn wrong_field_type_names_the_problem() {
        let body = LONDON.replace("\"humidity\": 72", "\"humidity\": \"damp\"");
        let err = parse_body(&body).unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
        assert!(err.to_string().contains("invalid type"), "got: {err}");
    }

    #[tokio::test]
    async fn missing_key_is_reported_without_a_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/current.json")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = Config {
            base_url: format!("{}/v1/current.json", server.url()),
            ..Config::default()
        };
        let client = WeatherClient::from_config(&config);
        let err = client.fetch_current("London").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, WeatherError::MissingApiKey));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn from_config_uses_configured_key_and_endpoint() {
        let mut config =
            Config { base_url: "https://example.com/current.json".into(), ..Config::default() };
        config.set_api_key("KEY".into());

        let url = WeatherClient::from_config(&config).request_url("Oslo").expect("valid url");
        assert_eq!(url.as_str(), "https://example.com/current.json?key=KEY&q=Oslo&aqi=no");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
