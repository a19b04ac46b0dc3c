//! Tool adapter: maps MCP tool invocations onto the request executor and
//! turns [`ApiError`] into an error tool result.

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use weatherstack_core::{ApiError, Credentials, DateSpec, Query, WeatherPayload, WeatherProvider};

/// Prefix of every error text returned to the caller.
pub const API_ERROR_TAG: &str = "Weatherstack API Error";

pub const CURRENT_WEATHER: &str = "query_current_weather";
pub const HISTORICAL_WEATHER: &str = "query_historical_weather";

const LOCATION_FORMS: &str = "Supported location identifiers:\n\
    - City name (e.g. \"New York\")\n\
    - ZIP code (UK, Canada, US) (e.g. \"99501\")\n\
    - Latitude,Longitude coordinates (e.g. \"40.7831,-73.9712\")\n\
    - IP address (e.g. \"153.65.8.20\")\n\
    - Special keyword \"fetch:ip\" to auto-detect requester IP";

/// Per-invocation execution context.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherArgs {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalWeatherArgs {
    pub query: String,
    pub historical_dates: Vec<String>,
}

pub async fn current_weather_tool(
    provider: &dyn WeatherProvider,
    query: Query,
    ctx: &ToolContext,
) -> CallToolResult {
    debug!(tool = CURRENT_WEATHER, %query, "tool invoked");
    into_tool_result(provider.current(&query, &ctx.credentials).await)
}

/// `dates` is joined with `;` and forwarded even when empty.
pub async fn historical_weather_tool(
    provider: &dyn WeatherProvider,
    query: Query,
    dates: &[String],
    ctx: &ToolContext,
) -> CallToolResult {
    let dates = DateSpec::from_dates(dates);
    debug!(tool = HISTORICAL_WEATHER, %query, dates = dates.as_str(), "tool invoked");
    into_tool_result(provider.historical(&query, &dates, &ctx.credentials).await)
}

fn into_tool_result(outcome: Result<WeatherPayload, ApiError>) -> CallToolResult {
    match outcome {
        Ok(payload) => success(payload),
        Err(err) => {
            match &err {
                ApiError::Status { status, .. } => {
                    warn!(status, url = err.url(), "Weatherstack returned an error status");
                }
                ApiError::Transport { detail, .. } => {
                    warn!(
                        url = err.url(),
                        detail = detail.as_str(),
                        "Weatherstack request failed in transport"
                    );
                }
                ApiError::Unexpected { message, .. } => {
                    warn!(
                        url = err.url(),
                        message = message.as_str(),
                        "Weatherstack request failed unexpectedly"
                    );
                }
            }
            CallToolResult::error(vec![Content::text(format!("{API_ERROR_TAG} {err}"))])
        }
    }
}

fn success(payload: WeatherPayload) -> CallToolResult {
    // Structured content must be a JSON object.
    if payload.is_object() {
        CallToolResult::structured(payload)
    } else {
        CallToolResult::success(vec![Content::text(payload.to_string())])
    }
}

pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            CURRENT_WEATHER,
            format!(
                "Gets the current weather for a location using the Weatherstack API.\n\n\
                 {LOCATION_FORMS}\n\nReturns the Weatherstack response unchanged."
            ),
            Arc::new(current_schema()),
        ),
        Tool::new(
            HISTORICAL_WEATHER,
            format!(
                "Gets historical weather for a location on one or more dates using the \
                 Weatherstack API.\n\n{LOCATION_FORMS}\n\n\
                 Dates use the YYYY-MM-DD format. Returns the Weatherstack response unchanged."
            ),
            Arc::new(historical_schema()),
        ),
    ]
}

fn query_property() -> serde_json::Value {
    json!({
        "type": "string",
        "description": "Location identifier: city name, ZIP code, \"lat,lon\", IP address or \"fetch:ip\"."
    })
}

fn current_schema() -> JsonObject {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), json!({ "query": query_property() }));
    schema.insert("required".to_string(), json!(["query"]));
    schema
}

fn historical_schema() -> JsonObject {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert(
        "properties".to_string(),
        json!({
            "query": query_property(),
            "historical_dates": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Dates in YYYY-MM-DD format, sent in the given order."
            }
        }),
    );
    schema.insert("required".to_string(), json!(["query", "historical_dates"]));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Behaviour, FakeProvider, result_json};

    fn ctx() -> ToolContext {
        ToolContext { credentials: Credentials::new("KEY") }
    }

    #[tokio::test]
    async fn current_success_returns_payload_verbatim() {
        let payload = json!({"current": {"temperature": 15}});
        let provider = FakeProvider::new(Behaviour::Payload(payload.clone()));

        let result = current_weather_tool(&provider, Query::from("New York"), &ctx()).await;

        let value = result_json(&result);
        assert_eq!(value["structuredContent"], payload);
        assert_ne!(value["isError"], json!(true));
        let calls = provider.calls();
        assert_eq!(calls[0].query, "New York");
        assert_eq!(calls[0].access_key, "KEY");
        assert_eq!(calls[0].dates, None);
    }

    #[tokio::test]
    async fn status_failure_becomes_tagged_error_result() {
        let provider = FakeProvider::new(Behaviour::Status(401, "invalid access key"));

        let result = current_weather_tool(&provider, Query::caller_ip(), &ctx()).await;

        let value = result_json(&result);
        assert_eq!(value["isError"], json!(true));
        let text = value["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Weatherstack API Error "));
        assert!(text.contains("401"));
        assert!(text.contains("invalid access key"));
        assert_eq!(provider.calls()[0].query, "fetch:ip");
    }

    #[tokio::test]
    async fn unexpected_failure_becomes_tagged_error_result() {
        let provider = FakeProvider::new(Behaviour::Unexpected("expected value at line 1 column 1"));

        let result = current_weather_tool(&provider, Query::from("Rome"), &ctx()).await;

        let value = result_json(&result);
        assert_eq!(value["isError"], json!(true));
        let text = value["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Weatherstack API Error Unexpected error during request to"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_tagged_error_result_without_status() {
        let provider = FakeProvider::new(Behaviour::Transport);

        let result = current_weather_tool(&provider, Query::from("Oslo"), &ctx()).await;

        let value = result_json(&result);
        assert_eq!(value["isError"], json!(true));
        let text = value["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Weatherstack API Error Network error during request to"));
        assert!(text.contains("http://fake.weatherstack.test/current"));
        assert!(!text.contains("API error"));
        assert!(!text.contains("KEY"));
    }

    #[tokio::test]
    async fn historical_joins_dates_in_given_order() {
        let provider = FakeProvider::new(Behaviour::Payload(json!({"historical": {}})));
        let dates = vec!["2024-01-01".to_string(), "2024-01-03".into(), "2024-01-02".into()];

        let result = historical_weather_tool(&provider, Query::from("London"), &dates, &ctx()).await;

        assert_ne!(result_json(&result)["isError"], json!(true));
        assert_eq!(
            provider.calls()[0].dates.as_deref(),
            Some("2024-01-01;2024-01-03;2024-01-02")
        );
    }

    #[tokio::test]
    async fn historical_forwards_empty_dates() {
        let provider = FakeProvider::new(Behaviour::Status(400, "missing historical_date"));

        let result = historical_weather_tool(&provider, Query::from("London"), &[], &ctx()).await;

        assert_eq!(provider.calls()[0].dates.as_deref(), Some(""));
        assert_eq!(result_json(&result)["isError"], json!(true));
    }

    #[tokio::test]
    async fn non_object_payload_is_returned_as_json_text() {
        let provider = FakeProvider::new(Behaviour::Payload(json!([1, 2, 3])));

        let result = current_weather_tool(&provider, Query::from("Oslo"), &ctx()).await;

        let value = result_json(&result);
        assert_ne!(value["isError"], json!(true));
        assert_eq!(value["content"][0]["text"], "[1,2,3]");
    }

    #[tokio::test]
    async fn repeated_success_is_identical() {
        let provider = FakeProvider::new(Behaviour::Payload(json!({"current": {"temperature": 15}})));

        let first = current_weather_tool(&provider, Query::from("New York"), &ctx()).await;
        let second = current_weather_tool(&provider, Query::from("New York"), &ctx()).await;

        assert_eq!(result_json(&first), result_json(&second));
    }

    #[test]
    fn definitions_expose_both_tools_with_required_args() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();
        assert_eq!(names, [CURRENT_WEATHER, HISTORICAL_WEATHER]);

        let historical = &tools[1];
        assert_eq!(
            historical.input_schema.get("required"),
            Some(&json!(["query", "historical_dates"]))
        );
    }
}
