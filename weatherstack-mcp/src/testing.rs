use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::Mutex;
use weatherstack_core::{ApiError, Credentials, DateSpec, Query, WeatherPayload, WeatherProvider};

#[derive(Debug, Clone)]
pub enum Behaviour {
    Payload(Value),
    Status(u16, &'static str),
    Unexpected(&'static str),
    /// A real connection-refused error from a closed local port.
    Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub query: String,
    pub dates: Option<String>,
    pub access_key: String,
}

/// In-memory provider that records each call and replays one outcome.
#[derive(Debug)]
pub struct FakeProvider {
    behaviour: Behaviour,
    calls: Mutex<Vec<Call>>,
}

impl FakeProvider {
    pub fn new(behaviour: Behaviour) -> Self {
        Self { behaviour, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, endpoint: &str, call: Call) -> Result<WeatherPayload, ApiError> {
        self.calls.lock().unwrap().push(call);
        let url = format!("http://fake.weatherstack.test/{endpoint}");
        match &self.behaviour {
            Behaviour::Payload(value) => Ok(value.clone()),
            Behaviour::Status(status, body) => {
                Err(ApiError::Status { status: *status, url, body: (*body).to_string() })
            }
            Behaviour::Unexpected(message) => {
                Err(ApiError::Unexpected { url, message: (*message).to_string() })
            }
            Behaviour::Transport => {
                let err = reqwest::get(closed_local_origin()).await.unwrap_err();
                Err(ApiError::transport(&url, err))
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current(
        &self,
        query: &Query,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        self.respond(
            "current",
            Call {
                query: query.to_string(),
                dates: None,
                access_key: credentials.expose().to_string(),
            },
        )
        .await
    }

    async fn historical(
        &self,
        query: &Query,
        dates: &DateSpec,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        self.respond(
            "historical",
            Call {
                query: query.to_string(),
                dates: Some(dates.as_str().to_string()),
                access_key: credentials.expose().to_string(),
            },
        )
        .await
    }
}

fn closed_local_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/current")
}

pub fn result_json(result: &CallToolResult) -> Value {
    serde_json::to_value(result).unwrap()
}
