//! MCP server handler routing tool calls to the adapter.

use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Implementation, JsonObject, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use weatherstack_core::{Credentials, WeatherProvider};

use crate::tools::{
    self, CURRENT_WEATHER, CurrentWeatherArgs, HISTORICAL_WEATHER, HistoricalWeatherArgs,
    ToolContext,
};

#[derive(Debug, Clone)]
pub struct WeatherServer {
    provider: Arc<dyn WeatherProvider>,
    credentials: Credentials,
}

impl WeatherServer {
    pub fn new(provider: Arc<dyn WeatherProvider>, credentials: Credentials) -> Self {
        Self { provider, credentials }
    }

    fn context(&self) -> ToolContext {
        ToolContext { credentials: self.credentials.clone() }
    }

    /// Run the named tool. Unknown names and malformed arguments are protocol
    /// errors; upstream failures come back as error tool results.
    pub async fn dispatch(&self, name: &str, args: JsonObject) -> Result<CallToolResult, McpError> {
        let ctx = self.context();
        let provider = self.provider.as_ref();

        match name {
            CURRENT_WEATHER => {
                let args: CurrentWeatherArgs = parse_args(args)?;
                Ok(tools::current_weather_tool(provider, args.query.into(), &ctx).await)
            }
            HISTORICAL_WEATHER => {
                let args: HistoricalWeatherArgs = parse_args(args)?;
                Ok(tools::historical_weather_tool(
                    provider,
                    args.query.into(),
                    &args.historical_dates,
                    &ctx,
                )
                .await)
            }
            other => Err(McpError::invalid_params(format!("Unknown tool: {other}"), None)),
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: JsonObject) -> Result<T, McpError> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| McpError::invalid_params(format!("Invalid tool arguments: {e}"), None))
}

impl ServerHandler for WeatherServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let result = ListToolsResult {
            tools: tools::tool_definitions(),
            next_cursor: None,
            ..Default::default()
        };
        std::future::ready(Ok(result))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let args = request.arguments.unwrap_or_default();
            self.dispatch(&request.name, args).await
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Weather lookups backed by the Weatherstack API. Use query_current_weather for \
                 current conditions and query_historical_weather for past dates."
                    .to_string(),
            ),
        }
    }
}
