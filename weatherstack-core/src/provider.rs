use crate::{
    ApiError, Config, Credentials, DateSpec, Query, WeatherPayload,
    provider::weatherstack::WeatherstackProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherstack;

/// Source of weather payloads. Implementations make one upstream call per
/// invocation and report every failure as an [`ApiError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        query: &Query,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError>;

    async fn historical(
        &self,
        query: &Query,
        dates: &DateSpec,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError>;
}

/// Construct the Weatherstack provider pointed at the configured origin.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(WeatherstackProvider::new(config.base_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_uses_configured_origin() {
        let cfg = Config::default().with_overrides(None, Some("http://localhost:4000/".into()));
        let provider = provider_from_config(&cfg);
        assert!(format!("{provider:?}").contains("http://localhost:4000"));
    }
}
