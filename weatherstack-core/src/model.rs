use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded response body. Its shape is never interpreted.
pub type WeatherPayload = serde_json::Value;

/// Location identifier forwarded verbatim to the upstream API.
///
/// Accepted forms (validated upstream only): city name, postal code,
/// `"lat,lon"`, an IP address, or [`Query::FETCH_IP`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Sentinel asking the upstream to resolve the caller's IP.
    pub const FETCH_IP: &'static str = "fetch:ip";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn caller_ip() -> Self {
        Self::new(Self::FETCH_IP)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semicolon-joined list of `YYYY-MM-DD` dates for historical lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateSpec(String);

impl DateSpec {
    /// Joins `dates` with `;` in the given order, keeping duplicates.
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (i, date) in dates.into_iter().enumerate() {
            if i > 0 {
                joined.push(';');
            }
            joined.push_str(date.as_ref());
        }
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Weatherstack access key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self(access_key.into())
    }

    /// Raw key, for placing on the outgoing request only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Historical,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "/current",
            Endpoint::Historical => "/historical",
        }
    }
}
