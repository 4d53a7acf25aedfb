use serde::{Deserialize, Serialize};

/// Body of `GET /status`.
#[derive(Serialize, Debug)]
pub struct Status {
    pub status: &'static str,
}

impl Status {
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}

/// Uniform error body: `{"error": <message>}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Body of `GET /stats`: object counts per entity type.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub amenities: u64,
    pub cities: u64,
    pub places: u64,
    pub reviews: u64,
    pub states: u64,
    pub users: u64,
}
