use serde::{Deserialize, Serialize};

/// Status change for an existing request. The status string is passed to the
/// remote service as-is; it decides what is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestUpdate {
    pub request_id: String,
    pub new_status: String,
}

/// Response of `GET /request/count`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RequestCounts {
    pub total: u64,
    pub movie: u64,
    pub tv: u64,
    pub pending: u64,
    pub approved: u64,
    pub declined: u64,
    pub processing: u64,
    pub available: u64,
}

/// Response of `GET /issue/count`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IssueCounts {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
    pub video: u64,
    pub audio: u64,
    pub subtitles: u64,
    pub others: u64,
}
