use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensors published for the request service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Pending,
    Movies,
    Tv,
    Total,
    Issues,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Pending,
        SensorKind::Movies,
        SensorKind::Tv,
        SensorKind::Total,
        SensorKind::Issues,
    ];

    pub fn entity_id(&self) -> &'static str {
        match self {
            SensorKind::Pending => "sensor.overseerr_pending_requests",
            SensorKind::Movies => "sensor.overseerr_movie_requests",
            SensorKind::Tv => "sensor.overseerr_tv_requests",
            SensorKind::Total => "sensor.overseerr_total_requests",
            SensorKind::Issues => "sensor.overseerr_issues",
        }
    }

    pub fn from_entity_id(entity_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.entity_id() == entity_id)
    }

    pub fn friendly_name(&self) -> &'static str {
        match self {
            SensorKind::Pending => "Pending requests",
            SensorKind::Movies => "Movie requests",
            SensorKind::Tv => "TV Show requests",
            SensorKind::Total => "Total requests",
            SensorKind::Issues => "Issues",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SensorKind::Pending => "mdi:clock-alert-outline",
            SensorKind::Movies => "mdi:movie",
            SensorKind::Tv => "mdi:television-classic",
            SensorKind::Total => "mdi:movie",
            SensorKind::Issues => "mdi:movie",
        }
    }
}

/// Last known value of a sensor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorState {
    pub kind: SensorKind,
    pub entity_id: String,
    pub name: String,
    pub icon: String,
    pub value: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SensorState {
    pub fn unknown(kind: SensorKind) -> Self {
        Self {
            kind,
            entity_id: kind.entity_id().to_string(),
            name: kind.friendly_name().to_string(),
            icon: kind.icon().to_string(),
            value: None,
            last_updated: None,
        }
    }
}
