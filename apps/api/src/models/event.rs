use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Social platform an event is hosted or announced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Online,
    Onsite,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Online => "online",
            EventType::Onsite => "onsite",
        }
    }
}

impl FromStr for EventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(EventType::Online),
            "onsite" => Ok(EventType::Onsite),
            _ => Err(()),
        }
    }
}

/// A stored event. `event_type` and `platform` stay TEXT at the storage
/// boundary; requests validate them through the enums above.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub event_type: String,
    pub platform: String,
    pub link: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub keywords: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, client-writable event fields. `id`, `created_at` and
/// `updated_at` are always server-assigned.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub name: String,
    pub description: String,
    pub event_type: EventType,
    pub platform: Platform,
    pub link: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub keywords: String,
}
