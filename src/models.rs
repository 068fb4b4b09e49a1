use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// Lifecycle flag for a client's program enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    Active,
    Paused,
    Completed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            other => Err(InputError::UnknownStatus(other.to_string())),
        }
    }
}

/// Coach-assigned alert priority, independent of status and program day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HealthFlag {
    CrushingIt,
    OnTrack,
    New,
    AtRisk,
    Paused,
}

impl HealthFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrushingIt => "crushing-it",
            Self::OnTrack => "on-track",
            Self::New => "new",
            Self::AtRisk => "at-risk",
            Self::Paused => "paused",
        }
    }
}

impl std::str::FromStr for HealthFlag {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crushing-it" => Ok(Self::CrushingIt),
            "on-track" => Ok(Self::OnTrack),
            "new" => Ok(Self::New),
            "at-risk" => Ok(Self::AtRisk),
            "paused" => Ok(Self::Paused),
            other => Err(InputError::UnknownHealthFlag(other.to_string())),
        }
    }
}

/// The two daily touchpoints a coach can mark complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TouchpointKind {
    Morning,
    Evening,
}

impl TouchpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }
}

impl std::str::FromStr for TouchpointKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "evening" => Ok(Self::Evening),
            other => Err(InputError::UnknownTouchpointKind(other.to_string())),
        }
    }
}

/// Next scheduled coach-client contact, display data only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextTouchpoint {
    pub kind: String,
    pub time_label: String,
    pub day: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub start_date: NaiveDate,
    /// Days elapsed in the program, tracked independently of start_date.
    pub current_day: i32,
    pub status: ClientStatus,
    pub health: HealthFlag,
    pub start_weight: f64,
    pub current_weight: f64,
    pub goal_weight: f64,
    /// Always round1(start_weight - current_weight) as of the last weigh-in.
    pub total_lost: f64,
    pub weekly_avg: f64,
    pub last_contact: NaiveDate,
    pub last_weigh_in: NaiveDate,
    pub next_touchpoint: NextTouchpoint,
    pub today_morning: bool,
    pub today_evening: bool,
    pub notes: String,
    pub coach_prospect: bool,
    /// Handle into the external prospect pipeline; not validated here.
    pub prospect_id: Option<Uuid>,
}
