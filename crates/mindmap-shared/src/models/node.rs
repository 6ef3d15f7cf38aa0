use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MapError;
use crate::Actor;

/// Work-item classification. Only meaningful on non-category nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    Performance,
    Feature,
    Refactor,
    Bugfix,
}

/// Fixed donation durations, stored on the wire as the bare day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DonationPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl DonationPeriod {
    pub fn days(self) -> u32 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    pub fn duration(self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.days()))
    }
}

impl TryFrom<u32> for DonationPeriod {
    type Error = MapError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            30 => Ok(Self::OneMonth),
            90 => Ok(Self::ThreeMonths),
            180 => Ok(Self::SixMonths),
            365 => Ok(Self::OneYear),
            other => Err(MapError::Validation(format!(
                "invalid donation period: {other} days"
            ))),
        }
    }
}

impl From<DonationPeriod> for u32 {
    fn from(period: DonationPeriod) -> u32 {
        period.days()
    }
}

/// One supporter's accumulated contribution to a node.
///
/// Older documents stored a bare number per supporter name; deserialization
/// accepts both shapes and normalizes to this record, so the legacy form
/// disappears on the next save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSupporter", rename_all = "camelCase")]
pub struct Supporter {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<DonationPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSupporter {
    Amount(f64),
    #[serde(rename_all = "camelCase")]
    Record {
        #[serde(default)]
        amount: f64,
        #[serde(default)]
        date: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "lenient_period")]
        period: Option<DonationPeriod>,
        #[serde(default)]
        expire_date: Option<DateTime<Utc>>,
    },
}

/// Stored documents may carry day counts outside the current enumeration;
/// those load as no period rather than failing the whole document. New
/// donations still go through the strict [`DonationPeriod`] conversion.
fn lenient_period<'de, D>(deserializer: D) -> Result<Option<DonationPeriod>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let days = Option::<u32>::deserialize(deserializer)?;
    Ok(days.and_then(|d| DonationPeriod::try_from(d).ok()))
}

impl From<RawSupporter> for Supporter {
    fn from(raw: RawSupporter) -> Self {
        match raw {
            RawSupporter::Amount(amount) => Self {
                amount,
                date: None,
                period: None,
                expire_date: None,
            },
            RawSupporter::Record {
                amount,
                date,
                period,
                expire_date,
            } => Self {
                amount,
                date,
                period,
                expire_date,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// A mindmap tree vertex. Nodes own their children exclusively and never
/// reference their parent; parent lookup is a top-down search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub is_category: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    /// Cached sum of all supporter contributions, rewritten together with
    /// `supporters` on every donation.
    #[serde(default)]
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Display name captured at creation time; not live-updated.
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub supporters: BTreeMap<String, Supporter>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub support_count: i64,
}

impl Node {
    /// Creates a node with a fresh random id, stamping creator identity
    /// and creation time. Category nodes never carry a work type.
    pub fn new(text: impl Into<String>, actor: &Actor, is_category: bool, work_type: Option<WorkType>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            children: Vec::new(),
            is_category,
            work_type: if is_category { None } else { work_type },
            amount: 0.0,
            created_at: Utc::now(),
            created_by: actor.id.clone(),
            creator_name: actor.username.clone(),
            details: String::new(),
            supporters: BTreeMap::new(),
            comments: Vec::new(),
            support_count: 0,
        }
    }
}
