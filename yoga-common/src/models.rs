//! Practice data models
//!
//! Poses (asanas), series built from poses, sequences built from series,
//! user profiles and practice reminders. The database schema holding these
//! rows is owned elsewhere; these types mirror its columns.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::grouping::{GroupConfig, Grouped};
use crate::ordering::group_and_order;

/// A single pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Asana {
    pub id: String,
    pub name: String,
    pub sanskrit_name: Option<String>,
    /// Other common spellings/names, stored as a JSON array
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub alternative_names: Vec<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: String,
    /// Whether the pose is practiced once per side
    pub per_side: bool,
    pub image_url: Option<String>,
    /// Creator id or email; `None` for imported rows
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered list of poses practiced together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Series {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub asana_ids: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered list of series forming a full practice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sequence {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub series_ids: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserProfile {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A recurring practice reminder
///
/// `time_of_day` is UTC; `weekdays` lists the days it fires on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub user_email: Option<String>,
    pub time_of_day: NaiveTime,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub weekdays: Vec<Weekday>,
    pub message: Option<String>,
    pub enabled: bool,
    pub last_sent_at: Option<DateTime<Utc>>,
}

/// A record shown in search lists: it has a creator and a display label.
pub trait DataAsset {
    fn id(&self) -> &str;
    fn created_by(&self) -> Option<&str>;
    fn label(&self) -> &str;
}

impl DataAsset for Asana {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl DataAsset for Series {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl DataAsset for Sequence {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Group `items` by ownership and sort each section by label.
pub fn search_sections<'a, T: DataAsset>(
    items: impl IntoIterator<Item = &'a T>,
    config: &GroupConfig,
) -> Vec<Grouped<&'a T>> {
    group_and_order(items, config, |item| item.created_by(), |item| item.label())
}
