//! Personal data export and erasure planning
//!
//! A user may request a copy of everything they created, or its deletion.
//! Ownership uses the same rule as the "mine" search section: a record belongs
//! to the user when its creator equals their id or their email.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grouping::{GroupConfig, Ownership};
use crate::models::{Asana, DataAsset, Reminder, Sequence, Series, UserProfile};

/// Bumped whenever the export document layout changes
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Identity of the user requesting an export or erasure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub user_id: String,
    pub email: Option<String>,
}

impl Subject {
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }

    fn owner_config(&self) -> GroupConfig {
        GroupConfig::default().with_current_user(Some(self.user_id.clone()), self.email.clone())
    }

    fn owns_reminder(&self, reminder: &Reminder) -> bool {
        reminder.user_id == self.user_id
            || (reminder.user_email.is_some() && reminder.user_email == self.email)
    }
}

/// Everything held about one user
#[derive(Debug, Clone, Serialize)]
pub struct UserDataExport {
    pub format_version: u32,
    pub generated_at: DateTime<Utc>,
    pub user_id: String,
    pub profile: Option<UserProfile>,
    pub asanas: Vec<Asana>,
    pub series: Vec<Series>,
    pub sequences: Vec<Sequence>,
    pub reminders: Vec<Reminder>,
}

impl UserDataExport {
    pub fn record_count(&self) -> usize {
        usize::from(self.profile.is_some())
            + self.asanas.len()
            + self.series.len()
            + self.sequences.len()
            + self.reminders.len()
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::Internal(e.to_string()))
    }
}

/// Candidate records for an export; anything not owned by the subject is dropped
#[derive(Debug, Clone, Default)]
pub struct ExportSource {
    pub profile: Option<UserProfile>,
    pub asanas: Vec<Asana>,
    pub series: Vec<Series>,
    pub sequences: Vec<Sequence>,
    pub reminders: Vec<Reminder>,
}

fn owned<T: DataAsset>(config: &GroupConfig, items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| config.classify(item.created_by()) == Ownership::Mine)
        .collect()
}

/// Assemble the export document for `subject`
pub fn build_export(subject: &Subject, source: ExportSource, now: DateTime<Utc>) -> UserDataExport {
    let config = subject.owner_config();

    UserDataExport {
        format_version: EXPORT_FORMAT_VERSION,
        generated_at: now,
        user_id: subject.user_id.clone(),
        profile: source.profile.filter(|p| p.user_id == subject.user_id),
        asanas: owned(&config, source.asanas),
        series: owned(&config, source.series),
        sequences: owned(&config, source.sequences),
        reminders: source
            .reminders
            .into_iter()
            .filter(|r| subject.owns_reminder(r))
            .collect(),
    }
}

/// Ids of the records a deletion request would remove
///
/// Executing the deletion is left to the database owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErasurePlan {
    pub user_id: String,
    pub profile: bool,
    pub asana_ids: Vec<String>,
    pub series_ids: Vec<String>,
    pub sequence_ids: Vec<String>,
    pub reminder_ids: Vec<String>,
}

impl ErasurePlan {
    pub fn from_export(export: &UserDataExport) -> Self {
        fn ids<T: DataAsset>(items: &[T]) -> Vec<String> {
            items.iter().map(|i| i.id().to_string()).collect()
        }

        Self {
            user_id: export.user_id.clone(),
            profile: export.profile.is_some(),
            asana_ids: ids(&export.asanas),
            series_ids: ids(&export.series),
            sequence_ids: ids(&export.sequences),
            reminder_ids: export.reminders.iter().map(|r| r.id.clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.profile
            && self.asana_ids.is_empty()
            && self.series_ids.is_empty()
            && self.sequence_ids.is_empty()
            && self.reminder_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn asana(id: &str, created_by: Option<&str>) -> Asana {
        Asana {
            id: id.to_string(),
            name: format!("Pose {}", id),
            sanskrit_name: None,
            alternative_names: Vec::new(),
            description: None,
            category: None,
            difficulty: "beginner".to_string(),
            per_side: false,
            image_url: None,
            created_by: created_by.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reminder(id: &str, user_id: &str, email: Option<&str>) -> Reminder {
        Reminder {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_email: email.map(str::to_string),
            time_of_day: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            weekdays: vec![Weekday::Mon],
            message: None,
            enabled: true,
            last_sent_at: None,
        }
    }

    fn subject() -> Subject {
        Subject::new("u1", Some("me@example.com".into()))
    }

    #[test]
    fn test_export_keeps_only_owned_records() {
        let source = ExportSource {
            profile: Some(UserProfile {
                user_id: "u1".into(),
                email: Some("me@example.com".into()),
                display_name: Some("Me".into()),
                bio: None,
                created_at: Utc::now(),
            }),
            asanas: vec![
                asana("a1", Some("u1")),
                asana("a2", Some("me@example.com")),
                asana("a3", Some("alpha")),
                asana("a4", None),
            ],
            reminders: vec![
                reminder("r1", "u1", None),
                reminder("r2", "u2", Some("me@example.com")),
                reminder("r3", "u2", None),
            ],
            ..Default::default()
        };

        let export = build_export(&subject(), source, Utc::now());

        let asana_ids: Vec<&str> = export.asanas.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(asana_ids, vec!["a1", "a2"]);
        let reminder_ids: Vec<&str> = export.reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(reminder_ids, vec!["r1", "r2"]);
        assert!(export.profile.is_some());
        assert_eq!(export.record_count(), 5);
    }

    #[test]
    fn test_foreign_profile_dropped() {
        let source = ExportSource {
            profile: Some(UserProfile {
                user_id: "u2".into(),
                email: None,
                display_name: None,
                bio: None,
                created_at: Utc::now(),
            }),
            ..Default::default()
        };

        let export = build_export(&subject(), source, Utc::now());
        assert!(export.profile.is_none());
        assert_eq!(export.record_count(), 0);
    }

    #[test]
    fn test_reminder_without_email_does_not_match_subject_without_email() {
        let subject = Subject::new("u1", None);
        let source = ExportSource {
            reminders: vec![reminder("r1", "u2", None)],
            ..Default::default()
        };

        let export = build_export(&subject, source, Utc::now());
        assert!(export.reminders.is_empty());
    }

    #[test]
    fn test_export_json_layout() {
        let source = ExportSource {
            asanas: vec![asana("a1", Some("u1"))],
            ..Default::default()
        };
        let export = build_export(&subject(), source, Utc::now());

        let json: serde_json::Value = serde_json::from_str(&export.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["format_version"], EXPORT_FORMAT_VERSION);
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["asanas"][0]["id"], "a1");
        assert!(json["profile"].is_null());
    }

    #[test]
    fn test_erasure_plan() {
        let source = ExportSource {
            asanas: vec![asana("a1", Some("u1")), asana("a2", Some("other"))],
            reminders: vec![reminder("r1", "u1", None)],
            ..Default::default()
        };
        let export = build_export(&subject(), source, Utc::now());

        let plan = ErasurePlan::from_export(&export);
        assert_eq!(plan.user_id, "u1");
        assert!(!plan.profile);
        assert_eq!(plan.asana_ids, vec!["a1"]);
        assert_eq!(plan.reminder_ids, vec!["r1"]);
        assert!(!plan.is_empty());

        let empty = ErasurePlan::from_export(&build_export(&subject(), ExportSource::default(), Utc::now()));
        assert!(empty.is_empty());
    }
}
