//! Practice reminder selection and delivery
//!
//! A scheduler invokes [`deliver_reminders`] periodically with the current time
//! and the length of its invocation window. Every reminder whose time of day
//! falls in `(now - window, now]` on one of its weekdays is turned into a
//! [`PushPayload`] and handed to a [`ReminderChannel`]. The pass is best effort:
//! there is no retry, failures are logged and reported.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::Reminder;
use crate::Result;

/// Body used when a reminder has no message of its own
pub const DEFAULT_REMINDER_BODY: &str = "Time to roll out your mat.";
pub const REMINDER_TITLE: &str = "Practice reminder";
/// Page opened when the notification is clicked
pub const REMINDER_URL: &str = "/practice";

/// Notification content sent to a push or email provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub url: String,
    /// Collapses repeated notifications for the same reminder on the device
    pub tag: String,
}

/// Delivery seam for the external push/email provider
pub trait ReminderChannel {
    fn deliver(&self, reminder: &Reminder, payload: &PushPayload) -> Result<()>;
}

/// Outcome of one delivery pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub sent: Vec<String>,
    pub failed: Vec<String>,
}

/// Whether `reminder` should fire in the window ending at `now`.
///
/// Windows that cross midnight are handled: a reminder at 23:58 is due for a
/// pass at 00:01 with a five minute window, on the weekday of 23:58.
pub fn is_due(reminder: &Reminder, now: DateTime<Utc>, window: Duration) -> bool {
    if !reminder.enabled || window <= Duration::zero() {
        return false;
    }

    let window_start = now - window;
    if let Some(last_sent) = reminder.last_sent_at {
        if last_sent > window_start {
            return false;
        }
    }

    // Candidate firing instants: the reminder's time on today and yesterday
    [now.date_naive(), (now - Duration::days(1)).date_naive()]
        .into_iter()
        .map(|day| day.and_time(reminder.time_of_day).and_utc())
        .any(|fire_at| {
            fire_at > window_start
                && fire_at <= now
                && reminder.weekdays.contains(&fire_at.weekday())
        })
}

/// Reminders due in the window ending at `now`, in input order
pub fn due_reminders<'a>(
    reminders: &'a [Reminder],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a Reminder> {
    reminders
        .iter()
        .filter(|r| is_due(r, now, window))
        .collect()
}

pub fn build_push_payload(reminder: &Reminder) -> PushPayload {
    let body = reminder
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_REMINDER_BODY);

    PushPayload {
        title: REMINDER_TITLE.to_string(),
        body: body.to_string(),
        url: REMINDER_URL.to_string(),
        tag: format!("reminder-{}", reminder.id),
    }
}

/// Run one best-effort delivery pass.
///
/// Each due reminder is attempted exactly once; a failure does not stop the
/// pass.
pub fn deliver_reminders<C: ReminderChannel>(
    reminders: &[Reminder],
    now: DateTime<Utc>,
    window: Duration,
    channel: &C,
) -> DeliveryReport {
    let due = due_reminders(reminders, now, window);
    debug!(due = due.len(), total = reminders.len(), "Selected due reminders");

    let mut report = DeliveryReport::default();
    for reminder in due {
        let payload = build_push_payload(reminder);
        match channel.deliver(reminder, &payload) {
            Ok(()) => report.sent.push(reminder.id.clone()),
            Err(e) => {
                warn!(reminder_id = %reminder.id, user_id = %reminder.user_id, "Reminder delivery failed: {}", e);
                report.failed.push(reminder.id.clone());
            }
        }
    }

    info!(
        sent = report.sent.len(),
        failed = report.failed.len(),
        "Reminder delivery pass complete"
    );
    report
}
