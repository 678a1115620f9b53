//! Ownership grouping for search results
//!
//! Search and autocomplete lists show the caller's own records first, then the
//! curated records published by the alpha (seed) accounts, then optionally
//! everything else. [`group_by_creator`] partitions a flat list into those
//! sections and interleaves a [`SectionMarker`] in front of each non-empty one.
//!
//! Item order inside a section is the input order; alphabetical ordering is
//! applied afterwards by [`crate::ordering::order_in_groups`].

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

/// Positional delimiter in a grouped sequence, carrying the section label.
///
/// Serializes as `{"section": "<label>"}` so clients can branch on the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMarker {
    pub section: Arc<str>,
}

impl SectionMarker {
    pub fn new(label: &str) -> Self {
        Self {
            section: Arc::from(label),
        }
    }

    pub fn label(&self) -> &str {
        &self.section
    }
}

/// One element of a grouped sequence: either a section header or a data item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Grouped<T> {
    Section(SectionMarker),
    Item(T),
}

impl<T> Grouped<T> {
    pub fn is_section(&self) -> bool {
        matches!(self, Grouped::Section(_))
    }

    pub fn as_section(&self) -> Option<&SectionMarker> {
        match self {
            Grouped::Section(marker) => Some(marker),
            Grouped::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            Grouped::Item(item) => Some(item),
            Grouped::Section(_) => None,
        }
    }
}

/// Which section a record lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Created by the current user (matched on id or email)
    Mine,
    /// Created by one of the alpha accounts
    Public,
    /// Anything else
    Others,
}

/// Identity and labels used to group one list.
///
/// Empty identity strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct GroupConfig {
    pub current_user_id: Option<String>,
    pub current_user_email: Option<String>,
    pub alpha_user_ids: Vec<String>,
    pub my_label: String,
    pub public_label: String,
    /// When `None`, records that are neither mine nor public are dropped
    pub others_label: Option<String>,
}

impl GroupConfig {
    pub fn new(my_label: impl Into<String>, public_label: impl Into<String>) -> Self {
        Self {
            my_label: my_label.into(),
            public_label: public_label.into(),
            ..Self::default()
        }
    }

    pub fn with_current_user(mut self, id: Option<String>, email: Option<String>) -> Self {
        self.current_user_id = id;
        self.current_user_email = email;
        self
    }

    pub fn with_alpha_users<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alpha_user_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_others_label(mut self, label: impl Into<String>) -> Self {
        self.others_label = Some(label.into());
        self
    }

    /// Classify a record by its creator. First match wins: mine, public, others.
    pub fn classify(&self, created_by: Option<&str>) -> Ownership {
        let Some(creator) = created_by.filter(|c| !c.is_empty()) else {
            return Ownership::Others;
        };

        if non_empty(&self.current_user_id) == Some(creator)
            || non_empty(&self.current_user_email) == Some(creator)
        {
            Ownership::Mine
        } else if self.alpha_user_ids.iter().any(|alpha| alpha == creator) {
            Ownership::Public
        } else {
            Ownership::Others
        }
    }

    /// Creators whose records can appear in a grouped list, or `None` when
    /// every record is kept (an others label is set).
    pub fn visible_creators(&self) -> Option<Vec<&str>> {
        if self.others_label.is_some() {
            return None;
        }
        let mut creators: Vec<&str> = Vec::with_capacity(self.alpha_user_ids.len() + 2);
        let candidates = non_empty(&self.current_user_id)
            .into_iter()
            .chain(non_empty(&self.current_user_email))
            .chain(self.alpha_user_ids.iter().map(String::as_str).filter(|a| !a.is_empty()));
        for creator in candidates {
            if !creators.contains(&creator) {
                creators.push(creator);
            }
        }
        Some(creators)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Partition `items` into mine / public / others sections.
///
/// Items are deduplicated by identity: the same reference appearing twice is
/// kept once (first occurrence), while two distinct values that happen to be
/// equal are both kept. Sections are emitted in the fixed order mine, public,
/// others; a section with no members is omitted together with its marker.
///
/// ```
/// use yoga_common::grouping::{group_by_creator, GroupConfig, Grouped};
///
/// struct Pose { name: &'static str, created_by: Option<&'static str> }
///
/// let poses = [
///     Pose { name: "Tree", created_by: Some("seed") },
///     Pose { name: "Crow", created_by: Some("user-123") },
/// ];
/// let config = GroupConfig::new("My Items", "Public Items")
///     .with_current_user(Some("user-123".into()), None)
///     .with_alpha_users(["seed"]);
///
/// let grouped = group_by_creator(&poses, &config, |p| p.created_by);
/// let labels: Vec<&str> = grouped
///     .iter()
///     .map(|e| match e {
///         Grouped::Section(m) => m.label(),
///         Grouped::Item(p) => p.name,
///     })
///     .collect();
/// assert_eq!(labels, ["My Items", "Crow", "Public Items", "Tree"]);
/// ```
pub fn group_by_creator<'a, T, I, F>(
    items: I,
    config: &GroupConfig,
    get_created_by: F,
) -> Vec<Grouped<&'a T>>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<&str>,
{
    let mut seen: HashSet<*const T> = HashSet::new();
    let mut mine = Vec::new();
    let mut public = Vec::new();
    let mut others = Vec::new();

    for item in items {
        if !seen.insert(item as *const T) {
            continue;
        }
        match config.classify(get_created_by(item)) {
            Ownership::Mine => mine.push(item),
            Ownership::Public => public.push(item),
            Ownership::Others => others.push(item),
        }
    }

    let mut out = Vec::with_capacity(mine.len() + public.len() + others.len() + 3);
    push_section(&mut out, &config.my_label, mine);
    push_section(&mut out, &config.public_label, public);
    match &config.others_label {
        Some(label) => push_section(&mut out, label, others),
        None if !others.is_empty() => {
            debug!(dropped = others.len(), "No others label configured, dropping unowned items");
        }
        None => {}
    }
    out
}

/// Keep at most `limit` items of a grouped list, in list order.
///
/// Earlier sections fill first, so a short limit trims the others and public
/// sections before the caller's own records. A marker left with no items
/// after the cut is dropped.
pub fn limit_items<T>(entries: Vec<Grouped<T>>, limit: usize) -> Vec<Grouped<T>> {
    let mut out = Vec::with_capacity(entries.len());
    let mut pending = None;
    let mut taken = 0;

    for entry in entries {
        if taken == limit {
            break;
        }
        match entry {
            Grouped::Section(_) => pending = Some(entry),
            Grouped::Item(_) => {
                out.extend(pending.take());
                out.push(entry);
                taken += 1;
            }
        }
    }
    out
}

fn push_section<'a, T>(out: &mut Vec<Grouped<&'a T>>, label: &str, members: Vec<&'a T>) {
    if members.is_empty() {
        return;
    }
    out.push(Grouped::Section(SectionMarker::new(label)));
    out.extend(members.into_iter().map(Grouped::Item));
}
