//! Pose-creation payload validation and normalization
//!
//! Clients submit a loosely-typed [`NewAsanaPayload`]. [`validate`] trims and
//! collapses whitespace, parses the enumerated fields, applies length limits
//! and collects every problem it finds into [`ValidationErrors`] so a form can
//! show all of them at once.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::collation::collation_key;
use crate::models::Asana;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_ALTERNATIVE_NAMES: usize = 10;

/// Raw pose payload as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAsanaPayload {
    pub name: Option<String>,
    pub sanskrit_name: Option<String>,
    pub alternative_names: Vec<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub sides: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsanaCategory {
    Standing,
    Seated,
    Balancing,
    Backbend,
    ForwardBend,
    Twist,
    Inversion,
    HipOpener,
    Restorative,
    ArmBalance,
}

impl AsanaCategory {
    pub const ALL: [AsanaCategory; 10] = [
        AsanaCategory::Standing,
        AsanaCategory::Seated,
        AsanaCategory::Balancing,
        AsanaCategory::Backbend,
        AsanaCategory::ForwardBend,
        AsanaCategory::Twist,
        AsanaCategory::Inversion,
        AsanaCategory::HipOpener,
        AsanaCategory::Restorative,
        AsanaCategory::ArmBalance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AsanaCategory::Standing => "standing",
            AsanaCategory::Seated => "seated",
            AsanaCategory::Balancing => "balancing",
            AsanaCategory::Backbend => "backbend",
            AsanaCategory::ForwardBend => "forward_bend",
            AsanaCategory::Twist => "twist",
            AsanaCategory::Inversion => "inversion",
            AsanaCategory::HipOpener => "hip_opener",
            AsanaCategory::Restorative => "restorative",
            AsanaCategory::ArmBalance => "arm_balance",
        }
    }
}

impl FromStr for AsanaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = enum_token(s);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown category '{}' (expected one of: {})", s.trim(), known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_token(s).as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!(
                "unknown difficulty '{}' (expected beginner, intermediate or advanced)",
                s.trim()
            )),
        }
    }
}

/// Whether a pose is held once or once per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sides {
    #[default]
    None,
    Both,
}

impl FromStr for Sides {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_token(s).as_str() {
            "none" | "single" => Ok(Sides::None),
            "both" | "per_side" => Ok(Sides::Both),
            _ => Err(format!("unknown sides value '{}' (expected none or both)", s.trim())),
        }
    }
}

/// Normalized, validated pose ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidAsana {
    pub name: String,
    pub sanskrit_name: Option<String>,
    pub alternative_names: Vec<String>,
    pub description: Option<String>,
    pub category: Option<AsanaCategory>,
    pub difficulty: Difficulty,
    pub sides: Sides,
    pub image_url: Option<String>,
}

impl ValidAsana {
    /// Build a new stored record owned by `created_by`
    pub fn into_asana(self, created_by: Option<String>, now: DateTime<Utc>) -> Asana {
        Asana {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            sanskrit_name: self.sanskrit_name,
            alternative_names: self.alternative_names,
            description: self.description,
            category: self.category.map(|c| c.as_str().to_string()),
            difficulty: self.difficulty.to_string(),
            per_side: self.sides == Sides::Both,
            image_url: self.image_url,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Trim and collapse internal whitespace runs to one space
pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized optional text; blank becomes `None`
fn normalize_optional(input: Option<&str>) -> Option<String> {
    input.map(normalize_text).filter(|s| !s.is_empty())
}

/// Lowercase and unify `-` and spaces to `_` for enum parsing
fn enum_token(input: &str) -> String {
    normalize_text(input)
        .to_lowercase()
        .replace(['-', ' '], "_")
}

fn check_len(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.push(field, format!("must be at most {} characters (got {})", max, len));
    }
}

/// Validate and normalize a pose payload.
///
/// ```
/// use yoga_common::asana_input::{validate, Difficulty, NewAsanaPayload};
///
/// let payload = NewAsanaPayload {
///     name: Some("  Downward   Dog ".into()),
///     category: Some("Inversion".into()),
///     ..Default::default()
/// };
/// let pose = validate(&payload).unwrap();
/// assert_eq!(pose.name, "Downward Dog");
/// assert_eq!(pose.difficulty, Difficulty::Beginner);
/// ```
pub fn validate(payload: &NewAsanaPayload) -> Result<ValidAsana, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = normalize_optional(payload.name.as_deref());
    match &name {
        None => errors.push("name", "is required"),
        Some(n) => check_len(&mut errors, "name", n, MAX_NAME_LEN),
    }

    let sanskrit_name = normalize_optional(payload.sanskrit_name.as_deref());
    if let Some(s) = &sanskrit_name {
        check_len(&mut errors, "sanskrit_name", s, MAX_NAME_LEN);
    }

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    if let Some(d) = &description {
        check_len(&mut errors, "description", d, MAX_DESCRIPTION_LEN);
    }

    let alternative_names = normalize_alternative_names(
        &payload.alternative_names,
        name.as_deref(),
        &mut errors,
    );

    let category = match normalize_optional(payload.category.as_deref()) {
        None => None,
        Some(raw) => match raw.parse::<AsanaCategory>() {
            Ok(c) => Some(c),
            Err(e) => {
                errors.push("category", e);
                None
            }
        },
    };

    let difficulty = match normalize_optional(payload.difficulty.as_deref()) {
        None => Difficulty::default(),
        Some(raw) => raw.parse::<Difficulty>().unwrap_or_else(|e: String| {
            errors.push("difficulty", e);
            Difficulty::default()
        }),
    };

    let sides = match normalize_optional(payload.sides.as_deref()) {
        None => Sides::default(),
        Some(raw) => raw.parse::<Sides>().unwrap_or_else(|e: String| {
            errors.push("sides", e);
            Sides::default()
        }),
    };

    let image_url = payload
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    if let Some(url) = &image_url {
        if let Err(message) = check_image_url(url) {
            errors.push("image_url", message);
        }
    }

    match name {
        Some(name) if errors.is_empty() => Ok(ValidAsana {
            name,
            sanskrit_name,
            alternative_names,
            description,
            category,
            difficulty,
            sides,
            image_url,
        }),
        _ => Err(errors),
    }
}

/// An image link must be an absolute http(s) URL with a host
fn check_image_url(raw: &str) -> Result<(), String> {
    if raw.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace".to_string());
    }
    let parsed = Url::parse(raw).map_err(|e| format!("invalid URL: {}", e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("must be an http:// or https:// URL".to_string());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err("missing host".to_string()),
    }
}

/// Drop blanks, duplicates (by collation key, first spelling wins) and
/// repeats of the primary name; cap the list length.
fn normalize_alternative_names(
    raw: &[String],
    name: Option<&str>,
    errors: &mut ValidationErrors,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    if let Some(name) = name {
        seen.insert(collation_key(name));
    }

    let mut names = Vec::new();
    for candidate in raw {
        let candidate = normalize_text(candidate);
        if candidate.is_empty() || !seen.insert(collation_key(&candidate)) {
            continue;
        }
        if candidate.chars().count() > MAX_NAME_LEN {
            errors.push(
                "alternative_names",
                format!("each name must be at most {} characters", MAX_NAME_LEN),
            );
            continue;
        }
        names.push(candidate);
    }

    if names.len() > MAX_ALTERNATIVE_NAMES {
        errors.push(
            "alternative_names",
            format!("at most {} alternative names are allowed", MAX_ALTERNATIVE_NAMES),
        );
    }
    names
}
