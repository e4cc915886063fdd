// src/entity/entry.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a stored entry.
pub type EntryId = i64;

/// A mood value on the 1 (worst) to 5 (best) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodCode(u8);

impl MoodCode {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MoodCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("Mood out of range: {}", value))
    }
}

impl From<MoodCode> for u8 {
    fn from(mood: MoodCode) -> Self {
        mood.0
    }
}

impl std::fmt::Display for MoodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MoodCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("Invalid mood: {}", s))
    }
}

/// A stored mood entry, joined with its author's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub body: String,
    /// The mood exactly as it was submitted.
    pub mood: String,
    pub date: NaiveDate,
    pub created: DateTime<Utc>,
    pub author_id: i64,
    pub username: String,
}

impl Entry {
    /// The mood as a code on the 1-5 scale, if it is one.
    pub fn mood_code(&self) -> Option<MoodCode> {
        self.mood.parse().ok()
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// Values submitted from the create and update forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    pub body: String,
    pub mood: String,
    pub date: String,
}

/// Form values that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub body: String,
    pub mood: String,
    pub date: NaiveDate,
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl EntryForm {
    pub fn new(body: impl Into<String>, mood: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            mood: mood.into(),
            date: date.into(),
        }
    }

    /// Check the submitted values. Only the mood is required; the date must
    /// be a calendar date so the tracker can bucket it.
    pub fn validate(&self) -> Result<ValidEntry, String> {
        if self.mood.is_empty() {
            return Err("Mood is required.".to_string());
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| "Date must be YYYY-MM-DD.".to_string())?;

        Ok(ValidEntry {
            body: self.body.clone(),
            mood: self.mood.clone(),
            date,
        })
    }
}
