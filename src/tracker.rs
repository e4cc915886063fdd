//! Monthly mood tracker.
//!
//! Projects a user's entries onto a fixed calendar of thirty day slots, one
//! mood per day of the month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entity::{Entry, MoodCode};
use crate::error::MoodlogError;

/// Number of day slots in the calendar. Day 31 has no slot.
pub const CALENDAR_DAYS: usize = 30;

/// Which entry keeps a day slot when several entries share a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The first entry recorded for the day wins.
    #[default]
    Earliest,
    /// The most recently recorded entry for the day wins.
    Latest,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionPolicy::Earliest => write!(f, "earliest"),
            CollisionPolicy::Latest => write!(f, "latest"),
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = MoodlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "earliest" => Ok(CollisionPolicy::Earliest),
            "latest" => Ok(CollisionPolicy::Latest),
            _ => Err(MoodlogError::InvalidCollisionPolicy(s.to_string())),
        }
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = MoodlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MoodlogError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// Thirty day slots holding a mood code, or 0 for a day with no mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodCalendar([u8; CALENDAR_DAYS]);

impl Default for MoodCalendar {
    fn default() -> Self {
        Self([0; CALENDAR_DAYS])
    }
}

impl MoodCalendar {
    /// Build a calendar from entries ordered most recently created first.
    ///
    /// Entries without a valid mood code are skipped, as are entries dated
    /// on day 31.
    pub fn project(entries: &[Entry], policy: CollisionPolicy) -> Self {
        let mut calendar = Self::default();

        // Later writes overwrite earlier ones, so walking newest-first leaves
        // the earliest entry in each slot.
        let ordered: Vec<&Entry> = match policy {
            CollisionPolicy::Earliest => entries.iter().collect(),
            CollisionPolicy::Latest => entries.iter().rev().collect(),
        };

        for entry in ordered {
            let Some(mood) = entry.mood_code() else {
                tracing::debug!(entry_id = entry.id, mood = %entry.mood, "skipping entry without mood code");
                continue;
            };
            if !calendar.set(entry.date.day(), mood) {
                tracing::debug!(entry_id = entry.id, date = %entry.date, "no calendar slot for day");
            }
        }

        calendar
    }

    /// Write a mood into the slot for `day` (1-based). Returns false when
    /// the day has no slot.
    pub fn set(&mut self, day: u32, mood: MoodCode) -> bool {
        match (day as usize).checked_sub(1).and_then(|i| self.0.get_mut(i)) {
            Some(slot) => {
                *slot = mood.get();
                true
            }
            None => false,
        }
    }

    /// Mood recorded for `day` (1-based), if any.
    pub fn day(&self, day: u32) -> Option<MoodCode> {
        (day as usize)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .and_then(|&m| MoodCode::new(m))
    }

    pub fn slots(&self) -> &[u8; CALENDAR_DAYS] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&m| m == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Build entries in creation order and return them newest first, the
    /// order storage hands them out in.
    fn newest_first(specs: &[(u32, &str)]) -> Vec<Entry> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut entries: Vec<Entry> = specs
            .iter()
            .enumerate()
            .map(|(i, (day, mood))| Entry {
                id: i as i64 + 1,
                body: String::new(),
                mood: mood.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, *day).unwrap(),
                created: base + Duration::minutes(i as i64),
                author_id: 1,
                username: "ana".to_string(),
            })
            .collect();
        entries.reverse();
        entries
    }

    #[test]
    fn test_empty_calendar() {
        let calendar = MoodCalendar::project(&[], CollisionPolicy::Earliest);
        assert_eq!(calendar.len(), CALENDAR_DAYS);
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_day_maps_to_slot() {
        let entries = newest_first(&[(1, "3"), (30, "5")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Earliest);

        assert_eq!(calendar.slots()[0], 3);
        assert_eq!(calendar.slots()[29], 5);
        assert_eq!(calendar.day(1), MoodCode::new(3));
        assert_eq!(calendar.day(2), None);
    }

    #[test]
    fn test_same_day_earliest_wins() {
        let entries = newest_first(&[(5, "2"), (5, "4")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Earliest);
        assert_eq!(calendar.slots()[4], 2);
    }

    #[test]
    fn test_same_day_latest_wins() {
        let entries = newest_first(&[(5, "2"), (5, "4")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Latest);
        assert_eq!(calendar.slots()[4], 4);
    }

    #[test]
    fn test_invalid_moods_skipped() {
        let entries = newest_first(&[(2, "9"), (3, "0"), (4, "sad"), (6, "1")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Earliest);

        assert!(!calendar.slots().contains(&9));
        assert_eq!(calendar.slots()[1], 0);
        assert_eq!(calendar.slots()[2], 0);
        assert_eq!(calendar.slots()[3], 0);
        assert_eq!(calendar.slots()[5], 1);
    }

    #[test]
    fn test_invalid_mood_does_not_shadow_valid_one() {
        let entries = newest_first(&[(7, "3"), (7, "9")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Latest);
        assert_eq!(calendar.slots()[6], 3);
    }

    #[test]
    fn test_day_31_dropped() {
        let entries = newest_first(&[(31, "4")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Earliest);

        assert_eq!(calendar.len(), CALENDAR_DAYS);
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_set_rejects_out_of_range_days() {
        let mut calendar = MoodCalendar::default();
        let mood = MoodCode::new(2).unwrap();
        assert!(!calendar.set(0, mood));
        assert!(!calendar.set(31, mood));
        assert!(calendar.set(30, mood));
    }

    #[test]
    fn test_serializes_as_array() {
        let entries = newest_first(&[(2, "5")]);
        let calendar = MoodCalendar::project(&entries, CollisionPolicy::Earliest);
        let json = serde_json::to_value(calendar).unwrap();

        let slots = json.as_array().unwrap();
        assert_eq!(slots.len(), 30);
        assert_eq!(slots[1], 5);
    }

    #[test]
    fn test_collision_policy_from_str() {
        assert_eq!("earliest".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Earliest);
        assert_eq!("LATEST".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Latest);
        assert!("newest".parse::<CollisionPolicy>().is_err());
    }

    #[test]
    fn test_year_month_parse() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month, YearMonth { year: 2024, month: 3 });
        assert_eq!(month.to_string(), "2024-03");

        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-3".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_contains() {
        let month = YearMonth::new(2024, 3).unwrap();
        assert!(month.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert_eq!(YearMonth::of(NaiveDate::from_ymd_opt(2023, 12, 9).unwrap()), YearMonth::new(2023, 12).unwrap());
    }
}
