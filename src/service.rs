//! Entry operations scoped to the current user.
//!
//! Every call takes the current user explicitly; `None` is an anonymous
//! visitor. Reads degrade to empty results for anonymous visitors, writes
//! refuse with [`MoodlogError::Unauthorized`].

use crate::entity::{Entry, EntryForm, EntryId, User};
use crate::error::{MoodlogError, Result};
use crate::storage::SqliteStore;
use crate::tracker::{CollisionPolicy, MoodCalendar, YearMonth};

pub struct EntryService<'a> {
    store: &'a SqliteStore,
    policy: CollisionPolicy,
}

impl<'a> EntryService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self {
            store,
            policy: CollisionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Entries authored by `user`, most recently created first.
    pub fn list_mine(&self, user: Option<&User>) -> Result<Vec<Entry>> {
        let Some(user) = user else {
            return Ok(Vec::new());
        };

        let entries = self
            .store
            .list_entries()?
            .into_iter()
            .filter(|entry| entry.is_owned_by(user.id))
            .collect();
        Ok(entries)
    }

    /// Fetch one entry. A missing entry is reported before ownership is
    /// checked, so non-authors can tell a missing id from a foreign one.
    pub fn get_by_id(&self, user: Option<&User>, id: EntryId, check_author: bool) -> Result<Entry> {
        let entry = self
            .store
            .get_entry(id)?
            .ok_or(MoodlogError::NotFound(id))?;

        if check_author && !user.is_some_and(|u| entry.is_owned_by(u.id)) {
            tracing::warn!(entry_id = id, user = ?user.map(|u| &u.username), "entry requested by non-author");
            return Err(MoodlogError::Forbidden);
        }

        Ok(entry)
    }

    /// Record a new entry for `user`.
    pub fn create(&self, user: Option<&User>, form: &EntryForm) -> Result<EntryId> {
        let user = require_user(user)?;
        let valid = form.validate().map_err(MoodlogError::Validation)?;

        let id = self.store.insert_entry(user.id, &valid)?;
        tracing::info!(entry_id = id, user = %user.username, "created entry");
        Ok(id)
    }

    /// Replace the body, mood and date of an entry `user` authored.
    pub fn update(&self, user: Option<&User>, id: EntryId, form: &EntryForm) -> Result<()> {
        let user = require_user(user)?;
        self.get_by_id(Some(user), id, true)?;
        let valid = form.validate().map_err(MoodlogError::Validation)?;

        self.store.update_entry(id, &valid)?;
        tracing::info!(entry_id = id, user = %user.username, "updated entry");
        Ok(())
    }

    /// Permanently remove an entry `user` authored.
    pub fn delete(&self, user: Option<&User>, id: EntryId) -> Result<()> {
        let user = require_user(user)?;
        self.get_by_id(Some(user), id, true)?;

        self.store.delete_entry(id)?;
        tracing::info!(entry_id = id, user = %user.username, "deleted entry");
        Ok(())
    }

    /// Mood calendar of `user`'s entries, optionally limited to one month.
    pub fn tracker(&self, user: Option<&User>, month: Option<YearMonth>) -> Result<MoodCalendar> {
        let entries: Vec<Entry> = self
            .list_mine(user)?
            .into_iter()
            .filter(|entry| month.map_or(true, |m| m.contains(entry.date)))
            .collect();

        Ok(MoodCalendar::project(&entries, self.policy))
    }
}

fn require_user(user: Option<&User>) -> Result<&User> {
    user.ok_or(MoodlogError::Unauthorized)
}
