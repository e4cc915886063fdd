mod entry;
mod user;

pub use entry::{Entry, EntryForm, EntryId, MoodCode, ValidEntry, DATE_FORMAT};
pub use user::User;
