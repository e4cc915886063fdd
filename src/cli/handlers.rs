use std::path::PathBuf;

use crate::config::Config;
use crate::entity::User;
use crate::error::{MoodlogError, Result};
use crate::service::EntryService;
use crate::storage::SqliteStore;
use crate::tracker::{MoodCalendar, YearMonth};
use crate::web;

fn load_config(db: Option<PathBuf>) -> Result<Config> {
    Config::from_env()?.with_overrides(db, None, None)
}

fn open_store(db: Option<PathBuf>) -> Result<(Config, SqliteStore)> {
    let config = load_config(db)?;
    let store = SqliteStore::open(&config.db_path)?;
    Ok((config, store))
}

fn find_user(store: &SqliteStore, username: &str) -> Result<User> {
    store
        .find_user(username)?
        .ok_or_else(|| MoodlogError::UserNotFound(username.to_string()))
}

pub fn handle_init(db: Option<PathBuf>) -> Result<()> {
    let config = load_config(db)?;
    SqliteStore::init(&config.db_path)?;

    println!("Initialized moodlog database at {}", config.db_path.display());
    Ok(())
}

pub fn handle_serve(db: Option<PathBuf>, addr: Option<String>, collision: Option<String>) -> Result<()> {
    let config = Config::from_env()?.with_overrides(db, addr, collision)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(config))
}

pub fn handle_user_add(db: Option<PathBuf>, username: String) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(MoodlogError::Validation("Username is required.".to_string()));
    }

    let (_, store) = open_store(db)?;
    let user = store.create_user(username)?;
    tracing::info!(user_id = user.id, username = %user.username, "registered user");

    println!("Added user {} ({})", user.username, user.id);
    Ok(())
}

pub fn handle_user_list(db: Option<PathBuf>, json: bool) -> Result<()> {
    let (_, store) = open_store(db)?;
    let users = store.list_users()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    for user in users {
        println!("{:>4}  {}", user.id, user.username);
    }
    Ok(())
}

pub fn handle_list(db: Option<PathBuf>, username: String, json: bool) -> Result<()> {
    let (_, store) = open_store(db)?;
    let user = find_user(&store, &username)?;
    let entries = EntryService::new(&store).list_mine(Some(&user))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    for entry in entries {
        let body = entry.body.lines().next().unwrap_or("");
        println!("{:>4}  {}  mood {:<3} {}", entry.id, entry.date, entry.mood, body);
    }
    Ok(())
}

pub fn handle_tracker(
    db: Option<PathBuf>,
    username: String,
    month: Option<String>,
    collision: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::from_env()?.with_overrides(db, None, collision)?;
    let month = month.as_deref().map(str::parse::<YearMonth>).transpose()?;

    let store = SqliteStore::open(&config.db_path)?;
    let user = find_user(&store, &username)?;
    let calendar = EntryService::new(&store)
        .with_policy(config.collision)
        .tracker(Some(&user), month)?;

    if json {
        println!("{}", serde_json::to_string(&calendar)?);
    } else {
        print!("{}", render_calendar(&calendar));
    }
    Ok(())
}

/// Plain-text calendar: one row per week of the month, `.` for empty days.
fn render_calendar(calendar: &MoodCalendar) -> String {
    let mut out = String::new();
    for (week, days) in calendar.slots().chunks(7).enumerate() {
        let start = week * 7 + 1;
        out.push_str(&format!("{:>2}-{:<2} ", start, start + days.len() - 1));
        let cells: Vec<String> = days
            .iter()
            .map(|&m| if m == 0 { ".".to_string() } else { m.to_string() })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MoodCode;

    #[test]
    fn test_render_empty_calendar() {
        let rendered = render_calendar(&MoodCalendar::default());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " 1-7  . . . . . . .");
        assert_eq!(lines[4], "29-30 . .");
    }

    #[test]
    fn test_render_marks_moods() {
        let mut calendar = MoodCalendar::default();
        calendar.set(2, MoodCode::new(4).unwrap());

        let rendered = render_calendar(&calendar);
        assert!(rendered.starts_with(" 1-7  . 4 . . . . ."));
    }
}
