pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod service;
pub mod storage;
pub mod tracker;
pub mod web;

pub use config::Config;
pub use error::{MoodlogError, Result};
pub use service::EntryService;
pub use storage::SqliteStore;
pub use tracker::{CollisionPolicy, MoodCalendar};
