// src/entity/user.rs
use serde::{Deserialize, Serialize};

/// An account that can own entries. Accounts are created by an administrator;
/// this crate never authenticates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}
