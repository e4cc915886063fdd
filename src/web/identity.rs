//! Resolves the current user for each request.
//!
//! Authentication happens upstream (a reverse proxy or login layer); this
//! middleware trusts the username it forwards in [`USER_HEADER`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::entity::User;
use crate::error::{MoodlogError, Result};

/// Header carrying the authenticated username.
pub const USER_HEADER: &str = "x-moodlog-user";

/// The user making the request, `None` for anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn get(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// The user, or [`MoodlogError::Unauthorized`] on login-required routes.
    pub fn require(&self) -> Result<&User> {
        self.get().ok_or(MoodlogError::Unauthorized)
    }
}

/// Look up the forwarded username and attach a [`CurrentUser`] to the
/// request. A missing header or unknown username leaves the request
/// anonymous.
pub async fn attach_user(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let username = req
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let user = match username {
        Some(name) => {
            let store = state.store.lock().await;
            match store.find_user(&name) {
                Ok(Some(user)) => Some(user),
                Ok(None) => {
                    tracing::trace!(username = %name, "unknown user, treating request as anonymous");
                    None
                }
                Err(e) => return e.into_response(),
            }
        }
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
