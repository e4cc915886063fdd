use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::{Extension, Form, Json};
use serde::Deserialize;

use super::identity::CurrentUser;
use super::AppState;
use crate::entity::{Entry, EntryForm, EntryId};
use crate::error::Result;
use crate::service::EntryService;
use crate::tracker::{MoodCalendar, YearMonth};

const LISTING: &str = "/";

#[derive(Debug, Default, Deserialize)]
pub struct TrackerParams {
    /// Restrict the calendar to one month, `YYYY-MM`
    pub month: Option<String>,
}

/// List the current user's entries, newest first. Anonymous visitors get an
/// empty list.
#[tracing::instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Entry>>> {
    let store = state.store.lock().await;
    let entries = EntryService::new(&store).list_mine(user.get())?;
    Ok(Json(entries))
}

/// Blank form for a new entry.
pub async fn create_form(Extension(user): Extension<CurrentUser>) -> Result<Json<EntryForm>> {
    user.require()?;
    Ok(Json(EntryForm::default()))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<EntryForm>,
) -> Result<Redirect> {
    let user = user.require()?;
    let store = state.store.lock().await;
    EntryService::new(&store).create(Some(user), &form)?;
    Ok(Redirect::to(LISTING))
}

/// The stored entry, used to prefill the update form.
#[tracing::instrument(skip(state, user))]
pub async fn update_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<EntryId>,
) -> Result<Json<Entry>> {
    let user = user.require()?;
    let store = state.store.lock().await;
    let entry = EntryService::new(&store).get_by_id(Some(user), id, true)?;
    Ok(Json(entry))
}

#[tracing::instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<EntryId>,
    Form(form): Form<EntryForm>,
) -> Result<Redirect> {
    let user = user.require()?;
    let store = state.store.lock().await;
    EntryService::new(&store).update(Some(user), id, &form)?;
    Ok(Redirect::to(LISTING))
}

#[tracing::instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<EntryId>,
) -> Result<Redirect> {
    let user = user.require()?;
    let store = state.store.lock().await;
    EntryService::new(&store).delete(Some(user), id)?;
    Ok(Redirect::to(LISTING))
}

#[tracing::instrument(skip(state, user))]
pub async fn tracker(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<TrackerParams>,
) -> Result<Json<MoodCalendar>> {
    let user = user.require()?;
    let month = params
        .month
        .as_deref()
        .map(str::parse::<YearMonth>)
        .transpose()?;

    let store = state.store.lock().await;
    let calendar = EntryService::new(&store)
        .with_policy(state.collision)
        .tracker(Some(user), month)?;
    Ok(Json(calendar))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
