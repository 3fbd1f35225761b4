use crate::errors::AppError;
use crate::models::{
    Habit, InvalidFieldsResponse, NewDayRequest, NewHabitRequest, RestoreQuery, StateResponse,
    Target,
};
use crate::routing::location_for;
use crate::state::AppState;
use crate::storage::persist_habits;
use crate::tracker::Tracker;
use crate::ui::{PageForms, render_index};
use crate::validation::{DAY_FIELDS, FormView, HABIT_FIELDS, Invalid, validate};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::collections::HashMap;
use tracing::{error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker, &PageForms::default()))
}

/// Applies the startup selection rule to the fragment the browser holds.
pub async fn restore(
    State(state): State<AppState>,
    Query(query): Query<RestoreQuery>,
) -> Redirect {
    let mut tracker = state.tracker.lock().await;
    let active = tracker.bootstrap(query.fragment.as_deref());
    Redirect::to(&location_for(active))
}

pub async fn select_habit(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    let mut tracker = state.tracker.lock().await;
    tracker.select(id);
    Redirect::to(&location_for(tracker.active_id()))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let mut tracker = state.tracker.lock().await;
    let mut fields = match validate(&form, HABIT_FIELDS) {
        Ok(fields) => fields,
        Err(invalid) => {
            let forms = PageForms {
                habit: FormView::rejected(form, invalid),
                popup_open: true,
                ..PageForms::default()
            };
            return Ok(rejected_page(&tracker, &forms));
        }
    };

    let snapshot = tracker.clone();
    let id = tracker
        .add_habit(
            fields.remove("name").unwrap_or_default(),
            fields.remove("icon").unwrap_or_default(),
            Target::Text(fields.remove("target").unwrap_or_default()),
        )
        .ok_or_else(ids_exhausted)?;
    save(&state, &mut tracker, snapshot).await?;
    info!(habit_id = id, "habit added");

    Ok(Redirect::to(&location_for(Some(id))).into_response())
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    let mut tracker = state.tracker.lock().await;
    remove_habit(&state, &mut tracker, id).await?;
    Ok(Redirect::to(&location_for(tracker.active_id())))
}

pub async fn add_day(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let mut tracker = state.tracker.lock().await;
    let mut fields = match validate(&form, DAY_FIELDS) {
        Ok(fields) => fields,
        Err(invalid) => {
            let forms = PageForms {
                day: FormView::rejected(form, invalid),
                ..PageForms::default()
            };
            return Ok(rejected_page(&tracker, &forms));
        }
    };

    let snapshot = tracker.clone();
    if tracker.add_day(fields.remove("comment").unwrap_or_default()) {
        save(&state, &mut tracker, snapshot).await?;
        info!(habit_id = ?tracker.active_id(), "day added");
    }

    Ok(Redirect::to(&location_for(tracker.active_id())).into_response())
}

pub async fn delete_day(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    let mut tracker = state.tracker.lock().await;
    remove_day(&state, &mut tracker, index).await?;
    Ok(Redirect::to(&location_for(tracker.active_id())))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let tracker = state.tracker.lock().await;
    Json(state_response(&tracker))
}

pub async fn api_add_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<Response, AppError> {
    let mut fields = match validate(&payload.to_form(), HABIT_FIELDS) {
        Ok(fields) => fields,
        Err(invalid) => return Ok(invalid_fields(invalid)),
    };
    let target = match payload.target {
        Some(target @ Target::Number(_)) => target,
        _ => Target::Text(fields.remove("target").unwrap_or_default()),
    };

    let mut tracker = state.tracker.lock().await;
    let snapshot = tracker.clone();
    let id = tracker
        .add_habit(
            fields.remove("name").unwrap_or_default(),
            fields.remove("icon").unwrap_or_default(),
            target,
        )
        .ok_or_else(ids_exhausted)?;
    save(&state, &mut tracker, snapshot).await?;
    info!(habit_id = id, "habit added");

    Ok((StatusCode::CREATED, Json(tracker.active())).into_response())
}

pub async fn api_delete_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StateResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    remove_habit(&state, &mut tracker, id).await?;
    Ok(Json(state_response(&tracker)))
}

pub async fn api_select_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<StateResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.select(id);
    Json(state_response(&tracker))
}

pub async fn api_add_day(
    State(state): State<AppState>,
    Json(payload): Json<NewDayRequest>,
) -> Result<Response, AppError> {
    let mut fields = match validate(&payload.to_form(), DAY_FIELDS) {
        Ok(fields) => fields,
        Err(invalid) => return Ok(invalid_fields(invalid)),
    };

    let mut tracker = state.tracker.lock().await;
    let snapshot = tracker.clone();
    if !tracker.add_day(fields.remove("comment").unwrap_or_default()) {
        return Err(AppError::conflict("no habit is active"));
    }
    save(&state, &mut tracker, snapshot).await?;
    info!(habit_id = ?tracker.active_id(), "day added");

    Ok((StatusCode::CREATED, Json(tracker.active())).into_response())
}

pub async fn api_delete_day(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Habit>, AppError> {
    let mut tracker = state.tracker.lock().await;
    remove_day(&state, &mut tracker, index).await?;
    tracker
        .active()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::conflict("no habit is active"))
}

async fn remove_habit(state: &AppState, tracker: &mut Tracker, id: u64) -> Result<(), AppError> {
    let snapshot = tracker.clone();
    if tracker.delete_habit(id) {
        save(state, tracker, snapshot).await?;
        info!(habit_id = id, remaining = tracker.habits().len(), "habit deleted");
    }
    Ok(())
}

async fn remove_day(state: &AppState, tracker: &mut Tracker, index: usize) -> Result<(), AppError> {
    let snapshot = tracker.clone();
    if tracker.delete_day(index) {
        save(state, tracker, snapshot).await?;
        info!(habit_id = ?tracker.active_id(), index, "day deleted");
    }
    Ok(())
}

/// Persists the mutated tracker, or puts `snapshot` back when the write fails
/// so memory never holds changes the data file lacks.
async fn save(state: &AppState, tracker: &mut Tracker, snapshot: Tracker) -> Result<(), AppError> {
    if let Err(err) = persist_habits(&state.data_path, tracker.habits()).await {
        error!("failed to persist habits, change discarded: {}", err.message);
        *tracker = snapshot;
        return Err(err);
    }
    Ok(())
}

fn ids_exhausted() -> AppError {
    AppError::conflict("no habit ids left")
}

fn state_response(tracker: &Tracker) -> StateResponse {
    StateResponse {
        active_id: tracker.active_id(),
        habits: tracker.habits().to_vec(),
        progress: tracker.active_progress(),
    }
}

fn rejected_page(tracker: &Tracker, forms: &PageForms) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(render_index(tracker, forms))).into_response()
}

fn invalid_fields(invalid: Invalid) -> Response {
    let body = InvalidFieldsResponse {
        invalid: invalid.fields,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
