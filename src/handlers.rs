use crate::dates::{canonical_day_key, to_day_key, today};
use crate::errors::AppError;
use crate::models::{
    BadgesResponse, CalendarMonth, CalendarQuery, DeleteResponse, Habit, HabitView,
    NewHabitRequest, StatsResponse, ToggleRequest, ToggleResponse,
};
use crate::state::AppState;
use crate::stats::{build_calendar_at, build_stats};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{DateTime, Datelike, Utc};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let now = Utc::now();
    let store = state.store.lock().await;
    let views = habit_views(store.habits(), now);
    let stats = build_stats(store.habits());
    Html(render_index(&to_day_key(now), &views, store.badges(), &stats))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitView>> {
    let store = state.store.lock().await;
    Json(habit_views(store.habits(), Utc::now()))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let mut store = state.store.lock().await;
    match blocking(|| store.add_habit(&payload.name, &payload.description, &payload.color))? {
        Some(habit) => Ok((StatusCode::CREATED, Json(habit))),
        None => Err(AppError::bad_request("habit name must not be blank")),
    }
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut store = state.store.lock().await;
    let deleted = blocking(|| store.delete_habit(&habit_id))?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Toggles `date` (today when omitted) for the habit.
pub async fn toggle_completion(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    payload: Option<Json<ToggleRequest>>,
) -> Result<Json<ToggleResponse>, AppError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let date = request.date.unwrap_or_else(|| to_day_key(Utc::now()));

    let mut store = state.store.lock().await;
    let outcome = blocking(|| store.toggle_completion(&habit_id, &date))?
        .ok_or_else(|| AppError::not_found(format!("no habit with id {habit_id}")))?;

    Ok(Json(ToggleResponse {
        date: canonical_day_key(&date).unwrap_or(date),
        habit: outcome.habit,
        completed: outcome.completed,
        newly_earned: outcome.newly_earned,
    }))
}

pub async fn get_badges(State(state): State<AppState>) -> Json<BadgesResponse> {
    let store = state.store.lock().await;
    Json(BadgesResponse {
        badges: store.badges().to_vec(),
        earned: store.earned_badges().cloned().collect(),
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    Json(build_stats(store.habits()))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let today = today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let store = state.store.lock().await;
    build_calendar_at(today, store.habits(), year, month)
        .map(Json)
        .ok_or_else(|| AppError::bad_request("invalid year or month"))
}

pub async fn form_add_habit(
    State(state): State<AppState>,
    Form(payload): Form<NewHabitRequest>,
) -> Result<Redirect, AppError> {
    let mut store = state.store.lock().await;
    blocking(|| store.add_habit(&payload.name, &payload.description, &payload.color))?;
    Ok(Redirect::to("/"))
}

pub async fn form_toggle_today(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut store = state.store.lock().await;
    blocking(|| store.toggle_completion(&habit_id, &to_day_key(Utc::now())))?;
    Ok(Redirect::to("/"))
}

pub async fn form_delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut store = state.store.lock().await;
    blocking(|| store.delete_habit(&habit_id))?;
    Ok(Redirect::to("/"))
}

/// Store mutations write through `FileStore`, which does blocking file I/O.
fn blocking<T>(mutation: impl FnOnce() -> T) -> T {
    tokio::task::block_in_place(mutation)
}

fn habit_views(habits: &[Habit], now: DateTime<Utc>) -> Vec<HabitView> {
    let today = to_day_key(now);
    habits
        .iter()
        .map(|habit| HabitView {
            completion_rate: habit.completion_rate(now),
            completed_today: habit.is_completed_on(&today),
            habit: habit.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStore;
    use crate::store::HabitStore;

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        AppState::new(HabitStore::load(FileStore::new(dir.path())))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn add_habit_writes_through_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let request = NewHabitRequest {
            name: "Read".into(),
            description: String::new(),
            color: String::new(),
        };

        let (status, Json(habit)) = add_habit(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let stored = std::fs::read_to_string(dir.path().join("habits.json")).unwrap();
        assert!(stored.contains(&habit.id));

        let Json(deleted) = delete_habit(State(state), Path(habit.id)).await.unwrap();
        assert!(deleted.deleted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_unknown_habit_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let request = ToggleRequest {
            date: Some("garbage".into()),
        };
        let err = toggle_completion(State(state_in(&dir)), Path("missing".into()), Some(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn calendar_rejects_out_of_range_year() {
        let dir = tempfile::tempdir().unwrap();
        let query = CalendarQuery {
            year: Some(chrono::NaiveDate::MIN.year()),
            month: Some(1),
        };
        let err = get_calendar(State(state_in(&dir)), Query(query)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "invalid year or month");
    }
}
