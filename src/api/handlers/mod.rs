use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::extract::ValidJson;
use crate::db::{Database, SortDir, SortField};
use crate::error::Error;
use crate::models::*;

/// Query parameters for the opportunity list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: Uuid,
}

fn ok_body() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(db): State<Database>) -> impl IntoResponse {
    match db.ping() {
        Ok(()) => ok_body().into_response(),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ============================================================
// Opportunities
// ============================================================

pub async fn list_opportunities(
    State(db): State<Database>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Opportunity>>, Error> {
    let sort = SortField::parse(query.sort.as_deref().unwrap_or("updated"));
    let dir = SortDir::parse(query.dir.as_deref().unwrap_or("desc"));
    db.list_opportunities(&query.q, sort, dir).map(Json)
}

pub async fn get_opportunity(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<OpportunityDetail>, Error> {
    db.get_opportunity_detail(id)?
        .map(Json)
        .ok_or(Error::NotFound("opportunity"))
}

pub async fn create_opportunity(
    State(db): State<Database>,
    ValidJson(input): ValidJson<OpportunityInput>,
) -> Result<(StatusCode, Json<Created>), Error> {
    let id = db.create_opportunity(&input)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update_opportunity(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    ValidJson(input): ValidJson<OpportunityInput>,
) -> Result<Json<serde_json::Value>, Error> {
    if db.update_opportunity(id, &input)? {
        Ok(ok_body())
    } else {
        Err(Error::NotFound("opportunity"))
    }
}

pub async fn delete_opportunity(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Error> {
    if db.delete_opportunity(id)? {
        Ok(ok_body())
    } else {
        Err(Error::NotFound("opportunity"))
    }
}

// ============================================================
// Notes
// ============================================================

pub async fn add_note(
    State(db): State<Database>,
    Path(opportunity_id): Path<Uuid>,
    ValidJson(input): ValidJson<NoteInput>,
) -> Result<(StatusCode, Json<Created>), Error> {
    let id = db.add_note(opportunity_id, &input)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn delete_note(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Error> {
    if db.delete_note(id)? {
        Ok(ok_body())
    } else {
        Err(Error::NotFound("note"))
    }
}

// ============================================================
// Next steps
// ============================================================

pub async fn add_step(
    State(db): State<Database>,
    Path(opportunity_id): Path<Uuid>,
    ValidJson(input): ValidJson<StepInput>,
) -> Result<(StatusCode, Json<Created>), Error> {
    let id = db.add_step(opportunity_id, &input)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn toggle_step(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    ValidJson(input): ValidJson<ToggleStepInput>,
) -> Result<Json<serde_json::Value>, Error> {
    if db.set_step_done(id, input.is_done)? {
        Ok(ok_body())
    } else {
        Err(Error::NotFound("step"))
    }
}

pub async fn delete_step(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Error> {
    if db.delete_step(id)? {
        Ok(ok_body())
    } else {
        Err(Error::NotFound("step"))
    }
}
