//! Patient listing and mutation handlers.
//!
//! Listing is open to any authenticated user; every mutation route lives
//! under `/admin` and is gated by the admin middleware before the handler
//! runs. Mutations redirect back to the listing, preserving `page` and
//! `keyword` so the client lands on the view it came from.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, FieldError};
use crate::api::types::{ApiContext, UserContext};
use crate::config;
use crate::db::repository::patient;
use crate::models::Patient;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(default)]
    pub keyword: String,
}

fn default_page_size() -> u32 {
    config::DEFAULT_PAGE_SIZE
}

/// View model for the listing.
#[derive(Debug, Serialize)]
pub struct PatientListView {
    pub patients: Vec<Patient>,
    pub total_pages: u32,
    pub current_page: u32,
    pub keyword: String,
}

/// `GET /user/index` — paginated, keyword-filtered listing.
pub async fn index(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<UserContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PatientListView>, ApiError> {
    if query.size == 0 {
        return Err(ApiError::BadRequest("size must be positive".into()));
    }

    let conn = ctx
        .db
        .lock()
        .map_err(|_| ApiError::Internal("db lock".into()))?;
    let page = patient::find_page(&conn, &query.keyword, query.page, query.size)?;

    Ok(Json(PatientListView {
        patients: page.items,
        total_pages: page.total_pages,
        current_page: query.page,
        keyword: query.keyword,
    }))
}

/// `GET /` — unconditional redirect to the listing.
pub async fn home() -> Redirect {
    Redirect::to("/user/index")
}

#[derive(Deserialize)]
pub struct MutationQuery {
    pub id: i64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub keyword: String,
}

/// `GET /admin/delete` — delete by id, then redirect back to the listing.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<MutationQuery>,
) -> Result<Redirect, ApiError> {
    {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        patient::delete_by_id(&conn, query.id)?;
    }
    tracing::info!(username = %user.username, id = query.id, "patient deleted");
    Ok(list_redirect(query.page, &query.keyword))
}

/// View model for the create/edit form.
#[derive(Debug, Serialize)]
pub struct PatientFormView {
    pub patient: Patient,
    pub errors: Vec<FieldError>,
}

/// `GET /admin/formPatients` — blank form for creating a patient.
pub async fn form(Extension(_user): Extension<UserContext>) -> Json<PatientFormView> {
    Json(PatientFormView {
        patient: Patient::default(),
        errors: Vec::new(),
    })
}

#[derive(Deserialize)]
pub struct SaveForm {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub is_sick: bool,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub keyword: String,
}

/// `POST /admin/save` — validate and upsert, then redirect to the listing.
/// Validation failures re-render the form view with field errors (422)
/// and leave the store untouched.
pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Form(form): Form<SaveForm>,
) -> Result<Response, ApiError> {
    let submitted = Patient {
        id: form.id,
        name: form.name,
        birth_date: form.birth_date,
        is_sick: form.is_sick,
        score: form.score,
    };

    let errors = validate(&submitted);
    if !errors.is_empty() {
        let view = PatientFormView {
            patient: submitted,
            errors,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response());
    }

    let saved = {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        patient::save(&conn, &submitted)?
    };
    tracing::info!(username = %user.username, id = ?saved.id, "patient saved");

    Ok(list_redirect(form.page, &form.keyword).into_response())
}

/// View model for the edit form, carrying `page`/`keyword` so a
/// subsequent save round-trips back to the same listing view.
#[derive(Debug, Serialize)]
pub struct PatientEditView {
    pub patient: Patient,
    pub page: u32,
    pub keyword: String,
}

/// `GET /admin/editPatient` — pre-filled form for an existing patient.
/// An unknown id is a fatal request error.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<UserContext>,
    Query(query): Query<MutationQuery>,
) -> Result<Json<PatientEditView>, ApiError> {
    let found = {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;
        patient::find_by_id(&conn, query.id)?
    };
    let found = found.ok_or_else(|| ApiError::NotFound("Patient introuvable".into()))?;

    Ok(Json(PatientEditView {
        patient: found,
        page: query.page,
        keyword: query.keyword,
    }))
}

fn validate(patient: &Patient) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if patient.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "name must not be blank".to_string(),
        });
    }
    errors
}

/// Redirect back to the listing, percent-encoding the keyword so `&`,
/// `#`, and control characters survive the round-trip as data instead of
/// splitting the query or producing an invalid Location header.
fn list_redirect(page: u32, keyword: &str) -> Redirect {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("page", &page.to_string())
        .append_pair("keyword", keyword)
        .finish();
    Redirect::to(&format!("/user/index?{query}"))
}
