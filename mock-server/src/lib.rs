//! In-memory JSON API used as a fixture by the client's integration tests.
//!
//! Routes:
//! - `GET /notes[?q=]`, `POST /notes`
//! - `GET | PUT | DELETE /notes/{id}`
//! - `ANY /echo`: reflects method, raw query, headers and JSON body
//! - `GET /whoami`: requires `authorization: Bearer <token>`
//! - `GET /boom`: 500 with a plain-text body
//! - `GET /empty`: 204
//!
//! Errors are JSON objects of the form
//! `{"error": <kind>, "status": <code>, "message": <text>}`.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
pub struct ListFilter {
    pub q: Option<String>,
}

/// JSON error payload returned for every failure except `/boom`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
    pub message: String,
}

/// What `/echo` saw.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

struct ApiFailure(StatusCode, String);

impl ApiFailure {
    fn not_found(id: Uuid) -> Self {
        Self(StatusCode::NOT_FOUND, format!("note {id} does not exist"))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let kind = match self.0 {
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::UNAUTHORIZED => "unauthorized",
            _ => "error",
        };
        let body = ErrorBody {
            error: kind.to_string(),
            status: self.0.as_u16(),
            message: self.1,
        };
        (self.0, Json(body)).into_response()
    }
}

pub type Db = Arc<RwLock<HashMap<Uuid, Note>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).put(update_note).delete(delete_note))
        .route("/echo", any(echo))
        .route("/whoami", get(whoami))
        .route("/boom", get(boom))
        .route("/empty", get(empty))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_notes(State(db): State<Db>, Query(filter): Query<ListFilter>) -> Json<Vec<Note>> {
    let notes = db.read().await;
    let mut matching: Vec<Note> = notes
        .values()
        .filter(|note| filter.q.as_ref().map_or(true, |q| note.title.contains(q.as_str())))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.title.cmp(&b.title));
    Json(matching)
}

async fn create_note(
    State(db): State<Db>,
    Json(input): Json<CreateNote>,
) -> (StatusCode, Json<Note>) {
    let note = Note {
        id: Uuid::new_v4(),
        title: input.title,
        body: input.body,
    };
    db.write().await.insert(note.id, note.clone());
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Note>, ApiFailure> {
    let notes = db.read().await;
    notes.get(&id).cloned().map(Json).ok_or_else(|| ApiFailure::not_found(id))
}

async fn update_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateNote>,
) -> Result<Json<Note>, ApiFailure> {
    let mut notes = db.write().await;
    let note = notes.get_mut(&id).ok_or_else(|| ApiFailure::not_found(id))?;
    if let Some(title) = input.title {
        note.title = title;
    }
    if let Some(body) = input.body {
        note.body = body;
    }
    Ok(Json(note.clone()))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiFailure> {
    let mut notes = db.write().await;
    notes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found(id))
}

async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    Json(Echo {
        method: method.to_string(),
        query,
        headers,
        body,
    })
}

async fn whoami(headers: HeaderMap) -> Result<Json<serde_json::Value>, ApiFailure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiFailure(StatusCode::UNAUTHORIZED, "missing bearer token".to_string()))?;
    Ok(Json(serde_json::json!({ "token": token })))
}

async fn boom() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
